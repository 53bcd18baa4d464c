// ============================================================================
// DiabRisk Relay - Routes HTTP
// ============================================================================

use actix_web::web;

use super::{handlers, metrics};

/// Configure toutes les routes du serveur HTTP
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(handlers::health_check))
        // Calcul d'IMC (pur, aucun appel sortant)
        .route("/api/bmi", web::get().to(handlers::compute_bmi))
        // Relais de prédiction: POST uniquement, toute autre méthode -> 405
        .service(
            web::resource("/api/predict")
                .route(web::post().to(handlers::predict))
                .default_service(web::route().to(handlers::method_not_allowed)),
        )
        // Métriques Prometheus
        .route("/metrics", web::get().to(metrics::metrics_handler))
        // Route inconnue -> 404 JSON
        .default_service(web::route().to(handlers::not_found));
}
