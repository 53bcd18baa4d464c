// ============================================================================
// DiabRisk Relay - Module Serveur HTTP Local
// ============================================================================
// Ce module expose le serveur HTTP local qui reçoit les dossiers de santé
// du formulaire web et relaie les demandes de prédiction vers Vertex AI.
// ============================================================================

pub mod handlers;
pub mod metrics;
pub mod routes;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use crate::vertex_client::Predictor;

/// État partagé du serveur HTTP
pub struct HttpServerState {
    pub predictor: Arc<dyn Predictor>,
}

/// Démarre le serveur HTTP sur l'adresse et le port spécifiés
pub async fn start_server(
    host: &str,
    port: u16,
    predictor: Arc<dyn Predictor>,
) -> std::io::Result<()> {
    let state = web::Data::new(HttpServerState { predictor });

    println!("🌐 [HTTP Server] Démarrage sur http://{}:{}", host, port);

    HttpServer::new(move || {
        // Configuration CORS permissive pour le formulaire servi en localhost
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:8080")
            .allowed_origin_fn(|origin, _req_head| {
                // Autoriser tous les ports localhost
                origin.as_bytes().starts_with(b"http://localhost:")
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
