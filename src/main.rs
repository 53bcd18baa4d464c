// ============================================================================
// DiabRisk Relay - Point d'entrée
// ============================================================================
// Service local de prédiction du risque de diabète: reçoit les dossiers de
// santé du formulaire web, calcule l'IMC côté serveur et relaie les demandes
// de prédiction vers un endpoint Vertex AI.
// ============================================================================

mod bmi;
mod config;
mod http_server;
mod risk;
mod vertex_client;

use std::sync::Arc;

use http_server::metrics::Metrics;
use vertex_client::{Predictor, VertexClient};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Charger la configuration (fichier TOML puis variables d'environnement)
    let config = config::get_config();

    // Initialiser le logger (RUST_LOG prioritaire sur le niveau configuré)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .format_timestamp_millis()
    .format_module_path(false)
    .init();

    log::info!("🚀 Démarrage DiabRisk Relay v{}", env!("CARGO_PKG_VERSION"));

    // Écrire un fichier de configuration par défaut si absent
    config::AppConfig::ensure_config_file();

    // Initialiser les métriques
    Metrics::init();

    // Créer le client Vertex AI (client HTTP + compte de service)
    let predictor: Arc<dyn Predictor> = match VertexClient::new(config.vertex.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("❌ Initialisation du client Vertex AI impossible: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "📡 Endpoint de prédiction: projects/{}/locations/{}/endpoints/{}",
        config.vertex.project_id,
        config.vertex.location,
        config.vertex.endpoint_id
    );
    log::info!("🌐 Routes: GET /health, GET /api/bmi, POST /api/predict, GET /metrics");

    http_server::start_server(&config.http_host, config.http_port, predictor).await
}
