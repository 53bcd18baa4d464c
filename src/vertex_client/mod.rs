// ============================================================================
// DiabRisk Relay - Client Vertex AI
// ============================================================================
//
// Client HTTP sortant vers l'endpoint de prédiction Vertex AI.
// Authentification par compte de service Google (fichier JSON local),
// jeton OAuth2 obtenu via gcp_auth et renouvelé à la demande.

pub mod errors;
pub mod models;

pub use errors::{VertexClientError, VertexResult};
pub use models::{VertexPredictRequest, VertexPredictResponse};

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::VertexConfig;

/// Version de l'API Vertex AI pour les appels de prédiction
const API_VERSION: &str = "v1beta1";

/// Scope OAuth2 requis par aiplatform.googleapis.com
const CLOUD_PLATFORM_SCOPE: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Timeout de connexion TCP (secondes)
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Abstraction de l'appel de prédiction.
///
/// Le serveur HTTP ne dépend que de ce trait: `VertexClient` en production,
/// un stub contrôlable dans les tests de handlers.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Envoie les instances au modèle et retourne sa réponse brute.
    async fn predict(&self, instances: Vec<Value>) -> VertexResult<VertexPredictResponse>;
}

/// Chemin ressource complet de l'endpoint de prédiction
fn endpoint_resource(config: &VertexConfig) -> String {
    format!(
        "projects/{}/locations/{}/endpoints/{}",
        config.project_id, config.location, config.endpoint_id
    )
}

/// URL complète de l'appel `:predict` (hôte régional aiplatform)
fn predict_url(config: &VertexConfig) -> String {
    format!(
        "https://{}-aiplatform.googleapis.com/{}/{}:predict",
        config.location,
        API_VERSION,
        endpoint_resource(config)
    )
}

/// Client de prédiction vers un endpoint Vertex AI
pub struct VertexClient {
    http: reqwest::Client,
    credentials: CustomServiceAccount,
    config: VertexConfig,
}

impl VertexClient {
    /// Crée le client: connexion HTTP réutilisable, compte de service chargé
    /// une seule fois au démarrage.
    pub fn new(config: VertexConfig) -> VertexResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| VertexClientError::ClientError(e.to_string()))?;

        let credentials = CustomServiceAccount::from_file(PathBuf::from(&config.credentials_file))
            .map_err(|e| VertexClientError::CredentialError(e.to_string()))?;

        info!("🔑 Compte de service chargé: {}", config.credentials_file);

        Ok(VertexClient {
            http,
            credentials,
            config,
        })
    }
}

#[async_trait]
impl Predictor for VertexClient {
    async fn predict(&self, instances: Vec<Value>) -> VertexResult<VertexPredictResponse> {
        let token = self
            .credentials
            .token(CLOUD_PLATFORM_SCOPE)
            .await
            .map_err(|e| VertexClientError::AuthError(e.to_string()))?;

        let url = predict_url(&self.config);
        debug!("🌐 POST {} ({} instance(s))", url, instances.len());

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", token.as_str()))
            .json(&VertexPredictRequest { instances })
            .send()
            .await
            .map_err(|e| VertexClientError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VertexClientError::HttpError(status.as_u16(), body));
        }

        let parsed: VertexPredictResponse = response
            .json()
            .await
            .map_err(|e| VertexClientError::ParseError(e.to_string()))?;

        info!(
            "✅ Prédiction reçue de l'endpoint {} (modèle: {})",
            self.config.endpoint_id,
            parsed.model_display_name.as_deref().unwrap_or("?")
        );

        Ok(parsed)
    }
}

// ============================================================================
// Tests
// ============================================================================
