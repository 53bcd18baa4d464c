// ============================================================================
// DiabRisk Relay - Modèles de données Vertex AI
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Corps de la requête `:predict` envoyée au endpoint Vertex AI.
///
/// Chaque instance est un objet JSON dont toutes les valeurs sont des
/// chaînes de caractères (contrat du modèle AutoML déployé).
#[derive(Debug, Clone, Serialize)]
pub struct VertexPredictRequest {
    pub instances: Vec<Value>,
}

/// Réponse du endpoint `:predict`.
///
/// Le champ `predictions` est conservé tel quel (JSON brut): sa forme dépend
/// du modèle déployé et le relais ne doit ni la valider ni la transformer.
/// Les métadonnées sont optionnelles selon la version de l'API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexPredictResponse {
    #[serde(default)]
    pub predictions: Value,

    #[serde(default)]
    pub deployed_model_id: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub model_display_name: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
