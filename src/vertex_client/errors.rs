// ============================================================================
// DiabRisk Relay - Erreurs Client Vertex AI
// ============================================================================

use std::fmt;

/// Erreurs possibles du client de prédiction Vertex AI.
///
/// Au niveau du relais, toutes les variantes se réduisent à leur message:
/// l'appelant reçoit le texte tel quel, sans classification ni nouvelle
/// tentative.
#[derive(Debug, Clone)]
pub enum VertexClientError {
    /// Lecture ou parsing du fichier de compte de service impossible
    CredentialError(String),

    /// Obtention du jeton d'accès refusée ou impossible
    AuthError(String),

    /// Erreur réseau (timeout, connexion refusée, etc.)
    NetworkError(String),

    /// Réponse HTTP non-2xx du service de prédiction
    HttpError(u16, String),

    /// Erreur de parsing JSON de la réponse
    ParseError(String),

    /// Erreur de création du client HTTP
    ClientError(String),
}

impl fmt::Display for VertexClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexClientError::CredentialError(msg) => write!(f, "Erreur credentials: {}", msg),
            VertexClientError::AuthError(msg) => write!(f, "Erreur authentification: {}", msg),
            VertexClientError::NetworkError(msg) => write!(f, "Erreur réseau: {}", msg),
            VertexClientError::HttpError(code, msg) => write!(f, "Erreur HTTP {}: {}", code, msg),
            VertexClientError::ParseError(msg) => write!(f, "Erreur parsing: {}", msg),
            VertexClientError::ClientError(msg) => write!(f, "Erreur client: {}", msg),
        }
    }
}

impl std::error::Error for VertexClientError {}

// Conversion en String pour l'enveloppe d'erreur du relais
impl From<VertexClientError> for String {
    fn from(err: VertexClientError) -> String {
        err.to_string()
    }
}

/// Résultat typé pour les opérations du client Vertex
pub type VertexResult<T> = Result<T, VertexClientError>;
