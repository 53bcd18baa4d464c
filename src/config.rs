// ============================================================================
// DiabRisk Relay - Configuration Externalisée
// ============================================================================
// Gère les paramètres configurables via fichier TOML et variables d'environnement
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Configuration de l'application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Adresse d'écoute du serveur HTTP local (défaut: 127.0.0.1)
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// Port du serveur HTTP local (défaut: 8080)
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Niveau de log (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Paramètres de l'endpoint de prédiction Vertex AI
    #[serde(default)]
    pub vertex: VertexConfig,
}

/// Configuration du service de prédiction distant.
///
/// Les trois identifiants (projet, région, endpoint) ne sont pas validés au
/// chargement: une valeur absente se manifeste comme un échec de l'appel
/// distant, relayé tel quel à l'appelant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexConfig {
    /// Identifiant du projet GCP (surcharge: GCP_PROJECT_ID)
    #[serde(default)]
    pub project_id: String,

    /// Région du déploiement, ex: "asia-east1" (surcharge: GCP_REGION)
    #[serde(default)]
    pub location: String,

    /// Identifiant numérique de l'endpoint déployé (surcharge: VERTEX_ENDPOINT_ID)
    #[serde(default)]
    pub endpoint_id: String,

    /// Fichier de credentials du compte de service
    /// (surcharge: VERTEX_CREDENTIALS_FILE)
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Timeout des requêtes vers le service de prédiction, en secondes
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_http_host() -> String { "127.0.0.1".to_string() }
fn default_http_port() -> u16 { 8080 }
fn default_log_level() -> String { "info".to_string() }
fn default_credentials_file() -> String { "service-account.json".to_string() }
fn default_timeout_secs() -> u64 { 30 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_host: default_http_host(),
            http_port: default_http_port(),
            log_level: default_log_level(),
            vertex: VertexConfig::default(),
        }
    }
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: String::new(),
            endpoint_id: String::new(),
            credentials_file: default_credentials_file(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Chemin du fichier de configuration
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("diabrisk-relay").join("config.toml"))
    }

    /// Charge la configuration depuis le fichier TOML ou utilise les valeurs
    /// par défaut, puis applique les surcharges d'environnement
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_env_overrides();
        config
    }

    fn load_file() -> Self {
        // 1. Essayer de charger depuis le fichier
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(config) = toml::from_str::<AppConfig>(&content) {
                        println!("📁 [Config] Chargé depuis {:?}", path);
                        return config;
                    } else {
                        eprintln!("⚠️ [Config] Erreur parsing {:?}, utilisation des valeurs par défaut", path);
                    }
                }
            }
        }

        // 2. Utiliser les valeurs par défaut
        println!("📁 [Config] Utilisation de la configuration par défaut");
        Self::default()
    }

    /// Applique les variables d'environnement (prioritaires sur le fichier).
    /// Noms hérités du déploiement d'origine: GCP_PROJECT_ID, GCP_REGION,
    /// VERTEX_ENDPOINT_ID.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("GCP_PROJECT_ID") {
            self.vertex.project_id = v;
        }
        if let Ok(v) = std::env::var("GCP_REGION") {
            self.vertex.location = v;
        }
        if let Ok(v) = std::env::var("VERTEX_ENDPOINT_ID") {
            self.vertex.endpoint_id = v;
        }
        if let Ok(v) = std::env::var("VERTEX_CREDENTIALS_FILE") {
            self.vertex.credentials_file = v;
        }
    }

    /// Sauvegarde la configuration dans le fichier TOML
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path()
            .ok_or_else(|| "Impossible de déterminer le chemin de configuration".to_string())?;

        // Créer le répertoire parent si nécessaire
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Erreur création répertoire: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Erreur sérialisation: {}", e))?;

        fs::write(&path, content)
            .map_err(|e| format!("Erreur écriture: {}", e))?;

        println!("💾 [Config] Sauvegardé dans {:?}", path);
        Ok(())
    }

    /// Crée un fichier de configuration par défaut s'il n'existe pas
    pub fn ensure_config_file() {
        if let Some(path) = Self::config_path() {
            if !path.exists() {
                let default_config = Self::default();
                if default_config.save().is_ok() {
                    println!("✅ [Config] Fichier de configuration créé: {:?}", path);
                }
            }
        }
    }
}

/// Obtient la configuration globale (thread-safe)
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::load)
}
