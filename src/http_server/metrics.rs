// ============================================================================
// DiabRisk Relay - Métriques Prometheus
// ============================================================================

use actix_web::HttpResponse;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Compteurs globaux pour métriques
pub struct Metrics {
    /// Nombre total de requêtes de prédiction
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,
    /// Requêtes rejetées (méthode non autorisée)
    pub requests_rejected: AtomicU64,

    /// Timestamp de démarrage du serveur
    pub start_time: u64,

    /// Durée totale des requêtes (pour calcul moyenne)
    pub total_duration_ms: AtomicU64,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

impl Metrics {
    /// Initialise les métriques globales
    pub fn init() -> &'static Metrics {
        METRICS.get_or_init(|| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();

            Metrics {
                requests_total: AtomicU64::new(0),
                requests_success: AtomicU64::new(0),
                requests_error: AtomicU64::new(0),
                requests_rejected: AtomicU64::new(0),
                start_time: now,
                total_duration_ms: AtomicU64::new(0),
            }
        })
    }

    /// Obtient l'instance des métriques
    pub fn get() -> &'static Metrics {
        Self::init()
    }

    /// Enregistre une requête de prédiction
    pub fn record_request(result: &str, duration_ms: u64) {
        let m = Self::get();
        m.requests_total.fetch_add(1, Ordering::Relaxed);
        m.total_duration_ms.fetch_add(duration_ms, Ordering::Relaxed);

        match result {
            "success" => m.requests_success.fetch_add(1, Ordering::Relaxed),
            "rejected" => m.requests_rejected.fetch_add(1, Ordering::Relaxed),
            _ => m.requests_error.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Calcule l'uptime en secondes
    pub fn uptime_seconds(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        now.saturating_sub(self.start_time)
    }

    /// Calcule la durée moyenne des requêtes
    pub fn avg_duration_ms(&self) -> f64 {
        let total = self.requests_total.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.total_duration_ms.load(Ordering::Relaxed) as f64 / total as f64
    }
}

/// GET /metrics - Endpoint Prometheus
pub async fn metrics_handler() -> HttpResponse {
    let m = Metrics::get();

    // Générer le format Prometheus
    let mut output = String::new();

    output.push_str("# HELP diabrisk_requests_total Total number of prediction requests\n");
    output.push_str("# TYPE diabrisk_requests_total counter\n");
    output.push_str(&format!(
        "diabrisk_requests_total {}\n",
        m.requests_total.load(Ordering::Relaxed)
    ));

    output.push_str("# HELP diabrisk_requests_success_total Successful prediction requests\n");
    output.push_str("# TYPE diabrisk_requests_success_total counter\n");
    output.push_str(&format!(
        "diabrisk_requests_success_total {}\n",
        m.requests_success.load(Ordering::Relaxed)
    ));

    output.push_str("# HELP diabrisk_requests_error_total Failed prediction requests\n");
    output.push_str("# TYPE diabrisk_requests_error_total counter\n");
    output.push_str(&format!(
        "diabrisk_requests_error_total {}\n",
        m.requests_error.load(Ordering::Relaxed)
    ));

    output.push_str("# HELP diabrisk_requests_rejected_total Requests rejected with 405\n");
    output.push_str("# TYPE diabrisk_requests_rejected_total counter\n");
    output.push_str(&format!(
        "diabrisk_requests_rejected_total {}\n",
        m.requests_rejected.load(Ordering::Relaxed)
    ));

    // Durée moyenne
    output.push_str("# HELP diabrisk_request_duration_avg_ms Average request duration in milliseconds\n");
    output.push_str("# TYPE diabrisk_request_duration_avg_ms gauge\n");
    output.push_str(&format!(
        "diabrisk_request_duration_avg_ms {:.2}\n",
        m.avg_duration_ms()
    ));

    // Uptime
    output.push_str("# HELP diabrisk_uptime_seconds Server uptime in seconds\n");
    output.push_str("# TYPE diabrisk_uptime_seconds gauge\n");
    output.push_str(&format!("diabrisk_uptime_seconds {}\n", m.uptime_seconds()));

    // Version
    output.push_str("# HELP diabrisk_info Application info\n");
    output.push_str("# TYPE diabrisk_info gauge\n");
    output.push_str(&format!(
        "diabrisk_info{{version=\"{}\"}} 1\n",
        env!("CARGO_PKG_VERSION")
    ));

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4; charset=utf-8")
        .body(output)
}

// ============================================================================
// Tests
// ============================================================================
