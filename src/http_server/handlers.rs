// ============================================================================
// DiabRisk Relay - Handlers HTTP
// ============================================================================

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use super::metrics::Metrics;
use super::HttpServerState;
use crate::bmi::calc_bmi;
use crate::risk::risk_message;

// ============================================================================
// Structures de données
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

#[derive(Deserialize)]
pub struct BmiQuery {
    pub height: Option<String>,
    pub weight: Option<String>,
}

#[derive(Serialize)]
pub struct BmiResponse {
    pub bmi: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Conversion du dossier de santé
// ============================================================================

/// Convertit une valeur JSON en chaîne, format attendu par le modèle.
/// `null` devient "null", les structures imbriquées leur JSON compact.
fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reconstruit le dossier avec chaque valeur convertie en chaîne.
/// Le modèle AutoML déployé n'accepte que des valeurs textuelles.
fn stringify_record(record: &serde_json::Map<String, Value>) -> Value {
    let fields: serde_json::Map<String, Value> = record
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(stringify_value(value))))
        .collect();
    Value::Object(fields)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Vérification de l'état du serveur
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/bmi?height=XXX&weight=XXX - Calcule l'IMC
///
/// Retourne toujours 200: une entrée invalide donne une chaîne vide,
/// comme le champ en lecture seule du formulaire.
pub async fn compute_bmi(query: web::Query<BmiQuery>) -> HttpResponse {
    let height = query.height.as_deref().unwrap_or("");
    let weight = query.weight.as_deref().unwrap_or("");

    let bmi = calc_bmi(height, weight);
    debug!("🧮 [HTTP] IMC: taille={} poids={} -> \"{}\"", height, weight, bmi);

    HttpResponse::Ok().json(BmiResponse { bmi })
}

/// POST /api/predict - Relaie un dossier de santé vers l'endpoint Vertex AI
///
/// Le corps est un objet JSON à champs libres; chaque valeur est convertie
/// en chaîne puis envoyée comme instance unique au modèle. La réponse reprend
/// le champ `predictions` du service amont tel quel.
pub async fn predict(
    body: web::Json<serde_json::Map<String, Value>>,
    state: web::Data<HttpServerState>,
) -> HttpResponse {
    let start = Instant::now();
    let record = body.into_inner();

    info!("🔄 [HTTP] Prédiction demandée ({} champ(s))", record.len());

    let instance = stringify_record(&record);

    match state.predictor.predict(vec![instance]).await {
        Ok(response) => {
            // Enveloppe de succès: le champ `predictions` amont, sans
            // transformation
            let envelope = serde_json::json!({ "predictions": response.predictions });
            match risk_message(&envelope) {
                Some(message) => info!("✅ [HTTP] {}", message),
                None => debug!("⚠️ [HTTP] Forme de prédictions non reconnue, relais tel quel"),
            }
            Metrics::record_request("success", start.elapsed().as_millis() as u64);
            HttpResponse::Ok().json(envelope)
        }
        Err(e) => {
            error!("❌ [HTTP] Erreur de prédiction: {}", e);
            Metrics::record_request("error", start.elapsed().as_millis() as u64);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

/// Rejette toute méthode autre que POST sur /api/predict, sans lire le corps
/// ni contacter le service amont
pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    warn!("⚠️ [HTTP] Méthode {} rejetée sur {}", req.method(), req.path());
    Metrics::record_request("rejected", 0);
    HttpResponse::MethodNotAllowed().json(ErrorResponse {
        error: "Method not allowed".to_string(),
    })
}

/// Réponse 404 JSON pour les routes inconnues
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    warn!("⚠️ [HTTP] Route non trouvée: {}", req.path());
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Route not found".to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_server::routes;
    use crate::vertex_client::{
        Predictor, VertexClientError, VertexPredictResponse, VertexResult,
    };
    use actix_web::test::{call_service, init_service, read_body, read_body_json, TestRequest};
    use actix_web::App;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Prédicteur de test: réponse fixée à l'avance, instances capturées
    struct StubPredictor {
        response: VertexResult<VertexPredictResponse>,
        calls: AtomicUsize,
        captured: Mutex<Vec<Value>>,
    }

    impl StubPredictor {
        fn with_response(response: VertexResult<VertexPredictResponse>) -> Arc<Self> {
            Arc::new(StubPredictor {
                response,
                calls: AtomicUsize::new(0),
                captured: Mutex::new(Vec::new()),
            })
        }

        fn succeeding(predictions: Value) -> Arc<Self> {
            Self::with_response(Ok(VertexPredictResponse {
                predictions,
                deployed_model_id: None,
                model: None,
                model_display_name: None,
            }))
        }

        fn failing(message: &str) -> Arc<Self> {
            Self::with_response(Err(VertexClientError::NetworkError(message.to_string())))
        }
    }

    #[async_trait]
    impl Predictor for StubPredictor {
        async fn predict(&self, instances: Vec<Value>) -> VertexResult<VertexPredictResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.captured.lock().unwrap().extend(instances);
            self.response.clone()
        }
    }

    fn test_state(stub: Arc<StubPredictor>) -> web::Data<HttpServerState> {
        let predictor: Arc<dyn Predictor> = stub;
        web::Data::new(HttpServerState { predictor })
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = init_service(
            App::new()
                .app_data(test_state(StubPredictor::succeeding(json!([]))))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::get().uri("/health").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["status"], json!("ok"));
    }

    #[actix_web::test]
    async fn test_bmi_endpoint() {
        let app = init_service(
            App::new()
                .app_data(test_state(StubPredictor::succeeding(json!([]))))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::get()
            .uri("/api/bmi?height=170&weight=65")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["bmi"], json!("22.49"));
    }

    #[actix_web::test]
    async fn test_bmi_endpoint_entree_invalide() {
        let app = init_service(
            App::new()
                .app_data(test_state(StubPredictor::succeeding(json!([]))))
                .configure(routes::configure),
        )
        .await;

        // Paramètre manquant: toujours 200, IMC vide
        let req = TestRequest::get().uri("/api/bmi?height=170").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["bmi"], json!(""));
    }

    #[actix_web::test]
    async fn test_predict_succes_transmet_predictions() {
        let predictions = json!([{"scores": [0.7, 0.3], "classes": ["false", "true"]}]);
        let stub = StubPredictor::succeeding(predictions.clone());
        let app = init_service(
            App::new()
                .app_data(test_state(stub.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({
                "Glucose": "148",
                "BloodPressure": "72",
                "BMI": "33.6",
                "Age": "50"
            }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["predictions"], predictions);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_predict_stringifie_toutes_les_valeurs() {
        let stub = StubPredictor::succeeding(json!([]));
        let app = init_service(
            App::new()
                .app_data(test_state(stub.clone()))
                .configure(routes::configure),
        )
        .await;

        // Valeurs mixtes: nombres, booléen, null, chaîne
        let req = TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({
                "Glucose": 148,
                "BMI": 33.6,
                "Age": "50",
                "Smoker": false,
                "Notes": null
            }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let captured = stub.captured.lock().unwrap();
        assert_eq!(captured.len(), 1);

        let instance = captured[0].as_object().unwrap();
        assert!(instance.values().all(|v| v.is_string()));
        assert_eq!(instance["Glucose"], json!("148"));
        assert_eq!(instance["BMI"], json!("33.6"));
        assert_eq!(instance["Age"], json!("50"));
        assert_eq!(instance["Smoker"], json!("false"));
        assert_eq!(instance["Notes"], json!("null"));
    }

    #[actix_web::test]
    async fn test_predict_erreur_amont_en_500() {
        let stub = StubPredictor::failing("connexion refusée");
        let app = init_service(
            App::new()
                .app_data(test_state(stub.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({"Glucose": "148"}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 500);

        // Le message d'erreur est repris tel quel dans l'enveloppe
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["error"], json!("Erreur réseau: connexion refusée"));
    }

    #[actix_web::test]
    async fn test_predict_get_rejete_sans_appel_amont() {
        let stub = StubPredictor::succeeding(json!([]));
        let app = init_service(
            App::new()
                .app_data(test_state(stub.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::get().uri("/api/predict").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 405);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["error"], json!("Method not allowed"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_predict_delete_rejete() {
        let stub = StubPredictor::succeeding(json!([]));
        let app = init_service(
            App::new()
                .app_data(test_state(stub.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::delete().uri("/api/predict").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 405);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_route_inconnue_404_json() {
        let app = init_service(
            App::new()
                .app_data(test_state(StubPredictor::succeeding(json!([]))))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::get().uri("/inconnu").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["error"], json!("Route not found"));
    }

    #[actix_web::test]
    async fn test_metrics_format_prometheus() {
        let app = init_service(
            App::new()
                .app_data(test_state(StubPredictor::succeeding(json!([]))))
                .configure(routes::configure),
        )
        .await;

        let req = TestRequest::get().uri("/metrics").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("diabrisk_requests_total"));
        assert!(text.contains("diabrisk_uptime_seconds"));
    }

    #[test]
    fn test_stringify_record_valeurs_mixtes() {
        let mut record = serde_json::Map::new();
        record.insert("Glucose".to_string(), json!(148));
        record.insert("BMI".to_string(), json!(33.6));
        record.insert("Age".to_string(), json!("50"));
        record.insert("Smoker".to_string(), json!(false));
        record.insert("Notes".to_string(), json!(null));
        record.insert("History".to_string(), json!(["a", "b"]));

        let instance = stringify_record(&record);
        assert_eq!(instance["Glucose"], json!("148"));
        assert_eq!(instance["BMI"], json!("33.6"));
        assert_eq!(instance["Age"], json!("50"));
        assert_eq!(instance["Smoker"], json!("false"));
        assert_eq!(instance["Notes"], json!("null"));
        assert_eq!(instance["History"], json!("[\"a\",\"b\"]"));
    }
}
