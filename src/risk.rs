// ============================================================================
// DiabRisk Relay - Message de Risque
// ============================================================================
// Décorateur best-effort au-dessus du résultat opaque du prédicteur: si le
// score de la classe positive est présent, il est mis en forme pour
// affichage; toute structure inattendue produit simplement "pas de message".
// ============================================================================

use serde_json::Value;

/// Extrait `predictions[0].scores[1]` (probabilité de la classe positive)
/// si le chemin existe et pointe sur un nombre fini.
pub fn positive_class_score(predictions: &Value) -> Option<f64> {
    let score = predictions.get(0)?.get("scores")?.get(1)?.as_f64()?;
    score.is_finite().then_some(score)
}

/// Construit le message de risque à partir du champ `predictions` seul.
pub fn risk_message_for_predictions(predictions: &Value) -> Option<String> {
    let score = positive_class_score(predictions)?;
    Some(format!("Risque estimé de diabète : {:.1}%", score * 100.0))
}

/// Construit le message de risque à partir de la réponse complète du relais
/// (`{ "predictions": ... }`). Retourne `None` sans bruit si la structure
/// attendue est absente; ce n'est pas un validateur.
pub fn risk_message(result: &Value) -> Option<String> {
    risk_message_for_predictions(result.get("predictions")?)
}
