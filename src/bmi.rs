// ============================================================================
// DiabRisk Relay - Calcul de l'IMC
// ============================================================================
// L'indice de masse corporelle est dérivé côté service à partir des champs
// texte du formulaire (taille en cm, poids en kg), puis réinjecté dans le
// dossier transmis au service de prédiction.
// ============================================================================

/// Calcule l'IMC à partir de la taille (cm) et du poids (kg) en texte libre.
///
/// Retourne l'IMC formaté avec exactement deux décimales (arrondi du
/// formateur Rust, au pair le plus proche), ou une chaîne vide si l'une des
/// entrées est non numérique, non finie ou ≤ 0. La chaîne vide signifie
/// "pas encore calculable", jamais une erreur.
pub fn calc_bmi(height_cm: &str, weight_kg: &str) -> String {
    let h: f64 = match height_cm.trim().parse() {
        Ok(v) => v,
        Err(_) => return String::new(),
    };
    let w: f64 = match weight_kg.trim().parse() {
        Ok(v) => v,
        Err(_) => return String::new(),
    };

    if h.is_finite() && w.is_finite() && h > 0.0 && w > 0.0 {
        let meters = h / 100.0;
        format!("{:.2}", w / (meters * meters))
    } else {
        String::new()
    }
}
