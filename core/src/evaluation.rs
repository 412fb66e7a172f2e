use crate::types::{Evaluation, EvaluationStatus, GaitMetrics};

/// Målområde for kadens (steg/min).
pub const CADENCE_TARGET: (f64, f64) = (90.0, 120.0);
pub const CADENCE_CRITICAL: f64 = 60.0;
pub const SYMMETRY_CRITICAL: f64 = 60.0;
pub const SYMMETRY_ATTENTION: f64 = 75.0;
pub const SYMMETRY_TARGET: f64 = 85.0;

/// Status ut fra kadens og symmetri. Mangler symmetri (ingen last) brukes bare kadens.
pub fn status_for(cadence: f64, symmetry: Option<f64>) -> EvaluationStatus {
    let sym_below = |limit: f64| symmetry.map(|s| s < limit).unwrap_or(false);

    if cadence < CADENCE_CRITICAL || sym_below(SYMMETRY_CRITICAL) {
        EvaluationStatus::Critical
    } else if cadence < CADENCE_TARGET.0 || sym_below(SYMMETRY_ATTENTION) {
        EvaluationStatus::NeedsAttention
    } else {
        EvaluationStatus::Good
    }
}

/// Evaluering med tiltaksplan for behandler.
pub fn evaluate(metrics: &GaitMetrics) -> Evaluation {
    let cadence = metrics.cadence_steps_per_minute;
    let status = status_for(cadence, metrics.step_symmetry_percent);

    let action_plan = match status {
        EvaluationStatus::Critical => vec![
            format!(
                "Cadence is below normal (target: {:.0}-{:.0} steps/min)",
                CADENCE_TARGET.0, CADENCE_TARGET.1
            ),
            "Schedule immediate consultation".to_string(),
            "Review gait pattern with physical therapist".to_string(),
        ],
        EvaluationStatus::NeedsAttention => {
            let sym = metrics
                .step_symmetry_percent
                .map(|s| format!("{s:.1}%"))
                .unwrap_or_else(|| "n/a".to_string());
            vec![
                format!(
                    "Work on improving cadence (current: {cadence:.1}, target: {:.0}-{:.0})",
                    CADENCE_TARGET.0, CADENCE_TARGET.1
                ),
                format!("Focus on gait symmetry exercises (current: {sym}, target: >{SYMMETRY_TARGET:.0}%)"),
                "Follow up within 2 weeks".to_string(),
            ]
        }
        EvaluationStatus::Good => vec![
            "Maintain current walking routine".to_string(),
            "Continue regular monitoring".to_string(),
            "Next evaluation in 1 month".to_string(),
        ],
    };

    Evaluation { status, action_plan }
}
