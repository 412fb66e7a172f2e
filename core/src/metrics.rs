use crate::config::{GaitConfig, StanceMethod};
use crate::types::{GaitMetrics, StanceMethodUsed, StepEvent};

/// Kadens (steg/min) = kumulative steg / forløpte minutter. 0 når ingen tid har gått.
pub fn cadence(cumulative_steps: u64, elapsed_seconds: f64) -> f64 {
    if elapsed_seconds > 0.0 && elapsed_seconds.is_finite() {
        cumulative_steps as f64 / (elapsed_seconds / 60.0)
    } else {
        0.0
    }
}

/// 100 × (1 − |L − R| / (L + R)), klemt til [0, 100].
/// `None` når ingen last på noen side (udefinert, ikke 100 %).
pub fn step_symmetry(left_load: f64, right_load: f64) -> Option<f64> {
    let total = left_load + right_load;
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }
    Some((100.0 * (1.0 - (left_load - right_load).abs() / total)).clamp(0.0, 100.0))
}

/// (L − R) / (L + R) × 100. Positiv = venstre dominerer.
pub fn gait_balance(left_load: f64, right_load: f64) -> Option<f64> {
    let total = left_load + right_load;
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }
    Some(((left_load - right_load) / total * 100.0).clamp(-100.0, 100.0))
}

/// Snittintervall mellom påfølgende hendelser (sekunder).
pub fn mean_event_interval(events: &[StepEvent]) -> Option<f64> {
    let dts: Vec<f64> = events
        .windows(2)
        .map(|w| w[1].timestamp - w[0].timestamp)
        .filter(|dt| *dt > 0.0)
        .collect();
    if dts.is_empty() {
        None
    } else {
        Some(dts.iter().sum::<f64>() / dts.len() as f64)
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() { 0.0 } else { xs.iter().sum::<f64>() / xs.len() as f64 }
}

#[derive(Clone)]
pub struct MetricsInputs<'a> {
    /// Talte steg-hendelser i analysevinduet.
    pub events: &'a [StepEvent],
    pub cumulative_steps: u64,
    pub elapsed_seconds: f64,
    pub left_load: f64,
    pub right_load: f64,
    /// Rå samples sett i økten (for konfidensflagget).
    pub samples_observed: usize,
    /// Hælisett → tåavvik (sekunder). Tom når sub-hendelser ikke kan skilles ut.
    pub stance_durations: &'a [f64],
    /// Tåavvik → neste hælisett (sekunder).
    pub swing_durations: &'a [f64],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitMetricsCalculator {
    pub stance_method: StanceMethod,
    /// Andel av syklusen som er stance i forholdstall-metoden (typ 0.6).
    pub stance_fraction: f64,
    pub min_samples_for_confidence: usize,
}

impl Default for GaitMetricsCalculator {
    fn default() -> Self {
        Self::from_config(&GaitConfig::default())
    }
}

impl GaitMetricsCalculator {
    pub fn from_config(cfg: &GaitConfig) -> Self {
        Self {
            stance_method: cfg.stance_method,
            stance_fraction: cfg.stance_fraction,
            min_samples_for_confidence: cfg.min_samples_for_confidence,
        }
    }

    fn ratio_estimate(&self, events: &[StepEvent]) -> (f64, f64, StanceMethodUsed) {
        match mean_event_interval(events) {
            Some(cycle) => (
                cycle * self.stance_fraction,
                cycle * (1.0 - self.stance_fraction),
                StanceMethodUsed::Ratio,
            ),
            None => (0.0, 0.0, StanceMethodUsed::None),
        }
    }

    fn heel_toe_estimate(&self, stance: &[f64], swing: &[f64]) -> (f64, f64, StanceMethodUsed) {
        if stance.is_empty() && swing.is_empty() {
            (0.0, 0.0, StanceMethodUsed::None)
        } else {
            (mean(stance), mean(swing), StanceMethodUsed::HeelToe)
        }
    }

    pub fn compute(&self, inputs: &MetricsInputs) -> GaitMetrics {
        let cadence_spm = cadence(inputs.cumulative_steps, inputs.elapsed_seconds);

        let (stance, swing, used) = match self.stance_method {
            StanceMethod::Ratio => self.ratio_estimate(inputs.events),
            StanceMethod::HeelToe => self.heel_toe_estimate(inputs.stance_durations, inputs.swing_durations),
            StanceMethod::Auto => {
                if !inputs.stance_durations.is_empty() && !inputs.swing_durations.is_empty() {
                    self.heel_toe_estimate(inputs.stance_durations, inputs.swing_durations)
                } else {
                    self.ratio_estimate(inputs.events)
                }
            }
        };

        GaitMetrics {
            cadence_steps_per_minute: cadence_spm,
            step_symmetry_percent: step_symmetry(inputs.left_load, inputs.right_load),
            gait_balance_percent: gait_balance(inputs.left_load, inputs.right_load),
            stance_time_seconds: stance,
            swing_time_seconds: swing,
            step_time_seconds: if cadence_spm > 0.0 { 60.0 / cadence_spm } else { 0.0 },
            stance_method: used,
            cumulative_steps: inputs.cumulative_steps,
            elapsed_seconds: inputs.elapsed_seconds.max(0.0),
            low_confidence: inputs.samples_observed < self.min_samples_for_confidence,
        }
    }
}
