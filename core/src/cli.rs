use std::fmt::Write;

use crate::types::{ChannelRating, SessionReport};

fn fmt_opt_pct(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.1} %")).unwrap_or_else(|| "—".to_string())
}

/// Menneskelesbar rapport (terminal/logg).
pub fn format_gait_report(report: &SessionReport) -> String {
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "--- Gait Report ({}) ---", report.session_id);
    let _ = writeln!(out, "Steps: {} (+{})", m.cumulative_steps, report.new_steps);
    let _ = writeln!(out, "Cadence: {:.1} steps/min", m.cadence_steps_per_minute);
    let _ = writeln!(out, "Stance/Swing: {:.2} s / {:.2} s ({:?})", m.stance_time_seconds, m.swing_time_seconds, m.stance_method);
    let _ = writeln!(out, "Symmetry: {}", fmt_opt_pct(m.step_symmetry_percent));
    let _ = writeln!(out, "Balance: {}", fmt_opt_pct(m.gait_balance_percent));
    if m.low_confidence {
        let _ = writeln!(out, "(lav konfidens: for få samples)");
    }
    if report.discontinuity {
        let _ = writeln!(out, "(økten ble nullstilt: strømmen krympet)");
    }
    for (ch, r) in &report.channels {
        let tag = match r.rating {
            ChannelRating::Low => "Low",
            ChannelRating::Normal => "Normal",
            ChannelRating::High => "High",
        };
        let _ = writeln!(out, "  {:?}: {:.1} → {} ({})", ch, r.statistic, tag, r.score);
    }
    let _ = writeln!(out, "Status: {:?}", report.evaluation.status);
    out
}

pub fn print_gait_report(report: &SessionReport) {
    print!("{}", format_gait_report(report));
}
