// core/tests/test_analyze_session.rs
use gaitgraph_core::analyze_session::{analyze_session, GaitSession};
use gaitgraph_core::config::{GaitConfig, StanceMethod};
use gaitgraph_core::telemetry::Telemetry;
use gaitgraph_core::types::{Channel, ChannelRating, EvaluationStatus, Sample, StanceMethodUsed};

const FS: f64 = 25.0;

fn bump(i: usize, center: f64, amp: f64) -> f64 {
    let d = i as f64 - center;
    if d.abs() >= 6.0 {
        0.0
    } else {
        amp * 0.5 * (1.0 + (std::f64::consts::PI * d / 6.0).cos())
    }
}

/// Syntetisk gange: steg hvert `spacing` sample, vekslende høyre/venstre.
/// Hæl topper 2 samples før steg-senteret, forfot 2 samples etter.
fn walk(len: usize, first: usize, spacing: usize, steps: usize) -> Vec<Sample> {
    (0..len)
        .map(|i| {
            let mut ch = [0.0; 10];
            for k in 0..steps {
                let c = (first + spacing * k) as f64;
                let base = if k % 2 == 0 { 0 } else { 5 };
                ch[base] += bump(i, c + 2.0, 25.0); // stortå
                ch[base + 2] += bump(i, c + 2.0, 15.0); // meta ut
                ch[base + 3] += bump(i, c + 2.0, 20.0); // meta inn
                ch[base + 4] += bump(i, c - 2.0, 60.0); // hæl
            }
            Sample::new(i as f64 / FS, ch)
        })
        .collect()
}

#[test]
fn walking_session_counts_every_step() {
    let stream = walk(500, 15, 15, 32);
    let mut session = GaitSession::new("walk", GaitConfig::default()).expect("gyldig config");

    let mut last = 0;
    let mut report = None;
    for end in (100..=500).step_by(100) {
        let r = session.update(&stream[..end]);
        assert!(r.metrics.cumulative_steps >= last, "stegtallet gikk ned");
        assert!(!r.discontinuity);
        last = r.metrics.cumulative_steps;
        report = Some(r);
    }
    let report = report.expect("minst én rapport");
    let m = &report.metrics;

    assert_eq!(m.cumulative_steps, 32);
    assert_eq!(session.cumulative_steps(), 32);
    assert!((m.elapsed_seconds - 19.96).abs() < 1e-9);
    assert!((m.cadence_steps_per_minute - 32.0 / (19.96 / 60.0)).abs() < 1e-6);
    assert_eq!(m.stance_method, StanceMethodUsed::HeelToe);
    assert!(m.stance_time_seconds > 0.0 && m.swing_time_seconds > 0.0);
    let sym = m.step_symmetry_percent.expect("symmetri skal finnes");
    assert!(sym > 85.0, "vekslende like steg skal være symmetriske, fikk {sym}");
    assert!(!m.low_confidence);
    assert_eq!(report.evaluation.status, EvaluationStatus::Good);

    // lilletå har aldri last
    let pinky = report.channels[&Channel::RightPinkyToe];
    assert_eq!(pinky.rating, ChannelRating::Low);
    assert_eq!(pinky.score, 1);
    assert_eq!(report.channels.len(), 10);
}

#[test]
fn frames_lag_the_stream_by_half_window() {
    let stream = walk(100, 15, 15, 6);
    let mut session = GaitSession::new("lag", GaitConfig::default()).expect("gyldig config");
    session.update(&stream[..5]);
    assert!(session.frames().is_empty(), "ingen rammer før første fulle vindu");

    session.update(&stream);
    assert_eq!(session.smoothing_delay(), 6);
    assert_eq!(session.frames().len(), 100 - 6);
    assert_eq!(session.load_series().len(), session.frames().len());
    for (i, f) in session.frames().iter().enumerate() {
        assert_eq!(f.index, i);
        assert_eq!(f.timestamp, stream[i].timestamp);
    }
}

#[test]
fn shrunk_stream_is_reported_and_recounted() {
    let stream = walk(500, 15, 15, 32);
    let mut session = GaitSession::new("shrink", GaitConfig::default()).expect("gyldig config");
    assert_eq!(session.update(&stream).metrics.cumulative_steps, 32);

    let r = session.update(&stream[..200]);
    assert!(r.discontinuity);
    // rammer 0..194: topper på 15, 30, ..., 180
    assert_eq!(r.metrics.cumulative_steps, 12);
}

#[test]
fn replaced_stream_of_same_length_resets() {
    let a = walk(300, 15, 15, 19);
    let b: Vec<Sample> = a
        .iter()
        .map(|s| Sample::new(s.timestamp + 1000.0, s.channel_values))
        .collect();
    let mut session = GaitSession::new("swap", GaitConfig::default()).expect("gyldig config");
    let first = session.update(&a);
    let second = session.update(&b);
    assert!(!first.discontinuity);
    assert!(second.discontinuity);
    assert_eq!(first.metrics.cumulative_steps, second.metrics.cumulative_steps);
}

#[test]
fn idle_stream_reports_zero_and_undefined_symmetry() {
    let stream: Vec<Sample> = (0..50).map(|i| Sample::new(i as f64 / FS, [0.5; 10])).collect();
    let report = analyze_session("idle", &stream, GaitConfig::default()).expect("gyldig config");
    let m = &report.metrics;
    assert_eq!(m.cumulative_steps, 0);
    assert_eq!(m.cadence_steps_per_minute, 0.0);
    assert_eq!(m.step_symmetry_percent, None);
    assert_eq!(m.gait_balance_percent, None);
    assert_eq!(m.stance_method, StanceMethodUsed::None);
    assert!(m.low_confidence, "50 samples er under konfidensgrensen");
    assert_eq!(report.evaluation.status, EvaluationStatus::Critical);
}

#[test]
fn ratio_method_uses_event_interval() {
    let stream = walk(500, 15, 15, 32);
    let cfg = GaitConfig { stance_method: StanceMethod::Ratio, ..GaitConfig::default() };
    let report = analyze_session("ratio", &stream, cfg).expect("gyldig config");
    let m = &report.metrics;
    assert_eq!(m.stance_method, StanceMethodUsed::Ratio);
    // 15 samples = 0.6 s syklus
    assert!((m.stance_time_seconds - 0.36).abs() < 1e-6, "stance={}", m.stance_time_seconds);
    assert!((m.swing_time_seconds - 0.24).abs() < 1e-6, "swing={}", m.swing_time_seconds);
}

#[test]
fn one_sided_load_is_flagged() {
    // bare høyre fot
    let stream: Vec<Sample> = walk(500, 15, 15, 32)
        .into_iter()
        .map(|mut s| {
            for v in &mut s.channel_values[5..] {
                *v = 0.0;
            }
            s
        })
        .collect();
    let report = analyze_session("limp", &stream, GaitConfig::default()).expect("gyldig config");
    assert_eq!(report.metrics.step_symmetry_percent, Some(0.0));
    assert_eq!(report.metrics.gait_balance_percent, Some(-100.0));
    assert_eq!(report.evaluation.status, EvaluationStatus::Critical);
}

#[test]
fn invalid_config_is_rejected_at_start() {
    let cfg = GaitConfig { min_sample_separation: 0, ..GaitConfig::default() };
    assert!(GaitSession::new("bad", cfg).is_err());
}

#[test]
fn telemetry_tracks_updates_steps_and_outliers() {
    let telemetry = Telemetry::new().expect("registry");
    let mut stream = walk(300, 15, 15, 19);
    stream[40].channel_values[0] = 9000.0; // over taket

    let mut session = GaitSession::new("tele", GaitConfig::default())
        .expect("gyldig config")
        .with_telemetry(telemetry.clone());
    session.update(&stream[..150]);
    let report = session.update(&stream);
    session.update(&stream[..100]);

    assert_eq!(telemetry.updates_total.get(), 3);
    assert_eq!(telemetry.outliers_rejected_total.get(), 2, "lest inn på nytt etter nullstilling");
    assert_eq!(telemetry.discontinuities_total.get(), 1);
    assert!(telemetry.steps_counted_total.get() >= report.metrics.cumulative_steps);

    let text = telemetry.render();
    assert!(text.contains("gaitgraph_steps_counted_total"));
    assert!(text.contains("gaitgraph_outliers_rejected_total 2"));
}

#[test]
fn nan_timestamp_does_not_trigger_reset() {
    let mut stream = walk(300, 15, 15, 19);
    stream[149].timestamp = f64::NAN;

    let mut session = GaitSession::new("nan", GaitConfig::default()).expect("gyldig config");
    let first = session.update(&stream[..150]);
    assert!(!first.discontinuity);
    let before = session.cumulative_steps();

    let second = session.update(&stream);
    assert!(!second.discontinuity, "samme strøm med NaN-stempel er ikke byttet ut");
    assert!(session.cumulative_steps() >= before);
    assert_eq!(session.cumulative_steps(), 19);
    assert_eq!(session.frames().len(), 300 - session.smoothing_delay());

    // uendret strøm: ingen nye steg, ingen nullstilling
    let third = session.update(&stream);
    assert!(!third.discontinuity);
    assert_eq!(third.new_steps, 0);
}
