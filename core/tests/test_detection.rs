use gaitgraph_core::config::DetectorConfig;
use gaitgraph_core::detection::{detect, detect_events, local_maxima, prominence};
use gaitgraph_core::types::LoadPoint;

fn cfg(threshold: f64, distance: usize, prom: f64) -> DetectorConfig {
    DetectorConfig {
        step_threshold: threshold,
        min_sample_separation: distance,
        min_prominence: prom,
        adaptive_threshold_ratio: None,
    }
}

#[test]
fn peak_exactly_at_threshold_is_accepted() {
    let mut v = vec![0.0; 21];
    v[10] = 100.0;
    let peaks = detect(&v, &cfg(100.0, 5, 10.0));
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 10);
}

#[test]
fn peak_just_below_threshold_is_rejected() {
    let mut v = vec![0.0; 21];
    v[10] = 100.0 - 1e-9;
    assert!(detect(&v, &cfg(100.0, 5, 10.0)).is_empty());
}

#[test]
fn close_peaks_collapse_to_the_higher_one() {
    let mut v = vec![0.0; 30];
    v[10] = 300.0;
    v[14] = 400.0;
    let peaks = detect(&v, &cfg(50.0, 10, 10.0));
    assert_eq!(peaks.len(), 1, "to topper innenfor minsteavstand skal gi én");
    assert_eq!(peaks[0].index, 14);
    assert_eq!(peaks[0].value, 400.0);

    // med nok avstand beholdes begge
    let peaks = detect(&v, &cfg(50.0, 4, 10.0));
    assert_eq!(peaks.iter().map(|p| p.index).collect::<Vec<_>>(), vec![10, 14]);
}

#[test]
fn shoulder_on_large_stance_is_rejected_by_prominence() {
    let mut v = vec![0.0; 40];
    let ramp = [
        (12, 300.0), (13, 500.0), (14, 600.0), (15, 550.0), (16, 700.0),
        (17, 800.0), (18, 900.0), (19, 950.0), (20, 1000.0), (21, 500.0),
    ];
    for (i, x) in ramp {
        v[i] = x;
    }
    assert_eq!(local_maxima(&v), vec![14, 20]);
    assert_eq!(prominence(&v, 14), 50.0);

    let peaks = detect(&v, &cfg(100.0, 2, 100.0));
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 20);
    assert_eq!(peaks[0].prominence, 1000.0);
}

#[test]
fn window_edges_are_not_eligible() {
    // stigende mot slutten: siste sample er ikke en topp
    let v: Vec<f64> = (0..20).map(|i| i as f64 * 10.0).collect();
    assert!(detect(&v, &cfg(10.0, 1, 0.0)).is_empty());
    // fallende fra start: første sample er ikke en topp
    let v: Vec<f64> = (0..20).rev().map(|i| i as f64 * 10.0).collect();
    assert!(detect(&v, &cfg(10.0, 1, 0.0)).is_empty());
}

#[test]
fn plateau_counts_once() {
    let v = [0.0, 10.0, 80.0, 80.0, 80.0, 10.0, 0.0];
    let peaks = detect(&v, &cfg(50.0, 1, 10.0));
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 2);
}

#[test]
fn adaptive_threshold_raises_floor() {
    let mut v = vec![0.0; 40];
    v[10] = 100.0;
    v[25] = 1000.0;
    let mut c = cfg(50.0, 5, 10.0);
    assert_eq!(detect(&v, &c).len(), 2);
    c.adaptive_threshold_ratio = Some(0.3); // gulv = 300
    let peaks = detect(&v, &c);
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 25);
}

#[test]
fn detect_events_maps_to_absolute_index_and_timestamp() {
    let series: Vec<LoadPoint> = (0..21)
        .map(|i| LoadPoint { timestamp: 100.0 + i as f64 * 0.04, value: if i == 7 { 200.0 } else { 0.0 } })
        .collect();
    let ev = detect_events(&series, &cfg(100.0, 5, 10.0), 500);
    assert_eq!(ev.len(), 1);
    assert_eq!(ev[0].index, 507);
    assert!((ev[0].timestamp - 100.28).abs() < 1e-9);
    assert_eq!(ev[0].peak_value, 200.0);
}

#[test]
fn empty_and_tiny_windows_yield_nothing() {
    let c = cfg(0.0, 1, 0.0);
    assert!(detect(&[], &c).is_empty());
    assert!(detect(&[1.0], &c).is_empty());
    assert!(detect(&[1.0, 2.0], &c).is_empty());
}
