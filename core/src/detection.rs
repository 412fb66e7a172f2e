//! Peak-deteksjon i samlet last-signal.
//!
//! Tre betingelser må holde samtidig: høyde (`step_threshold`), avstand
//! (`min_sample_separation`) og prominens (`min_prominence`). Én terskel alene
//! dobbeltteller støyskuldre og mister lette fotisett.
//!
//! Rene funksjoner av vinduet, ingen tilstand mellom kall.

use crate::config::DetectorConfig;
use crate::types::{LoadPoint, StepEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Indeks i vinduet som ble gitt inn.
    pub index: usize,
    pub value: f64,
    pub prominence: f64,
}

/// Lokale maksima. Platå → én topp på første indeks.
/// Første og siste sample er aldri topper; et platå som treffer slutten heller ikke.
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    let n = values.len();
    let mut out = Vec::new();
    if n < 3 {
        return out;
    }
    let mut i = 1;
    while i < n - 1 {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < n - 1 && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                out.push(i);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Prominens: toppen minus den høyeste av de to basene. En base er minimum
/// mellom toppen og nærmeste strengt høyere sample (eller vinduskanten).
pub fn prominence(values: &[f64], peak: usize) -> f64 {
    let h = values[peak];

    let mut left_min = h;
    let mut i = peak;
    while i > 0 {
        i -= 1;
        if values[i] > h {
            break;
        }
        left_min = left_min.min(values[i]);
    }

    let mut right_min = h;
    for &v in &values[peak + 1..] {
        if v > h {
            break;
        }
        right_min = right_min.min(v);
    }

    h - left_min.max(right_min)
}

/// Grådig avstandsfilter: høyeste topp først, like høyder → tidligste indeks vinner.
/// Topper nærmere enn `distance` en beholdt topp fjernes.
fn select_by_distance(values: &[f64], candidates: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 || candidates.len() < 2 {
        return candidates.to_vec();
    }
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        values[candidates[b]]
            .total_cmp(&values[candidates[a]])
            .then(candidates[a].cmp(&candidates[b]))
    });

    let mut keep = vec![true; candidates.len()];
    for &k in &order {
        if !keep[k] {
            continue;
        }
        let p = candidates[k];
        // kandidatene er sortert på indeks, så vi kan gå utover fra k
        let mut j = k;
        while j > 0 && p - candidates[j - 1] < distance {
            j -= 1;
            keep[j] = false;
        }
        let mut j = k + 1;
        while j < candidates.len() && candidates[j] - p < distance {
            keep[j] = false;
            j += 1;
        }
    }

    candidates
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Effektiv høydeterskel for vinduet.
pub fn effective_threshold(values: &[f64], cfg: &DetectorConfig) -> f64 {
    match cfg.adaptive_threshold_ratio {
        Some(ratio) => {
            let max = values.iter().copied().fold(0.0f64, f64::max);
            cfg.step_threshold.max(ratio * max)
        }
        None => cfg.step_threshold,
    }
}

/// Finner stegtopper i `values` (høyde → avstand → prominens).
pub fn detect(values: &[f64], cfg: &DetectorConfig) -> Vec<Peak> {
    let threshold = effective_threshold(values, cfg);

    let candidates: Vec<usize> = local_maxima(values)
        .into_iter()
        .filter(|&i| values[i] >= threshold)
        .collect();

    select_by_distance(values, &candidates, cfg.min_sample_separation)
        .into_iter()
        .filter_map(|i| {
            let prom = prominence(values, i);
            (prom >= cfg.min_prominence).then_some(Peak { index: i, value: values[i], prominence: prom })
        })
        .collect()
}

/// Som `detect`, men på en last-serie der `series[0]` har absolutt indeks `offset`.
pub fn detect_events(series: &[LoadPoint], cfg: &DetectorConfig, offset: usize) -> Vec<StepEvent> {
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    detect(&values, cfg)
        .into_iter()
        .map(|p| StepEvent {
            index: offset + p.index,
            timestamp: series[p.index].timestamp,
            peak_value: p.value,
        })
        .collect()
}
