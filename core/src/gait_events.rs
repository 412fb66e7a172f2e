use serde::{Deserialize, Serialize};

use crate::types::{Channel, ConditionedFrame, Foot, Site};

/// Adaptiv terskel som andel av maks i vinduet.
pub const CONTACT_THRESHOLD_RATIO: f64 = 0.15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootEvents {
    /// Rammeindekser (absolutte) for hælisett.
    pub heel_strikes: Vec<usize>,
    pub toe_offs: Vec<usize>,
}

/// Hælisett: hæl krysser terskelen oppover utenfor stance.
/// Tåavvik: forfot (stortå + meta ut + meta inn) krysser terskelen nedover i stance.
pub fn detect_heel_strike_toe_off(frames: &[ConditionedFrame], foot: Foot) -> FootEvents {
    let heel_ch = Channel::of(foot, Site::Heel).index();
    let fore_ch = [
        Channel::of(foot, Site::BigToe).index(),
        Channel::of(foot, Site::MetaOut).index(),
        Channel::of(foot, Site::MetaIn).index(),
    ];

    let heel: Vec<f64> = frames.iter().map(|f| f.channels[heel_ch]).collect();
    let forefoot: Vec<f64> = frames
        .iter()
        .map(|f| fore_ch.iter().map(|&c| f.channels[c]).sum())
        .collect();

    let heel_max = heel.iter().copied().fold(0.0f64, f64::max);
    let fore_max = forefoot.iter().copied().fold(0.0f64, f64::max);
    let mut out = FootEvents::default();
    if heel_max <= 0.0 || fore_max <= 0.0 {
        return out;
    }
    let heel_thresh = CONTACT_THRESHOLD_RATIO * heel_max;
    let fore_thresh = CONTACT_THRESHOLD_RATIO * fore_max;

    let mut in_stance = false;
    for i in 1..frames.len() {
        if !in_stance {
            if heel[i - 1] < heel_thresh && heel[i] >= heel_thresh {
                out.heel_strikes.push(frames[i].index);
                in_stance = true;
            }
        } else if forefoot[i - 1] >= fore_thresh && forefoot[i] < fore_thresh {
            out.toe_offs.push(frames[i].index);
            in_stance = false;
        }
    }
    out
}

/// Stance- og swing-varigheter (sekunder) fra hendelsene.
/// stance = hælisett → første senere tåavvik; swing = tåavvik → første senere hælisett.
pub fn stance_swing_durations(
    events: &FootEvents,
    timestamp_of: impl Fn(usize) -> Option<f64>,
) -> (Vec<f64>, Vec<f64>) {
    let pair = |from: &[usize], to: &[usize]| -> Vec<f64> {
        from.iter()
            .filter_map(|&a| {
                let b = to.iter().copied().find(|&b| b > a)?;
                Some(timestamp_of(b)? - timestamp_of(a)?)
            })
            .filter(|d| *d > 0.0)
            .collect()
    };
    (
        pair(&events.heel_strikes, &events.toe_offs),
        pair(&events.toe_offs, &events.heel_strikes),
    )
}
