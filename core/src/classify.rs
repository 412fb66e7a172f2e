use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::config::{ChannelStatistic, GaitConfig, Thresholds};
use crate::types::{Channel, ChannelRating, ChannelReading, ConditionedFrame};

/// Score når kanalen ikke har data (midt i Normal).
pub const NEUTRAL_SCORE: u8 = 50;

/// value < weak → Low; value > high → High; ellers Normal.
pub fn classify(statistic: f64, t: Thresholds) -> ChannelRating {
    if statistic < t.weak {
        ChannelRating::Low
    } else if statistic > t.high {
        ChannelRating::High
    } else {
        ChannelRating::Normal
    }
}

/// Dashboard-skala 1–100: 1–33 Low, 34–66 Normal, 67–100 High.
/// "Maks" antas å være 2 × high.
pub fn rating_score(statistic: f64, t: Thresholds) -> u8 {
    let v = if statistic.is_finite() { statistic.max(0.0) } else { 0.0 };
    let score = match classify(v, t) {
        ChannelRating::Low => {
            if v <= 0.0 || t.weak <= 0.0 {
                1.0
            } else {
                (1.0 + (v / t.weak) * 32.0).floor().clamp(1.0, 33.0)
            }
        }
        ChannelRating::High => {
            let max = 2.0 * t.high;
            if v >= max {
                100.0
            } else {
                (67.0 + (v - t.high) / (max - t.high) * 33.0).floor().clamp(67.0, 100.0)
            }
        }
        ChannelRating::Normal => {
            if t.high > t.weak {
                (34.0 + (v - t.weak) / (t.high - t.weak) * 32.0).floor().clamp(34.0, 66.0)
            } else {
                f64::from(NEUTRAL_SCORE)
            }
        }
    };
    score as u8
}

/// Statistikk over en kanalserie. `None` for tom serie.
pub fn channel_statistic(values: &[f64], stat: ChannelStatistic) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    match stat {
        ChannelStatistic::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        ChannelStatistic::Median => percentile(values, 50.0),
        ChannelStatistic::Percentile(p) => percentile(values, p),
    }
}

/// Lineær interpolasjon mellom nærmeste rangerte verdier.
fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut xs: Vec<OrderedFloat<f64>> = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| OrderedFloat(*v))
        .collect();
    if xs.is_empty() {
        return None;
    }
    xs.sort_unstable();
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (xs.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(xs[lo].0 + (xs[hi].0 - xs[lo].0) * frac)
}

/// Vurderer hver kanal over vinduet. Tomt vindu → Normal med nøytral score.
pub fn classify_channels(frames: &[ConditionedFrame], cfg: &GaitConfig) -> BTreeMap<Channel, ChannelReading> {
    Channel::ALL
        .iter()
        .map(|&ch| {
            let series: Vec<f64> = frames.iter().map(|f| f.channels[ch.index()]).collect();
            let reading = match channel_statistic(&series, cfg.rating_statistic) {
                Some(stat) => {
                    let t = cfg.thresholds_for(ch);
                    ChannelReading { statistic: stat, rating: classify(stat, t), score: rating_score(stat, t) }
                }
                None => ChannelReading { statistic: 0.0, rating: ChannelRating::Normal, score: NEUTRAL_SCORE },
            };
            (ch, reading)
        })
        .collect()
}
