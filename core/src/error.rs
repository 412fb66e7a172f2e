use thiserror::Error;

use crate::types::Channel;

/// Feil i konfigurasjon. Avvises ved oppstart av en økt, aldri midt i strømmen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("terskler for {channel:?}: weak ({weak}) > high ({high})")]
    InvalidThresholds { channel: Channel, weak: f64, high: f64 },

    #[error("min_sample_separation må være > 0")]
    NonPositiveSeparation,

    #[error("sampling_rate_hz må være > 0 (fikk {0})")]
    NonPositiveSamplingRate(f64),

    #[error("overlap_fraction må ligge i [0, 1] (fikk {0})")]
    InvalidOverlap(f64),

    #[error("ugyldig støybånd: noise_floor={noise_floor}, sanity_ceiling={sanity_ceiling}")]
    InvalidNoiseBand { noise_floor: f64, sanity_ceiling: f64 },

    #[error("ugyldig glatting: {0}")]
    InvalidSmoothing(String),

    #[error("stance_fraction må ligge i (0, 1) (fikk {0})")]
    InvalidStanceFraction(f64),

    #[error("persentil må ligge i [0, 100] (fikk {0})")]
    InvalidPercentile(f64),

    #[error("{field} må være endelig og >= 0 (fikk {value})")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("parse error at {path}: {message}")]
    Parse { path: String, message: String },
}

/// Strømmen krympet i forhold til lagret tilstand. Økten er nullstilt og
/// prosessert på nytt; dette er en tilstand som meldes, ikke en feil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stream shrank to {stream_len} samples (last processed index {last_processed_index}); session reset")]
pub struct SessionDiscontinuity {
    pub last_processed_index: i64,
    pub stream_len: usize,
}
