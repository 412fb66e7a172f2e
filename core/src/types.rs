use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Antall trykkanaler per sample (5 per fot).
pub const CHANNEL_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Foot {
    Right,
    Left,
}

/// Måleposisjon under foten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Site {
    BigToe,
    PinkyToe,
    MetaOut,
    MetaIn,
    Heel,
}

/// Kanal-id i samme rekkefølge som enhetene sender dem (s1..s5 høyre, s6..s10 venstre).
/// Navnene i JSON følger dashboardets kolonnenavn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "bigToe")]
    RightBigToe,
    #[serde(rename = "pinkyToe")]
    RightPinkyToe,
    #[serde(rename = "metaOut")]
    RightMetaOut,
    #[serde(rename = "metaIn")]
    RightMetaIn,
    #[serde(rename = "heel")]
    RightHeel,
    #[serde(rename = "bigToe_L")]
    LeftBigToe,
    #[serde(rename = "pinkyToe_L")]
    LeftPinkyToe,
    #[serde(rename = "metaOut_L")]
    LeftMetaOut,
    #[serde(rename = "metaIn_L")]
    LeftMetaIn,
    #[serde(rename = "heel_L")]
    LeftHeel,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::RightBigToe,
        Channel::RightPinkyToe,
        Channel::RightMetaOut,
        Channel::RightMetaIn,
        Channel::RightHeel,
        Channel::LeftBigToe,
        Channel::LeftPinkyToe,
        Channel::LeftMetaOut,
        Channel::LeftMetaIn,
        Channel::LeftHeel,
    ];

    /// Posisjon i `Sample::channel_values`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn foot(self) -> Foot {
        if self.index() < CHANNEL_COUNT / 2 { Foot::Right } else { Foot::Left }
    }

    pub fn site(self) -> Site {
        match self.index() % 5 {
            0 => Site::BigToe,
            1 => Site::PinkyToe,
            2 => Site::MetaOut,
            3 => Site::MetaIn,
            _ => Site::Heel,
        }
    }

    pub fn of(foot: Foot, site: Site) -> Channel {
        let base = match foot {
            Foot::Right => 0,
            Foot::Left => 5,
        };
        let offset = match site {
            Site::BigToe => 0,
            Site::PinkyToe => 1,
            Site::MetaOut => 2,
            Site::MetaIn => 3,
            Site::Heel => 4,
        };
        Channel::ALL[base + offset]
    }
}

/// Én tidsstemplet observasjon over alle trykkanaler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(alias = "t", alias = "ts")]
    pub timestamp: f64, // sekunder
    #[serde(alias = "pressures", alias = "channels")]
    pub channel_values: [f64; CHANNEL_COUNT],
}

impl Sample {
    pub fn new(timestamp: f64, channel_values: [f64; CHANNEL_COUNT]) -> Self {
        Self { timestamp, channel_values }
    }

    /// Sum av de fem kanalene for én fot.
    pub fn foot_load(&self, foot: Foot) -> f64 {
        foot_load(&self.channel_values, foot)
    }
}

pub(crate) fn foot_load(values: &[f64; CHANNEL_COUNT], foot: Foot) -> f64 {
    let range = match foot {
        Foot::Right => 0..5,
        Foot::Left => 5..10,
    };
    values[range].iter().sum()
}

/// Kondisjonert (støyklemt, evt. glattet) ramme. Indeksen er lik indeksen i strømmen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionedFrame {
    pub index: usize,
    pub timestamp: f64,
    pub channels: [f64; CHANNEL_COUNT],
}

impl ConditionedFrame {
    pub fn foot_load(&self, foot: Foot) -> f64 {
        foot_load(&self.channels, foot)
    }

    /// Samlet last (composite) brukt til stegdeteksjon.
    pub fn total_load(&self) -> f64 {
        self.channels.iter().sum()
    }
}

/// Ett punkt i last-serien (projeksjon av en ramme).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
    pub timestamp: f64,
    pub value: f64,
}

/// Et detektert lokalt maksimum tolket som fotisett.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    pub index: usize,
    pub timestamp: f64,
    pub peak_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelRating {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelReading {
    pub statistic: f64,
    pub rating: ChannelRating,
    /// 1–100 (dashboard-skala)
    pub score: u8,
}

/// Hvilken metode som faktisk ga stance/swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StanceMethodUsed {
    Ratio,
    HeelToe,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitMetrics {
    pub cadence_steps_per_minute: f64,
    /// `None` når ingen av føttene har last (udefinert, ikke 100 %).
    pub step_symmetry_percent: Option<f64>,
    /// Positiv = venstre dominerer.
    pub gait_balance_percent: Option<f64>,
    pub stance_time_seconds: f64,
    pub swing_time_seconds: f64,
    pub step_time_seconds: f64,
    pub stance_method: StanceMethodUsed,
    pub cumulative_steps: u64,
    pub elapsed_seconds: f64,
    pub low_confidence: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    Good,
    NeedsAttention,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: EvaluationStatus,
    pub action_plan: Vec<String>,
}

/// Utdata-record som overleveres til publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub metrics: GaitMetrics,
    pub channels: BTreeMap<Channel, ChannelReading>,
    pub evaluation: Evaluation,
    pub new_steps: u64,
    pub discontinuity: bool,
}
