use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::error::ConfigError;
use crate::types::{Channel, Site};

/// Kalibrerte terskler for én kanal (settes offline, ikke live).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub weak: f64,
    pub high: f64,
}

impl Thresholds {
    pub const fn new(weak: f64, high: f64) -> Self {
        Self { weak, high }
    }
}

fn site_default(site: Site) -> Thresholds {
    match site {
        Site::BigToe => Thresholds::new(8.0, 45.0),
        Site::PinkyToe => Thresholds::new(5.0, 40.0),
        Site::MetaOut => Thresholds::new(20.0, 50.0),
        Site::MetaIn => Thresholds::new(20.0, 50.0),
        Site::Heel => Thresholds::new(15.0, 55.0),
    }
}

/// Standardterskler per kanal, samme for begge føtter.
pub static DEFAULT_CHANNEL_THRESHOLDS: Lazy<BTreeMap<Channel, Thresholds>> = Lazy::new(|| {
    Channel::ALL
        .iter()
        .map(|c| (*c, site_default(c.site())))
        .collect()
});

/// Statistikk som klassifiseres per kanal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatistic {
    #[default]
    Mean,
    Median,
    /// 0–100
    Percentile(f64),
}

/// Strategi for stance/swing-estimat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StanceMethod {
    /// Hælisett/tåavvik når det finnes, ellers forholdstall.
    #[default]
    Auto,
    Ratio,
    HeelToe,
}

/// Største SG-vindu i samples (~1 s @ 255 Hz). Koeffisienttabellen er kvadratisk i lengden.
pub const MAX_SMOOTHING_WINDOW_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    #[serde(alias = "windowSecs")]
    pub window_secs: f64,
    #[serde(alias = "polyOrder")]
    pub poly_order: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        // ~0.5 s vindu, kubisk tilpasning
        Self { window_secs: 0.5, poly_order: 3 }
    }
}

impl SmoothingConfig {
    /// Vinduslengde i samples, tvunget til oddetall.
    pub fn window_len(&self, sampling_rate_hz: f64) -> usize {
        let n = (self.window_secs * sampling_rate_hz).max(0.0) as usize;
        if n % 2 == 0 { n + 1 } else { n }
    }
}

/// Parametre for peak-deteksjon (avledet fra `GaitConfig`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub step_threshold: f64,
    pub min_sample_separation: usize,
    pub min_prominence: f64,
    pub adaptive_threshold_ratio: Option<f64>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        GaitConfig::default().detector()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitConfig {
    #[serde(alias = "samplingRateHz")]
    pub sampling_rate_hz: f64,
    #[serde(alias = "noiseFloor")]
    pub noise_floor: f64,
    #[serde(alias = "sanityCeiling")]
    pub sanity_ceiling: f64,
    #[serde(alias = "stepThreshold")]
    pub step_threshold: f64,
    #[serde(alias = "minSampleSeparation")]
    pub min_sample_separation: usize,
    #[serde(alias = "minProminence")]
    pub min_prominence: f64,
    #[serde(alias = "overlapFraction")]
    pub overlap_fraction: f64,
    #[serde(alias = "adaptiveThresholdRatio")]
    pub adaptive_threshold_ratio: Option<f64>,
    /// `null` slår av glatting.
    pub smoothing: Option<SmoothingConfig>,
    #[serde(alias = "stanceMethod")]
    pub stance_method: StanceMethod,
    #[serde(alias = "stanceFraction")]
    pub stance_fraction: f64,
    #[serde(alias = "recentWindowSecs")]
    pub recent_window_secs: f64,
    #[serde(alias = "ratingStatistic")]
    pub rating_statistic: ChannelStatistic,
    #[serde(alias = "channelThresholds")]
    pub channel_thresholds: BTreeMap<Channel, Thresholds>,
    #[serde(alias = "minimumSampleCountForConfidence")]
    pub min_samples_for_confidence: usize,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: 25.0,
            noise_floor: 1.0,
            sanity_ceiling: 4095.0, // 12-bit ADC fullskala
            step_threshold: 20.0,
            min_sample_separation: 10, // 0.4 s @ 25 Hz
            min_prominence: 10.0,
            overlap_fraction: 0.25,
            adaptive_threshold_ratio: None,
            smoothing: Some(SmoothingConfig::default()),
            stance_method: StanceMethod::Auto,
            stance_fraction: 0.6,
            recent_window_secs: 10.0,
            rating_statistic: ChannelStatistic::Mean,
            channel_thresholds: DEFAULT_CHANNEL_THRESHOLDS.clone(),
            min_samples_for_confidence: 100,
        }
    }
}

fn finite_nonneg(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

impl GaitConfig {
    /// Parser JSON (ukjente felt ignoreres, manglende felt får default) og validerer.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let cfg: GaitConfig = spte::deserialize(de).map_err(|e| ConfigError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sampling_rate_hz.is_finite() && self.sampling_rate_hz > 0.0) {
            return Err(ConfigError::NonPositiveSamplingRate(self.sampling_rate_hz));
        }
        if self.min_sample_separation == 0 {
            return Err(ConfigError::NonPositiveSeparation);
        }
        if !(0.0..=1.0).contains(&self.overlap_fraction) {
            return Err(ConfigError::InvalidOverlap(self.overlap_fraction));
        }
        finite_nonneg("noise_floor", self.noise_floor)?;
        if !(self.sanity_ceiling > self.noise_floor) {
            return Err(ConfigError::InvalidNoiseBand {
                noise_floor: self.noise_floor,
                sanity_ceiling: self.sanity_ceiling,
            });
        }
        finite_nonneg("step_threshold", self.step_threshold)?;
        finite_nonneg("min_prominence", self.min_prominence)?;
        finite_nonneg("recent_window_secs", self.recent_window_secs)?;
        if let Some(r) = self.adaptive_threshold_ratio {
            finite_nonneg("adaptive_threshold_ratio", r)?;
        }
        if !(self.stance_fraction > 0.0 && self.stance_fraction < 1.0) {
            return Err(ConfigError::InvalidStanceFraction(self.stance_fraction));
        }
        if let ChannelStatistic::Percentile(p) = self.rating_statistic {
            if !(0.0..=100.0).contains(&p) {
                return Err(ConfigError::InvalidPercentile(p));
            }
        }
        if let Some(s) = &self.smoothing {
            let len = s.window_len(self.sampling_rate_hz);
            if !s.window_secs.is_finite() || len > MAX_SMOOTHING_WINDOW_LEN {
                return Err(ConfigError::InvalidSmoothing(format!(
                    "window_len={len} (maks {MAX_SMOOTHING_WINDOW_LEN})"
                )));
            }
            if len < 3 || s.poly_order >= len {
                return Err(ConfigError::InvalidSmoothing(format!(
                    "window_len={len}, poly_order={}",
                    s.poly_order
                )));
            }
        }
        for (channel, t) in &self.channel_thresholds {
            if !(t.weak <= t.high) {
                return Err(ConfigError::InvalidThresholds {
                    channel: *channel,
                    weak: t.weak,
                    high: t.high,
                });
            }
        }
        Ok(())
    }

    /// Terskler for kanalen; faller tilbake til standard når kanalen mangler i configen.
    pub fn thresholds_for(&self, channel: Channel) -> Thresholds {
        self.channel_thresholds
            .get(&channel)
            .or_else(|| DEFAULT_CHANNEL_THRESHOLDS.get(&channel))
            .copied()
            .unwrap_or_else(|| site_default(channel.site()))
    }

    pub fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            step_threshold: self.step_threshold,
            min_sample_separation: self.min_sample_separation,
            min_prominence: self.min_prominence,
            adaptive_threshold_ratio: self.adaptive_threshold_ratio,
        }
    }

    /// Antall samples i "nylig"-vinduet (minst 1).
    pub fn recent_window_len(&self) -> usize {
        ((self.recent_window_secs * self.sampling_rate_hz).round() as usize).max(1)
    }
}
