//! Inkrementell stegteller som aldri går bakover.
//!
//! Full re-deteksjon over hele strømmen ved hver oppdatering kan gi færre topper
//! enn forrige kjøring (kanteffekter når data legges til). Telleren analyserer
//! derfor bare nye samples pluss et overlapp, og teller kun topper etter
//! `last_processed_index`.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{DetectorConfig, GaitConfig};
use crate::detection::detect_events;
use crate::error::SessionDiscontinuity;
use crate::types::{LoadPoint, StepEvent};

/// Persistent tilstand for én økt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// -1 før første analyse.
    pub last_processed_index: i64,
    pub cumulative_steps: u64,
}

impl Default for CounterState {
    fn default() -> Self {
        Self { last_processed_index: -1, cumulative_steps: 0 }
    }
}

impl CounterState {
    pub fn is_idle(&self) -> bool {
        self.last_processed_index < 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepUpdate {
    pub cumulative_steps: u64,
    /// Hendelser talt i denne oppdateringen.
    pub new_events: Vec<StepEvent>,
    pub discontinuity: Option<SessionDiscontinuity>,
}

#[derive(Debug, Clone)]
pub struct IncrementalStepCounter {
    detector: DetectorConfig,
    overlap_fraction: f64,
    state: CounterState,
    events: Vec<StepEvent>,
}

impl IncrementalStepCounter {
    pub fn new(detector: DetectorConfig, overlap_fraction: f64) -> Self {
        Self {
            detector,
            overlap_fraction: overlap_fraction.clamp(0.0, 1.0),
            state: CounterState::default(),
            events: Vec::new(),
        }
    }

    pub fn from_config(cfg: &GaitConfig) -> Self {
        Self::new(cfg.detector(), cfg.overlap_fraction)
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    pub fn cumulative_steps(&self) -> u64 {
        self.state.cumulative_steps
    }

    /// Alle talte hendelser i økten (kun påfylling).
    pub fn events(&self) -> &[StepEvent] {
        &self.events
    }

    /// Eksplisitt øktnullstilling (ny økt/enhet/person).
    pub fn reset(&mut self) {
        self.state = CounterState::default();
        self.events.clear();
    }

    /// Første indeks i analysevinduet: `last - overlap`, der overlappet er en andel
    /// av de nye samplene siden forrige kall, men aldri kortere enn minsteavstanden.
    fn overlap_start(&self, len: usize) -> usize {
        let last = self.state.last_processed_index;
        if last < 0 {
            return 0;
        }
        let fresh = (len as i64 - 1 - last).max(0) as f64;
        let overlap = ((self.overlap_fraction * fresh).ceil() as i64)
            .max(self.detector.min_sample_separation as i64);
        (last - overlap).max(0) as usize
    }

    pub fn update(&mut self, series: &[LoadPoint]) -> StepUpdate {
        let len = series.len() as i64;
        let mut discontinuity = None;

        if len < self.state.last_processed_index + 1 {
            let d = SessionDiscontinuity {
                last_processed_index: self.state.last_processed_index,
                stream_len: series.len(),
            };
            warn!("{d}");
            self.reset();
            discontinuity = Some(d);
        }

        // ingen nye samples → uendret
        if len - 1 <= self.state.last_processed_index {
            return StepUpdate {
                cumulative_steps: self.state.cumulative_steps,
                new_events: Vec::new(),
                discontinuity,
            };
        }

        let start = self.overlap_start(series.len());
        let last = self.state.last_processed_index;
        let min_gap = self.detector.min_sample_separation;
        // minsteavstand holder også mot hendelser talt i tidligere kall
        let mut prev = self.events.last().map(|e| e.index);
        let mut new_events = Vec::new();
        for e in detect_events(&series[start..], &self.detector, start) {
            if e.index as i64 <= last {
                continue;
            }
            if prev.is_some_and(|p| e.index - p < min_gap) {
                continue;
            }
            prev = Some(e.index);
            new_events.push(e);
        }

        self.state.cumulative_steps += new_events.len() as u64;
        self.state.last_processed_index = len - 1;
        self.events.extend_from_slice(&new_events);

        debug!(
            "step counter: window [{start}, {}], +{} steps, total {}",
            len - 1,
            new_events.len(),
            self.state.cumulative_steps
        );

        StepUpdate {
            cumulative_steps: self.state.cumulative_steps,
            new_events,
            discontinuity,
        }
    }
}

/// Delt håndtak for én økt. `update` serialiseres via mutex slik at
/// lese-og-skriv av tilstanden skjer atomisk.
#[derive(Debug, Clone)]
pub struct SharedStepCounter {
    inner: Arc<Mutex<IncrementalStepCounter>>,
}

impl SharedStepCounter {
    pub fn new(counter: IncrementalStepCounter) -> Self {
        Self { inner: Arc::new(Mutex::new(counter)) }
    }

    pub fn update(&self, series: &[LoadPoint]) -> StepUpdate {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update(series)
    }

    pub fn cumulative_steps(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cumulative_steps()
    }

    pub fn reset(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> DetectorConfig {
        DetectorConfig {
            step_threshold: 10.0,
            min_sample_separation: 5,
            min_prominence: 1.0,
            adaptive_threshold_ratio: None,
        }
    }

    #[test]
    fn overlap_is_at_least_min_separation() {
        let mut c = IncrementalStepCounter::new(cfg(), 0.0);
        c.state.last_processed_index = 100;
        assert_eq!(c.overlap_start(200), 95);

        let mut c = IncrementalStepCounter::new(cfg(), 0.25);
        c.state.last_processed_index = 99;
        assert_eq!(c.overlap_start(200), 74);
        // liten bit: andelen av 10 nye samples er under minsteavstanden
        assert_eq!(c.overlap_start(110), 94);
    }

    #[test]
    fn idle_starts_at_zero() {
        let c = IncrementalStepCounter::new(cfg(), 0.25);
        assert!(c.state().is_idle());
        assert_eq!(c.overlap_start(50), 0);
    }
}
