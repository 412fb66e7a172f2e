use chrono::Utc;
use log::{info, warn};

use crate::classify::classify_channels;
use crate::config::GaitConfig;
use crate::counter::{CounterState, IncrementalStepCounter};
use crate::error::{ConfigError, SessionDiscontinuity};
use crate::evaluation::evaluate;
use crate::gait_events::{detect_heel_strike_toe_off, stance_swing_durations};
use crate::metrics::{GaitMetricsCalculator, MetricsInputs};
use crate::smoothing::{FrameSmoother, SignalConditioner};
use crate::telemetry::Telemetry;
use crate::types::{ConditionedFrame, Foot, LoadPoint, Sample, SessionReport, StepEvent};

/// Én overvåkingsøkt for én person. Eies av kalleren: opprett ved start,
/// kast ved slutt. Uavhengige økter deler ingen muterbar tilstand.
#[derive(Debug)]
pub struct GaitSession {
    session_id: String,
    config: GaitConfig,
    conditioner: SignalConditioner,
    smoother: FrameSmoother,
    calculator: GaitMetricsCalculator,
    counter: IncrementalStepCounter,
    frames: Vec<ConditionedFrame>,
    load: Vec<LoadPoint>,
    ingested: usize,
    last_ingested_timestamp: Option<f64>,
    telemetry: Option<Telemetry>,
}

impl GaitSession {
    /// Validerer konfigurasjonen; ugyldig config stopper øktstart.
    pub fn new(session_id: impl Into<String>, config: GaitConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            session_id: session_id.into(),
            conditioner: SignalConditioner::from_config(&config),
            smoother: FrameSmoother::from_config(&config),
            calculator: GaitMetricsCalculator::from_config(&config),
            counter: IncrementalStepCounter::from_config(&config),
            config,
            frames: Vec::new(),
            load: Vec::new(),
            ingested: 0,
            last_ingested_timestamp: None,
            telemetry: None,
        })
    }

    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &GaitConfig {
        &self.config
    }

    pub fn telemetry(&self) -> Option<&Telemetry> {
        self.telemetry.as_ref()
    }

    pub fn counter_state(&self) -> CounterState {
        self.counter.state()
    }

    pub fn cumulative_steps(&self) -> u64 {
        self.counter.cumulative_steps()
    }

    pub fn step_events(&self) -> &[StepEvent] {
        self.counter.events()
    }

    /// Kondisjonerte rammer (ligger `smoothing_delay()` samples bak strømmen).
    pub fn frames(&self) -> &[ConditionedFrame] {
        &self.frames
    }

    pub fn load_series(&self) -> &[LoadPoint] {
        &self.load
    }

    pub fn smoothing_delay(&self) -> usize {
        self.smoother.delay()
    }

    /// Eksplisitt nullstilling (ny økt/enhet/person valgt).
    pub fn reset(&mut self) {
        info!("session {}: reset", self.session_id);
        self.smoother.reset();
        self.counter.reset();
        self.frames.clear();
        self.load.clear();
        self.ingested = 0;
        self.last_ingested_timestamp = None;
    }

    /// Leser inn halen av strømmen som ikke er sett før.
    /// Krympet eller utskiftet strøm → nullstilling og ny innlesing fra start.
    pub fn ingest(&mut self, stream: &[Sample]) -> Option<SessionDiscontinuity> {
        // bitvis sammenligning: NaN-tidsstempel er likt seg selv
        let replaced = self.ingested > 0
            && stream.len() >= self.ingested
            && Some(stream[self.ingested - 1].timestamp.to_bits())
                != self.last_ingested_timestamp.map(f64::to_bits);

        let mut discontinuity = None;
        if stream.len() < self.ingested || replaced {
            let d = SessionDiscontinuity {
                last_processed_index: self.ingested as i64 - 1,
                stream_len: stream.len(),
            };
            warn!("session {}: {d}", self.session_id);
            if let Some(t) = &self.telemetry {
                t.discontinuities_total.inc();
            }
            self.reset();
            discontinuity = Some(d);
        }

        for sample in &stream[self.ingested..] {
            let (conditioned, outliers) = self.conditioner.condition_frame(&sample.channel_values);
            if outliers > 0 {
                if let Some(t) = &self.telemetry {
                    t.outliers_rejected_total.inc_by(outliers as u64);
                }
            }
            for channels in self.smoother.push(conditioned) {
                let index = self.frames.len();
                let timestamp = stream[index].timestamp;
                let frame = ConditionedFrame { index, timestamp, channels };
                self.load.push(LoadPoint { timestamp, value: frame.total_load() });
                self.frames.push(frame);
            }
        }
        self.ingested = stream.len();
        self.last_ingested_timestamp = stream.last().map(|s| s.timestamp);
        discontinuity
    }

    /// Analyserer (hele) strømmen inkrementelt og lager en rapport for publisering.
    pub fn update(&mut self, stream: &[Sample]) -> SessionReport {
        let discontinuity = self.ingest(stream);
        let step = self.counter.update(&self.load);

        if let Some(t) = &self.telemetry {
            t.updates_total.inc();
            t.steps_counted_total.inc_by(step.new_events.len() as u64);
        }

        let window_start = self.frames.len().saturating_sub(self.config.recent_window_len());
        let recent = &self.frames[window_start..];

        let left_load: f64 = recent.iter().map(|f| f.foot_load(Foot::Left)).sum();
        let right_load: f64 = recent.iter().map(|f| f.foot_load(Foot::Right)).sum();

        let frames = &self.frames;
        let mut stance = Vec::new();
        let mut swing = Vec::new();
        for foot in [Foot::Right, Foot::Left] {
            let events = detect_heel_strike_toe_off(recent, foot);
            let (st, sw) = stance_swing_durations(&events, |i| frames.get(i).map(|f| f.timestamp));
            stance.extend(st);
            swing.extend(sw);
        }

        let recent_events: Vec<StepEvent> = self
            .counter
            .events()
            .iter()
            .filter(|e| e.index >= window_start)
            .copied()
            .collect();

        let elapsed_seconds = match (stream.first(), stream.last()) {
            (Some(a), Some(b)) => (b.timestamp - a.timestamp).max(0.0),
            _ => 0.0,
        };

        let metrics = self.calculator.compute(&MetricsInputs {
            events: &recent_events,
            cumulative_steps: step.cumulative_steps,
            elapsed_seconds,
            left_load,
            right_load,
            samples_observed: stream.len(),
            stance_durations: &stance,
            swing_durations: &swing,
        });

        SessionReport {
            session_id: self.session_id.clone(),
            generated_at: Utc::now(),
            channels: classify_channels(recent, &self.config),
            evaluation: evaluate(&metrics),
            metrics,
            new_steps: step.new_events.len() as u64,
            discontinuity: discontinuity.is_some() || step.discontinuity.is_some(),
        }
    }
}

/// Engangsanalyse av en ferdig strøm (ny økt, ett kall).
pub fn analyze_session(
    session_id: &str,
    samples: &[Sample],
    config: GaitConfig,
) -> Result<SessionReport, ConfigError> {
    let mut session = GaitSession::new(session_id, config)?;
    Ok(session.update(samples))
}
