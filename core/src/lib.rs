//! GaitGraph core: stegdeteksjon, gangmetrikker og trykkvurdering fra
//! plantare trykksensorer (5 kanaler per fot).
//!
//! Flyt: samples → `smoothing` → last-serie → `detection` → `counter`
//! (inkrementell, aldri synkende) → `metrics`. `classify` går parallelt på
//! kondisjonerte kanaler. `GaitSession` binder det sammen og lager en
//! `SessionReport` som overleveres til en `GaitPublisher`.

pub mod analyze_session;
pub mod classify;
pub mod cli;
pub mod config;
pub mod counter;
pub mod detection;
pub mod error;
pub mod evaluation;
pub mod gait_events;
pub mod metrics;
pub mod publish;
pub mod smoothing;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use analyze_session::{analyze_session, GaitSession};
pub use classify::{classify, classify_channels, rating_score};
pub use config::{ChannelStatistic, DetectorConfig, GaitConfig, StanceMethod, Thresholds};
pub use counter::{CounterState, IncrementalStepCounter, SharedStepCounter, StepUpdate};
pub use detection::{detect, detect_events};
pub use error::{ConfigError, SessionDiscontinuity};
pub use metrics::{GaitMetricsCalculator, MetricsInputs};
pub use publish::{GaitPublisher, JsonLinesPublisher, MemoryPublisher};
pub use storage::{load_config, save_config};
pub use types::{
    Channel, ChannelRating, ChannelReading, ConditionedFrame, Foot, GaitMetrics, LoadPoint, Sample,
    SessionReport, StepEvent,
};
