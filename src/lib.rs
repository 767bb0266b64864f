//! Vitalis Analytics - Deterministic analytics over personal health and fitness data
//!
//! The engine turns a user's daily nutrition, training, sleep, hydration and weight
//! records into a report: metric correlations, a composite health score with trend,
//! insights, performance patterns and a coarse metabolic profile.
//!
//! Every computation is a pure function of its input. Fetching and storing data,
//! and rendering the report, are left to the host.
//!
//! ## Modules
//!
//! - **Stages**: [`correlation`], [`health_score`], [`insights`], [`performance`], [`metabolic`]
//! - **Orchestration**: [`pipeline`] resolves the window and runs every stage
//! - **Boundaries**: [`aggregator`] for raw entries, [`encoder`] and [`ffi`] for output

pub mod aggregator;
pub mod config;
pub mod correlation;
pub mod encoder;
pub mod error;
pub mod health_score;
pub mod insights;
pub mod logging;
pub mod metabolic;
pub mod normalizer;
pub mod performance;
pub mod pipeline;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregator::{DailyAggregator, RawEntries};
pub use config::EngineConfig;
pub use encoder::{ReportEncoder, ReportEnvelope};
pub use error::{AnalyticsError, ValidationError};
pub use pipeline::{analytics_from_json, compute_analytics, AnalyticsEngine};
pub use types::{AnalyticsInput, AnalyticsReport, AnalyticsWindow};

/// Engine version embedded in every report envelope
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "vitalis-analytics";
