pub mod classify;
pub mod config;
pub mod error;
pub mod reconciler;
pub mod telemetry;

pub use config::{ReconcilerConfig, TelemetryConfig};
pub use error::{ConfigError, ReconcileError, SubmitError};
pub use reconciler::{Identity, PassOutcome, Reconciler};
pub use telemetry::TelemetryFeed;
