/// Shared types for the VoltMesh marketplace client
///
/// This crate provides common type definitions, constants, and the error
/// taxonomy used across the gateway, units, and reconciler components.

pub mod address;
pub mod constants;
pub mod errors;
pub mod market;
pub mod snapshot;
pub mod telemetry;

// Re-export all public types
pub use address::*;
pub use constants::*;
pub use errors::*;
pub use market::*;
pub use snapshot::*;
pub use telemetry::*;

/// Result type alias for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Result type alias for amount validation and conversion
pub type AmountResult<T> = std::result::Result<T, AmountError>;
