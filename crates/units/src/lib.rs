/// Unit conversion utilities for the VoltMesh client
///
/// This crate provides pure, stateless conversion between the ledger's
/// integer base-unit representation and human decimal display units, plus
/// the duration math used for derived snapshot fields. All amount math is
/// exact `u128` integer arithmetic; nothing here touches floats.

pub mod convert;
pub mod duration;

// Re-export commonly used functions
pub use convert::*;
pub use duration::*;
