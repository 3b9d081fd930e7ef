//! Shared constants for the VoltMesh client

/// Number of decimal places in the ledger's base-unit representation.
pub const DISPLAY_DECIMALS: u32 = 18;

/// Base units per whole display unit (10^18).
pub const BASE_UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Seconds per minute, used by the duration formatter.
pub const SECS_PER_MINUTE: u64 = 60;

/// Seconds per hour.
pub const SECS_PER_HOUR: u64 = 3_600;

/// Seconds per day.
pub const SECS_PER_DAY: u64 = 86_400;
