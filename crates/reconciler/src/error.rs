//! Error types for the reconciler service

use thiserror::Error;
use voltmesh_types::{Address, AmountError, GatewayError};

/// Errors that fail a whole reconciliation pass. Individual read failures
/// inside a pass degrade that entry instead and never surface here.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A required read (profile, producer listing, transaction count)
    /// failed; the prior snapshot is retained and flagged stale.
    #[error("contract data unavailable: {0}")]
    DataUnavailable(#[source] GatewayError),

    /// The account has no registered role to reconcile for.
    #[error("account {0} is not registered")]
    Unregistered(Address),
}

/// Errors from submitting a mutating intent through the service.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Client-side validation failed; nothing reached the network.
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    /// The prepaid balance cannot cover the estimated cost; blocked
    /// client-side before submission.
    #[error("insufficient balance: need {required} base units, have {available}")]
    InsufficientBalance { required: u128, available: u128 },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("failed to write config file {path}: {message}")]
    Write { path: String, message: String },

    #[error("invalid configuration '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &str, reason: &str) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
