//! Error taxonomy shared across the VoltMesh client components

use thiserror::Error;

use crate::address::Address;

// ============================================================================
// Gateway Errors
// ============================================================================

/// Errors surfaced by the contract gateway for reads and submissions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The signer declined the transaction. Recoverable; never retried.
    #[error("transaction rejected by signer")]
    UserRejected,

    /// A contract-level precondition failed.
    #[error("transaction reverted{}", reason.as_deref().map(|r| format!(": {}", r)).unwrap_or_default())]
    Reverted { reason: Option<String> },

    /// Transport-level failure talking to the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The address has no registered profile for the requested role.
    #[error("no registered profile for {address}")]
    NotFound { address: Address },

    /// A response from the provider could not be decoded.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// An address string could not be parsed.
    #[error("invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn reverted(reason: Option<&str>) -> Self {
        Self::Reverted {
            reason: reason.map(|r| r.to_string()),
        }
    }

    pub fn not_found(address: Address) -> Self {
        Self::NotFound { address }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn invalid_address(input: &str, reason: &str) -> Self {
        Self::InvalidAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether a read that failed with this error is worth retrying on the
    /// next scheduled pass.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::InvalidResponse(_))
    }
}

// ============================================================================
// Amount Errors
// ============================================================================

/// Errors from client-side amount validation and conversion. These are
/// caught at the input boundary and never reach the gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    /// The input string is not a valid amount at the fixed scale.
    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// An exact-integer computation would overflow.
    #[error("amount overflow in '{operation}'")]
    Overflow { operation: String },
}

impl AmountError {
    pub fn invalid_amount(input: &str, reason: &str) -> Self {
        Self::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn overflow(operation: &str) -> Self {
        Self::Overflow {
            operation: operation.to_string(),
        }
    }
}
