//! Raw on-chain record types
//!
//! These mirror the external contract's storage layout. They are only ever
//! observed by this client; every mutation happens through submitted
//! transactions and is re-read after confirmation.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Registration state of an account. Roles are mutually exclusive; an
/// address is never both a producer and a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Producer,
    Consumer,
    Unregistered,
}

impl Role {
    pub fn is_registered(&self) -> bool {
        !matches!(self, Role::Unregistered)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Producer => write!(f, "producer"),
            Role::Consumer => write!(f, "consumer"),
            Role::Unregistered => write!(f, "unregistered"),
        }
    }
}

/// A producer's on-chain profile (`producers` mapping).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerProfile {
    pub address: Address,
    /// Price per energy unit, in base units.
    pub rate: u128,
    /// Accrued revenue, in base units.
    pub balance: u128,
    pub registered: bool,
    pub supply_active: bool,
}

/// A consumer's on-chain profile (`consumers` mapping).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerProfile {
    pub address: Address,
    /// Prepaid deposit, in base units.
    pub balance: u128,
    pub registered: bool,
}

/// One entry from the bulk `getAllProducers` view call. The contract
/// returns these in storage order; callers must treat the list as
/// unordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerListing {
    pub address: Address,
    pub rate: u128,
    pub supply_active: bool,
}

/// The single request slot keyed by producer (`requests` mapping).
///
/// A "no request" state is represented by `active == false`, never by an
/// absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyRequest {
    pub producer: Address,
    pub consumer: Address,
    /// Rate captured at request time, in base units per energy unit.
    pub rate: u128,
    /// Unix seconds; 0 while unset.
    pub request_time: u64,
    /// Unix seconds; 0 until the producer accepts.
    pub accept_time: u64,
    /// Unix seconds; 0 until settled.
    pub settle_time: u64,
    /// Requested energy, in whole energy units (kWh).
    pub requested_amount: u128,
    pub active: bool,
}

impl EnergyRequest {
    /// Pending iff active and not yet accepted.
    pub fn is_pending(&self) -> bool {
        self.active && self.accept_time == 0
    }

    /// Actively supplying iff active and accepted.
    pub fn is_supplying(&self) -> bool {
        self.active && self.accept_time > 0
    }

    /// An inactive slot with no settlement is a terminated (or never
    /// created) request and must not appear in any bucket.
    pub fn is_terminated(&self) -> bool {
        !self.active
    }
}

/// A settled trade from the append-only `transactionHistory` array,
/// immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyTransaction {
    pub producer: Address,
    pub consumer: Address,
    /// Payment, in base units.
    pub amount: u128,
    /// Supply duration in seconds.
    pub duration: u64,
    /// Settlement time, unix seconds.
    pub timestamp: u64,
}

impl EnergyTransaction {
    /// Whether the given account was a party to this trade.
    pub fn involves(&self, account: &Address) -> bool {
        self.producer == *account || self.consumer == *account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(active: bool, accept_time: u64) -> EnergyRequest {
        EnergyRequest {
            producer: Address::ZERO,
            consumer: Address::ZERO,
            rate: 0,
            request_time: 100,
            accept_time,
            settle_time: 0,
            requested_amount: 1,
            active,
        }
    }

    #[test]
    fn test_bucket_predicates_are_disjoint() {
        let pending = request(true, 0);
        assert!(pending.is_pending());
        assert!(!pending.is_supplying());

        let supplying = request(true, 500);
        assert!(supplying.is_supplying());
        assert!(!supplying.is_pending());

        let terminated = request(false, 500);
        assert!(terminated.is_terminated());
        assert!(!terminated.is_pending());
        assert!(!terminated.is_supplying());
    }
}
