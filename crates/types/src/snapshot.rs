//! Derived view-model snapshot types
//!
//! A snapshot is rebuilt wholesale on every reconciliation pass and
//! published as an immutable value; it is never partially mutated.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::market::{ProducerListing, Role};

/// Role-dependent balance summary for the active account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Balances {
    Producer {
        /// Current listed rate, base units per energy unit.
        rate: u128,
        /// Accrued revenue, base units.
        revenue: u128,
        supply_active: bool,
    },
    Consumer {
        /// Prepaid deposit, base units.
        deposit: u128,
    },
}

/// A request awaiting producer acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequestView {
    pub producer: Address,
    pub consumer: Address,
    /// Rate captured when the request was made.
    pub requested_rate: u128,
    /// The producer's current listed rate, when known.
    pub producer_rate: Option<u128>,
    pub requested_amount: u128,
    /// Unix seconds.
    pub request_time: u64,
    /// Counterparty prepaid balance; populated on the producer side when
    /// the lookup succeeds.
    pub consumer_balance: Option<u128>,
}

/// An accepted request currently supplying energy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSupplyView {
    pub producer: Address,
    pub consumer: Address,
    /// Rate locked at request time.
    pub rate: u128,
    /// Energy units delivered over the supply.
    pub requested_amount: u128,
    /// `requested_amount * rate`, exact integer math in base units.
    pub estimated_cost: u128,
    /// Unix seconds.
    pub accept_time: u64,
    /// Supply duration so far, clamped to >= 0 against clock skew.
    pub elapsed_secs: u64,
    /// Floor-formatted elapsed duration, e.g. "1 minutes".
    pub elapsed_label: String,
}

/// A settled historical trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledTradeView {
    /// Original position in the contract's history array.
    pub index: u64,
    pub producer: Address,
    pub consumer: Address,
    /// Payment, base units.
    pub amount: u128,
    pub duration_secs: u64,
    /// Floor-formatted duration.
    pub duration_label: String,
    /// Supply start, `timestamp - duration`, unix seconds.
    pub started_at: u64,
    /// Settlement time, unix seconds.
    pub settled_at: u64,
    /// `amount * 10^18 / duration`; absent for zero-duration settlements.
    pub implied_rate: Option<u128>,
}

/// Immutable view-model snapshot for one account and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub account: Address,
    pub role: Role,
    /// Monotonically increasing pass number, assigned when the pass starts.
    pub sequence: u64,
    /// When this snapshot was built, unix seconds.
    pub taken_at: i64,
    /// Set when a later pass failed and this snapshot is being retained as
    /// last-known-good data.
    pub stale: bool,
    pub balances: Balances,
    pub pending_requests: Vec<PendingRequestView>,
    pub active_supplies: Vec<ActiveSupplyView>,
    pub transaction_history: Vec<SettledTradeView>,
    /// Marketplace listing: producers with active supply and a nonzero
    /// rate. Empty for producer-role snapshots.
    pub available_producers: Vec<ProducerListing>,
}
