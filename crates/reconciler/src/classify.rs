//! Bucket classification for raw contract records
//!
//! Pure functions shared by every reconciliation pass. Buckets are
//! disjoint and exhaustive over active requests: pending iff
//! `active && accept_time == 0`, supplying iff `active && accept_time > 0`;
//! inactive slots appear nowhere.

use std::cmp::Ordering;

use log::warn;
use voltmesh_types::{
    Address, ActiveSupplyView, EnergyRequest, EnergyTransaction, PendingRequestView,
    ProducerListing, SettledTradeView,
};
use voltmesh_units::{elapsed_since, estimated_cost, format_duration, implied_rate};

/// Classify request slots into the pending and active-supply buckets.
///
/// When `consumer_filter` is set, only requests addressed to that consumer
/// are retained (the consumer-role scan across all producer slots); a
/// producer pass feeds its own slot and passes `None`.
pub fn bucket_requests(
    requests: &[EnergyRequest],
    listings: &[ProducerListing],
    consumer_filter: Option<&Address>,
    now: u64,
) -> (Vec<PendingRequestView>, Vec<ActiveSupplyView>) {
    let mut pending = Vec::new();
    let mut active = Vec::new();

    for request in requests {
        if request.is_terminated() {
            continue;
        }
        if let Some(consumer) = consumer_filter {
            if request.consumer != *consumer {
                continue;
            }
        }

        if request.is_pending() {
            let producer_rate = listings
                .iter()
                .find(|l| l.address == request.producer)
                .map(|l| l.rate);
            pending.push(PendingRequestView {
                producer: request.producer,
                consumer: request.consumer,
                requested_rate: request.rate,
                producer_rate,
                requested_amount: request.requested_amount,
                request_time: request.request_time,
                consumer_balance: None,
            });
        } else {
            // Exact integer math before any decimal conversion.
            let cost = match estimated_cost(request.requested_amount, request.rate) {
                Ok(cost) => cost,
                Err(e) => {
                    warn!(
                        "skipping supply on {}: {}",
                        request.producer.short(),
                        e
                    );
                    continue;
                }
            };
            let elapsed_secs = elapsed_since(request.accept_time, now);
            active.push(ActiveSupplyView {
                producer: request.producer,
                consumer: request.consumer,
                rate: request.rate,
                requested_amount: request.requested_amount,
                estimated_cost: cost,
                accept_time: request.accept_time,
                elapsed_secs,
                elapsed_label: format_duration(elapsed_secs),
            });
        }
    }

    (pending, active)
}

/// Filter the full transaction history down to trades involving `account`
/// and order them newest-first. Ties on the settlement timestamp keep
/// ascending original index, preserving insertion order for
/// same-timestamp settlements.
pub fn filter_history(
    account: &Address,
    entries: &[(u64, EnergyTransaction)],
) -> Vec<SettledTradeView> {
    let mut trades: Vec<SettledTradeView> = entries
        .iter()
        .filter(|(_, tx)| tx.involves(account))
        .map(|(index, tx)| SettledTradeView {
            index: *index,
            producer: tx.producer,
            consumer: tx.consumer,
            amount: tx.amount,
            duration_secs: tx.duration,
            duration_label: format_duration(tx.duration),
            started_at: tx.timestamp.saturating_sub(tx.duration),
            settled_at: tx.timestamp,
            implied_rate: implied_rate(tx.amount, tx.duration),
        })
        .collect();

    trades.sort_by(|a, b| match b.settled_at.cmp(&a.settled_at) {
        Ordering::Equal => a.index.cmp(&b.index),
        other => other,
    });

    trades
}
