//! The state reconciliation service
//!
//! One `Reconciler` serves one account/role at a time. Each pass pulls raw
//! records through the contract gateway, classifies them, and publishes an
//! immutable snapshot on a watch channel. Passes never overlap on the
//! scheduler path, the most recently completed pass wins, and in-flight
//! passes for a replaced identity are discarded on completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use voltmesh_gateway::{ContractGateway, Intent, Receipt};
use voltmesh_types::{Address, Balances, Role, Snapshot};
use voltmesh_units::estimated_cost;

use crate::classify;
use crate::error::{ReconcileError, SubmitError};

/// The account and role a reconciler is currently serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub account: Address,
    pub role: Role,
}

impl Identity {
    pub fn new(account: Address, role: Role) -> Self {
        Self { account, role }
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass published its snapshot.
    Published(Snapshot),
    /// A newer pass already published; this result was dropped.
    Superseded,
    /// The identity changed while the pass was in flight; the result was
    /// discarded rather than applied.
    IdentityChanged,
}

pub struct Reconciler<G> {
    gateway: Arc<G>,
    /// Current identity plus an epoch bumped on every change.
    identity: RwLock<(Identity, u64)>,
    /// Monotonically increasing pass number, assigned at pass start.
    sequence: AtomicU64,
    /// Sequence of the most recently published snapshot.
    last_published: AtomicU64,
    /// Held across a scheduled pass; `tick` skips when already taken.
    pass_gate: Mutex<()>,
    /// Serializes mutating submissions.
    submit_gate: Mutex<()>,
    publisher: watch::Sender<Option<Snapshot>>,
}

impl<G: ContractGateway> Reconciler<G> {
    pub fn new(gateway: Arc<G>, identity: Identity) -> Result<Self, ReconcileError> {
        if !identity.role.is_registered() {
            return Err(ReconcileError::Unregistered(identity.account));
        }
        let (publisher, _) = watch::channel(None);
        Ok(Self {
            gateway,
            identity: RwLock::new((identity, 0)),
            sequence: AtomicU64::new(0),
            last_published: AtomicU64::new(0),
            pass_gate: Mutex::new(()),
            submit_gate: Mutex::new(()),
            publisher,
        })
    }

    /// Subscribe to published snapshots. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.publisher.subscribe()
    }

    pub async fn identity(&self) -> Identity {
        self.identity.read().await.0
    }

    /// Switch the reconciler to a new account/role. The published snapshot
    /// is cleared and any in-flight pass for the previous identity is
    /// discarded on completion.
    pub async fn set_identity(&self, identity: Identity) -> Result<(), ReconcileError> {
        if !identity.role.is_registered() {
            return Err(ReconcileError::Unregistered(identity.account));
        }
        let mut slot = self.identity.write().await;
        slot.0 = identity;
        slot.1 += 1;
        self.publisher.send_replace(None);
        Ok(())
    }

    /// Run the reconcile loop until the task is cancelled.
    pub async fn run(&self, poll_interval: Duration) {
        let mut timer = tokio::time::interval(poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut iteration = 0u64;
        loop {
            timer.tick().await;
            iteration += 1;
            debug!("starting reconcile iteration {}", iteration);
            self.tick().await;
        }
    }

    /// One scheduled pass. Suppressed (not queued) when a prior pass for
    /// this reconciler is still in flight.
    pub async fn tick(&self) {
        let Ok(_guard) = self.pass_gate.try_lock() else {
            debug!("reconcile pass in flight, tick suppressed");
            return;
        };
        match self.run_pass().await {
            Ok(PassOutcome::Published(snapshot)) => {
                debug!(
                    "published snapshot seq={} pending={} active={} history={}",
                    snapshot.sequence,
                    snapshot.pending_requests.len(),
                    snapshot.active_supplies.len(),
                    snapshot.transaction_history.len()
                );
            }
            Ok(outcome) => debug!("pass discarded: {:?}", outcome),
            Err(ReconcileError::DataUnavailable(cause)) if cause.is_transient() => {
                warn!("reconcile pass failed: {}; retrying next pass", cause);
            }
            Err(e) => error!("reconcile pass failed: {}", e),
        }
    }

    /// Execute one reconciliation pass end to end.
    ///
    /// On failure of a required read the prior snapshot is retained and
    /// flagged stale; per-entry reads degrade individually inside the
    /// fetch.
    pub async fn run_pass(&self) -> Result<PassOutcome, ReconcileError> {
        let (identity, epoch) = *self.identity.read().await;
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        match self.fetch_snapshot(&identity, sequence).await {
            Ok(snapshot) => {
                if self.identity.read().await.1 != epoch {
                    debug!("pass {} discarded: identity changed mid-flight", sequence);
                    return Ok(PassOutcome::IdentityChanged);
                }
                let won = self
                    .last_published
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                        (sequence > current).then_some(sequence)
                    })
                    .is_ok();
                if !won {
                    debug!("pass {} discarded: superseded by a newer pass", sequence);
                    return Ok(PassOutcome::Superseded);
                }
                self.publisher.send_replace(Some(snapshot.clone()));
                Ok(PassOutcome::Published(snapshot))
            }
            Err(e) => {
                // Keep last-known-good data on display, but mark it. A
                // superseded or identity-replaced pass must not touch a
                // newer pass's snapshot, failing or not.
                let current = self.identity.read().await.1 == epoch
                    && sequence > self.last_published.load(Ordering::SeqCst);
                if current {
                    self.publisher.send_modify(|slot| {
                        if let Some(snapshot) = slot {
                            snapshot.stale = true;
                        }
                    });
                }
                Err(e)
            }
        }
    }

    async fn fetch_snapshot(
        &self,
        identity: &Identity,
        sequence: u64,
    ) -> Result<Snapshot, ReconcileError> {
        let taken_at = chrono::Utc::now().timestamp();
        let now = taken_at.max(0) as u64;
        match identity.role {
            Role::Consumer => self.fetch_consumer_snapshot(identity, sequence, taken_at, now).await,
            Role::Producer => self.fetch_producer_snapshot(identity, sequence, taken_at, now).await,
            Role::Unregistered => Err(ReconcileError::Unregistered(identity.account)),
        }
    }

    async fn fetch_consumer_snapshot(
        &self,
        identity: &Identity,
        sequence: u64,
        taken_at: i64,
        now: u64,
    ) -> Result<Snapshot, ReconcileError> {
        let profile = self
            .gateway
            .read_consumer(&identity.account)
            .await
            .map_err(ReconcileError::DataUnavailable)?;
        let listings = self
            .gateway
            .read_all_producers()
            .await
            .map_err(ReconcileError::DataUnavailable)?;

        // Scan every producer's request slot; the contract holds at most
        // one outstanding request per producer.
        let mut requests = Vec::with_capacity(listings.len());
        for listing in &listings {
            match self.gateway.read_request(&listing.address).await {
                Ok(request) => requests.push(request),
                Err(e) => warn!(
                    "request read failed for producer {}: {}; entry omitted",
                    listing.address.short(),
                    e
                ),
            }
        }

        let (pending_requests, active_supplies) =
            classify::bucket_requests(&requests, &listings, Some(&identity.account), now);
        let transaction_history = self.fetch_history(&identity.account).await?;
        let available_producers = listings
            .iter()
            .filter(|l| l.supply_active && l.rate > 0)
            .cloned()
            .collect();

        Ok(Snapshot {
            account: identity.account,
            role: Role::Consumer,
            sequence,
            taken_at,
            stale: false,
            balances: Balances::Consumer {
                deposit: profile.balance,
            },
            pending_requests,
            active_supplies,
            transaction_history,
            available_producers,
        })
    }

    async fn fetch_producer_snapshot(
        &self,
        identity: &Identity,
        sequence: u64,
        taken_at: i64,
        now: u64,
    ) -> Result<Snapshot, ReconcileError> {
        let profile = self
            .gateway
            .read_producer(&identity.account)
            .await
            .map_err(ReconcileError::DataUnavailable)?;

        // A producer only ever holds its own request slot.
        let mut requests = Vec::with_capacity(1);
        match self.gateway.read_request(&identity.account).await {
            Ok(request) => requests.push(request),
            Err(e) => warn!("own request read failed: {}; entry omitted", e),
        }

        let (mut pending_requests, active_supplies) =
            classify::bucket_requests(&requests, &[], None, now);

        // Best-effort enrichment: the accept decision wants to see the
        // counterparty's prepaid balance.
        for pending in &mut pending_requests {
            match self.gateway.read_consumer(&pending.consumer).await {
                Ok(consumer) => pending.consumer_balance = Some(consumer.balance),
                Err(e) => debug!(
                    "consumer balance lookup failed for {}: {}",
                    pending.consumer.short(),
                    e
                ),
            }
        }

        let transaction_history = self.fetch_history(&identity.account).await?;

        Ok(Snapshot {
            account: identity.account,
            role: Role::Producer,
            sequence,
            taken_at,
            stale: false,
            balances: Balances::Producer {
                rate: profile.rate,
                revenue: profile.balance,
                supply_active: profile.supply_active,
            },
            pending_requests,
            active_supplies,
            transaction_history,
            available_producers: Vec::new(),
        })
    }

    /// Page through the full history; there is no per-address pagination
    /// on the contract, so filtering happens client-side.
    async fn fetch_history(
        &self,
        account: &Address,
    ) -> Result<Vec<voltmesh_types::SettledTradeView>, ReconcileError> {
        let count = self
            .gateway
            .read_transaction_count()
            .await
            .map_err(ReconcileError::DataUnavailable)?;

        let mut entries = Vec::with_capacity(count as usize);
        for index in 0..count {
            match self.gateway.read_transaction(index).await {
                Ok(transaction) => entries.push((index, transaction)),
                Err(e) => warn!("transaction {} read failed: {}; entry omitted", index, e),
            }
        }

        Ok(classify::filter_history(account, &entries))
    }

    /// Submit a mutating intent. Strictly sequential per service; waits
    /// for confirmation and then triggers a fresh pass — balances and
    /// requests are never mutated optimistically.
    pub async fn submit(&self, intent: Intent) -> Result<Receipt, SubmitError> {
        let _guard = self.submit_gate.lock().await;

        intent.validate()?;
        if let Intent::RequestEnergy { producer, amount } = &intent {
            self.check_request_funding(producer, *amount).await?;
        }

        let method = intent.method_name();
        let receipt = self.gateway.submit(intent).await?;
        info!("{} confirmed: {}", method, receipt.tx_hash);

        // All reads for the involved addresses are now stale.
        if let Err(e) = self.run_pass().await {
            warn!("post-submit refresh failed: {}", e);
        }
        Ok(receipt)
    }

    /// Block a request the prepaid balance cannot cover before it reaches
    /// the network.
    async fn check_request_funding(
        &self,
        producer: &Address,
        amount: u128,
    ) -> Result<(), SubmitError> {
        let account = self.identity().await.account;
        let available = self.gateway.read_consumer(&account).await?.balance;
        let rate = self.gateway.read_producer(producer).await?.rate;
        let required = estimated_cost(amount, rate)?;
        if required > available {
            return Err(SubmitError::InsufficientBalance { required, available });
        }
        Ok(())
    }
}
