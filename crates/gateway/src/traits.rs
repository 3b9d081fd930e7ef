//! The contract gateway port

use async_trait::async_trait;
use voltmesh_types::{
    Address, ConsumerProfile, EnergyRequest, EnergyTransaction, GatewayError, GatewayResult,
    ProducerListing, ProducerProfile, Role,
};

use crate::intent::{Intent, Receipt};

/// Read and mutate on-chain state through the external contract's ABI.
///
/// Implementations surface failures through [`GatewayError`]; callers that
/// can degrade gracefully (the reconciler's per-entry reads) decide how
/// much of a pass survives a failure.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Read a producer profile. Fails with [`GatewayError::NotFound`] when
    /// the address has never registered as a producer; callers treat that
    /// as "no profile", not as a fault.
    async fn read_producer(&self, address: &Address) -> GatewayResult<ProducerProfile>;

    /// Read a consumer profile; `NotFound` when unregistered.
    async fn read_consumer(&self, address: &Address) -> GatewayResult<ConsumerProfile>;

    /// Bulk listing of all producers. Contract-defined order; treat as
    /// unordered.
    async fn read_all_producers(&self) -> GatewayResult<Vec<ProducerListing>>;

    /// Read the request slot keyed by `producer`. Always yields a value;
    /// `active == false` means no outstanding request.
    async fn read_request(&self, producer: &Address) -> GatewayResult<EnergyRequest>;

    /// Read one settled trade by its history index.
    async fn read_transaction(&self, index: u64) -> GatewayResult<EnergyTransaction>;

    /// Total number of settled trades; used to page through the full
    /// history (there is no native per-address pagination).
    async fn read_transaction_count(&self) -> GatewayResult<u64>;

    /// Submit a state-mutating intent and wait for confirmation. After a
    /// receipt is returned, all reads for the involved addresses are
    /// stale.
    async fn submit(&self, intent: Intent) -> GatewayResult<Receipt>;

    /// Resolve the registration role of an account. Roles are mutually
    /// exclusive; the producer mapping is checked first.
    async fn resolve_role(&self, address: &Address) -> GatewayResult<Role> {
        match self.read_producer(address).await {
            Ok(_) => return Ok(Role::Producer),
            Err(GatewayError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
        match self.read_consumer(address).await {
            Ok(_) => Ok(Role::Consumer),
            Err(GatewayError::NotFound { .. }) => Ok(Role::Unregistered),
            Err(e) => Err(e),
        }
    }
}
