//! In-memory contract gateway for service tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use voltmesh_gateway::{ContractGateway, Intent, Receipt};
use voltmesh_types::{
    Address, ConsumerProfile, EnergyRequest, EnergyTransaction, GatewayError, GatewayResult,
    ProducerListing, ProducerProfile,
};

pub fn addr(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::new(bytes)
}

#[derive(Default)]
pub struct MockGateway {
    producers: Mutex<HashMap<Address, ProducerProfile>>,
    consumers: Mutex<HashMap<Address, ConsumerProfile>>,
    listings: Mutex<Vec<ProducerListing>>,
    requests: Mutex<HashMap<Address, EnergyRequest>>,
    transactions: Mutex<Vec<EnergyTransaction>>,

    failing_requests: Mutex<HashSet<Address>>,
    fail_listings: AtomicBool,
    fail_consumers: AtomicBool,
    /// One-shot delay applied to the next `read_all_producers` call.
    listing_delay_ms: AtomicU64,
    pub listing_calls: AtomicU64,
    submitted: Mutex<Vec<Intent>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_producer(&self, address: Address, rate: u128, balance: u128, supply_active: bool) {
        self.producers.lock().unwrap().insert(
            address,
            ProducerProfile {
                address,
                rate,
                balance,
                registered: true,
                supply_active,
            },
        );
        self.listings.lock().unwrap().push(ProducerListing {
            address,
            rate,
            supply_active,
        });
    }

    pub fn insert_consumer(&self, address: Address, balance: u128) {
        self.consumers.lock().unwrap().insert(
            address,
            ConsumerProfile {
                address,
                balance,
                registered: true,
            },
        );
    }

    pub fn set_request(&self, request: EnergyRequest) {
        self.requests.lock().unwrap().insert(request.producer, request);
    }

    pub fn push_transaction(&self, transaction: EnergyTransaction) {
        self.transactions.lock().unwrap().push(transaction);
    }

    pub fn fail_request_reads_for(&self, producer: Address) {
        self.failing_requests.lock().unwrap().insert(producer);
    }

    pub fn set_fail_listings(&self, fail: bool) {
        self.fail_listings.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_consumers(&self, fail: bool) {
        self.fail_consumers.store(fail, Ordering::SeqCst);
    }

    pub fn delay_next_listing_read(&self, millis: u64) {
        self.listing_delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn submitted(&self) -> Vec<Intent> {
        self.submitted.lock().unwrap().clone()
    }

    fn empty_slot(producer: Address) -> EnergyRequest {
        EnergyRequest {
            producer,
            consumer: Address::ZERO,
            rate: 0,
            request_time: 0,
            accept_time: 0,
            settle_time: 0,
            requested_amount: 0,
            active: false,
        }
    }
}

#[async_trait]
impl ContractGateway for MockGateway {
    async fn read_producer(&self, address: &Address) -> GatewayResult<ProducerProfile> {
        self.producers
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or(GatewayError::not_found(*address))
    }

    async fn read_consumer(&self, address: &Address) -> GatewayResult<ConsumerProfile> {
        if self.fail_consumers.load(Ordering::SeqCst) {
            return Err(GatewayError::network("consumer read refused"));
        }
        self.consumers
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or(GatewayError::not_found(*address))
    }

    async fn read_all_producers(&self) -> GatewayResult<Vec<ProducerListing>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.listing_delay_ms.swap(0, Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_listings.load(Ordering::SeqCst) {
            return Err(GatewayError::network("listing read refused"));
        }
        Ok(self.listings.lock().unwrap().clone())
    }

    async fn read_request(&self, producer: &Address) -> GatewayResult<EnergyRequest> {
        if self.failing_requests.lock().unwrap().contains(producer) {
            return Err(GatewayError::network("request read refused"));
        }
        Ok(self
            .requests
            .lock()
            .unwrap()
            .get(producer)
            .cloned()
            .unwrap_or_else(|| Self::empty_slot(*producer)))
    }

    async fn read_transaction(&self, index: u64) -> GatewayResult<EnergyTransaction> {
        self.transactions
            .lock()
            .unwrap()
            .get(index as usize)
            .cloned()
            .ok_or_else(|| GatewayError::invalid_response(format!("no transaction {}", index)))
    }

    async fn read_transaction_count(&self) -> GatewayResult<u64> {
        Ok(self.transactions.lock().unwrap().len() as u64)
    }

    async fn submit(&self, intent: Intent) -> GatewayResult<Receipt> {
        self.submitted.lock().unwrap().push(intent);
        Ok(Receipt {
            tx_hash: format!("0xmock{:04}", self.submitted.lock().unwrap().len()),
        })
    }
}
