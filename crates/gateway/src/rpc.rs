//! JSON-RPC gateway against the wallet provider bridge
//!
//! The bridge exposes the contract's view functions and submits signed
//! transactions on the session account's behalf. `u128` amounts travel as
//! decimal strings on the wire; only the bridge touches raw key material.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use voltmesh_types::{
    Address, ConsumerProfile, EnergyRequest, EnergyTransaction, GatewayError, GatewayResult,
    ProducerListing, ProducerProfile,
};

use crate::intent::{Intent, Receipt};
use crate::traits::ContractGateway;

/// Provider error code for a signer-declined request (EIP-1193).
const CODE_USER_REJECTED: i64 = 4001;

/// Provider error code for a contract-level revert.
const CODE_EXECUTION_REVERTED: i64 = 3;

/// The authenticated session this gateway acts for. Passed by injection;
/// there are no ambient singletons holding the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub account: Address,
}

impl SessionContext {
    pub fn new(account: Address) -> Self {
        Self { account }
    }
}

/// Transport configuration for the provider bridge.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// JSON-RPC gateway implementation.
pub struct RpcGateway {
    http: reqwest::Client,
    endpoint: String,
    session: SessionContext,
}

impl RpcGateway {
    pub fn new(config: &ProviderConfig, session: SessionContext) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::network(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    async fn call<T>(&self, method: &str, params: Value) -> GatewayResult<T>
    where
        T: DeserializeOwned,
    {
        debug!("provider call: {} params={}", method, params);
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
            "from": self.session.account.to_string(),
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        let envelope: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::invalid_response(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(map_provider_error(error));
        }
        envelope
            .result
            .ok_or_else(|| GatewayError::invalid_response(format!("{}: missing result", method)))
    }
}

#[async_trait]
impl ContractGateway for RpcGateway {
    async fn read_producer(&self, address: &Address) -> GatewayResult<ProducerProfile> {
        let record: ProducerRecord = self
            .call("producers", json!([address.to_string()]))
            .await?;
        if !record.registered {
            return Err(GatewayError::not_found(*address));
        }
        Ok(ProducerProfile {
            address: *address,
            rate: record.rate.0,
            balance: record.balance.0,
            registered: record.registered,
            supply_active: record.supply_active,
        })
    }

    async fn read_consumer(&self, address: &Address) -> GatewayResult<ConsumerProfile> {
        let record: ConsumerRecord = self
            .call("consumers", json!([address.to_string()]))
            .await?;
        if !record.registered {
            return Err(GatewayError::not_found(*address));
        }
        Ok(ConsumerProfile {
            address: *address,
            balance: record.balance.0,
            registered: record.registered,
        })
    }

    async fn read_all_producers(&self) -> GatewayResult<Vec<ProducerListing>> {
        let record: AllProducersRecord = self.call("getAllProducers", json!([])).await?;
        if record.addresses.len() != record.rates.len()
            || record.addresses.len() != record.active_statuses.len()
        {
            return Err(GatewayError::invalid_response(
                "getAllProducers: mismatched array lengths",
            ));
        }
        Ok(record
            .addresses
            .into_iter()
            .zip(record.rates)
            .zip(record.active_statuses)
            .map(|((address, rate), supply_active)| ProducerListing {
                address,
                rate: rate.0,
                supply_active,
            })
            .collect())
    }

    async fn read_request(&self, producer: &Address) -> GatewayResult<EnergyRequest> {
        let record: RequestRecord = self
            .call("getRequestDetails", json!([producer.to_string()]))
            .await?;
        Ok(EnergyRequest {
            producer: *producer,
            consumer: record.consumer,
            rate: record.rate.0,
            request_time: record.request_time,
            accept_time: record.accept_time,
            settle_time: record.settle_time,
            requested_amount: record.requested_amount.0,
            active: record.active,
        })
    }

    async fn read_transaction(&self, index: u64) -> GatewayResult<EnergyTransaction> {
        let record: TransactionRecord = self.call("getTransaction", json!([index])).await?;
        Ok(EnergyTransaction {
            producer: record.producer,
            consumer: record.consumer,
            amount: record.amount.0,
            duration: record.duration,
            timestamp: record.timestamp,
        })
    }

    async fn read_transaction_count(&self) -> GatewayResult<u64> {
        self.call("getTransactionCount", json!([])).await
    }

    async fn submit(&self, intent: Intent) -> GatewayResult<Receipt> {
        let method = intent.method_name();
        let params = Value::Array(intent.params());
        self.call(method, params).await
    }
}

fn map_provider_error(error: RpcErrorBody) -> GatewayError {
    if error.code == CODE_USER_REJECTED {
        return GatewayError::UserRejected;
    }
    let reverted = error.code == CODE_EXECUTION_REVERTED
        || error.message.to_ascii_lowercase().contains("revert");
    if reverted {
        let reason = error
            .data
            .as_ref()
            .and_then(|d| d.as_str())
            .map(|s| s.to_string())
            .or_else(|| {
                let msg = error.message.trim();
                (!msg.is_empty()).then(|| msg.to_string())
            });
        return GatewayError::Reverted { reason };
    }
    GatewayError::network(format!("provider error {}: {}", error.code, error.message))
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    data: Option<Value>,
}

/// `u128` carried as a decimal string on the wire.
#[derive(Debug)]
struct WireAmount(u128);

impl<'de> Deserialize<'de> for WireAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>()
            .map(WireAmount)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount string '{}'", s)))
    }
}

#[derive(Debug, Deserialize)]
struct ProducerRecord {
    rate: WireAmount,
    balance: WireAmount,
    registered: bool,
    #[serde(rename = "supplyActive")]
    supply_active: bool,
}

#[derive(Debug, Deserialize)]
struct ConsumerRecord {
    balance: WireAmount,
    registered: bool,
}

#[derive(Debug, Deserialize)]
struct AllProducersRecord {
    addresses: Vec<Address>,
    rates: Vec<WireAmount>,
    #[serde(rename = "activeStatuses")]
    active_statuses: Vec<bool>,
}

#[derive(Debug, Deserialize)]
struct RequestRecord {
    consumer: Address,
    rate: WireAmount,
    #[serde(rename = "requestTime")]
    request_time: u64,
    #[serde(rename = "acceptTime")]
    accept_time: u64,
    #[serde(rename = "settleTime")]
    settle_time: u64,
    #[serde(rename = "requestedAmount")]
    requested_amount: WireAmount,
    active: bool,
}

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    producer: Address,
    consumer: Address,
    amount: WireAmount,
    duration: u64,
    timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_maps_to_user_rejected() {
        let err = map_provider_error(RpcErrorBody {
            code: 4001,
            message: "User rejected the request.".to_string(),
            data: None,
        });
        assert_eq!(err, GatewayError::UserRejected);
    }

    #[test]
    fn test_revert_carries_contract_reason() {
        let err = map_provider_error(RpcErrorBody {
            code: 3,
            message: "execution reverted".to_string(),
            data: Some(json!("Insufficient balance")),
        });
        assert_eq!(
            err,
            GatewayError::Reverted {
                reason: Some("Insufficient balance".to_string())
            }
        );
    }

    #[test]
    fn test_revert_detected_from_message() {
        let err = map_provider_error(RpcErrorBody {
            code: -32000,
            message: "VM Exception: revert".to_string(),
            data: None,
        });
        assert!(matches!(err, GatewayError::Reverted { .. }));
    }

    #[test]
    fn test_other_codes_are_network_errors() {
        let err = map_provider_error(RpcErrorBody {
            code: -32603,
            message: "internal error".to_string(),
            data: None,
        });
        assert!(matches!(err, GatewayError::Network(_)));
    }

    #[test]
    fn test_request_record_decodes_wire_shape() {
        let raw = json!({
            "consumer": "0x00000000000000000000000000000000000000aa",
            "rate": "20000000000000000",
            "requestTime": 1700000000u64,
            "acceptTime": 0,
            "settleTime": 0,
            "requestedAmount": "100",
            "active": true
        });
        let record: RequestRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.rate.0, 20_000_000_000_000_000);
        assert_eq!(record.requested_amount.0, 100);
        assert!(record.active);
        assert_eq!(record.accept_time, 0);
    }
}
