//! State-mutating intents and their fixed ABI surface

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use voltmesh_types::{Address, AmountError, AmountResult};

/// A state-mutating call against the external contract.
///
/// Variants map one-to-one onto the contract's ABI; the method names in
/// [`Intent::method_name`] are fixed by the deployed contract and must not
/// be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    RegisterProducer,
    RegisterConsumer,
    /// Set the producer's price per energy unit, in base units.
    SetRate { rate: u128 },
    ActivateSupply,
    DeactivateSupply,
    /// Request energy from a producer, amount in whole energy units.
    RequestEnergy { producer: Address, amount: u128 },
    /// Producer accepts the pending request from `consumer`.
    AcceptRequest { consumer: Address },
    /// Settle the active supply on `producer`'s slot for the delivered
    /// meter reading.
    SettlePayment { producer: Address, delivered_amount: u128 },
    /// Terminate the request on `producer`'s slot.
    TerminateRequest { producer: Address },
    /// Prepay into the consumer balance; value in base units.
    Deposit { value: u128 },
    WithdrawBalance,
    WithdrawProducerBalance,
}

impl Intent {
    /// The ABI function name backing this intent, bit-exact.
    pub fn method_name(&self) -> &'static str {
        match self {
            Intent::RegisterProducer => "registerProducer",
            Intent::RegisterConsumer => "registerConsumer",
            Intent::SetRate { .. } => "setRate",
            Intent::ActivateSupply => "activateSupply",
            Intent::DeactivateSupply => "deactivateSupply",
            Intent::RequestEnergy { .. } => "requestEnergy",
            Intent::AcceptRequest { .. } => "acceptRequest",
            Intent::SettlePayment { .. } => "settlePayment",
            Intent::TerminateRequest { .. } => "terminateRequest",
            Intent::Deposit { .. } => "deposit",
            Intent::WithdrawBalance => "withdrawBalance",
            Intent::WithdrawProducerBalance => "withdrawProducerBalance",
        }
    }

    /// Positional call parameters; numeric values travel as decimal
    /// strings.
    pub fn params(&self) -> Vec<Value> {
        match self {
            Intent::RegisterProducer
            | Intent::RegisterConsumer
            | Intent::ActivateSupply
            | Intent::DeactivateSupply
            | Intent::WithdrawBalance
            | Intent::WithdrawProducerBalance => vec![],
            Intent::SetRate { rate } => vec![json!(rate.to_string())],
            Intent::RequestEnergy { producer, amount } => {
                vec![json!(producer.to_string()), json!(amount.to_string())]
            }
            Intent::AcceptRequest { consumer } => vec![json!(consumer.to_string())],
            Intent::SettlePayment { producer, delivered_amount } => {
                vec![json!(producer.to_string()), json!(delivered_amount.to_string())]
            }
            Intent::TerminateRequest { producer } => vec![json!(producer.to_string())],
            Intent::Deposit { value } => vec![json!(value.to_string())],
        }
    }

    /// Client-side validation, performed at the input boundary before any
    /// network call.
    pub fn validate(&self) -> AmountResult<()> {
        match self {
            Intent::SetRate { rate } => require_positive(*rate, "rate"),
            Intent::RequestEnergy { amount, .. } => require_positive(*amount, "amount"),
            Intent::SettlePayment { delivered_amount, .. } => {
                require_positive(*delivered_amount, "delivered amount")
            }
            Intent::Deposit { value } => require_positive(*value, "deposit"),
            _ => Ok(()),
        }
    }
}

fn require_positive(value: u128, what: &str) -> AmountResult<()> {
    if value == 0 {
        return Err(AmountError::invalid_amount("0", &format!("{} must be positive", what)));
    }
    Ok(())
}

/// Confirmation receipt for a submitted intent. Once a receipt is
/// returned, all reads for the involved addresses are stale and must be
/// re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}
