/// Contract gateway for the VoltMesh marketplace client
///
/// Single point of truth for reading and mutating on-chain state. The
/// [`ContractGateway`] trait is the port the reconciler consumes; the
/// [`RpcGateway`] implementation speaks JSON-RPC to a wallet provider
/// bridge, which holds the signing capability. Private keys never pass
/// through this crate.

pub mod intent;
pub mod rpc;
pub mod traits;

pub use intent::{Intent, Receipt};
pub use rpc::{ProviderConfig, RpcGateway, SessionContext};
pub use traits::ContractGateway;
