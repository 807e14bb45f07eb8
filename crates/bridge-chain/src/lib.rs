//! Chain connectors for talking to the ledger.
//!
//! This crate defines the `ChainConnector` trait, the narrow capability the
//! rest of the bridge needs from a node: broadcast a raw transaction, look up
//! receipts and transactions by hash, read an account's confirmed nonce and
//! perform read-only calls. Implementations live under `implementations`.
//!
//! Connectors must tolerate concurrent queries; every in-flight operation
//! polls through the same connector.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use bridge_types::{Receipt, TxHash};
use thiserror::Error;

pub mod implementations;

pub use implementations::evm::AlloyConnector;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
	/// The node could not be reached or answered with an error. Worth retrying.
	#[error("Transport error: {0}")]
	Transport(String),
	/// The node answered with something this connector cannot interpret.
	#[error("Malformed response: {0}")]
	Malformed(String),
	/// The node refused a submitted transaction.
	#[error("Transaction rejected: {0}")]
	Rejected(String),
}

impl ConnectorError {
	pub fn is_transient(&self) -> bool {
		matches!(self, ConnectorError::Transport(_))
	}
}

#[async_trait]
pub trait ChainConnector: Send + Sync {
	/// Broadcasts an EIP-2718 encoded signed transaction.
	async fn submit_raw(&self, raw: &Bytes) -> Result<TxHash, ConnectorError>;

	/// Returns the receipt for `hash`, or `None` while it is not yet included.
	async fn get_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ConnectorError>;

	/// Whether the node still knows about `hash`, pending or mined.
	async fn transaction_known(&self, hash: TxHash) -> Result<bool, ConnectorError>;

	/// Number of transactions from `address` included in the latest block.
	async fn confirmed_nonce(&self, address: Address) -> Result<u64, ConnectorError>;

	/// Executes a read-only call against the latest state.
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ConnectorError>;
}
