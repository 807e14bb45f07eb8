//! Alloy-based EVM connector.
//!
//! Wraps an alloy HTTP provider and translates between node responses and
//! the bridge's receipt types. Error classification decides what the receipt
//! waiter may retry: anything the node could not serialize or that we could
//! not deserialize is malformed and therefore fatal.

use crate::{ChainConnector, ConnectorError};
use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Log, TransactionInput, TransactionReceipt, TransactionRequest};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use bridge_types::{short_hash, LogEntry, Receipt, TxHash};
use tracing::{debug, info};

/// JSON-RPC connector for EVM chains.
#[derive(Clone)]
pub struct AlloyConnector {
	provider: DynProvider,
}

impl AlloyConnector {
	/// Creates a connector for the HTTP endpoint at `rpc_url`.
	///
	/// No request is made until the first call.
	pub fn new(rpc_url: &str) -> Result<Self, ConnectorError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ConnectorError::Transport(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new().connect_http(url);

		Ok(Self {
			provider: provider.erased(),
		})
	}

	pub fn from_provider(provider: DynProvider) -> Self {
		Self { provider }
	}

	/// Fails unless the node serves the expected chain.
	pub async fn verify_chain_id(&self, expected: u64) -> Result<(), ConnectorError> {
		let actual = self.provider.get_chain_id().await.map_err(classify)?;
		if actual != expected {
			return Err(ConnectorError::Malformed(format!(
				"Chain ID mismatch: expected {}, got {}",
				expected, actual
			)));
		}
		info!(chain_id = actual, "Connected to chain");
		Ok(())
	}
}

/// Classifies an error from a read request.
fn classify(err: TransportError) -> ConnectorError {
	match &err {
		RpcError::SerError(_) | RpcError::DeserError { .. } | RpcError::NullResp => {
			ConnectorError::Malformed(err.to_string())
		}
		_ => ConnectorError::Transport(err.to_string()),
	}
}

/// Classifies an error from a transaction broadcast.
///
/// A JSON-RPC error response to `eth_sendRawTransaction` is the node refusing
/// the transaction, not a transport hiccup.
fn classify_submission(err: TransportError) -> ConnectorError {
	if let RpcError::ErrorResp(payload) = &err {
		return ConnectorError::Rejected(payload.message.to_string());
	}
	classify(err)
}

fn log_entry(log: &Log) -> LogEntry {
	LogEntry::new(log.address(), log.topics().to_vec(), log.data().data.clone())
}

fn convert_receipt(receipt: &TransactionReceipt) -> Result<Receipt, ConnectorError> {
	let block_number = receipt.block_number.ok_or_else(|| {
		ConnectorError::Malformed(format!(
			"Receipt for {} has no block number",
			receipt.transaction_hash
		))
	})?;

	Ok(Receipt {
		transaction_hash: receipt.transaction_hash,
		block_number,
		gas_used: receipt.gas_used,
		success: receipt.status(),
		logs: receipt.inner.logs().iter().map(log_entry).collect(),
	})
}

#[async_trait]
impl ChainConnector for AlloyConnector {
	async fn submit_raw(&self, raw: &Bytes) -> Result<TxHash, ConnectorError> {
		let pending = self
			.provider
			.send_raw_transaction(raw)
			.await
			.map_err(classify_submission)?;

		let hash = *pending.tx_hash();
		info!(tx_hash = %short_hash(&hash), "Broadcast transaction");
		Ok(hash)
	}

	async fn get_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ConnectorError> {
		let receipt = self
			.provider
			.get_transaction_receipt(hash)
			.await
			.map_err(classify)?;

		match receipt {
			Some(receipt) => {
				if receipt.transaction_hash != hash {
					return Err(ConnectorError::Malformed(format!(
						"Asked for receipt of {}, got {}",
						hash, receipt.transaction_hash
					)));
				}
				convert_receipt(&receipt).map(Some)
			}
			None => {
				debug!(tx_hash = %short_hash(&hash), "Receipt not available yet");
				Ok(None)
			}
		}
	}

	async fn transaction_known(&self, hash: TxHash) -> Result<bool, ConnectorError> {
		let tx = self
			.provider
			.get_transaction_by_hash(hash)
			.await
			.map_err(classify)?;
		Ok(tx.is_some())
	}

	async fn confirmed_nonce(&self, address: Address) -> Result<u64, ConnectorError> {
		self.provider
			.get_transaction_count(address)
			.latest()
			.await
			.map_err(classify)
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ConnectorError> {
		let request = TransactionRequest {
			to: Some(to.into()),
			input: TransactionInput::new(data),
			..Default::default()
		};
		self.provider.call(request).await.map_err(classify)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{LogData, B256};
	use alloy::rpc::json_rpc::ErrorPayload;
	use alloy::transports::TransportErrorKind;

	#[test]
	fn test_classify_malformed() {
		let err: TransportError = RpcError::NullResp;
		assert!(matches!(classify(err), ConnectorError::Malformed(_)));

		let bad_json = serde_json::from_str::<u64>("{").unwrap_err();
		let err: TransportError = RpcError::DeserError {
			err: bad_json,
			text: "{".to_string(),
		};
		assert!(matches!(classify(err), ConnectorError::Malformed(_)));
	}

	#[test]
	fn test_classify_transport() {
		let err = TransportErrorKind::backend_gone();
		assert!(classify(err).is_transient());
	}

	#[test]
	fn test_classify_submission_rejection() {
		let payload = ErrorPayload {
			code: -32000,
			message: "nonce too low".into(),
			data: None,
		};
		let err: TransportError = RpcError::ErrorResp(payload);
		assert_eq!(
			classify_submission(err),
			ConnectorError::Rejected("nonce too low".to_string())
		);

		let err = TransportErrorKind::backend_gone();
		assert!(classify_submission(err).is_transient());
	}

	#[test]
	fn test_log_entry_conversion() {
		let address = Address::repeat_byte(0x42);
		let topics = vec![B256::repeat_byte(1), B256::repeat_byte(2)];
		let data = Bytes::from(vec![9u8; 32]);
		let log = Log {
			inner: alloy::primitives::Log {
				address,
				data: LogData::new_unchecked(topics.clone(), data.clone()),
			},
			..Default::default()
		};

		let entry = log_entry(&log);
		assert_eq!(entry.address, address);
		assert_eq!(entry.topics, topics);
		assert_eq!(entry.data, data);
	}

	#[tokio::test]
	async fn test_invalid_url_rejected() {
		assert!(AlloyConnector::new("not a url").is_err());
		assert!(AlloyConnector::new("http://localhost:8545").is_ok());
	}
}
