//! Read-only contract queries.

use alloy::sol_types::SolCall;
use bridge_chain::ChainConnector;
use bridge_types::{Address, BridgeError, Bytes};
use std::sync::Arc;
use tracing::debug;

/// Performs single read-only calls. No signing, no waiting.
#[derive(Clone)]
pub struct ViewCaller {
	connector: Arc<dyn ChainConnector>,
}

impl ViewCaller {
	pub fn new(connector: Arc<dyn ChainConnector>) -> Self {
		Self { connector }
	}

	/// Calls `call` on the contract at `to` and decodes its return value.
	pub async fn query<C: SolCall>(
		&self,
		to: Address,
		label: &str,
		call: &C,
	) -> Result<C::Return, BridgeError> {
		if to.is_zero() {
			return Err(BridgeError::invalid_argument(label, "contract address is zero"));
		}

		let data = self
			.connector
			.call(to, Bytes::from(call.abi_encode()))
			.await
			.map_err(|e| BridgeError::connection(label, None, e.to_string()))?;
		debug!(operation = label, to = %to, bytes = data.len(), "View call returned");

		C::abi_decode_returns(&data).map_err(|e| {
			BridgeError::connection(label, None, format!("undecodable return data: {}", e))
		})
	}
}
