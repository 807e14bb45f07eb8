//! Configuration types for the bridge.

use bridge_account::GasStrategy;
use bridge_delivery::WaiterConfig;
use bridge_types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Complete bridge configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeConfig {
	/// Ledger connection
	pub chain: ChainSettings,
	/// Signing account and fee policy
	#[serde(default)]
	pub account: AccountSettings,
	/// Deployed contract addresses
	pub contracts: ContractSettings,
	/// Receipt polling
	#[serde(default)]
	pub waiter: WaiterSettings,
}

/// Ledger connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainSettings {
	/// HTTP JSON-RPC endpoint
	pub rpc_url: String,
	/// Chain the account signs for
	pub chain_id: u64,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct AccountSettings {
	/// 0x-prefixed hex private key. May be left empty and supplied through
	/// `BRIDGE_PRIVATE_KEY`.
	#[serde(default)]
	pub private_key: String,
	#[serde(default)]
	pub gas_strategy: GasStrategy,
	/// Gas limit as a percentage of the node's estimate
	#[serde(default = "default_gas_limit_multiplier")]
	pub gas_limit_multiplier: u64,
}

impl Default for AccountSettings {
	fn default() -> Self {
		Self {
			private_key: String::new(),
			gas_strategy: GasStrategy::default(),
			gas_limit_multiplier: default_gas_limit_multiplier(),
		}
	}
}

impl fmt::Debug for AccountSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccountSettings")
			.field("private_key", &"<redacted>")
			.field("gas_strategy", &self.gas_strategy)
			.field("gas_limit_multiplier", &self.gas_limit_multiplier)
			.finish()
	}
}

fn default_gas_limit_multiplier() -> u64 {
	120
}

/// Contract addresses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractSettings {
	/// Rollup factory
	pub arb_factory: Address,
	/// Challenge tester, only needed to start challenges
	#[serde(default)]
	pub challenge_tester: Option<Address>,
}

/// Receipt polling settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaiterSettings {
	pub initial_poll_interval_ms: u64,
	pub max_poll_interval_ms: u64,
	pub multiplier: f64,
	/// How long a transacting command waits for its receipt
	pub timeout_secs: u64,
}

impl Default for WaiterSettings {
	fn default() -> Self {
		Self {
			initial_poll_interval_ms: 500,
			max_poll_interval_ms: 10_000,
			multiplier: 1.5,
			timeout_secs: 300,
		}
	}
}

impl WaiterSettings {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl From<&WaiterSettings> for WaiterConfig {
	fn from(settings: &WaiterSettings) -> Self {
		WaiterConfig {
			initial_interval: Duration::from_millis(settings.initial_poll_interval_ms),
			max_interval: Duration::from_millis(settings.max_poll_interval_ms),
			multiplier: settings.multiplier,
			..WaiterConfig::default()
		}
	}
}
