//! Configuration loading from files and environment.

use crate::types::*;
use anyhow::{Context, Result};
use bridge_account::GasStrategy;
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Load configuration from file
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BridgeConfig> {
		let config = Self::parse_file(path.as_ref())?;
		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<BridgeConfig> {
		toml::from_str(contents).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<BridgeConfig> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	/// Load from YAML string
	pub fn from_yaml(contents: &str) -> Result<BridgeConfig> {
		serde_yaml::from_str(contents).context("Failed to parse YAML")
	}

	/// Load a file, then apply environment overrides before validating.
	///
	/// Secrets may therefore be left out of the file entirely.
	pub fn from_env_and_file(path: &Path) -> Result<BridgeConfig> {
		let mut config = Self::parse_file(path)?;
		Self::apply_env_overrides(&mut config);
		Self::validate_config(&config)?;
		Ok(config)
	}

	fn parse_file(path: &Path) -> Result<BridgeConfig> {
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents),
			Some("json") => Self::from_json(&contents),
			Some("yaml") | Some("yml") => Self::from_yaml(&contents),
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		}
	}

	/// Apply environment variable overrides
	fn apply_env_overrides(config: &mut BridgeConfig) {
		if let Ok(key) = std::env::var("BRIDGE_PRIVATE_KEY") {
			debug!("Overriding private key from environment");
			config.account.private_key = key;
		}

		if let Ok(url) = std::env::var("BRIDGE_RPC_URL") {
			debug!("Overriding RPC URL from environment");
			config.chain.rpc_url = url;
		}
	}

	/// Validate configuration
	pub fn validate_config(config: &BridgeConfig) -> Result<()> {
		let url = &config.chain.rpc_url;
		if !(url.starts_with("http://") || url.starts_with("https://")) {
			anyhow::bail!("RPC URL must use http or https: {}", url);
		}
		if config.chain.chain_id == 0 {
			anyhow::bail!("Chain ID must be non-zero");
		}

		let key = &config.account.private_key;
		let Some(hex_key) = key.strip_prefix("0x") else {
			anyhow::bail!("Private key must start with 0x");
		};
		if hex_key.len() != 64 || !hex_key.chars().all(|c| c.is_ascii_hexdigit()) {
			anyhow::bail!("Private key must be 32 bytes of hex");
		}
		if let GasStrategy::Custom { multiplier } = config.account.gas_strategy {
			if !(multiplier > 0.0 && multiplier.is_finite()) {
				anyhow::bail!("Custom gas price multiplier must be positive, got {}", multiplier);
			}
		}
		if config.account.gas_limit_multiplier < 100 {
			anyhow::bail!(
				"Gas limit multiplier must be at least 100 percent, got {}",
				config.account.gas_limit_multiplier
			);
		}

		if config.contracts.arb_factory.is_zero() {
			anyhow::bail!("ArbFactory address must be non-zero");
		}
		if config
			.contracts
			.challenge_tester
			.is_some_and(|address| address.is_zero())
		{
			anyhow::bail!("ChallengeTester address must be non-zero");
		}

		let waiter = &config.waiter;
		if waiter.initial_poll_interval_ms == 0 {
			anyhow::bail!("Initial poll interval must be positive");
		}
		if waiter.initial_poll_interval_ms > waiter.max_poll_interval_ms {
			anyhow::bail!(
				"Initial poll interval {}ms exceeds maximum {}ms",
				waiter.initial_poll_interval_ms,
				waiter.max_poll_interval_ms
			);
		}
		if !(waiter.multiplier >= 1.0) {
			anyhow::bail!("Poll interval multiplier must be at least 1");
		}
		if waiter.timeout_secs == 0 {
			anyhow::bail!("Receipt timeout must be positive");
		}

		Ok(())
	}
}

/// Load configuration from standard locations
pub fn load_config() -> Result<BridgeConfig> {
	// Check for config file in order:
	// 1. Environment variable BRIDGE_CONFIG
	// 2. ./config.toml
	// 3. ./config/bridge.toml

	if let Ok(path) = std::env::var("BRIDGE_CONFIG") {
		return ConfigLoader::from_env_and_file(Path::new(&path));
	}

	for path in ["./config.toml", "./config/bridge.toml"] {
		if Path::new(path).exists() {
			return ConfigLoader::from_env_and_file(Path::new(path));
		}
	}

	anyhow::bail!("No configuration file found; pass --config or set BRIDGE_CONFIG")
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_delivery::WaiterConfig;
	use bridge_types::Address;
	use std::io::Write;
	use std::time::Duration;

	const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn toml_config() -> String {
		format!(
			r#"
[chain]
rpc_url = "http://localhost:8545"
chain_id = 31337

[account]
private_key = "{KEY}"
gas_limit_multiplier = 150

[account.gas_strategy]
type = "custom"
multiplier = 1.1

[contracts]
arb_factory = "0x5FbDB2315678afecb367f032d93F642f64180aa3"

[waiter]
initial_poll_interval_ms = 250
max_poll_interval_ms = 4000
multiplier = 2.0
timeout_secs = 60
"#
		)
	}

	fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		file
	}

	#[test]
	fn test_toml_parsing() {
		let config = ConfigLoader::from_toml(&toml_config()).unwrap();
		assert_eq!(config.chain.chain_id, 31337);
		assert_eq!(config.account.gas_limit_multiplier, 150);
		assert_eq!(
			config.account.gas_strategy,
			GasStrategy::Custom { multiplier: 1.1 }
		);
		assert_eq!(config.contracts.challenge_tester, None);
		assert_eq!(config.waiter.timeout(), Duration::from_secs(60));
		assert!(ConfigLoader::validate_config(&config).is_ok());
	}

	#[test]
	fn test_defaults() {
		let toml = format!(
			r#"
[chain]
rpc_url = "https://rpc.example.com"
chain_id = 1

[account]
private_key = "{KEY}"

[contracts]
arb_factory = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
challenge_tester = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
"#
		);
		let config = ConfigLoader::from_toml(&toml).unwrap();
		assert_eq!(config.account.gas_strategy, GasStrategy::Standard);
		assert_eq!(config.account.gas_limit_multiplier, 120);
		assert_eq!(config.waiter.initial_poll_interval_ms, 500);
		assert_eq!(config.waiter.timeout_secs, 300);
		assert!(config.contracts.challenge_tester.is_some());

		let waiter = WaiterConfig::from(&config.waiter);
		assert_eq!(waiter, WaiterConfig::default());
	}

	#[test]
	fn test_from_file_by_extension() {
		let file = write_temp(".toml", &toml_config());
		let config = ConfigLoader::from_file(file.path()).unwrap();
		assert_eq!(config.waiter.max_poll_interval_ms, 4000);

		let json = serde_json::to_string(&config).unwrap();
		let file = write_temp(".json", &json);
		let from_json = ConfigLoader::from_file(file.path()).unwrap();
		assert_eq!(from_json.chain.rpc_url, config.chain.rpc_url);

		let yaml = serde_yaml::to_string(&config).unwrap();
		let file = write_temp(".yml", &yaml);
		let from_yaml = ConfigLoader::from_file(file.path()).unwrap();
		assert_eq!(from_yaml.contracts.arb_factory, config.contracts.arb_factory);
	}

	#[test]
	fn test_unsupported_extension() {
		let file = write_temp(".ini", &toml_config());
		let err = ConfigLoader::from_file(file.path()).unwrap_err();
		assert!(err.to_string().contains("Unsupported config format"));
	}

	#[test]
	fn test_env_overrides() {
		let without_key = toml_config().replace(KEY, "");
		let file = write_temp(".toml", &without_key);
		assert!(ConfigLoader::from_file(file.path()).is_err());

		std::env::set_var("BRIDGE_PRIVATE_KEY", KEY);
		std::env::set_var("BRIDGE_RPC_URL", "https://override.example.com");
		let config = ConfigLoader::from_env_and_file(file.path());
		std::env::remove_var("BRIDGE_PRIVATE_KEY");
		std::env::remove_var("BRIDGE_RPC_URL");

		let config = config.unwrap();
		assert_eq!(config.account.private_key, KEY);
		assert_eq!(config.chain.rpc_url, "https://override.example.com");
	}

	fn assert_rejected(expected: &str, mutate: impl Fn(&mut BridgeConfig)) {
		let mut config = ConfigLoader::from_toml(&toml_config()).unwrap();
		mutate(&mut config);
		let err = ConfigLoader::validate_config(&config).unwrap_err();
		assert!(
			err.to_string().contains(expected),
			"expected '{}' in '{}'",
			expected,
			err
		);
	}

	#[test]
	fn test_validation_failures() {
		assert_rejected("http or https", |c| c.chain.rpc_url = "ws://x".into());
		assert_rejected("Chain ID", |c| c.chain.chain_id = 0);
		assert_rejected("start with 0x", |c| c.account.private_key = KEY[2..].into());
		assert_rejected("32 bytes", |c| c.account.private_key = "0x1234".into());
		assert_rejected("100 percent", |c| c.account.gas_limit_multiplier = 90);
		for multiplier in [0.0, -1.5, f64::NAN, f64::INFINITY] {
			assert_rejected("gas price multiplier", |c| {
				c.account.gas_strategy = GasStrategy::Custom { multiplier }
			});
		}
		assert_rejected("ArbFactory", |c| c.contracts.arb_factory = Address::ZERO);
		assert_rejected("ChallengeTester", |c| {
			c.contracts.challenge_tester = Some(Address::ZERO)
		});
		assert_rejected("positive", |c| c.waiter.initial_poll_interval_ms = 0);
		assert_rejected("exceeds maximum", |c| c.waiter.max_poll_interval_ms = 100);
		assert_rejected("at least 1", |c| c.waiter.multiplier = 0.5);
		assert_rejected("Receipt timeout", |c| c.waiter.timeout_secs = 0);
	}

	#[test]
	fn test_private_key_is_redacted() {
		let config = ConfigLoader::from_toml(&toml_config()).unwrap();
		let debug = format!("{:?}", config);
		assert!(!debug.contains(&KEY[2..]));
		assert!(debug.contains("<redacted>"));
	}
}
