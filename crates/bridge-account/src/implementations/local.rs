//! Local private key authority.
//!
//! Signs EIP-1559 transactions in process with an alloy `PrivateKeySigner`.
//! Gas, fees and the pending nonce come from the node; every one of those
//! round trips is raced against the caller's cancellation token.

use crate::{AuthorityError, FeeEstimate, GasStrategy, NonceTracker, TransactionAuthority};
use alloy::eips::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use bridge_types::{
	short_hash, Address, Bytes, CancellationToken, OperationRequest, SignedTransaction,
};
use std::fmt::Display;
use std::future::IntoFuture;
use tracing::{debug, info};

/// Default gas limit headroom over the node's estimate, in percent.
pub const DEFAULT_GAS_LIMIT_MULTIPLIER: u64 = 120;

/// Transaction authority backed by a local private key.
pub struct LocalAuthority {
	address: Address,
	chain_id: u64,
	wallet: EthereumWallet,
	provider: DynProvider,
	gas_strategy: GasStrategy,
	gas_limit_multiplier: u64,
	nonces: NonceTracker,
}

impl LocalAuthority {
	/// Creates an authority signing for `chain_id` with the hex-encoded key.
	///
	/// The key may be given with or without the 0x prefix.
	pub fn new(
		rpc_url: &str,
		chain_id: u64,
		private_key_hex: &str,
		gas_strategy: GasStrategy,
	) -> Result<Self, AuthorityError> {
		let url = rpc_url
			.parse()
			.map_err(|e| AuthorityError::Provider(format!("Invalid RPC URL: {}", e)))?;
		let provider = ProviderBuilder::new().connect_http(url).erased();
		let signer = parse_private_key(private_key_hex)?;

		Ok(Self::from_parts(provider, chain_id, signer, gas_strategy))
	}

	pub fn from_parts(
		provider: DynProvider,
		chain_id: u64,
		signer: PrivateKeySigner,
		gas_strategy: GasStrategy,
	) -> Self {
		let signer = signer.with_chain_id(Some(chain_id));
		let address = signer.address();

		Self {
			address,
			chain_id,
			wallet: EthereumWallet::from(signer),
			provider,
			gas_strategy,
			gas_limit_multiplier: DEFAULT_GAS_LIMIT_MULTIPLIER,
			nonces: NonceTracker::new(),
		}
	}

	/// Sets the gas limit headroom in percent of the estimate.
	pub fn with_gas_limit_multiplier(mut self, percent: u64) -> Self {
		self.gas_limit_multiplier = percent;
		self
	}

	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	async fn build_and_sign(
		&self,
		request: &OperationRequest,
		cancel: &CancellationToken,
	) -> Result<SignedTransaction, AuthorityError> {
		let tx = TransactionRequest::default()
			.with_from(self.address)
			.with_to(request.to)
			.with_input(request.calldata.clone())
			.with_value(request.value)
			.with_chain_id(self.chain_id);

		let estimated = step(cancel, "estimate gas", self.provider.estimate_gas(tx.clone())).await?;
		let gas_limit = estimated.saturating_mul(self.gas_limit_multiplier) / 100;

		let estimate = step(cancel, "estimate fees", self.provider.estimate_eip1559_fees()).await?;
		let fees = self.gas_strategy.apply(FeeEstimate {
			max_fee_per_gas: estimate.max_fee_per_gas,
			max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
		});

		let pending = step(
			cancel,
			"fetch pending nonce",
			self.provider.get_transaction_count(self.address).pending(),
		)
		.await?;
		let nonce = self.nonces.allocate(pending);

		debug!(
			nonce,
			gas_limit,
			max_fee_per_gas = fees.max_fee_per_gas,
			"Signing transaction"
		);

		let envelope = tx
			.with_nonce(nonce)
			.with_gas_limit(gas_limit)
			.with_max_fee_per_gas(fees.max_fee_per_gas)
			.with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
			.build(&self.wallet)
			.await
			.map_err(|e| AuthorityError::SigningFailed(e.to_string()))?;

		let hash = *envelope.tx_hash();
		info!(tx_hash = %short_hash(&hash), nonce, "Signed transaction");

		Ok(SignedTransaction {
			hash,
			from: self.address,
			nonce,
			raw: Bytes::from(envelope.encoded_2718()),
		})
	}
}

/// Runs one network step of transaction preparation under the token.
async fn step<F, T, E>(
	cancel: &CancellationToken,
	what: &str,
	fut: F,
) -> Result<T, AuthorityError>
where
	F: IntoFuture<Output = Result<T, E>>,
	E: Display,
{
	match cancel.run_until_cancelled(fut).await {
		Some(Ok(value)) => Ok(value),
		Some(Err(e)) => Err(AuthorityError::Provider(format!("Failed to {}: {}", what, e))),
		None => Err(AuthorityError::Cancelled),
	}
}

fn parse_private_key(key: &str) -> Result<PrivateKeySigner, AuthorityError> {
	let without_prefix = key.strip_prefix("0x").unwrap_or(key);
	if without_prefix.len() != 64 {
		return Err(AuthorityError::InvalidKey(
			"Private key must be 64 hex characters (32 bytes)".to_string(),
		));
	}
	if hex::decode(without_prefix).is_err() {
		return Err(AuthorityError::InvalidKey(
			"Private key must be valid hexadecimal".to_string(),
		));
	}

	without_prefix
		.parse::<PrivateKeySigner>()
		.map_err(|e| AuthorityError::InvalidKey(format!("Invalid private key: {}", e)))
}

#[async_trait]
impl TransactionAuthority for LocalAuthority {
	fn address(&self) -> Address {
		self.address
	}

	async fn sign(
		&self,
		request: &OperationRequest,
		cancel: &CancellationToken,
	) -> Result<SignedTransaction, AuthorityError> {
		let result = self.build_and_sign(request, cancel).await;
		if result.is_err() {
			// The allocated nonce, if any, was never used.
			self.nonces.reset();
		}
		result
	}

	fn release(&self, tx: &SignedTransaction) {
		debug!(nonce = tx.nonce, tx_hash = %short_hash(&tx.hash), "Releasing refused nonce");
		self.nonces.release(tx.nonce);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;

	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[tokio::test]
	async fn test_address_from_key() {
		let authority =
			LocalAuthority::new("http://localhost:8545", 31337, TEST_KEY, GasStrategy::Standard)
				.unwrap();
		assert_eq!(
			authority.address(),
			address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
		);
		assert_eq!(authority.chain_id(), 31337);

		// Prefix is optional
		let unprefixed = LocalAuthority::new(
			"http://localhost:8545",
			31337,
			TEST_KEY.trim_start_matches("0x"),
			GasStrategy::Fast,
		)
		.unwrap();
		assert_eq!(unprefixed.address(), authority.address());
	}

	#[tokio::test]
	async fn test_invalid_keys() {
		for key in ["0x1234", "zz".repeat(32).as_str()] {
			let result =
				LocalAuthority::new("http://localhost:8545", 1, key, GasStrategy::Standard);
			assert!(matches!(result, Err(AuthorityError::InvalidKey(_))));
		}
	}

	#[tokio::test]
	async fn test_sign_with_cancelled_token_does_no_work() {
		let authority =
			LocalAuthority::new("http://localhost:8545", 31337, TEST_KEY, GasStrategy::Standard)
				.unwrap();
		let token = CancellationToken::new();
		token.cancel();

		let request = OperationRequest {
			to: Address::repeat_byte(1),
			selector: [0u8; 4],
			calldata: Bytes::from(vec![0u8; 4]),
			value: Default::default(),
		};
		let result = authority.sign(&request, &token).await;
		assert!(matches!(result, Err(AuthorityError::Cancelled)));
	}

	#[tokio::test]
	async fn test_release_hands_nonce_back() {
		let authority =
			LocalAuthority::new("http://localhost:8545", 31337, TEST_KEY, GasStrategy::Standard)
				.unwrap();
		let nonce = authority.nonces.allocate(7);
		assert_eq!(nonce, 7);

		let refused = SignedTransaction {
			hash: Default::default(),
			from: authority.address(),
			nonce,
			raw: Bytes::new(),
		};
		authority.release(&refused);
		assert_eq!(authority.nonces.allocate(7), 7);
	}
}
