//! Signing identities for the bridge.
//!
//! A `TransactionAuthority` turns an encoded operation into a signed,
//! nonce-assigned transaction. It owns the signing key, the account nonce and
//! the fee policy; callers hand it everything else per call, including the
//! cancellation token that bounds the network round trips it needs.

use async_trait::async_trait;
use bridge_types::{Address, CancellationToken, OperationRequest, SignedTransaction};
use thiserror::Error;

pub mod gas;
pub mod implementations;
pub mod nonce;

pub use gas::{FeeEstimate, GasStrategy};
pub use implementations::local::LocalAuthority;
pub use nonce::NonceTracker;

#[derive(Debug, Error)]
pub enum AuthorityError {
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	#[error("Provider error: {0}")]
	Provider(String),
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	#[error("Cancelled before the transaction was signed")]
	Cancelled,
}

#[async_trait]
pub trait TransactionAuthority: Send + Sync {
	/// The account every transaction is signed by.
	fn address(&self) -> Address;

	/// Signs `request` with a freshly allocated nonce.
	///
	/// Implementations must hand out a unique, gap-free nonce per signed
	/// transaction, or reject concurrent attempts.
	async fn sign(
		&self,
		request: &OperationRequest,
		cancel: &CancellationToken,
	) -> Result<SignedTransaction, AuthorityError>;

	/// Returns the nonce of `tx` after the node refused to accept it.
	fn release(&self, _tx: &SignedTransaction) {}
}
