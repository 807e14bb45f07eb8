//! Operation requests and signed transactions.

use crate::common::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;

/// A fully encoded contract call, ready to be signed.
///
/// Built from a typed ABI call so the selector and the encoded arguments can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
	/// Target contract.
	pub to: Address,
	/// Four-byte method selector.
	pub selector: [u8; 4],
	/// Selector followed by the ABI-encoded arguments.
	pub calldata: Bytes,
	/// Native value attached to the call.
	pub value: U256,
}

impl OperationRequest {
	pub fn from_call<C: SolCall>(to: Address, call: &C) -> Self {
		Self {
			to,
			selector: C::SELECTOR,
			calldata: Bytes::from(call.abi_encode()),
			value: U256::ZERO,
		}
	}

	pub fn with_value(mut self, value: U256) -> Self {
		self.value = value;
		self
	}
}

/// A signed, nonce-assigned transaction produced by a transaction authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
	/// Hash of the signed envelope.
	pub hash: TxHash,
	/// Signing account.
	pub from: Address,
	/// Nonce consumed by this transaction.
	pub nonce: u64,
	/// EIP-2718 encoded envelope, as broadcast.
	pub raw: Bytes,
}
