//! Error types for the bridge.
//!
//! Every variant carries the operation label and, once one exists, the
//! transaction hash, so a caller can log the error without re-deriving any
//! state. Only `Timeout` is worth retrying with a fresh attempt.

use crate::common::{Address, TxHash};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// A log entry that does not match the event schema it was decoded against.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Log from {address} does not match {schema}: {reason}")]
pub struct DecodeError {
	/// Name of the expected event schema.
	pub schema: &'static str,
	/// Contract that emitted the entry.
	pub address: Address,
	pub reason: String,
}

impl DecodeError {
	pub fn new(schema: &'static str, address: Address, reason: impl Into<String>) -> Self {
		Self {
			schema,
			address,
			reason: reason.into(),
		}
	}
}

#[derive(Error, Debug)]
pub enum BridgeError {
	#[error("{operation}: invalid argument: {reason}")]
	InvalidArgument { operation: String, reason: String },

	#[error("{operation}: connection error{}: {reason}", tx_suffix(.tx_hash))]
	Connection {
		operation: String,
		tx_hash: Option<TxHash>,
		reason: String,
	},

	#[error("{operation}: submission failed{}: {reason}", tx_suffix(.tx_hash))]
	Submission {
		operation: String,
		tx_hash: Option<TxHash>,
		reason: String,
	},

	#[error("{operation}: timed out waiting for receipt of {tx_hash}")]
	Timeout { operation: String, tx_hash: TxHash },

	#[error("{operation}: transaction {tx_hash} reverted in block {block_number}")]
	Reverted {
		operation: String,
		tx_hash: TxHash,
		block_number: u64,
	},

	#[error("{operation}: transaction {tx_hash} emitted {actual} logs, expected {expected}")]
	ShapeViolation {
		operation: String,
		tx_hash: TxHash,
		expected: usize,
		actual: usize,
	},

	#[error("{operation}: transaction {tx_hash}: {source}")]
	Decode {
		operation: String,
		tx_hash: TxHash,
		#[source]
		source: DecodeError,
	},
}

fn tx_suffix(tx_hash: &Option<TxHash>) -> String {
	match tx_hash {
		Some(hash) => format!(" for {}", hash),
		None => String::new(),
	}
}

impl BridgeError {
	pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
		Self::InvalidArgument {
			operation: operation.to_string(),
			reason: reason.into(),
		}
	}

	pub fn connection(operation: &str, tx_hash: Option<TxHash>, reason: impl Into<String>) -> Self {
		Self::Connection {
			operation: operation.to_string(),
			tx_hash,
			reason: reason.into(),
		}
	}

	pub fn submission(operation: &str, tx_hash: Option<TxHash>, reason: impl Into<String>) -> Self {
		Self::Submission {
			operation: operation.to_string(),
			tx_hash,
			reason: reason.into(),
		}
	}

	/// Only a timeout leaves the caller in a state where a fresh attempt is meaningful.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}

	pub fn operation(&self) -> &str {
		match self {
			Self::InvalidArgument { operation, .. }
			| Self::Connection { operation, .. }
			| Self::Submission { operation, .. }
			| Self::Timeout { operation, .. }
			| Self::Reverted { operation, .. }
			| Self::ShapeViolation { operation, .. }
			| Self::Decode { operation, .. } => operation,
		}
	}

	pub fn tx_hash(&self) -> Option<TxHash> {
		match self {
			Self::InvalidArgument { .. } => None,
			Self::Connection { tx_hash, .. } | Self::Submission { tx_hash, .. } => *tx_hash,
			Self::Timeout { tx_hash, .. }
			| Self::Reverted { tx_hash, .. }
			| Self::ShapeViolation { tx_hash, .. }
			| Self::Decode { tx_hash, .. } => Some(*tx_hash),
		}
	}
}
