//! Receipts, log entries and submission outcomes.
//!
//! A receipt is produced by the ledger exactly once per transaction hash and
//! never changes after it has been observed. Nothing in this workspace builds
//! a `Receipt` except the connector translating a node response.

use crate::common::{Address, BlockNumber, Bytes, TxHash, B256};
use serde::{Deserialize, Serialize};

/// Raw event data emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Contract that emitted the entry.
	pub address: Address,
	/// Indexed topics; topic0 is the event signature hash for non-anonymous events.
	pub topics: Vec<B256>,
	/// ABI-encoded non-indexed parameters.
	pub data: Bytes,
}

impl LogEntry {
	pub fn new(address: Address, topics: Vec<B256>, data: Bytes) -> Self {
		Self {
			address,
			topics,
			data,
		}
	}

	/// The event signature topic, if present.
	pub fn signature(&self) -> Option<&B256> {
		self.topics.first()
	}
}

/// The ledger's record of a transaction's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
	/// The hash of the transaction.
	pub transaction_hash: TxHash,
	/// The block number where the transaction was included.
	pub block_number: BlockNumber,
	/// Gas consumed by the transaction.
	pub gas_used: u64,
	/// Whether execution succeeded.
	pub success: bool,
	/// Emitted log entries, in emission order.
	pub logs: Vec<LogEntry>,
}

impl Receipt {
	pub fn log_count(&self) -> usize {
		self.logs.len()
	}
}

/// Terminal result of waiting on a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// Included and executed successfully.
	Confirmed(Receipt),
	/// Included but execution failed.
	Reverted(Receipt),
	/// The cancellation token fired before a receipt was observed.
	TimedOut,
	/// The ledger will never include the transaction.
	SubmissionFailed(String),
}

impl Outcome {
	/// The receipt backing this outcome, if the ledger produced one.
	pub fn receipt(&self) -> Option<&Receipt> {
		match self {
			Outcome::Confirmed(receipt) | Outcome::Reverted(receipt) => Some(receipt),
			Outcome::TimedOut | Outcome::SubmissionFailed(_) => None,
		}
	}

	pub fn is_confirmed(&self) -> bool {
		matches!(self, Outcome::Confirmed(_))
	}

	/// Short name used in log lines.
	pub fn kind(&self) -> &'static str {
		match self {
			Outcome::Confirmed(_) => "confirmed",
			Outcome::Reverted(_) => "reverted",
			Outcome::TimedOut => "timed_out",
			Outcome::SubmissionFailed(_) => "submission_failed",
		}
	}
}
