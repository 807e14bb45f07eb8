//! The state-changing call wrapper.
//!
//! `Transactor::execute` drives one operation from typed arguments to a typed
//! result: validate, encode, sign, broadcast, wait for the receipt, check the
//! receipt's log shape and decode the expected event. Exactly one transaction
//! is broadcast per call; nothing is resubmitted.

use crate::events::{self, DecodedEvent, EventSchema};
use alloy::sol_types::SolCall;
use bridge_account::{AuthorityError, TransactionAuthority};
use bridge_chain::{ChainConnector, ConnectorError};
use bridge_delivery::ReceiptWaiter;
use bridge_types::{
	short_hash, Address, BridgeError, CancellationToken, DecodeError, LogEntry, OperationRequest,
	Outcome,
};
use std::sync::Arc;
use tracing::{debug, info};

/// The receipt shape an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogExpectation {
	/// Exact number of logs the receipt must carry.
	pub count: usize,
	/// Position of the result event among them.
	pub index: usize,
	/// Schema the result event is decoded with.
	pub schema: EventSchema,
}

impl LogExpectation {
	/// A receipt carrying exactly one log, the result event.
	pub fn single(schema: EventSchema) -> Self {
		Self {
			count: 1,
			index: 0,
			schema,
		}
	}
}

/// A chain-level operation executed through a `Transactor`.
pub trait Operation: Send + Sync {
	type Call: SolCall + Send + Sync;
	type Output;

	/// Name used in logs and errors.
	fn label(&self) -> &'static str;

	fn expected_logs(&self) -> LogExpectation;

	/// Checks the arguments against their declared domains.
	fn validate(&self) -> Result<(), String>;

	/// Encodes the arguments. Only called once `validate` has passed.
	fn to_call(&self) -> Self::Call;

	/// Builds the result from the decoded event and the log it came from.
	fn output(&self, event: DecodedEvent, entry: &LogEntry) -> Result<Self::Output, DecodeError>;
}

/// Submits operations and resolves their results.
///
/// Cloning is cheap; clones share the connector, the authority and with it
/// the authority's nonce sequence.
#[derive(Clone)]
pub struct Transactor {
	connector: Arc<dyn ChainConnector>,
	authority: Arc<dyn TransactionAuthority>,
	waiter: ReceiptWaiter,
}

impl Transactor {
	pub fn new(
		connector: Arc<dyn ChainConnector>,
		authority: Arc<dyn TransactionAuthority>,
		waiter: ReceiptWaiter,
	) -> Self {
		Self {
			connector,
			authority,
			waiter,
		}
	}

	pub fn connector(&self) -> &Arc<dyn ChainConnector> {
		&self.connector
	}

	/// The account every transaction is sent from.
	pub fn sender(&self) -> Address {
		self.authority.address()
	}

	/// Executes `op` against the contract at `to`.
	pub async fn execute<O: Operation>(
		&self,
		to: Address,
		op: &O,
		cancel: &CancellationToken,
	) -> Result<O::Output, BridgeError> {
		let label = op.label();
		if to.is_zero() {
			return Err(BridgeError::invalid_argument(label, "contract address is zero"));
		}
		op.validate()
			.map_err(|reason| BridgeError::invalid_argument(label, reason))?;

		let request = OperationRequest::from_call(to, &op.to_call());
		let signed = self
			.authority
			.sign(&request, cancel)
			.await
			.map_err(|e| match e {
				AuthorityError::Cancelled => {
					BridgeError::submission(label, None, "cancelled before signing")
				}
				other => BridgeError::submission(label, None, other.to_string()),
			})?;

		let broadcast = match cancel
			.run_until_cancelled(self.connector.submit_raw(&signed.raw))
			.await
		{
			// The node may or may not have received it.
			None => {
				return Err(BridgeError::Timeout {
					operation: label.to_string(),
					tx_hash: signed.hash,
				})
			}
			Some(result) => result,
		};
		match broadcast {
			Ok(hash) if hash == signed.hash => {}
			Ok(hash) => {
				self.authority.release(&signed);
				return Err(BridgeError::connection(
					label,
					Some(signed.hash),
					format!("node acknowledged {} instead", hash),
				))
			}
			Err(e @ ConnectorError::Malformed(_)) => {
				return Err(BridgeError::connection(label, Some(signed.hash), e.to_string()))
			}
			Err(e @ ConnectorError::Rejected(_)) => {
				self.authority.release(&signed);
				return Err(BridgeError::submission(label, Some(signed.hash), e.to_string()));
			}
			// Transport failures may still have reached the node.
			Err(e) => return Err(BridgeError::submission(label, Some(signed.hash), e.to_string())),
		}
		info!(
			operation = label,
			tx_hash = %short_hash(&signed.hash),
			nonce = signed.nonce,
			to = %to,
			"Submitted transaction"
		);

		let outcome = self
			.waiter
			.wait(self.connector.as_ref(), self.sender(), &signed, label, cancel)
			.await?;

		let receipt = match outcome {
			Outcome::Confirmed(receipt) => receipt,
			Outcome::Reverted(receipt) => {
				return Err(BridgeError::Reverted {
					operation: label.to_string(),
					tx_hash: signed.hash,
					block_number: receipt.block_number,
				})
			}
			Outcome::TimedOut => {
				return Err(BridgeError::Timeout {
					operation: label.to_string(),
					tx_hash: signed.hash,
				})
			}
			Outcome::SubmissionFailed(reason) => {
				return Err(BridgeError::submission(label, Some(signed.hash), reason))
			}
		};

		let expected = op.expected_logs();
		let entry = match receipt.logs.get(expected.index) {
			Some(entry) if receipt.log_count() == expected.count => entry,
			_ => {
				return Err(BridgeError::ShapeViolation {
					operation: label.to_string(),
					tx_hash: signed.hash,
					expected: expected.count,
					actual: receipt.log_count(),
				})
			}
		};

		let decode_error = |source| BridgeError::Decode {
			operation: label.to_string(),
			tx_hash: signed.hash,
			source,
		};
		let event = events::decode(expected.schema, entry).map_err(decode_error)?;
		debug!(operation = label, event = ?event, "Decoded result event");

		op.output(event, entry).map_err(decode_error)
	}
}
