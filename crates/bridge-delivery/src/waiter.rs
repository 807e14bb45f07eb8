//! The receipt polling loop.

use crate::types::WaiterConfig;
use backoff::backoff::Backoff;
use bridge_chain::{ChainConnector, ConnectorError};
use bridge_types::{
	short_hash, Address, BridgeError, CancellationToken, Outcome, SignedTransaction,
};
use tracing::{debug, info, warn};

/// Reason reported when another transaction consumed the sender's nonce.
pub const REPLACED_OR_DROPPED: &str = "replaced or dropped";

/// Result of a single poll.
enum Poll {
	Finished(Outcome),
	Pending,
}

/// Waits for submitted transactions to reach a terminal outcome.
///
/// The waiter holds no per-transaction state, so one instance can serve any
/// number of concurrent waits.
#[derive(Debug, Clone, Default)]
pub struct ReceiptWaiter {
	config: WaiterConfig,
}

impl ReceiptWaiter {
	pub fn new(config: WaiterConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &WaiterConfig {
		&self.config
	}

	/// Polls `connector` until `tx` reaches a terminal outcome.
	///
	/// Transport errors are retried until the token fires. A malformed or
	/// rejected response is returned as `BridgeError::Connection` straight
	/// away. Once the token has fired no further connector call is made and
	/// the outcome is `Outcome::TimedOut`.
	pub async fn wait(
		&self,
		connector: &dyn ChainConnector,
		sender: Address,
		tx: &SignedTransaction,
		label: &str,
		cancel: &CancellationToken,
	) -> Result<Outcome, BridgeError> {
		let mut backoff = self.config.backoff();
		let mut attempt: u32 = 0;

		loop {
			if cancel.is_cancelled() {
				return Ok(timed_out(label, tx, attempt));
			}
			attempt += 1;

			if let Poll::Finished(outcome) = self.poll(connector, sender, tx, label, cancel).await? {
				match &outcome {
					Outcome::TimedOut => return Ok(timed_out(label, tx, attempt)),
					Outcome::Confirmed(receipt) | Outcome::Reverted(receipt) => info!(
						operation = label,
						tx_hash = %short_hash(&tx.hash),
						block = receipt.block_number,
						outcome = outcome.kind(),
						attempt,
						"Transaction included"
					),
					Outcome::SubmissionFailed(reason) => warn!(
						operation = label,
						tx_hash = %short_hash(&tx.hash),
						nonce = tx.nonce,
						"Transaction will not be included: {}",
						reason
					),
				}
				return Ok(outcome);
			}

			let delay = backoff.next_backoff().unwrap_or(self.config.max_interval);
			debug!(
				operation = label,
				tx_hash = %short_hash(&tx.hash),
				attempt,
				delay_ms = delay.as_millis() as u64,
				"Receipt not available yet"
			);
			if cancel
				.run_until_cancelled(tokio::time::sleep(delay))
				.await
				.is_none()
			{
				return Ok(timed_out(label, tx, attempt));
			}
		}
	}

	async fn poll(
		&self,
		connector: &dyn ChainConnector,
		sender: Address,
		tx: &SignedTransaction,
		label: &str,
		cancel: &CancellationToken,
	) -> Result<Poll, BridgeError> {
		let receipt = match cancel.run_until_cancelled(connector.get_receipt(tx.hash)).await {
			None => return Ok(Poll::Finished(Outcome::TimedOut)),
			Some(Ok(receipt)) => receipt,
			Some(Err(e)) => return retry_or_fail(e, label, tx),
		};

		if let Some(receipt) = receipt {
			if receipt.transaction_hash != tx.hash {
				return Err(BridgeError::connection(
					label,
					Some(tx.hash),
					format!("receipt belongs to {}", receipt.transaction_hash),
				));
			}
			let outcome = if receipt.success {
				Outcome::Confirmed(receipt)
			} else {
				Outcome::Reverted(receipt)
			};
			return Ok(Poll::Finished(outcome));
		}

		// No receipt yet. The transaction can only still be included while the
		// node knows it or the sender's nonce is unspent.
		let known = match cancel
			.run_until_cancelled(connector.transaction_known(tx.hash))
			.await
		{
			None => return Ok(Poll::Finished(Outcome::TimedOut)),
			Some(Ok(known)) => known,
			Some(Err(e)) => return retry_or_fail(e, label, tx),
		};
		if known {
			return Ok(Poll::Pending);
		}

		let confirmed = match cancel
			.run_until_cancelled(connector.confirmed_nonce(sender))
			.await
		{
			None => return Ok(Poll::Finished(Outcome::TimedOut)),
			Some(Ok(nonce)) => nonce,
			Some(Err(e)) => return retry_or_fail(e, label, tx),
		};
		if confirmed > tx.nonce {
			return Ok(Poll::Finished(Outcome::SubmissionFailed(
				REPLACED_OR_DROPPED.to_string(),
			)));
		}

		Ok(Poll::Pending)
	}
}

fn retry_or_fail(
	err: ConnectorError,
	label: &str,
	tx: &SignedTransaction,
) -> Result<Poll, BridgeError> {
	if err.is_transient() {
		warn!(
			operation = label,
			tx_hash = %short_hash(&tx.hash),
			"Connector error while polling, retrying: {}",
			err
		);
		Ok(Poll::Pending)
	} else {
		Err(BridgeError::connection(label, Some(tx.hash), err.to_string()))
	}
}

fn timed_out(label: &str, tx: &SignedTransaction, attempts: u32) -> Outcome {
	info!(
		operation = label,
		tx_hash = %short_hash(&tx.hash),
		attempts,
		"Stopped waiting for receipt"
	);
	Outcome::TimedOut
}
