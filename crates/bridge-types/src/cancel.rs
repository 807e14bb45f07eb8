//! Cooperative cancellation with an optional deadline.
//!
//! A `CancellationToken` is the only thing that bounds how long an operation
//! waits on the ledger. Clones share the same cancel signal, so cancelling
//! any clone stops every flow holding one. A deadline can be tightened on a
//! derived token without affecting the original.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CancellationToken {
	signal: Arc<watch::Sender<bool>>,
	deadline: Option<Instant>,
}

impl Default for CancellationToken {
	fn default() -> Self {
		Self::new()
	}
}

impl CancellationToken {
	/// Creates a token with no deadline that only fires on `cancel`.
	pub fn new() -> Self {
		let (tx, _rx) = watch::channel(false);
		Self {
			signal: Arc::new(tx),
			deadline: None,
		}
	}

	/// Derives a token that also fires once `timeout` has elapsed from now.
	pub fn with_timeout(&self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Derives a token that also fires at `deadline`.
	///
	/// The earlier of the existing and the new deadline wins.
	pub fn with_deadline(&self, deadline: Instant) -> Self {
		let deadline = match self.deadline {
			Some(existing) => existing.min(deadline),
			None => deadline,
		};
		Self {
			signal: self.signal.clone(),
			deadline: Some(deadline),
		}
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Fires the token for every clone sharing its signal.
	pub fn cancel(&self) {
		self.signal.send_replace(true);
	}

	pub fn is_cancelled(&self) -> bool {
		*self.signal.borrow() || self.deadline.is_some_and(|d| Instant::now() >= d)
	}

	/// Resolves once the token is cancelled or its deadline passes.
	pub async fn cancelled(&self) {
		let mut rx = self.signal.subscribe();
		// The sender lives as long as `self`, so the wait only ends on a cancel.
		let signalled = async move {
			let _ = rx.wait_for(|cancelled| *cancelled).await;
		};

		match self.deadline {
			Some(deadline) => {
				tokio::select! {
					_ = signalled => {}
					_ = tokio::time::sleep_until(deadline) => {}
				}
			}
			None => signalled.await,
		}
	}

	/// Drives `fut` to completion unless the token fires first.
	pub async fn run_until_cancelled<F: IntoFuture>(&self, fut: F) -> Option<F::Output> {
		if self.is_cancelled() {
			return None;
		}
		let fut = fut.into_future();
		tokio::select! {
			biased;
			_ = self.cancelled() => None,
			output = fut => Some(output),
		}
	}
}
