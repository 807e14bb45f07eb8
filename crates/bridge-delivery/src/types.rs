//! Polling configuration for the receipt waiter.

use backoff::ExponentialBackoff;
use std::time::Duration;

/// Backoff schedule between receipt polls.
///
/// The schedule has no elapsed-time limit; a wait ends only on a terminal
/// outcome or when its cancellation token fires.
#[derive(Debug, Clone, PartialEq)]
pub struct WaiterConfig {
	/// Delay before the second poll.
	pub initial_interval: Duration,
	/// Upper bound on the delay between two polls.
	pub max_interval: Duration,
	/// Growth factor applied after every empty poll.
	pub multiplier: f64,
	/// Jitter, as a fraction of the current interval.
	pub randomization_factor: f64,
}

impl Default for WaiterConfig {
	fn default() -> Self {
		Self {
			initial_interval: Duration::from_millis(500),
			max_interval: Duration::from_secs(10),
			multiplier: 1.5,
			randomization_factor: 0.1,
		}
	}
}

impl WaiterConfig {
	pub(crate) fn backoff(&self) -> ExponentialBackoff {
		ExponentialBackoff {
			current_interval: self.initial_interval,
			initial_interval: self.initial_interval,
			randomization_factor: self.randomization_factor,
			multiplier: self.multiplier,
			max_interval: self.max_interval,
			max_elapsed_time: None,
			..Default::default()
		}
	}
}
