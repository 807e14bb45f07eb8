//! Local nonce allocation.
//!
//! The node's pending count lags behind transactions this process has just
//! signed but not yet broadcast, so the tracker remembers the next nonce it
//! handed out and never goes backwards while the cache is warm.

use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct NonceTracker {
	next: Mutex<Option<u64>>,
}

impl NonceTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocates the next nonce given the node's pending transaction count.
	pub fn allocate(&self, pending: u64) -> u64 {
		let mut next = self.next.lock();
		let nonce = match *next {
			Some(cached) => cached.max(pending),
			None => pending,
		};
		*next = Some(nonce + 1);
		nonce
	}

	/// Hands back `nonce` after the node refused the transaction carrying it.
	///
	/// The most recent allocation is rewound in place. Anything older leaves a
	/// gap behind later allocations, so the cache is dropped and the next
	/// allocation follows the node.
	pub fn release(&self, nonce: u64) {
		let mut next = self.next.lock();
		*next = match *next {
			Some(cached) if cached == nonce + 1 => Some(nonce),
			_ => None,
		};
	}

	/// Forgets the cached nonce so the next allocation resynchronises with the node.
	pub fn reset(&self) {
		*self.next.lock() = None;
	}
}
