//! Common types used throughout the bridge.

// Re-export the fixed-width primitives exchanged at every boundary
pub use alloy::primitives::{Address, Bytes, B256, U256};

/// Transaction hash
pub type TxHash = B256;

/// Block number
pub type BlockNumber = u64;

/// Renders a hash as a short prefix for log lines.
pub fn short_hash(hash: &TxHash) -> String {
	let full = format!("{:#x}", hash);
	if full.len() <= 10 {
		full
	} else {
		format!("{}..", &full[..10])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_short_hash() {
		let hash = B256::repeat_byte(0xab);
		assert_eq!(short_hash(&hash), "0xabababab..");
	}
}
