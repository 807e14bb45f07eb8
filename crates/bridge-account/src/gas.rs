//! Fee policy applied on top of the node's EIP-1559 estimate.

use serde::{Deserialize, Serialize};

/// Gas pricing strategy for transaction submission.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GasStrategy {
	/// Use the node's fee estimate as is.
	#[default]
	Standard,
	/// Pay 1.2x the estimate for faster inclusion.
	Fast,
	/// Apply a custom multiplier to the estimate.
	Custom { multiplier: f64 },
	/// Keep the estimated base fee and pay a fixed priority fee.
	Eip1559 { max_priority_fee: u64 },
}

/// EIP-1559 fee fields, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
	pub max_fee_per_gas: u128,
	pub max_priority_fee_per_gas: u128,
}

impl GasStrategy {
	pub fn apply(&self, estimate: FeeEstimate) -> FeeEstimate {
		match self {
			GasStrategy::Standard => estimate,
			GasStrategy::Fast => FeeEstimate {
				max_fee_per_gas: estimate.max_fee_per_gas * 12 / 10,
				max_priority_fee_per_gas: estimate.max_priority_fee_per_gas * 12 / 10,
			},
			GasStrategy::Custom { multiplier } => {
				let scaled = (*multiplier * 1000.0) as u128;
				FeeEstimate {
					max_fee_per_gas: estimate.max_fee_per_gas * scaled / 1000,
					max_priority_fee_per_gas: estimate.max_priority_fee_per_gas * scaled / 1000,
				}
			}
			GasStrategy::Eip1559 { max_priority_fee } => {
				let tip = u128::from(*max_priority_fee);
				let base = estimate
					.max_fee_per_gas
					.saturating_sub(estimate.max_priority_fee_per_gas);
				FeeEstimate {
					max_fee_per_gas: base + tip,
					max_priority_fee_per_gas: tip,
				}
			}
		}
	}
}
