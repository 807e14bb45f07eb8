//! Rollup chain parameters.

use crate::common::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticks per L1 block used by the rollup and challenge contracts.
pub const TICKS_PER_BLOCK: u64 = 1000;

/// A duration measured in contract ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeTicks(pub U256);

impl TimeTicks {
	pub fn from_blocks(blocks: u64) -> Self {
		Self(U256::from(blocks) * U256::from(TICKS_PER_BLOCK))
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// The tick count as a `uint128` contract argument.
	pub fn to_u128(&self) -> Option<u128> {
		u128::try_from(self.0).ok()
	}
}

impl fmt::Display for TimeTicks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ticks", self.0)
	}
}

/// Parameters a new rollup chain is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
	/// Time validators have to challenge an assertion.
	pub grace_period: TimeTicks,
	/// Arbitrum gas the VM may consume per tick.
	pub arb_gas_speed_limit_per_tick: u64,
	/// Upper bound on steps in a single assertion.
	pub max_execution_steps: u64,
	/// Stake required to become a validator, in wei.
	pub stake_requirement: U256,
}

impl ChainParams {
	/// Checks every field against the domain the factory contract accepts.
	pub fn validate(&self) -> Result<(), String> {
		if self.grace_period.is_zero() {
			return Err("grace period must be non-zero".to_string());
		}
		if self.grace_period.to_u128().is_none() {
			return Err(format!("grace period {} exceeds uint128", self.grace_period));
		}
		if self.arb_gas_speed_limit_per_tick == 0 {
			return Err("arb gas speed limit per tick must be non-zero".to_string());
		}
		if u128::try_from(self.stake_requirement).is_err() {
			return Err(format!(
				"stake requirement {} exceeds uint128",
				self.stake_requirement
			));
		}
		Ok(())
	}
}
