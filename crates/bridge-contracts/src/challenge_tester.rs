//! Challenge tester wrapper.
//!
//! The tester asks a challenge factory to deploy a new challenge. The only
//! log in the receipt is the new challenge's `InitiatedChallenge`, so the
//! result is the address that emitted it.

use crate::abi::IChallengeTester;
use crate::call::{LogExpectation, Operation, Transactor};
use crate::events::{DecodedEvent, EventSchema};
use bridge_types::{
	Address, BridgeError, CancellationToken, DecodeError, LogEntry, TimeTicks, B256, U256,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartChallenge {
	pub challenge_factory: Address,
	pub asserter: Address,
	pub challenger: Address,
	pub challenge_period: TimeTicks,
	pub challenge_hash: B256,
	pub challenge_type: U256,
}

impl Operation for StartChallenge {
	type Call = IChallengeTester::startChallengeCall;
	type Output = Address;

	fn label(&self) -> &'static str {
		"CreateChallenge"
	}

	fn expected_logs(&self) -> LogExpectation {
		LogExpectation::single(EventSchema::InitiatedChallenge)
	}

	fn validate(&self) -> Result<(), String> {
		for (name, address) in [
			("challenge factory", self.challenge_factory),
			("asserter", self.asserter),
			("challenger", self.challenger),
		] {
			if address.is_zero() {
				return Err(format!("{} must be a non-zero address", name));
			}
		}
		if self.asserter == self.challenger {
			return Err("asserter and challenger must differ".to_string());
		}
		if self.challenge_period.is_zero() {
			return Err("challenge period must be non-zero".to_string());
		}
		if self.challenge_period.to_u128().is_none() {
			return Err(format!(
				"challenge period {} exceeds uint128",
				self.challenge_period
			));
		}
		Ok(())
	}

	fn to_call(&self) -> Self::Call {
		IChallengeTester::startChallengeCall {
			challengeFactory: self.challenge_factory,
			asserter: self.asserter,
			challenger: self.challenger,
			challengePeriodTicks: self.challenge_period.to_u128().unwrap_or(u128::MAX),
			challengeHash: self.challenge_hash,
			challengeType: self.challenge_type,
		}
	}

	fn output(&self, event: DecodedEvent, entry: &LogEntry) -> Result<Address, DecodeError> {
		match event {
			DecodedEvent::InitiatedChallenge { .. } => Ok(entry.address),
			other => Err(DecodeError::new(
				EventSchema::InitiatedChallenge.name(),
				entry.address,
				format!("decoded as {}", other.schema().name()),
			)),
		}
	}
}

/// Starts challenges through a deployed challenge tester.
#[derive(Clone)]
pub struct ChallengeTester {
	address: Address,
	transactor: Transactor,
}

impl ChallengeTester {
	pub fn new(address: Address, transactor: Transactor) -> Self {
		Self {
			address,
			transactor,
		}
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// Starts a challenge and returns the new challenge contract's address.
	#[allow(clippy::too_many_arguments)]
	pub async fn start_challenge(
		&self,
		challenge_factory: Address,
		asserter: Address,
		challenger: Address,
		challenge_period: TimeTicks,
		challenge_hash: B256,
		challenge_type: U256,
		cancel: &CancellationToken,
	) -> Result<Address, BridgeError> {
		let op = StartChallenge {
			challenge_factory,
			asserter,
			challenger,
			challenge_period,
			challenge_hash,
			challenge_type,
		};
		self.transactor.execute(self.address, &op, cancel).await
	}
}
