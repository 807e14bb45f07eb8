//! Rollup factory wrappers.

use crate::abi::IArbFactory;
use crate::call::{LogExpectation, Operation, Transactor};
use crate::events::{DecodedEvent, EventSchema};
use crate::view::ViewCaller;
use bridge_types::{
	Address, BridgeError, CancellationToken, ChainParams, DecodeError, LogEntry, B256,
};

/// Creates a new rollup chain. Resolves to the new chain's VM address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRollup {
	pub vm_state: B256,
	pub params: ChainParams,
	pub owner: Address,
}

impl Operation for CreateRollup {
	type Call = IArbFactory::createRollupCall;
	type Output = Address;

	fn label(&self) -> &'static str {
		"CreateChain"
	}

	fn expected_logs(&self) -> LogExpectation {
		LogExpectation::single(EventSchema::RollupCreated)
	}

	fn validate(&self) -> Result<(), String> {
		self.params.validate()?;
		if self.owner.is_zero() {
			return Err("owner must be a non-zero address".to_string());
		}
		Ok(())
	}

	fn to_call(&self) -> Self::Call {
		IArbFactory::createRollupCall {
			vmState: self.vm_state,
			gracePeriodTicks: self.params.grace_period.to_u128().unwrap_or(u128::MAX),
			arbGasSpeedLimitPerTick: u128::from(self.params.arb_gas_speed_limit_per_tick),
			maxExecutionSteps: self.params.max_execution_steps,
			stakeRequirement: u128::try_from(self.params.stake_requirement).unwrap_or(u128::MAX),
			owner: self.owner,
		}
	}

	fn output(&self, event: DecodedEvent, entry: &LogEntry) -> Result<Address, DecodeError> {
		match event {
			DecodedEvent::RollupCreated { vm_address } => Ok(vm_address),
			other => Err(DecodeError::new(
				EventSchema::RollupCreated.name(),
				entry.address,
				format!("decoded as {}", other.schema().name()),
			)),
		}
	}
}

/// Read-only access to a rollup factory.
#[derive(Clone)]
pub struct ArbFactoryWatcher {
	address: Address,
	view: ViewCaller,
}

impl ArbFactoryWatcher {
	pub fn new(address: Address, view: ViewCaller) -> Self {
		Self { address, view }
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// Address of the global inbox every rollup created here shares.
	pub async fn global_inbox_address(&self) -> Result<Address, BridgeError> {
		self.view
			.query(
				self.address,
				"GlobalInboxAddress",
				&IArbFactory::globalInboxAddressCall {},
			)
			.await
	}

	/// Address of the factory new challenges are deployed from.
	pub async fn challenge_factory_address(&self) -> Result<Address, BridgeError> {
		self.view
			.query(
				self.address,
				"ChallengeFactoryAddress",
				&IArbFactory::challengeFactoryAddressCall {},
			)
			.await
	}
}

/// A rollup factory that can also create rollups.
#[derive(Clone)]
pub struct ArbFactory {
	watcher: ArbFactoryWatcher,
	transactor: Transactor,
}

impl ArbFactory {
	pub fn new(address: Address, transactor: Transactor) -> Self {
		let view = ViewCaller::new(transactor.connector().clone());
		Self {
			watcher: ArbFactoryWatcher::new(address, view),
			transactor,
		}
	}

	pub fn address(&self) -> Address {
		self.watcher.address()
	}

	pub async fn global_inbox_address(&self) -> Result<Address, BridgeError> {
		self.watcher.global_inbox_address().await
	}

	pub async fn challenge_factory_address(&self) -> Result<Address, BridgeError> {
		self.watcher.challenge_factory_address().await
	}

	/// Creates a rollup and returns the new chain's VM address.
	pub async fn create_rollup(
		&self,
		vm_state: B256,
		params: &ChainParams,
		owner: Address,
		cancel: &CancellationToken,
	) -> Result<Address, BridgeError> {
		let op = CreateRollup {
			vm_state,
			params: params.clone(),
			owner,
		};
		self.transactor.execute(self.address(), &op, cancel).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::sol_types::SolCall;
	use bridge_types::{TimeTicks, U256};

	fn op() -> CreateRollup {
		CreateRollup {
			vm_state: B256::repeat_byte(0x5a),
			params: ChainParams {
				grace_period: TimeTicks::from_blocks(10),
				arb_gas_speed_limit_per_tick: 200_000,
				max_execution_steps: 1_000_000,
				stake_requirement: U256::from(1_000u64),
			},
			owner: Address::repeat_byte(0x0e),
		}
	}

	#[test]
	fn test_call_encoding() {
		let call = op().to_call();
		assert_eq!(call.gracePeriodTicks, 10_000);
		assert_eq!(call.arbGasSpeedLimitPerTick, 200_000);
		assert_eq!(call.maxExecutionSteps, 1_000_000);
		assert_eq!(call.stakeRequirement, 1_000);
		assert_eq!(call.owner, Address::repeat_byte(0x0e));

		let encoded = call.abi_encode();
		assert_eq!(&encoded[..4], &IArbFactory::createRollupCall::SELECTOR[..]);
		assert_eq!(encoded.len(), 4 + 6 * 32);
	}

	#[test]
	fn test_zero_owner_rejected() {
		let mut op = op();
		op.owner = Address::ZERO;
		assert!(op.validate().unwrap_err().contains("owner"));
	}

	#[test]
	fn test_invalid_params_rejected() {
		let mut op = op();
		op.params.grace_period = TimeTicks(U256::ZERO);
		assert!(op.validate().is_err());
	}

	#[test]
	fn test_output_requires_rollup_event() {
		let entry = LogEntry::new(Address::repeat_byte(1), vec![], Default::default());
		let vm = Address::repeat_byte(0x77);
		assert_eq!(
			op().output(DecodedEvent::RollupCreated { vm_address: vm }, &entry),
			Ok(vm)
		);

		let wrong = DecodedEvent::InitiatedChallenge {
			deadline: TimeTicks::from_blocks(1),
		};
		assert!(op().output(wrong, &entry).is_err());
	}
}
