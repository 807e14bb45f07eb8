//! Contract interfaces used by the bridge.
//!
//! These match the deployed rollup factory and challenge tester ABIs; the
//! generated call and event types are what requests are encoded from and
//! what receipt logs are decoded into.

use alloy::sol;

sol! {
	/// Factory deploying new rollup chains.
	interface IArbFactory {
		function globalInboxAddress() external view returns (address);
		function challengeFactoryAddress() external view returns (address);
		function createRollup(
			bytes32 vmState,
			uint128 gracePeriodTicks,
			uint128 arbGasSpeedLimitPerTick,
			uint64 maxExecutionSteps,
			uint128 stakeRequirement,
			address owner
		) external;

		/// Emitted once per created rollup.
		event RollupCreated(address vmAddress);
	}

	/// Test harness that starts a challenge through a challenge factory.
	interface IChallengeTester {
		function startChallenge(
			address challengeFactory,
			address asserter,
			address challenger,
			uint128 challengePeriodTicks,
			bytes32 challengeHash,
			uint256 challengeType
		) external;
	}

	/// A running challenge.
	interface IChallenge {
		/// Emitted by the new challenge contract when it is initialised.
		event InitiatedChallenge(uint128 deadlineTicks);
	}
}
