//! Wiring from configuration to contract wrappers.

use crate::cli::{CreateRollupArgs, StartChallengeArgs};
use anyhow::{Context, Result};
use bridge_account::{LocalAuthority, TransactionAuthority};
use bridge_chain::AlloyConnector;
use bridge_config::BridgeConfig;
use bridge_contracts::{ArbFactory, ArbFactoryWatcher, ChallengeTester, Transactor, ViewCaller};
use bridge_delivery::{ReceiptWaiter, WaiterConfig};
use bridge_types::{Address, CancellationToken, ChainParams, TimeTicks, U256};
use std::sync::Arc;
use tracing::info;

pub struct BridgeService {
	config: BridgeConfig,
	connector: Arc<AlloyConnector>,
}

impl BridgeService {
	pub fn new(config: BridgeConfig) -> Result<Self> {
		let connector =
			AlloyConnector::new(&config.chain.rpc_url).context("Failed to create connector")?;
		Ok(Self {
			config,
			connector: Arc::new(connector),
		})
	}

	pub fn config(&self) -> &BridgeConfig {
		&self.config
	}

	fn watcher(&self) -> ArbFactoryWatcher {
		ArbFactoryWatcher::new(
			self.config.contracts.arb_factory,
			ViewCaller::new(self.connector.clone()),
		)
	}

	/// Builds the signing pipeline after checking the node serves the configured chain.
	async fn transactor(&self) -> Result<Transactor> {
		self.connector
			.verify_chain_id(self.config.chain.chain_id)
			.await
			.context("Failed to verify chain")?;

		let account = &self.config.account;
		let authority = LocalAuthority::new(
			&self.config.chain.rpc_url,
			self.config.chain.chain_id,
			&account.private_key,
			account.gas_strategy.clone(),
		)
		.context("Failed to create signing account")?
		.with_gas_limit_multiplier(account.gas_limit_multiplier);
		info!(sender = %authority.address(), "Signing account ready");

		let waiter = ReceiptWaiter::new(WaiterConfig::from(&self.config.waiter));
		Ok(Transactor::new(
			self.connector.clone(),
			Arc::new(authority),
			waiter,
		))
	}

	pub async fn global_inbox(&self) -> Result<Address> {
		Ok(self.watcher().global_inbox_address().await?)
	}

	pub async fn challenge_factory(&self) -> Result<Address> {
		Ok(self.watcher().challenge_factory_address().await?)
	}

	pub async fn create_rollup(
		&self,
		args: CreateRollupArgs,
		cancel: &CancellationToken,
	) -> Result<Address> {
		let params = ChainParams {
			grace_period: TimeTicks::from_blocks(args.grace_period_blocks),
			arb_gas_speed_limit_per_tick: args.speed_limit,
			max_execution_steps: args.max_steps,
			stake_requirement: parse_u256("stake", &args.stake)?,
		};

		let factory = ArbFactory::new(self.config.contracts.arb_factory, self.transactor().await?);
		Ok(factory
			.create_rollup(args.vm_state, &params, args.owner, cancel)
			.await?)
	}

	pub async fn start_challenge(
		&self,
		args: StartChallengeArgs,
		cancel: &CancellationToken,
	) -> Result<Address> {
		let tester_address = self
			.config
			.contracts
			.challenge_tester
			.context("contracts.challenge_tester is not configured")?;
		let challenge_type = parse_u256("challenge type", &args.challenge_type)?;

		let tester = ChallengeTester::new(tester_address, self.transactor().await?);
		Ok(tester
			.start_challenge(
				args.factory,
				args.asserter,
				args.challenger,
				TimeTicks::from_blocks(args.period_blocks),
				args.challenge_hash,
				challenge_type,
				cancel,
			)
			.await?)
	}
}

fn parse_u256(name: &str, value: &str) -> Result<U256> {
	value
		.parse::<U256>()
		.map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", name, value, e))
}
