//! Command-line interface definitions.

use bridge_types::{Address, B256};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arb-bridge")]
#[command(about = "Submit rollup and challenge transactions and report their results", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file
	#[arg(short, long, env = "BRIDGE_CONFIG")]
	pub config: Option<PathBuf>,

	/// Log level, used when RUST_LOG is not set
	#[arg(long, env = "BRIDGE_LOG_LEVEL", default_value = "info")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the factory's global inbox address
	GlobalInbox,

	/// Print the factory's challenge factory address
	ChallengeFactory,

	/// Create a new rollup chain and print its VM address
	CreateRollup(CreateRollupArgs),

	/// Start a challenge through the challenge tester and print its address
	StartChallenge(StartChallengeArgs),

	/// Validate the configuration file and exit
	Validate,
}

#[derive(ClapArgs, Debug)]
pub struct CreateRollupArgs {
	/// Initial VM state hash
	#[arg(long)]
	pub vm_state: B256,

	/// Grace period, in L1 blocks
	#[arg(long)]
	pub grace_period_blocks: u64,

	/// ArbGas speed limit per tick
	#[arg(long)]
	pub speed_limit: u64,

	/// Maximum execution steps per assertion
	#[arg(long)]
	pub max_steps: u64,

	/// Validator stake requirement, in wei
	#[arg(long)]
	pub stake: String,

	/// Owner of the new rollup
	#[arg(long)]
	pub owner: Address,
}

#[derive(ClapArgs, Debug)]
pub struct StartChallengeArgs {
	/// Challenge factory the tester deploys through
	#[arg(long)]
	pub factory: Address,

	#[arg(long)]
	pub asserter: Address,

	#[arg(long)]
	pub challenger: Address,

	/// Challenge period, in L1 blocks
	#[arg(long)]
	pub period_blocks: u64,

	#[arg(long)]
	pub challenge_hash: B256,

	#[arg(long, default_value = "0")]
	pub challenge_type: String,
}
