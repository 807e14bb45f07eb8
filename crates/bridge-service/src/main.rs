use anyhow::{Context, Result};
use bridge_config::{load_config, BridgeConfig, ConfigLoader};
use bridge_types::{BridgeError, CancellationToken};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod service;

use cli::{Args, Command};
use service::BridgeService;

#[tokio::main]
async fn main() {
	let args = Args::parse();

	setup_tracing(&args.log_level);

	if let Err(err) = run(args).await {
		match err.downcast_ref::<BridgeError>() {
			Some(bridge) if bridge.is_retryable() => {
				error!("{:#}", err);
				warn!("The operation timed out and may be retried");
			}
			_ => error!("{:#}", err),
		}
		std::process::exit(1);
	}
}

async fn run(args: Args) -> Result<()> {
	let config = match &args.config {
		Some(path) => ConfigLoader::from_env_and_file(path),
		None => load_config(),
	}
	.context("Failed to load configuration")?;

	let cancel = CancellationToken::new().with_timeout(config.waiter.timeout());
	let service = BridgeService::new(config)?;

	let watchdog = cancel.clone();
	let shutdown = tokio::spawn(async move {
		shutdown_signal().await;
		info!("Shutdown signal received, cancelling");
		watchdog.cancel();
	});

	let result = match args.command {
		Command::Validate => {
			print_summary(service.config());
			None
		}
		Command::GlobalInbox => Some(service.global_inbox().await),
		Command::ChallengeFactory => Some(service.challenge_factory().await),
		Command::CreateRollup(create) => Some(service.create_rollup(create, &cancel).await),
		Command::StartChallenge(start) => Some(service.start_challenge(start, &cancel).await),
	};
	shutdown.abort();

	if let Some(address) = result {
		println!("{}", address?);
	}
	Ok(())
}

fn print_summary(config: &BridgeConfig) {
	info!("Configuration is valid");
	info!("RPC endpoint: {}", config.chain.rpc_url);
	info!("Chain ID: {}", config.chain.chain_id);
	info!("ArbFactory: {}", config.contracts.arb_factory);
	match config.contracts.challenge_tester {
		Some(address) => info!("ChallengeTester: {}", address),
		None => info!("ChallengeTester: not configured"),
	}
	info!("Receipt timeout: {}s", config.waiter.timeout_secs);
}

fn setup_tracing(log_level: &str) {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			warn!("Failed to install Ctrl+C handler: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!("Failed to install signal handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
