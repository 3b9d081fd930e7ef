use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use voltmesh_gateway::{ContractGateway, RpcGateway, SessionContext};
use voltmesh_reconciler::{
    config, Identity, Reconciler, ReconcilerConfig, TelemetryFeed,
};
use voltmesh_types::{Address, Role};

#[derive(Parser, Debug)]
#[command(name = "voltmesh-reconciler")]
#[command(about = "VoltMesh marketplace state reconciliation service")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "reconciler.toml")]
    config: String,

    /// Account address to reconcile for (0x-prefixed hex)
    #[arg(short, long)]
    account: String,

    /// Wallet provider bridge endpoint (overrides config)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Poll interval in seconds (overrides config)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Write an example configuration file to the --config path and exit
    #[arg(long)]
    example_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    if args.example_config {
        config::create_example_config(&args.config)?;
        log::info!("Wrote example configuration to {}", args.config);
        return Ok(());
    }

    log::info!("Starting VoltMesh reconciler");

    let mut config = ReconcilerConfig::load(&args.config)?;
    if let Some(endpoint) = args.endpoint {
        config.provider.endpoint = endpoint;
    }
    if let Some(interval) = args.interval {
        config.poll_interval_secs = interval;
    }
    config.validate()?;

    log::info!("Provider endpoint: {}", config.provider.endpoint);
    log::info!("Poll interval: {}s", config.poll_interval_secs);

    let account: Address = args
        .account
        .parse()
        .with_context(|| format!("invalid account address '{}'", args.account))?;
    if account.is_zero() {
        bail!("the zero address cannot hold a marketplace registration");
    }

    let session = SessionContext::new(account);
    let gateway = Arc::new(RpcGateway::new(&config.provider, session)?);

    let role = gateway.resolve_role(&account).await?;
    log::info!("Account {} resolved as {}", account.short(), role);
    if role == Role::Unregistered {
        bail!(
            "account {} holds no marketplace registration; register first",
            account
        );
    }

    let reconciler = Arc::new(Reconciler::new(
        gateway,
        Identity::new(account, role),
    )?);
    let mut snapshots = reconciler.subscribe();

    let poll = Duration::from_secs(config.poll_interval_secs);
    let runner = Arc::clone(&reconciler);
    tokio::spawn(async move {
        runner.run(poll).await;
    });

    if config.telemetry.enabled {
        let feed = TelemetryFeed::new(
            config.telemetry.url.clone(),
            Duration::from_secs(config.provider.timeout_secs),
        )?;
        let mut batches = feed.subscribe();
        let telemetry_poll = Duration::from_secs(config.telemetry.poll_interval_secs);
        tokio::spawn(async move {
            feed.run(telemetry_poll).await;
        });
        tokio::spawn(async move {
            while batches.changed().await.is_ok() {
                let count = batches.borrow_and_update().len();
                log::debug!("Telemetry batch: {} records", count);
            }
        });
        log::info!("Telemetry feed enabled: {}", config.telemetry.url);
    }

    log::info!("Reconciler running; waiting for snapshots");

    while snapshots.changed().await.is_ok() {
        let summary = {
            let current = snapshots.borrow_and_update();
            current.as_ref().map(|s| {
                (
                    s.sequence,
                    s.stale,
                    s.pending_requests.len(),
                    s.active_supplies.len(),
                    s.transaction_history.len(),
                )
            })
        };
        match summary {
            Some((sequence, stale, pending, active, history)) => log::info!(
                "Snapshot {}{}: {} pending, {} active, {} settled",
                sequence,
                if stale { " (stale)" } else { "" },
                pending,
                active,
                history
            ),
            None => log::info!("Snapshot cleared (identity change)"),
        }
    }

    Ok(())
}
