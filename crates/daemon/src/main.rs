//! Skewer - Main Entry Point
//! Watches a fixed fleet for clock skew over ssh and alerts when it is real

mod cli;
mod signals;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use skewer_core::application::{
    shutdown_channel, AlertDispatcher, Sampler, Scheduler, TracingReporter,
};
use skewer_core::domain::MonitorConfig;
use skewer_core::port::AlertAction;
use skewer_infra_ssh::{connect_pool, probe_agent, SshOptions};
use skewer_infra_system::SubprocessAlert;

use cli::{Cli, LogFormat};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start async runtime");
            std::process::exit(1);
        }
    };

    // Single top-level handler: every failure ends here, logged once
    if let Err(e) = runtime.block_on(run(cli)) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr, pretty for humans or JSON for collectors
fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("skewer=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Skewer v{} starting...", VERSION);

    // 1. Validate configuration
    let alert_path = shellexpand::tilde(&cli.alert).into_owned();
    let config = MonitorConfig::from_raw(&cli.hosts, &cli.user, &cli.sleep, &alert_path)
        .context("Invalid configuration")?;

    info!(
        hosts = config.hosts.len(),
        user = %config.user,
        interval = ?config.interval,
        alert = ?config.alert,
        "Configuration loaded"
    );

    // 2. The agent must be reachable before any host is dialed
    let agent = probe_agent().await?;

    // 3. Connect the fleet (one persistent connection per host)
    let ssh_options = SshOptions::new(config.user.clone()).known_hosts(cli.known_hosts);
    let ssh_options = match cli.connect_timeout {
        Some(timeout) => ssh_options.connect_timeout(timeout.into()),
        None => ssh_options,
    };
    info!(
        hosts = config.hosts.len(),
        agent_identities = agent.identities,
        known_hosts = %cli.known_hosts,
        "Connecting fleet"
    );
    let pool = connect_pool(&config.hosts, &ssh_options).await?;

    // 4. Wire the round loop
    let alert: Option<Arc<dyn AlertAction>> = config
        .alert
        .as_ref()
        .map(|path| Arc::new(SubprocessAlert::new(path)) as Arc<dyn AlertAction>);
    let sampler = Sampler::new(config.hosts.clone(), pool)?;
    let scheduler = Scheduler::new(
        sampler,
        Arc::new(TracingReporter),
        AlertDispatcher::new(alert),
        config.interval,
    );

    // 5. Ctrl+C stops the loop between rounds, a second Ctrl+C exits now
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        match signals::handle_interrupts(tokio::signal::ctrl_c, shutdown_tx).await {
            Ok(()) => {
                warn!("Second shutdown signal received. Exiting without finishing the round.");
                std::process::exit(signals::EXIT_INTERRUPTED);
            }
            Err(e) => warn!(error = %e, "Unable to listen for Ctrl+C"),
        }
    });

    scheduler.run(shutdown_rx).await?;

    info!("Shutdown complete.");
    Ok(())
}
