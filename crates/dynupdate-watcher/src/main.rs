// # dynupdate-watcher
//
// Keeps one DNS record pointed at the current address of one network
// interface.
//
// This binary is a thin integration layer:
// 1. Parse and validate the command line
// 2. Initialize logging
// 3. Wire the interface resolver and the record API client into the watcher
// 4. Run the watch loop until SIGINT/SIGTERM
//
// ## Example
//
// ```bash
// export DYNUPDATE_TOKEN=secret
// dynupdate-watcher -i eth0 -n myhost.example.org. -u https://dns.example.org
// ```

mod cli;

use anyhow::Result;
use clap::{CommandFactory, Parser, error::ErrorKind};
use cli::Cli;
use dynupdate_client::HttpRecordClient;
use dynupdate_core::config::TOKEN_ENV_VAR;
use dynupdate_core::{WatchConfig, Watcher};
use dynupdate_ip_iface::InterfaceAddressSource;
use std::env;
use std::process::ExitCode;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
///
/// clap's own parse failures exit with clap's status.
#[derive(Debug, Clone, Copy)]
enum WatcherExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<WatcherExitCode> for ExitCode {
    fn from(code: WatcherExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.into_config(env::var(TOKEN_ENV_VAR).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let usage = Cli::command().error(ErrorKind::ValueValidation, e);
            eprintln!("{}", usage.render());
            return WatcherExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WatcherExitCode::ConfigError.into();
    }

    let client = match HttpRecordClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create record API client: {}", e);
            return WatcherExitCode::ConfigError.into();
        }
    };
    let source = InterfaceAddressSource::from_config(&config);

    // One loop, one unit of work per interval
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WatcherExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_watcher(config, source, client).await {
            error!("Watcher error: {}", e);
            WatcherExitCode::RuntimeError
        } else {
            WatcherExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the watch loop until a shutdown signal arrives
async fn run_watcher(
    config: WatchConfig,
    source: InterfaceAddressSource,
    client: HttpRecordClient,
) -> Result<()> {
    info!("Starting dynupdate-watcher {}", env!("CARGO_PKG_VERSION"));

    let (mut watcher, events) = Watcher::new(Box::new(source), Box::new(client), &config)?;
    // The log covers everything the events carry
    drop(events);

    let shutdown = CancellationToken::new();
    let signal_task = spawn_signal_listener(shutdown.clone())?;

    watcher.run(shutdown).await;

    signal_task.abort();
    Ok(())
}

/// Cancel `shutdown` on the first SIGTERM or SIGINT
#[cfg(unix)]
fn spawn_signal_listener(shutdown: CancellationToken) -> Result<JoinHandle<()>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::spawn(async move {
        let signal = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        info!("Received shutdown signal: {}", signal);
        shutdown.cancel();
    }))
}

/// Cancel `shutdown` on CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn spawn_signal_listener(shutdown: CancellationToken) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal: CTRL-C");
                shutdown.cancel();
            }
            Err(e) => error!("Failed to wait for CTRL-C: {}", e),
        }
    }))
}
