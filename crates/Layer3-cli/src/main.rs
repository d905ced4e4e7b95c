//! Tessera CLI - Main entry point

mod apply;
mod report;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tessera_core::PluginManagerConfig;
use tessera_foundation::HostConfig;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tessera - design-system plugin host
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Silence per-plugin loggers
    #[arg(long, global = true)]
    no_plugin_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register theme packs in order and print the resulting document state
    Apply {
        /// Theme pack JSON files (dependencies first)
        #[arg(required = true)]
        packs: Vec<PathBuf>,

        /// Install without activating
        #[arg(long)]
        no_activate: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate theme packs without applying them
    Check {
        #[arg(required = true)]
        packs: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = HostConfig::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {}", e);
        HostConfig::default()
    });

    // Initialize logging (RUST_LOG > --debug > config > warn)
    let log_level = if args.debug {
        "debug".to_string()
    } else {
        config
            .logging
            .level
            .clone()
            .unwrap_or_else(|| "warn".to_string())
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut manager_config = PluginManagerConfig::from(&config.plugins);
    if args.no_plugin_logs {
        manager_config.enable_logging = false;
    }

    match args.command {
        Command::Apply {
            packs,
            no_activate,
            json,
        } => {
            let outcome = apply::apply_packs(&packs, manager_config, no_activate).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                print!("{}", outcome.report.render_text());
            }

            if !outcome.failures.is_empty() {
                anyhow::bail!("{} theme pack(s) failed to apply", outcome.failures.len());
            }
        }
        Command::Check { packs } => {
            let mut failed = 0;
            for path in &packs {
                match apply::check_pack(path) {
                    Ok(summary) => println!("✓ {}", summary),
                    Err(e) => {
                        warn!("Invalid theme pack {}: {}", path.display(), e);
                        println!("✗ {}: {}", path.display(), e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{} of {} theme pack(s) are invalid", failed, packs.len());
            }
        }
    }

    Ok(())
}
