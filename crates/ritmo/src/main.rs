// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ritmo - a daily standup ritual bot.
//!
//! Binary entry point: loads configuration, wires adapters, and either
//! serves the HTTP gateway or runs one-shot maintenance commands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};

/// Ritmo - a daily standup ritual bot.
#[derive(Parser, Debug)]
#[command(name = "ritmo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway server.
    Serve,
    /// Run one scheduler tick and print what was sent.
    Tick,
    /// Print the resolved configuration.
    Config,
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ritmo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ritmo_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ritmo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.agent.log_level);

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run(&config).await {
                tracing::error!(error = %e, "server exited with error");
                std::process::exit(1);
            }
        }
        Some(Commands::Tick) => match serve::tick_once(&config).await {
            Ok(outcome) => {
                println!(
                    "{{\"morning\":{},\"evening\":{}}}",
                    outcome.morning, outcome.evening
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "tick failed");
                std::process::exit(1);
            }
        },
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("ritmo: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("ritmo: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = ritmo_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "ritmo");
        assert_eq!(config.schedule.morning_hour, 8);
    }
}
