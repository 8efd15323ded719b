// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Panelio - menu-navigable UI screens living inside editable chat messages.
//!
//! This is the binary entry point for the Panelio agent.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod status;

use clap::{Parser, Subcommand};

/// Panelio - menu-navigable UI screens living inside editable chat messages.
#[derive(Parser, Debug)]
#[command(name = "panelio", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Panelio agent.
    Serve,
    /// Inspect configuration and storage health.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match panelio_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            panelio_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status) => status::run_status(config).await,
        None => {
            println!("panelio: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("panelio: {err}");
        std::process::exit(1);
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
        let config = panelio_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "panelio");
    }
}
