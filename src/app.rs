//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to the command handlers.

use crate::commands;
use crate::interrupt;
use crate::logging;
use anyhow::anyhow;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Bluetooth headset probe, pairing and microphone capture
#[derive(Parser, Debug)]
#[command(name = "venbluez")]
#[command(version)]
#[command(about = "Bluetooth headset probe, pairing and microphone capture")]
#[command(long_about = "Bluetooth headset probe, pairing and microphone capture.\n\n\
Checks that the target answers l2ping, pairs and connects to it with bluetoothctl,\n\
finds its headset-profile microphone in the PulseAudio source list and records it\n\
with parecord until the recorder exits or you press Ctrl+C.\n\n\
EXAMPLES:\n    \
# Record from a headset into recordings/AA_BB_CC_DD_EE_FF.wav\n    \
$ venbluez -a AA:BB:CC:DD:EE:FF\n\n    \
# Only check whether the headset is in range\n    \
$ venbluez check -a AA:BB:CC:DD:EE:FF\n\n    \
# See which sources the audio server currently exposes\n    \
$ venbluez sources")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/venbluez/venbluez.toml\n    Logs:               ~/.local/state/venbluez/venbluez.log.*"
)]
#[command(subcommand_negates_reqs = true)]
struct Cli {
    /// Target Bluetooth MAC address (e.g. AA:BB:CC:DD:EE:FF)
    #[arg(short, long, value_name = "ADDRESS", required = true)]
    address: Option<String>,

    /// Use this config file instead of ~/.config/venbluez/venbluez.toml
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the required tools exist and the target answers l2ping
    Check {
        /// Target Bluetooth MAC address
        #[arg(short, long, value_name = "ADDRESS")]
        address: String,
    },

    /// List the audio server's input sources
    ///
    /// Bluetooth sources and sources in the headset profile are tagged.
    Sources,

    /// Open the configuration file in your preferred editor
    ///
    /// Uses $EDITOR or falls back to nano/vi.
    Config,

    /// Show recent log entries
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   venbluez completions bash > venbluez.bash
    ///   venbluez completions zsh > _venbluez
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success, or interrupted by the user
/// - 1: Fatal error (returned as `Err`)
/// - 2: Usage error (reported by clap)
///
/// # Errors
/// - If logging initialization fails
/// - If the selected command fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that need neither logging nor config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "venbluez", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;

    let config_path = cli.config.as_deref();
    match cli.command {
        None => {
            let address = cli
                .address
                .ok_or_else(|| anyhow!("--address is required"))?;
            let token = interrupt_token()?;
            commands::handle_capture(&address, config_path, &token).await?;
        }
        Some(Commands::Check { address }) => {
            let token = interrupt_token()?;
            commands::handle_check(&address, config_path, &token).await?;
        }
        Some(Commands::Sources) => {
            let token = interrupt_token()?;
            commands::handle_sources(config_path, &token).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config(config_path)?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

/// Routes SIGINT/SIGTERM into a fresh token for the commands that run
/// external tools. The editor keeps the default handling.
fn interrupt_token() -> anyhow::Result<CancellationToken> {
    let token = CancellationToken::new();
    interrupt::install(token.clone())
        .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;
    Ok(token)
}
