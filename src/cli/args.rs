//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::config::ProviderKind;

#[derive(Parser, Debug)]
#[command(name = "ancora")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Model to use (e.g., open-mistral-7b, mistral-small-latest)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Backend to talk to
    #[arg(short, long, global = true, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Use the offline simulated model instead of a hosted one
    #[arg(long, global = true)]
    pub simulated: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigSubcommands,
    },
    /// Stream a single reply to stdout without starting the terminal UI
    Ask {
        /// Message to send
        prompt: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Initialize a new config file
    Init,
    /// Print config file location
    Where,
}
