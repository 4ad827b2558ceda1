use std::process::ExitCode;

use clap::Parser;

use ancora::cli::{Cli, Commands, ConfigSubcommands, run_ask};
use ancora::config::AppConfig;
use ancora::core::{Result, StreamOutcome};
use ancora::{logging, providers, tui};

fn run_config_command(command: &ConfigSubcommands) -> ExitCode {
    match command {
        ConfigSubcommands::Init => match AppConfig::init_default() {
            Ok(path) => {
                println!("✓ Created config file at {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("✗ Failed to create config: {e}");
                ExitCode::FAILURE
            }
        },
        ConfigSubcommands::Where => match AppConfig::get_config_path() {
            Some(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("✗ Could not determine config path");
                ExitCode::FAILURE
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    config.apply_overrides(cli.provider, cli.model.clone(), cli.simulated);

    match &cli.command {
        Some(Commands::Config { command }) => Ok(run_config_command(command)),
        Some(Commands::Ask { prompt }) => {
            logging::init_stderr(cli.verbose);
            match run_ask(&config, prompt).await? {
                StreamOutcome::Completed | StreamOutcome::Cancelled => Ok(ExitCode::SUCCESS),
                StreamOutcome::Failed(reason) => {
                    eprintln!("✗ {reason}");
                    Ok(ExitCode::FAILURE)
                }
                StreamOutcome::Rejected(rejection) => {
                    eprintln!("✗ Not sent: {rejection}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        None => {
            let _log_guard = logging::init();
            let model = providers::create_provider(&config)?;
            tracing::info!(provider = model.name(), model = model.model(), "starting terminal UI");
            tui::run_tui(&config, model).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
