use clap::Parser;
use std::process;
use veil::cli::{Cli, Commands};
use veil::logging::init_logging;

fn main() {
    // Optional .env; absence is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let log_level = cli.log_level.as_deref().unwrap_or("info");

    let logging_config = match veil::config::load_or_default(&cli.config) {
        Ok(config) => config.logging,
        Err(_) => veil::config::LoggingConfig::default(),
    };
    let _guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    process::exit(exit_code);
}

fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config),
        Commands::Lookup(args) => args.execute(&cli.config),
        Commands::Entities(args) => args.execute(),
        Commands::Init(args) => args.execute(),
    }
}
