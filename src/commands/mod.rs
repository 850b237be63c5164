use clap::Command;
use color_eyre::eyre::{self, Result};
use spanquery::config::Config;

/// Register all application commands
pub fn register_commands(app: Command) -> Command {
    app.subcommand(Command::new("serve").about("Serve the span query API"))
        .subcommand(Command::new("config").about("Print the effective configuration"))
}

/// Handle all application commands
pub async fn handle_commands(matches: clap::ArgMatches, config: &Config) -> Result<()> {
    match matches.subcommand() {
        Some(("serve", _)) => crate::service::run_service(config).await,
        Some(("config", _)) => {
            let rendered = serde_json::to_string_pretty(config)
                .map_err(|e| eyre::eyre!("Failed to render configuration: {}", e))?;
            println!("{}", rendered);
            Ok(())
        },
        _ => {
            println!("Please specify a subcommand. Use --help for more information.");
            Ok(())
        },
    }
}
