use std::process;

use clap::Parser;
use contentkit_cli::cli::{Cli, Commands};
use contentkit_cli::commands::{self, CommandContext};
use contentkit_cli::exit_codes::EXIT_ERROR;
use contentkit_cli::logging::configure_logging;
use contentkit_config::ConfigProvider;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.debug, cli.quiet);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(EXIT_ERROR);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut provider = ConfigProvider::new();
    if let Some(file) = &cli.config {
        provider = provider.with_file(file);
    }
    let mut settings = provider.load()?;
    if let Some(dir) = cli.types_dir {
        settings.content_types_dir = dir;
    }

    let ctx = CommandContext::load(&settings).await?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::List { json } => commands::list(&ctx, json, &mut stdout),
        Commands::Schema {
            content_type,
            compact,
        } => commands::schema(&ctx, &content_type, compact, &mut stdout),
        Commands::Check { content_type, file } => {
            commands::check(&ctx, &content_type, &file, &mut stdout).await
        }
    }
}
