//! CLI entry point - the composition root.
//!
//! Storage is wired through `bootstrap`; command dispatch routes to the
//! handlers, which only talk to the core services.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use smartdict_cli::{Cli, Commands, bootstrap, exit_code_for, handlers};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code_for(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if matches!(command, Commands::Paths) {
        return handlers::paths::execute();
    }

    let ctx = bootstrap().await?;

    match command {
        Commands::Run(args) => handlers::run::execute(&ctx, args).await,
        Commands::Voices { language } => handlers::voices::execute(&ctx, language).await,
        Commands::History { command } => handlers::history::execute(&ctx, command).await,
        Commands::Library { command } => handlers::library::execute(&ctx, command).await,
        Commands::Users { command } => handlers::users::execute(&ctx, command).await,
        Commands::Config { command } => handlers::config::execute(&ctx, command).await,
        Commands::Paths => handlers::paths::execute(),
    }
}
