//! Shopfront CLI - run and inspect the storefront.
//!
//! Commands:
//! - `shopfront serve` - Serve the storefront pages over HTTP
//! - `shopfront derive` - Derive the homepage view-model from a saved payload
//! - `shopfront fetch` - Fetch live data and print the derived homepage
//! - `shopfront config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, DeriveArgs, FetchArgs, ServeArgs};

/// Shopfront - server-rendered storefront over the shop's REST API
#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the storefront over HTTP
    Serve(ServeArgs),

    /// Derive the homepage view-model from a saved payload
    Derive(DeriveArgs),

    /// Fetch live data and print the derived homepage
    Fetch(FetchArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = ctx.init_tracing() {
        ctx.output.warn(&format!("Logging disabled: {}", e));
    }

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args, &ctx).await,
        Commands::Derive(args) => commands::derive::run(args, &ctx).await,
        Commands::Fetch(args) => commands::fetch::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
