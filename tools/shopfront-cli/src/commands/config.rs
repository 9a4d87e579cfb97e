//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use shopfront_core::generate_default_config;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "defaults"),
    }

    let rendered = toml::to_string_pretty(&ctx.config).context("Failed to render config")?;
    ctx.output.result(&rendered);
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shopfront.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}
