//! CLI command implementations.

pub mod config;
pub mod derive;
pub mod fetch;
pub mod serve;

use clap::{Args, Subcommand};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`).
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the derive command.
#[derive(Args)]
pub struct DeriveArgs {
    /// Saved `/api/homepage/` response. `null` derives the error state.
    #[arg(long)]
    pub payload: String,

    /// Saved `/api/categories/tree/` response.
    #[arg(long)]
    pub categories: Option<String>,

    /// Instant to measure new drops from (RFC 3339). Defaults to now.
    #[arg(long)]
    pub now: Option<String>,
}

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Print the rendered page instead of the view-model.
    #[arg(long)]
    pub html: bool,

    /// Fetch the `/products` listing for this query string instead,
    /// e.g. `category=men` or `best_selling=true`.
    #[arg(long)]
    pub products: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default `shopfront.toml`.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse an RFC 3339 instant, defaulting to now.
pub(crate) fn parse_now(now: Option<&str>) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    match now {
        Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&chrono::Utc))
            .map_err(|e| anyhow::anyhow!("Invalid --now '{}': {}", raw, e)),
        None => Ok(chrono::Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_now() {
        let parsed = parse_now(Some("2024-06-10T18:00:00+06:00")).unwrap();
        assert_eq!(parsed, chrono::Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap());
        assert!(parse_now(Some("yesterday")).is_err());
        assert!(parse_now(None).is_ok());
    }
}
