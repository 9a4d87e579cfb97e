//! Offline homepage derivation.

use std::fs;

use anyhow::{Context as _, Result};
use shopfront_commerce::catalog::Category;
use shopfront_commerce::homepage::{derive_homepage, HomepageData};

use super::{parse_now, DeriveArgs};
use crate::context::Context;

/// Run the derive command.
pub async fn run(args: DeriveArgs, ctx: &Context) -> Result<()> {
    let now = parse_now(args.now.as_deref())?;

    let payload_path = ctx.resolve_path(&args.payload);
    let content = fs::read_to_string(&payload_path)
        .with_context(|| format!("Failed to read {}", payload_path.display()))?;
    let data: Option<HomepageData> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid homepage payload in {}", payload_path.display()))?;

    let tree: Vec<Category> = match &args.categories {
        Some(path) => {
            let path = ctx.resolve_path(path);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid category tree in {}", path.display()))?
        }
        None => Vec::new(),
    };

    let categories = homepage::top_level_summaries(&tree);
    ctx.output.debug(&format!(
        "Deriving with {} categories as of {}",
        categories.len(),
        now.to_rfc3339()
    ));

    let derived = derive_homepage(data.as_ref(), &categories, now);
    ctx.output.json(&derived);
    Ok(())
}
