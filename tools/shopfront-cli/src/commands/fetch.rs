//! Live fetch against the configured backend.

use anyhow::{Context as _, Result};
use axum::extract::Query;
use axum::http::Uri;
use chrono::Utc;
use homepage::HomepageWorkload;
use product_listing::ListingWorkload;
use shopfront_commerce::listing::ListingQuery;
use shopfront_core::RequestId;
use shopfront_data::{ApiClient, StorefrontApi};
use shopfront_observability::StructuredLogger;

use super::FetchArgs;
use crate::context::Context;

/// Run the fetch command.
pub async fn run(args: FetchArgs, ctx: &Context) -> Result<()> {
    let client = ApiClient::from_config(&ctx.config).context("Failed to build API client")?;
    let api = StorefrontApi::new(client);
    ctx.output.debug(&format!("Fetching from {}", ctx.config.api.base_url));

    match args.products {
        Some(raw) => {
            let logger = logger(product_listing::WORKLOAD);
            let query = listing_query(&raw)?;
            let page = ListingWorkload::new(api).load(query, Utc::now(), &logger).await;

            if args.html {
                ctx.output.result(&page.render());
            } else {
                match &page.products {
                    Ok(products) => ctx.output.json(products),
                    Err(message) => anyhow::bail!("{}", message),
                }
            }
        }
        None => {
            let logger = logger(homepage::WORKLOAD);
            let page = HomepageWorkload::new(api).load(Utc::now(), &logger).await;

            if args.html {
                ctx.output.result(&page.render());
            } else {
                ctx.output.result(&page.derived_json()?);
            }
            if let Some(error) = &page.derived.error {
                ctx.output.warn(error);
            }
        }
    }

    Ok(())
}

/// Decode `category=men&search=...` (a leading `?` is allowed).
fn listing_query(raw: &str) -> Result<ListingQuery> {
    let uri: Uri = format!("/products?{}", raw.trim_start_matches('?'))
        .parse()
        .with_context(|| format!("Invalid listing query: {}", raw))?;
    let Query(query) = Query::<ListingQuery>::try_from_uri(&uri)
        .map_err(|e| anyhow::anyhow!("Invalid listing query: {}", e))?;
    Ok(query)
}

fn logger(workload: &str) -> StructuredLogger {
    StructuredLogger::new(RequestId::generate()).with_workload(workload)
}
