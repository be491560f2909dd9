//! Background pre-scrape loop: periodically pulls the latest headlines from
//! both sources and runs the full analysis on each so popular articles are
//! already processed when a user asks for them.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::pipeline::Pipeline;

pub struct PrescrapeConfig {
    pub per_source: usize,
    pub interval: Duration,
}

impl PrescrapeConfig {
    pub fn from_env() -> Option<Self> {
        let enabled = newslens_common::env_or("PRESCRAPE", "false");
        if !enabled.eq_ignore_ascii_case("true") {
            return None;
        }
        let per_source = newslens_common::env_or("PRESCRAPE_NUM_ARTICLES", "10")
            .parse()
            .unwrap_or(10);
        let mins: u64 = newslens_common::env_or("PRESCRAPE_INTERVAL_MINS", "30")
            .parse()
            .unwrap_or(30);
        Some(Self {
            per_source,
            interval: Duration::from_secs(mins * 60),
        })
    }
}

pub async fn run(pipeline: Pipeline, config: PrescrapeConfig) {
    info!(
        per_source = config.per_source,
        interval_secs = config.interval.as_secs(),
        "Pre-scrape loop started"
    );
    loop {
        if let Err(e) = prescrape_once(&pipeline, config.per_source).await {
            error!(error = %e, "Pre-scrape pass failed");
        }
        tokio::time::sleep(config.interval).await;
    }
}

async fn prescrape_once(pipeline: &Pipeline, per_source: usize) -> newslens_common::error::Result<()> {
    let latest = pipeline.scraper().latest(per_source).await?;
    let urls = latest.straitstimes.into_iter().chain(latest.cna);

    for url in urls {
        // Synchronous so one slow article does not pile up concurrent work.
        match pipeline.process_url(&url, false).await {
            Ok(_) => info!(url = %url, "Pre-scraped article"),
            Err(e) => warn!(url = %url, error = %e, "Pre-scrape failed for article"),
        }
    }
    Ok(())
}
