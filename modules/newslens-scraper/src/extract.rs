use std::time::Duration;

use dom_smoothie::{Config, Readability, TextMode};
use tracing::{debug, info};

use newslens_common::{error::Result, ArticleData, LatestArticles, NewsLensError};

use crate::sites::{self, Site};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0";

pub struct Extractor {
    http: reqwest::Client,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }

    /// Fetch a URL and extract its article content, picking the site-specific
    /// heuristic when the host is known and readability otherwise.
    pub async fn extract_article(&self, url: &str) -> Result<ArticleData> {
        let parsed = url::Url::parse(url)
            .map_err(|_| NewsLensError::Validation("Invalid URL format".to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(NewsLensError::Validation("Invalid URL format".to_string()));
        }

        let html = self.fetch(url).await?;
        let site = sites::site_for(&parsed);
        debug!(url = %url, site = ?site, "Extracting article");

        let article = match site {
            Site::StraitsTimes => sites::extract_straits(&html),
            Site::Cna => sites::extract_cna(&html),
            Site::Other => extract_readability(&html, url),
        };

        let article = article.ok_or_else(|| {
            NewsLensError::Scraping(format!("No article content found at {url}"))
        })?;

        if article.headline.is_empty() || article.body.is_empty() {
            return Err(NewsLensError::Scraping(format!(
                "Empty article content at {url}"
            )));
        }

        Ok(article)
    }

    /// Latest article URLs from both supported providers, capped per source.
    pub async fn latest_articles(&self, per_source: usize) -> Result<LatestArticles> {
        let straits_page = self
            .fetch(&format!("{}/singapore/latest", sites::STRAITS_BASE))
            .await?;
        let cna_page = self.fetch(&format!("{}/singapore", sites::CNA_BASE)).await?;

        let latest = LatestArticles {
            straitstimes: sites::straits_latest(&straits_page, per_source),
            cna: sites::cna_latest(&cna_page, per_source),
        };
        info!(
            straitstimes = latest.straitstimes.len(),
            cna = latest.cna.len(),
            "Fetched latest article listings"
        );
        Ok(latest)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NewsLensError::Scraping(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NewsLensError::Scraping(format!(
                "{url} returned status {}",
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| NewsLensError::Scraping(e.to_string()))
    }
}

/// Readability extraction for hosts without a dedicated heuristic.
fn extract_readability(html: &str, url: &str) -> Option<ArticleData> {
    let config = Config {
        text_mode: TextMode::Raw,
        ..Default::default()
    };

    let mut readability = Readability::new(html, Some(url), Some(config)).ok()?;
    let article = readability.parse().ok()?;

    Some(ArticleData {
        headline: sites::squash(&article.title),
        body: sites::squash(&article.text_content),
        publish_date: None,
    })
}
