//! Site-specific extraction heuristics for the two supported Singapore
//! outlets. These are CSS-selector scrapes of known page layouts; anything
//! else goes through the readability fallback in `extract.rs`.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use scraper::{Html, Selector};

use newslens_common::ArticleData;

pub const STRAITS_BASE: &str = "https://www.straitstimes.com";
pub const CNA_BASE: &str = "https://www.channelnewsasia.com";

static ST_HEADLINE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.headline-container").expect("valid selector"));
static ST_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.paragraph-base").expect("valid selector"));
static ST_UPDATED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button.updated-timestamp").expect("valid selector"));
static ST_DATE_FALLBACK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[class="font-primary text-xs uppercase block mt-2.5"]"#)
        .expect("valid selector")
});
static ST_LATEST_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.stretched-link").expect("valid selector"));

static CNA_HEADLINE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1.h1--page-title").expect("valid selector"));
static CNA_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.text").expect("valid selector"));
static CNA_PUBLISH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.article-publish").expect("valid selector"));
static CNA_LATEST_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.list-object__heading-link").expect("valid selector"));

/// Which extraction path a URL takes, decided by its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    StraitsTimes,
    Cna,
    Other,
}

pub fn site_for(url: &url::Url) -> Site {
    let Some(host) = url.host_str() else {
        return Site::Other;
    };
    let labels: Vec<&str> = host.split('.').collect();
    if labels.contains(&"straitstimes") {
        Site::StraitsTimes
    } else if labels.contains(&"channelnewsasia") {
        Site::Cna
    } else {
        Site::Other
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: scraper::ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

pub fn extract_straits(html: &str) -> Option<ArticleData> {
    let doc = Html::parse_document(html);

    let headline = doc.select(&ST_HEADLINE).next().map(element_text)?;
    let body: String = doc
        .select(&ST_PARAGRAPH)
        .map(element_text)
        .collect::<Vec<_>>()
        .join(" ");

    let publish_date = doc
        .select(&ST_UPDATED)
        .next()
        .map(|el| element_text(el).replace("UPDATED ", ""))
        .or_else(|| doc.select(&ST_DATE_FALLBACK).next().map(element_text))
        .map(|d| squash(&d));

    Some(ArticleData {
        headline: squash(&headline),
        body: squash(&body),
        publish_date,
    })
}

pub fn extract_cna(html: &str) -> Option<ArticleData> {
    let doc = Html::parse_document(html);

    let headline = doc.select(&CNA_HEADLINE).next().map(element_text)?;
    let body: String = doc
        .select(&CNA_BODY)
        .map(element_text)
        .collect::<Vec<_>>()
        .join(" ");

    // CNA prints "25 Jan 2025 11:15AM" as the first text node; normalise to
    // ISO date, keeping the raw text when the layout shifts.
    let publish_date = doc.select(&CNA_PUBLISH).next().map(|el| {
        let raw = squash(&el.text().next().unwrap_or_default().to_string());
        match NaiveDateTime::parse_from_str(&raw, "%d %b %Y %I:%M%p") {
            Ok(dt) => dt.format("%Y-%m-%d").to_string(),
            Err(_) => raw,
        }
    });

    Some(ArticleData {
        headline: squash(&headline),
        body: squash(&body),
        publish_date,
    })
}

fn collect_links(html: &str, selector: &Selector, base: &str, limit: usize) -> Vec<String> {
    let doc = Html::parse_document(html);
    let base_url = match url::Url::parse(base) {
        Ok(u) => u,
        Err(_) => return Vec::new(),
    };

    let mut urls = Vec::new();
    for anchor in doc.select(selector) {
        if urls.len() >= limit {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Ok(absolute) = base_url.join(href) {
            urls.push(absolute.to_string());
        }
    }
    urls
}

/// Latest article links from the Straits Times landing page.
pub fn straits_latest(html: &str, limit: usize) -> Vec<String> {
    collect_links(html, &ST_LATEST_LINK, STRAITS_BASE, limit)
}

/// Latest article links from the CNA Singapore landing page.
pub fn cna_latest(html: &str, limit: usize) -> Vec<String> {
    collect_links(html, &CNA_LATEST_LINK, CNA_BASE, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRAITS_ARTICLE: &str = r#"
        <html><body>
        <div class="headline-container">PM announces
            new policy</div>
        <button class="updated-timestamp">UPDATED Jan 25, 2025</button>
        <p class="paragraph-base">First paragraph.</p>
        <p class="paragraph-base">Second
        paragraph.</p>
        </body></html>
    "#;

    const CNA_ARTICLE: &str = r#"
        <html><body>
        <h1 class="h1--page-title">Parliament passes bill</h1>
        <div class="article-publish">25 Jan 2025 11:15AM<span>(Updated: later)</span></div>
        <div class="text">Opening text.</div>
        <div class="text">Closing text.</div>
        </body></html>
    "#;

    #[test]
    fn straits_extraction() {
        let article = extract_straits(STRAITS_ARTICLE).unwrap();
        assert_eq!(article.headline, "PM announces new policy");
        assert_eq!(article.body, "First paragraph. Second paragraph.");
        assert_eq!(article.publish_date.as_deref(), Some("Jan 25, 2025"));
    }

    #[test]
    fn cna_extraction_normalises_date() {
        let article = extract_cna(CNA_ARTICLE).unwrap();
        assert_eq!(article.headline, "Parliament passes bill");
        assert_eq!(article.body, "Opening text. Closing text.");
        assert_eq!(article.publish_date.as_deref(), Some("2025-01-25"));
    }

    #[test]
    fn missing_headline_yields_none() {
        assert!(extract_straits("<html><body><p>no headline</p></body></html>").is_none());
        assert!(extract_cna("<html><body></body></html>").is_none());
    }

    #[test]
    fn latest_links_resolve_relative_hrefs_and_cap() {
        let html = r#"
            <a class="stretched-link" href="/singapore/story-1">one</a>
            <a class="stretched-link" href="https://www.straitstimes.com/singapore/story-2">two</a>
            <a class="stretched-link" href="/singapore/story-3">three</a>
        "#;
        let urls = straits_latest(html, 2);
        assert_eq!(
            urls,
            vec![
                "https://www.straitstimes.com/singapore/story-1",
                "https://www.straitstimes.com/singapore/story-2",
            ]
        );
    }

    #[test]
    fn site_dispatch_by_host() {
        let st = url::Url::parse("https://www.straitstimes.com/singapore/x").unwrap();
        let cna = url::Url::parse("https://www.channelnewsasia.com/singapore/y").unwrap();
        let other = url::Url::parse("https://example.com/z").unwrap();
        assert_eq!(site_for(&st), Site::StraitsTimes);
        assert_eq!(site_for(&cna), Site::Cna);
        assert_eq!(site_for(&other), Site::Other);
    }
}
