//! Traits and interfaces for site-agnostic tyre scraping

use anyhow::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Selector};
use tracing::warn;

use crate::config::TyreQuery;
use crate::models::Tyre;

/// Read-only view of a parsed markup fragment.
///
/// The extraction layer only depends on this capability set, never on a concrete
/// HTML parser's types. Elements are located with CSS selector strings.
pub trait MarkupFragment: Sized {
    /// Every attribute on the fragment's root element, in document order.
    fn attributes(&self) -> Vec<(String, String)>;

    fn attr(&self, name: &str) -> Option<String>;

    /// Descendants (root excluded) matching `selector`, in document order.
    /// An unparseable selector matches nothing.
    fn find_all(&self, selector: &str) -> Vec<Self>;

    fn find(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }

    /// Text content of the fragment. With `strip`, each text node is trimmed and empty
    /// ones are dropped before joining with `separator`.
    fn text_content(&self, separator: &str, strip: bool) -> String;
}

impl MarkupFragment for ElementRef<'_> {
    fn attributes(&self) -> Vec<(String, String)> {
        self.value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(selector) => self
                .select(&selector)
                .filter(|el| el.id() != self.id())
                .collect(),
            Err(e) => {
                warn!("Failed to parse selector '{}': {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn text_content(&self, separator: &str, strip: bool) -> String {
        if strip {
            self.text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect::<Vec<_>>()
                .join(separator)
        } else {
            self.text().collect::<Vec<_>>().join(separator)
        }
    }
}

/// CSS selectors for the parts of a listing that carry raw fields
#[derive(Debug, Clone)]
pub struct SiteLayout {
    /// Container for one product listing
    pub listing: String,
    /// Prefix marking listing attributes that carry raw fields
    pub attribute_prefix: String,
    /// Nested block holding the human-readable listing details
    pub result: String,
    /// Pattern/name label within the result block
    pub pattern: String,
    /// Text blocks scanned for size, load index and speed rating
    pub text_block: String,
    /// Highlighted value inside a labelled text block
    pub highlight: String,
    /// Feature icons whose `title` lists fitment features
    pub fitment_icon: String,
    /// Free-text details block
    pub details: String,
}

impl SiteLayout {
    /// Markup used by national.co.uk search result pages.
    pub fn national() -> Self {
        Self {
            listing: "div.tyreDisplay".to_string(),
            attribute_prefix: "data-".to_string(),
            result: "div.tyreresult".to_string(),
            pattern: "a.pattern_link".to_string(),
            text_block: "p".to_string(),
            highlight: "span.red".to_string(),
            fitment_icon: "img.fitment".to_string(),
            details: "div.details".to_string(),
        }
    }

    /// Fails on the first selector that does not parse.
    pub fn check_selectors(&self) -> Result<()> {
        let selectors = [
            ("listing", &self.listing),
            ("result", &self.result),
            ("pattern", &self.pattern),
            ("text block", &self.text_block),
            ("highlight", &self.highlight),
            ("fitment icon", &self.fitment_icon),
            ("details", &self.details),
        ];
        for (name, selector) in selectors {
            Selector::parse(selector)
                .map_err(|e| anyhow::anyhow!("Failed to parse {} selector: {:?}", name, e))?;
        }
        Ok(())
    }
}

/// Configuration for a tyre website scraper
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Identifier stored on every tyre scraped from this site
    pub website: String,
    /// Search URL pattern with {width}, {aspect_ratio} and {rim_size} placeholders
    pub search_url_pattern: String,
    pub layout: SiteLayout,
}

/// Trait for website-specific tyre scrapers
#[async_trait]
pub trait TyreScraper: Send + Sync {
    fn config(&self) -> &ScraperConfig;

    /// Fetch and parse the search results for one tyre size.
    ///
    /// # Returns
    /// * `Result<Vec<Tyre>>` - Every listing that passed validation, in page order
    async fn scrape_tyres(&self, query: &TyreQuery) -> Result<Vec<Tyre>>;

    fn build_search_url(&self, query: &TyreQuery) -> String {
        self.config()
            .search_url_pattern
            .replace("{width}", &query.width.to_string())
            .replace("{aspect_ratio}", &query.aspect_ratio.to_string())
            .replace("{rim_size}", &query.rim_size.to_string())
    }
}
