//! Raw record extraction: turns one listing fragment into a flat field map.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::RawRecord;
use crate::traits::{MarkupFragment, SiteLayout};

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}/\d{2} R\d{2}").expect("size pattern is valid"));

const LOAD_INDEX_LABEL: &str = "Load Index:";
const SPEED_RATING_LABEL: &str = "Speed Rating:";

/// Key for an attribute carrying the marker prefix, with the prefix removed.
/// Attributes without the prefix (or with nothing after it) are not raw fields.
pub fn strip_marker_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|key| !key.is_empty())
}

#[derive(Debug, Clone)]
pub struct RawRecordExtractor {
    layout: SiteLayout,
}

impl RawRecordExtractor {
    pub fn new(layout: SiteLayout) -> Self {
        Self { layout }
    }

    /// Raw records for every listing fragment under `root`, in document order.
    pub fn extract_all<F: MarkupFragment>(&self, root: &F) -> Vec<RawRecord> {
        root.find_all(&self.layout.listing)
            .iter()
            .map(|listing| self.extract(listing))
            .collect()
    }

    pub fn extract<F: MarkupFragment>(&self, listing: &F) -> RawRecord {
        let mut raw = RawRecord::new();

        for (name, value) in listing.attributes() {
            if let Some(key) = strip_marker_prefix(&name, &self.layout.attribute_prefix) {
                raw.insert_text(key, value);
            }
        }

        if let Some(result) = listing.find(&self.layout.result) {
            self.extract_result(&result, &mut raw);
        }

        raw.coerce_price();
        debug!("Extracted {} raw fields from listing", raw.len());
        raw
    }

    fn extract_result<F: MarkupFragment>(&self, result: &F, raw: &mut RawRecord) {
        if let Some(pattern) = result.find(&self.layout.pattern) {
            raw.insert_text("pattern", pattern.text_content("", true));
        }

        let blocks = result.find_all(&self.layout.text_block);
        self.extract_size(&blocks, raw);
        self.extract_load_speed(&blocks, raw);
        self.extract_fitment(result, raw);

        let details_text = match result.find(&self.layout.details) {
            Some(details) => details.text_content(" ", true),
            None => result.text_content(" ", true),
        };
        raw.insert_text("details_text", details_text);
    }

    fn extract_size<F: MarkupFragment>(&self, blocks: &[F], raw: &mut RawRecord) {
        if let Some(size) = blocks
            .iter()
            .map(|block| block.text_content("", true))
            .find(|text| SIZE_RE.is_match(text))
        {
            raw.insert_text("size", size);
        }
    }

    fn extract_load_speed<F: MarkupFragment>(&self, blocks: &[F], raw: &mut RawRecord) {
        for block in blocks {
            let text = block.text_content("", false);
            if text.contains(LOAD_INDEX_LABEL)
                && let Some(value) = self.highlighted_value(block)
            {
                raw.insert_text("load_index", value);
            }
            if text.contains(SPEED_RATING_LABEL)
                && let Some(value) = self.highlighted_value(block)
            {
                raw.insert_text("speed_rating", value);
            }
        }
    }

    fn highlighted_value<F: MarkupFragment>(&self, block: &F) -> Option<String> {
        block
            .find(&self.layout.highlight)
            .map(|span| span.text_content("", true))
    }

    fn extract_fitment<F: MarkupFragment>(&self, result: &F, raw: &mut RawRecord) {
        let fitments: Vec<String> = result
            .find_all(&self.layout.fitment_icon)
            .iter()
            .filter_map(|icon| icon.attr("title"))
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .collect();

        if !fitments.is_empty() {
            raw.insert_text("fitment", fitments.join(", "));
        }
    }
}
