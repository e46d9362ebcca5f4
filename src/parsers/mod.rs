pub mod bestbuy;
pub mod newegg;
pub mod walmart;

pub use bestbuy::BestBuyParser;
pub use newegg::NeweggParser;
pub use walmart::WalmartParser;

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::product::ProductInfo;

/// Retailer-specific extraction capabilities. One implementation per site,
/// composed with the shared check cycle via [`parser_for`] rather than
/// inheritance.
pub trait RetailerParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Extract zero or more candidate records from a search-result listing.
    /// Missing DOM structure yields fewer (or no) candidates, never an error.
    fn extract_candidates(&self, doc: &Html) -> Vec<ProductInfo>;

    /// Extract a single record from a dedicated product page, or `None` when
    /// the expected structure is absent. The caller back-fills `url`.
    fn extract_product(&self, doc: &Html) -> Option<ProductInfo>;

    /// Stock determination for one listing entry.
    fn is_in_stock(&self, item: &ElementRef<'_>) -> bool;

    /// Sponsored/ad entries are dropped before they become candidates.
    fn is_sponsored(&self, _item: &ElementRef<'_>) -> bool {
        false
    }
}

/// Map a config name onto a retailer parser.
pub fn parser_for(name: &str) -> Result<Box<dyn RetailerParser>> {
    match name.to_lowercase().as_str() {
        "newegg" => Ok(Box::new(NeweggParser::new())),
        "bestbuy" => Ok(Box::new(BestBuyParser::new())),
        "walmart" => Ok(Box::new(WalmartParser::new())),
        other => Err(AppError::UnknownRetailer(other.to_string())),
    }
}

/// Parse a selector known valid at compile time.
pub(crate) fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must parse")
}

/// Whitespace-normalized text content of an element.
pub(crate) fn text_of(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Configured keyword/URL suppression rules. History-based suppression is
/// layered on top by the check cycle.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    keywords: Vec<String>,
    urls: Vec<String>,
}

impl IgnoreRules {
    pub fn new(keywords: Vec<String>, urls: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            urls,
        }
    }

    /// True when the title contains any configured keyword (case-insensitive
    /// substring) or the URL is explicitly ignored.
    pub fn matches(&self, product: &ProductInfo) -> bool {
        let title = product.title.to_lowercase();
        for keyword in &self.keywords {
            if title.contains(keyword) {
                tracing::debug!("Title contains ignore keyword {}", keyword);
                return true;
            }
        }
        if self.urls.iter().any(|u| u == &product.url) {
            tracing::debug!("Product URL in ignore list");
            return true;
        }
        false
    }
}
