use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{sel, text_of, RetailerParser};
use crate::product::ProductInfo;

/// Walmart is monitored through dedicated product pages; its search listings
/// are rendered client-side and yield nothing useful from a plain GET.
pub struct WalmartParser {
    product_title: Selector,
    add_to_cart: Selector,
}

impl WalmartParser {
    pub fn new() -> Self {
        Self {
            product_title: sel("h1.prod-ProductTitle"),
            add_to_cart: sel(r#"button[data-tl-id="ProductPrimaryCTA-cta_add_to_cart_button"]"#),
        }
    }

    fn in_stock_product_page(&self, doc: &Html) -> bool {
        if doc.select(&self.add_to_cart).next().is_none() {
            debug!("No add to cart button on product page");
            return false;
        }
        true
    }
}

impl Default for WalmartParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RetailerParser for WalmartParser {
    fn name(&self) -> &'static str {
        "walmart"
    }

    fn extract_candidates(&self, _doc: &Html) -> Vec<ProductInfo> {
        debug!("Walmart search pages are not supported, no candidates");
        Vec::new()
    }

    fn extract_product(&self, doc: &Html) -> Option<ProductInfo> {
        let title = match doc.select(&self.product_title).next() {
            Some(el) => text_of(&el),
            None => {
                warn!("Failed to find product title box");
                return None;
            }
        };
        // URL is back-filled by the caller from the requested page.
        Some(ProductInfo::new(
            title,
            String::new(),
            self.in_stock_product_page(doc),
        ))
    }

    fn is_in_stock(&self, _item: &ElementRef<'_>) -> bool {
        false
    }
}
