use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::{sel, text_of, RetailerParser};
use crate::product::ProductInfo;

/// Newegg search listings render results as `item-cell` tiles inside a
/// `list-wrap` container; sponsored tiles carry an ads link.
pub struct NeweggParser {
    result_container: Selector,
    search_result: Selector,
    ad_box: Selector,
    item_info: Selector,
    item_title: Selector,
    button_area: Selector,
    button: Selector,
    product_title: Selector,
    product_price: Selector,
    product_buy_button: Selector,
}

impl NeweggParser {
    pub fn new() -> Self {
        Self {
            result_container: sel("div.list-wrap"),
            search_result: sel("div.item-cell"),
            ad_box: sel("a.txt-ads-box"),
            item_info: sel("div.item-info"),
            item_title: sel("a.item-title"),
            button_area: sel("div.item-button-area"),
            button: sel("button"),
            product_title: sel("h1.product-title"),
            product_price: sel("li.price-current strong"),
            product_buy_button: sel("div.product-buy button"),
        }
    }

    fn title_and_url(&self, item: &ElementRef<'_>) -> Option<(String, String)> {
        let info_box = item.select(&self.item_info).next()?;
        let link = info_box.select(&self.item_title).next()?;
        let url = link.value().attr("href")?.to_string();
        Some((text_of(&link), url))
    }

    fn candidate_from_item(&self, item: &ElementRef<'_>) -> Option<ProductInfo> {
        let (title, url) = match self.title_and_url(item) {
            Some(pair) => pair,
            None => {
                warn!("Search result missing title link, dropping entry");
                return None;
            }
        };
        Some(ProductInfo::new(title, url, self.is_in_stock(item)))
    }
}

impl Default for NeweggParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RetailerParser for NeweggParser {
    fn name(&self) -> &'static str {
        "newegg"
    }

    fn extract_candidates(&self, doc: &Html) -> Vec<ProductInfo> {
        let container = match doc.select(&self.result_container).next() {
            Some(container) => container,
            None => {
                warn!("No result container found on search page");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for item in container.select(&self.search_result) {
            if self.is_sponsored(&item) {
                info!("Skipping ad in search results");
                continue;
            }
            if let Some(product) = self.candidate_from_item(&item) {
                results.push(product);
            }
        }
        results
    }

    fn extract_product(&self, doc: &Html) -> Option<ProductInfo> {
        let title = match doc.select(&self.product_title).next() {
            Some(el) => text_of(&el),
            None => {
                warn!("Failed to find product title on product page");
                return None;
            }
        };

        let in_stock = doc
            .select(&self.product_buy_button)
            .next()
            .map(|btn| text_of(&btn).to_lowercase() == "add to cart")
            .unwrap_or(false);

        // URL is back-filled by the caller from the requested page.
        let mut product = ProductInfo::new(title, String::new(), in_stock);
        product.price = doc.select(&self.product_price).next().map(|el| text_of(&el));
        Some(product)
    }

    fn is_in_stock(&self, item: &ElementRef<'_>) -> bool {
        let button = item
            .select(&self.button_area)
            .next()
            .and_then(|area| area.select(&self.button).next());
        let Some(button) = button else {
            return false;
        };
        let text = text_of(&button);
        debug!("Button Text: {}", text);
        text.to_lowercase() == "add to cart"
    }

    fn is_sponsored(&self, item: &ElementRef<'_>) -> bool {
        item.select(&self.ad_box).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_page(items: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="list-wrap">{}</div></body></html>"#,
            items
        ))
    }

    fn item_cell(title: &str, url: &str, button: &str) -> String {
        format!(
            r#"<div class="item-cell">
                <div class="item-info">
                    <a class="item-title" href="{url}">{title}</a>
                </div>
                <div class="item-button-area"><button>{button}</button></div>
            </div>"#
        )
    }

    #[test]
    fn test_extract_candidates() {
        let doc = search_page(&format!(
            "{}{}",
            item_cell("EVGA RTX 3080", "https://newegg.com/p/1", "Add to cart"),
            item_cell("MSI RTX 3090", "https://newegg.com/p/2", "Auto Notify"),
        ));

        let parser = NeweggParser::new();
        let candidates = parser.extract_candidates(&doc);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "EVGA RTX 3080");
        assert_eq!(candidates[0].url, "https://newegg.com/p/1");
        assert!(candidates[0].in_stock);
        assert!(!candidates[1].in_stock);
    }

    #[test]
    fn test_sponsored_entries_skipped() {
        let ad = r#"<div class="item-cell">
            <a class="txt-ads-box" href="https://ads.example.com">ad</a>
            <div class="item-info"><a class="item-title" href="https://newegg.com/ad">Sponsored</a></div>
        </div>"#;
        let doc = search_page(&format!(
            "{}{}",
            ad,
            item_cell("EVGA RTX 3080", "https://newegg.com/p/1", "Add to cart"),
        ));

        let candidates = NeweggParser::new().extract_candidates(&doc);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "EVGA RTX 3080");
    }

    #[test]
    fn test_missing_container_yields_no_candidates() {
        let doc = Html::parse_document("<html><body><p>maintenance page</p></body></html>");
        assert!(NeweggParser::new().extract_candidates(&doc).is_empty());
    }

    #[test]
    fn test_item_without_title_link_dropped() {
        let broken = r#"<div class="item-cell"><div class="item-info"></div></div>"#;
        let doc = search_page(&format!(
            "{}{}",
            broken,
            item_cell("EVGA RTX 3080", "https://newegg.com/p/1", "Add to cart"),
        ));

        let candidates = NeweggParser::new().extract_candidates(&doc);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_missing_button_means_out_of_stock() {
        let no_button = r#"<div class="item-cell">
            <div class="item-info"><a class="item-title" href="https://newegg.com/p/3">Card</a></div>
            <div class="item-button-area"></div>
        </div>"#;
        let doc = search_page(no_button);

        let candidates = NeweggParser::new().extract_candidates(&doc);
        assert_eq!(candidates.len(), 1);
        assert!(!candidates[0].in_stock);
    }

    #[test]
    fn test_extract_product_page() {
        let doc = Html::parse_document(
            r#"<html><body>
                <h1 class="product-title">EVGA RTX 3080 FTW3</h1>
                <ul><li class="price-current"><strong>$869.99</strong></li></ul>
                <div class="product-buy"><button>Add To Cart</button></div>
            </body></html>"#,
        );

        let product = NeweggParser::new().extract_product(&doc).unwrap();
        assert_eq!(product.title, "EVGA RTX 3080 FTW3");
        assert_eq!(product.price.as_deref(), Some("$869.99"));
        assert!(product.in_stock);
        assert!(product.url.is_empty());
    }

    #[test]
    fn test_extract_product_page_without_title() {
        let doc = Html::parse_document("<html><body><p>error</p></body></html>");
        assert!(NeweggParser::new().extract_product(&doc).is_none());
    }
}
