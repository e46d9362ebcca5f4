use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{sel, text_of, RetailerParser};
use crate::product::ProductInfo;

const BASE_URL: &str = "https://bestbuy.com";

/// Best Buy search listings are an `ol.sku-item-list` of `li.sku-item`
/// entries; stock status comes from the add-to-cart button label.
pub struct BestBuyParser {
    result_list: Selector,
    result_item: Selector,
    button_box: Selector,
    button: Selector,
    header_link: Selector,
    sku_attribute: Selector,
    attribute_title: Selector,
    sku_value: Selector,
    price_box: Selector,
    price_span: Selector,
}

impl BestBuyParser {
    pub fn new() -> Self {
        Self {
            result_list: sel("ol.sku-item-list"),
            result_item: sel("li.sku-item"),
            button_box: sel("div.sku-list-item-button"),
            button: sel("button"),
            header_link: sel("h4.sku-header a"),
            sku_attribute: sel("div.sku-attribute-title"),
            attribute_title: sel("span.attribute-title"),
            sku_value: sel("span.sku-value"),
            price_box: sel("div.priceView-hero-price.priceView-customer-price"),
            price_span: sel("span"),
        }
    }

    fn title_and_url(&self, item: &ElementRef<'_>) -> Option<(String, String)> {
        let link = item.select(&self.header_link).next()?;
        let href = link.value().attr("href")?;
        Some((text_of(&link), format!("{}{}", BASE_URL, href)))
    }

    fn cart_button_text(&self, item: &ElementRef<'_>) -> Option<String> {
        let button = item
            .select(&self.button_box)
            .next()?
            .select(&self.button)
            .next()?;
        Some(text_of(&button))
    }

    fn sku_of(&self, item: &ElementRef<'_>) -> Option<String> {
        for attribute in item.select(&self.sku_attribute) {
            let Some(title) = attribute.select(&self.attribute_title).next() else {
                continue;
            };
            if text_of(&title) == "SKU:" {
                return attribute
                    .select(&self.sku_value)
                    .next()
                    .map(|v| text_of(&v));
            }
        }
        None
    }

    fn price_of(&self, item: &ElementRef<'_>) -> Option<String> {
        let price_box = item.select(&self.price_box).next()?;
        price_box.select(&self.price_span).next().map(|s| text_of(&s))
    }

    fn candidate_from_item(&self, item: &ElementRef<'_>) -> Option<ProductInfo> {
        let (title, url) = match self.title_and_url(item) {
            Some(pair) => pair,
            None => {
                warn!("Search result missing sku header link, dropping entry");
                return None;
            }
        };
        let mut product = ProductInfo::new(title, url, self.is_in_stock(item));
        product.sku = self.sku_of(item);
        product.price = self.price_of(item);
        Some(product)
    }
}

impl Default for BestBuyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RetailerParser for BestBuyParser {
    fn name(&self) -> &'static str {
        "bestbuy"
    }

    fn extract_candidates(&self, doc: &Html) -> Vec<ProductInfo> {
        let list = match doc.select(&self.result_list).next() {
            Some(list) => list,
            None => {
                warn!("No sku item list found on search page");
                return Vec::new();
            }
        };

        list.select(&self.result_item)
            .filter_map(|item| self.candidate_from_item(&item))
            .collect()
    }

    fn extract_product(&self, _doc: &Html) -> Option<ProductInfo> {
        // Best Buy product pages are only reachable through listings here;
        // direct product-page monitoring uses the listing URL instead.
        None
    }

    fn is_in_stock(&self, item: &ElementRef<'_>) -> bool {
        match self.cart_button_text(item) {
            Some(text) => {
                debug!("Button Text: {}", text);
                text.to_lowercase() != "sold out"
            }
            None => {
                warn!("Failed to find cart button, treating as out of stock");
                false
            }
        }
    }
}
