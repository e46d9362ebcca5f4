use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized product record extracted from a single search-result entry or
/// product page. Lives only for the duration of one check cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: String,
    /// Back-filled from the requested page URL when parsed from a dedicated
    /// product page, which does not always carry its own canonical URL.
    pub url: String,
    pub in_stock: bool,
    pub price: Option<String>,
    pub sku: Option<String>,
}

impl ProductInfo {
    pub fn new(title: impl Into<String>, url: impl Into<String>, in_stock: bool) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            in_stock,
            price: None,
            sku: None,
        }
    }

    /// Message handed to the notification service for in-stock alerts.
    pub fn notification_message(&self) -> String {
        format!("**Instock Alert**\n{}\n{}", self.title, self.url)
    }
}

impl fmt::Display for ProductInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.title, self.url)
    }
}
