use scraper::Html;
use tracing::{error, info, instrument};

use crate::config::RetailerConfig;
use crate::error::Result;
use crate::fetch::PageSource;
use crate::parsers::{IgnoreRules, RetailerParser};
use crate::product::ProductInfo;
use crate::service::NotificationService;

/// Drives one retailer through a check cycle: fetch each configured page,
/// parse candidates, filter, and notify in-stock survivors.
pub struct StockChecker {
    retailer: String,
    search_pages: Vec<String>,
    product_pages: Vec<String>,
    rules: IgnoreRules,
    parser: Box<dyn RetailerParser>,
    pages: Box<dyn PageSource>,
    service: NotificationService,
}

impl StockChecker {
    pub fn new(
        config: &RetailerConfig,
        parser: Box<dyn RetailerParser>,
        pages: Box<dyn PageSource>,
        service: NotificationService,
    ) -> Self {
        Self {
            retailer: config.name.clone(),
            search_pages: config.links.search_pages.clone(),
            product_pages: config.links.product_pages.clone(),
            rules: IgnoreRules::new(
                config.ignore_title_keywords.clone(),
                config.ignore_urls.clone(),
            ),
            parser,
            pages,
            service,
        }
    }

    /// A product is suppressed when it matches the configured ignore rules
    /// or its URL has already triggered a notification.
    pub fn is_ignored(&self, product: &ProductInfo) -> bool {
        if self.rules.matches(product) {
            return true;
        }
        if self.service.has_been_notified(&product.url) {
            tracing::debug!("Already sent notification for this product");
            return true;
        }
        false
    }

    /// One full cycle over every configured page. A failed fetch or an
    /// unparseable page is logged and skipped; the cycle always completes.
    #[instrument(skip(self), fields(retailer = %self.retailer))]
    pub async fn run_check_cycle(&mut self) -> Result<()> {
        info!("Checking stock for {}", self.retailer);

        let mut records = self.check_search_pages().await;
        records.extend(self.check_product_pages().await);

        for record in records {
            if !record.in_stock {
                continue;
            }
            info!("In stock: {}", record);
            let message = record.notification_message();
            if let Err(e) = self.service.send(&message, &record.url).await {
                error!("Failed to record notification for {}: {}", record.url, e);
            }
        }
        Ok(())
    }

    /// Fetch and parse every configured search page, in list order.
    async fn check_search_pages(&self) -> Vec<ProductInfo> {
        let mut results = Vec::new();
        for url in &self.search_pages {
            let body = match self.pages.fetch(url).await {
                Ok(body) => body,
                Err(e) => {
                    error!("Failed to fetch search page {}: {}", url, e);
                    continue;
                }
            };
            let doc = Html::parse_document(&body);
            let candidates = self.parser.extract_candidates(&doc);
            info!("Found {} candidate(s) on {}", candidates.len(), url);
            results.extend(candidates.into_iter().filter(|c| !self.is_ignored(c)));
        }
        results
    }

    /// Fetch and parse every configured product page, back-filling each
    /// record's URL from the requested page.
    async fn check_product_pages(&self) -> Vec<ProductInfo> {
        let mut results = Vec::new();
        for url in &self.product_pages {
            let body = match self.pages.fetch(url).await {
                Ok(body) => body,
                Err(e) => {
                    error!("Failed to fetch product page {}: {}", url, e);
                    continue;
                }
            };
            let doc = Html::parse_document(&body);
            let Some(mut product) = self.parser.extract_product(&doc) else {
                error!("No product record parsed from {}", url);
                continue;
            };
            product.url = url.clone();
            if !self.is_ignored(&product) {
                results.push(product);
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, PageLinks};
    use crate::error::AppError;
    use crate::fetch::MockPageSource;
    use crate::history::MockNotificationHistory;
    use crate::notify::agent::MockNotificationAgent;
    use crate::parsers::NeweggParser;
    use mockall::predicate::eq;

    fn newegg_listing(title: &str, url: &str, button: &str) -> String {
        format!(
            r#"<html><body><div class="list-wrap">
                <div class="item-cell">
                    <div class="item-info"><a class="item-title" href="{url}">{title}</a></div>
                    <div class="item-button-area"><button>{button}</button></div>
                </div>
            </div></body></html>"#
        )
    }

    fn config(search_pages: Vec<String>, keywords: Vec<String>, urls: Vec<String>) -> RetailerConfig {
        RetailerConfig {
            name: "newegg".to_string(),
            links: PageLinks {
                search_pages,
                product_pages: vec![],
            },
            ignore_title_keywords: keywords,
            ignore_urls: urls,
            notification_agents: vec![AgentConfig {
                name: "discord".to_string(),
                webhook: Some("https://discord.com/api/webhooks/1/a".to_string()),
            }],
        }
    }

    fn fresh_history() -> Box<MockNotificationHistory> {
        let mut history = MockNotificationHistory::new();
        history.expect_has_been_notified().return_const(false);
        history.expect_add_history().returning(|_| Ok(()));
        Box::new(history)
    }

    fn agent_expecting(times: usize) -> Box<MockNotificationAgent> {
        let mut agent = MockNotificationAgent::new();
        agent.expect_name().return_const("mock".to_string());
        agent.expect_send().times(times).returning(|_| Ok(()));
        Box::new(agent)
    }

    fn service_with(history: Box<MockNotificationHistory>, agent: Box<MockNotificationAgent>) -> NotificationService {
        let mut service = NotificationService::new(history);
        service.register_agent(agent);
        service
    }

    #[tokio::test]
    async fn test_in_stock_candidate_notifies() {
        let mut pages = MockPageSource::new();
        pages
            .expect_fetch()
            .with(eq("https://newegg.com/search"))
            .returning(|_| Ok(newegg_listing("RTX 3080", "https://newegg.com/p/1", "Add to cart")));

        let mut agent = MockNotificationAgent::new();
        agent.expect_name().return_const("mock".to_string());
        agent
            .expect_send()
            .with(eq("**Instock Alert**\nRTX 3080\nhttps://newegg.com/p/1"))
            .times(1)
            .returning(|_| Ok(()));

        let config = config(vec!["https://newegg.com/search".to_string()], vec![], vec![]);
        let mut checker = StockChecker::new(
            &config,
            Box::new(NeweggParser::new()),
            Box::new(pages),
            service_with(fresh_history(), Box::new(agent)),
        );

        checker.run_check_cycle().await.unwrap();
    }

    #[tokio::test]
    async fn test_out_of_stock_never_notifies() {
        let mut pages = MockPageSource::new();
        pages
            .expect_fetch()
            .returning(|_| Ok(newegg_listing("RTX 3080", "https://newegg.com/p/1", "Auto Notify")));

        let config = config(vec!["https://newegg.com/search".to_string()], vec![], vec![]);
        let mut checker = StockChecker::new(
            &config,
            Box::new(NeweggParser::new()),
            Box::new(pages),
            service_with(fresh_history(), agent_expecting(0)),
        );

        checker.run_check_cycle().await.unwrap();
    }

    #[tokio::test]
    async fn test_ignored_keyword_never_notifies() {
        let mut pages = MockPageSource::new();
        pages.expect_fetch().returning(|_| {
            Ok(newegg_listing(
                "RTX 3080 Gladiator Edition",
                "https://newegg.com/p/1",
                "Add to cart",
            ))
        });

        let config = config(
            vec!["https://newegg.com/search".to_string()],
            vec!["gladiator".to_string()],
            vec![],
        );
        let mut checker = StockChecker::new(
            &config,
            Box::new(NeweggParser::new()),
            Box::new(pages),
            service_with(fresh_history(), agent_expecting(0)),
        );

        checker.run_check_cycle().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_failure_continues_with_remaining_urls() {
        let mut pages = MockPageSource::new();
        pages
            .expect_fetch()
            .with(eq("https://newegg.com/down"))
            .returning(|_| Err(AppError::Config("connection refused".into())));
        pages
            .expect_fetch()
            .with(eq("https://newegg.com/up"))
            .returning(|_| Ok(newegg_listing("RTX 3080", "https://newegg.com/p/1", "Add to cart")));

        let config = config(
            vec![
                "https://newegg.com/down".to_string(),
                "https://newegg.com/up".to_string(),
            ],
            vec![],
            vec![],
        );
        let mut checker = StockChecker::new(
            &config,
            Box::new(NeweggParser::new()),
            Box::new(pages),
            service_with(fresh_history(), agent_expecting(1)),
        );

        // The failed first page must not abort the cycle.
        checker.run_check_cycle().await.unwrap();
    }

    #[tokio::test]
    async fn test_is_ignored_reflects_history() {
        let mut history = MockNotificationHistory::new();
        history
            .expect_has_been_notified()
            .with(eq("https://x.com/a"))
            .return_const(true);
        history
            .expect_has_been_notified()
            .with(eq("https://x.com/b"))
            .return_const(false);

        let config = config(vec![], vec![], vec![]);
        let checker = StockChecker::new(
            &config,
            Box::new(NeweggParser::new()),
            Box::new(MockPageSource::new()),
            NotificationService::new(Box::new(history)),
        );

        assert!(checker.is_ignored(&ProductInfo::new("Widget", "https://x.com/a", true)));
        assert!(!checker.is_ignored(&ProductInfo::new("Widget", "https://x.com/b", true)));
    }

    #[tokio::test]
    async fn test_product_page_url_backfilled() {
        let product_page = r#"<html><body>
            <h1 class="product-title">RTX 3080 FTW3</h1>
            <div class="product-buy"><button>Add to cart</button></div>
        </body></html>"#;

        let mut pages = MockPageSource::new();
        pages
            .expect_fetch()
            .with(eq("https://newegg.com/p/42"))
            .returning(move |_| Ok(product_page.to_string()));

        let mut agent = MockNotificationAgent::new();
        agent.expect_name().return_const("mock".to_string());
        agent
            .expect_send()
            .with(eq("**Instock Alert**\nRTX 3080 FTW3\nhttps://newegg.com/p/42"))
            .times(1)
            .returning(|_| Ok(()));

        let config = RetailerConfig {
            name: "newegg".to_string(),
            links: PageLinks {
                search_pages: vec![],
                product_pages: vec!["https://newegg.com/p/42".to_string()],
            },
            ignore_title_keywords: vec![],
            ignore_urls: vec![],
            notification_agents: vec![],
        };
        let mut checker = StockChecker::new(
            &config,
            Box::new(NeweggParser::new()),
            Box::new(pages),
            service_with(fresh_history(), Box::new(agent)),
        );

        checker.run_check_cycle().await.unwrap();
    }
}
