// Re-export modules
pub mod browser;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod parsers;
pub mod progress;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CatalogSource, HarvestConfig, Strategy};
pub use discovery::Discovery;
pub use progress::{Progress, ProgressEvent};
pub use results::{ProductRecord, ProductUrlSet};

use browser::WebDriverConnector;
use std::error::Error;
use std::time::Duration;

/// Everything one harvest produced
#[derive(Debug)]
pub struct HarvestReport {
    pub urls: ProductUrlSet,
    pub records: Vec<ProductRecord>,
    /// Why discovery ended early or could not start, if it did
    pub discovery_error: Option<String>,
}

/// Main builder: discovers a catalog's product links, then fetches each product
pub struct Harvest {
    source: CatalogSource,
    webdriver_url: String,
    headless: bool,
    max_concurrency: usize,
    request_timeout: Duration,
    progress: Progress,
}

impl Harvest {
    /// Create a new builder for the given catalog with default settings
    pub fn new(source: CatalogSource) -> Self {
        Self::from_config(&HarvestConfig::default(), source)
    }

    /// Create a builder taking WebDriver and fetcher settings from `config`
    pub fn from_config(config: &HarvestConfig, source: CatalogSource) -> Self {
        Self {
            source,
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
            max_concurrency: config.max_concurrency,
            request_timeout: config.request_timeout(),
            progress: Progress::silent(),
        }
    }

    /// Set the maximum number of concurrent detail requests
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.webdriver_url = webdriver_url.to_string();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the timeout of a single detail request
    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.request_timeout = Duration::from_secs(timeout_seconds);
        self
    }

    /// Send progress events to this handle
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Run link discovery only
    pub async fn discover(&self) -> Discovery {
        let mut webdriver_url = self.webdriver_url.clone();

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(from_env) = std::env::var("WEBDRIVER_URL") {
            if !from_env.is_empty() {
                webdriver_url = from_env;
            }
        }

        let connector = WebDriverConnector::new(&webdriver_url, self.headless);
        discovery::discover(&connector, &self.source, &self.progress).await
    }

    /// Fetch and extract every product page of `urls`
    pub async fn fetch(&self, urls: &ProductUrlSet) -> Result<Vec<ProductRecord>, Box<dyn Error>> {
        let client = fetcher::build_http_client(self.request_timeout)?;
        let fetcher = fetcher::DetailFetcher::new(client, self.max_concurrency);
        self.progress.status(format!(
            "Fetching {} product pages ({} at a time)...",
            urls.len(),
            self.max_concurrency
        ));
        Ok(fetcher
            .fetch_all(urls, self.source.site.extractor(), &self.progress)
            .await)
    }

    /// Discover the catalog, then fetch every product found
    pub async fn run(self) -> Result<HarvestReport, Box<dyn Error>> {
        let discovery = self.discover().await;

        let records = if discovery.urls.is_empty() {
            self.progress.status("No product links found");
            Vec::new()
        } else {
            self.fetch(&discovery.urls).await?
        };

        Ok(HarvestReport {
            urls: discovery.urls,
            records,
            discovery_error: discovery.error,
        })
    }
}
