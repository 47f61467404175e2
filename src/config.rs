use crate::filter::LinkFilterConfig;
use crate::parsers::SiteId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Fixed waits applied while a page renders
///
/// All values are milliseconds. They stand in for readiness events the
/// remote sites never expose, so every one of them is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Pause after the first navigation to the entry URL
    #[serde(default = "default_initial_load_ms")]
    pub initial_load_ms: u64,

    /// Pause after a scroll, click or navigation before the page is read
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Backoff between two polls of the same condition
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound when waiting for catalog items to appear
    #[serde(default = "default_item_wait_ms")]
    pub item_wait_ms: u64,
}

impl Timings {
    pub fn initial_load(&self) -> Duration {
        Duration::from_millis(self.initial_load_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn item_wait(&self) -> Duration {
        Duration::from_millis(self.item_wait_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            initial_load_ms: default_initial_load_ms(),
            settle_ms: default_settle_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            item_wait_ms: default_item_wait_ms(),
        }
    }
}

/// Options for infinite-scroll catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollOptions {
    /// Consecutive unchanged height readings required before stopping
    #[serde(default = "default_stable_rounds")]
    pub stable_rounds: u32,

    /// Hard cap on scroll attempts
    #[serde(default = "default_max_scrolls")]
    pub max_scrolls: u32,

    /// Keep only the first N items of the final snapshot
    #[serde(default)]
    pub item_limit: Option<usize>,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            stable_rounds: default_stable_rounds(),
            max_scrolls: default_max_scrolls(),
            item_limit: None,
        }
    }
}

/// Options for catalogs paginated by clicking a control that re-renders in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOptions {
    /// Selector of the "next page" control
    pub next_selector: String,

    /// Hard cap on pages read, the first page included
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Polls spent waiting for the first item to change after a click
    #[serde(default = "default_first_item_retries")]
    pub first_item_retries: u32,

    /// Extra settle+read attempts before accepting a page with no new links
    #[serde(default)]
    pub empty_page_rechecks: u32,
}

impl ClickOptions {
    pub fn new(next_selector: &str) -> Self {
        Self {
            next_selector: next_selector.to_string(),
            max_pages: default_max_pages(),
            first_item_retries: default_first_item_retries(),
            empty_page_rechecks: 0,
        }
    }
}

/// Options for catalogs whose "next page" control is a real hyperlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateOptions {
    /// Selector of the "next page" link
    pub next_selector: String,

    /// Attribute holding the destination of the next page
    #[serde(default = "default_next_attribute")]
    pub next_attribute: String,

    /// Hard cap on pages read
    #[serde(default = "default_navigate_max_pages")]
    pub max_pages: u32,

    /// Extra settle+read attempts before accepting a page with no new links
    #[serde(default = "default_navigate_rechecks")]
    pub empty_page_rechecks: u32,
}

impl NavigateOptions {
    pub fn new(next_selector: &str) -> Self {
        Self {
            next_selector: next_selector.to_string(),
            next_attribute: default_next_attribute(),
            max_pages: default_navigate_max_pages(),
            empty_page_rechecks: default_navigate_rechecks(),
        }
    }
}

/// Promotional slider on a hub page that can be read without visiting its category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselOptions {
    /// Presence of this element enables the fast path
    pub container_selector: String,

    /// Product anchors inside the slider
    pub item_selector: String,

    /// Control that advances the slider
    pub next_selector: String,

    /// Hard cap on clicks of the slider control
    #[serde(default = "default_max_clicks")]
    pub max_clicks: u32,

    /// Category URL whose products the slider already lists
    #[serde(default)]
    pub covers: Option<String>,
}

/// How each category found on a hub page is paginated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryPagination {
    Click(ClickOptions),
    Navigate(NavigateOptions),
}

/// Options for hub pages listing several sub-catalogs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutOptions {
    /// Regions of the hub page holding category links (anchors or their containers)
    pub category_selectors: Vec<String>,

    /// Regex patterns on the entry URL path marking it as a hub
    #[serde(default)]
    pub hub_patterns: Vec<String>,

    /// Entry URLs with at most this many path segments are hubs
    #[serde(default)]
    pub hub_max_depth: Option<usize>,

    /// Which candidate links count as categories
    #[serde(default)]
    pub category_filter: LinkFilterConfig,

    #[serde(default)]
    pub carousel: Option<CarouselOptions>,

    pub per_category: CategoryPagination,
}

/// Pagination protocol used by a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Scroll(ScrollOptions),
    ClickPagination(ClickOptions),
    NavigationPagination(NavigateOptions),
    CategoryFanout(FanoutOptions),
}

impl Strategy {
    /// Short label used in progress messages
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Scroll(_) => "infinite scroll",
            Strategy::ClickPagination(_) => "click pagination",
            Strategy::NavigationPagination(_) => "navigation pagination",
            Strategy::CategoryFanout(_) => "category fan-out",
        }
    }
}

/// A configured target catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSource {
    /// Human readable name, also used for the output file name
    pub name: String,

    /// Which record extractor handles this site's product pages
    pub site: SiteId,

    /// Catalog page discovery starts from
    pub entry_url: String,

    /// Selector of one catalog item
    pub item_selector: String,

    /// Selector of the anchor inside an item; `None` when the item is the anchor
    #[serde(default)]
    pub link_selector: Option<String>,

    pub strategy: Strategy,

    #[serde(default)]
    pub timings: Timings,
}

impl CatalogSource {
    /// Scheme and host of the entry URL, used to absolutize relative links
    pub fn origin(&self) -> Result<Url, url::ParseError> {
        let entry = Url::parse(&self.entry_url)?;
        let mut origin = entry.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        Ok(origin)
    }
}

/// Top level configuration: WebDriver settings, fetcher limits and sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Maximum number of concurrent detail requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Timeout of a single detail request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "presets")]
    pub sources: Vec<CatalogSource>,
}

impl HarvestConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Find a source by exact name, falling back to a case-insensitive prefix match
    ///
    /// A blank name matches nothing.
    pub fn source(&self, name: &str) -> Option<&CatalogSource> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.sources.iter().find(|s| s.name == name).or_else(|| {
            let wanted = name.to_lowercase();
            self.sources
                .iter()
                .find(|s| s.name.to_lowercase().starts_with(&wanted))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            sources: presets(),
        }
    }
}

/// Built-in catalog sources
pub fn presets() -> Vec<CatalogSource> {
    vec![
        CatalogSource {
            name: "viglacera-tiles-gach-op-lat".to_string(),
            site: SiteId::ViglaceraTiles,
            entry_url: "https://viglaceratiles.vn/san-pham/gach-op-lat.html".to_string(),
            item_selector: ".product-box".to_string(),
            link_selector: Some("a.link-load".to_string()),
            strategy: Strategy::Scroll(ScrollOptions::default()),
            timings: Timings::default(),
        },
        CatalogSource {
            name: "viglacera-tiles-ngoi-lop".to_string(),
            site: SiteId::ViglaceraTiles,
            entry_url: "https://viglaceratiles.vn/san-pham/ngoi-lop.html".to_string(),
            item_selector: ".product-box-tiles".to_string(),
            link_selector: Some("a.link-load".to_string()),
            strategy: Strategy::Scroll(ScrollOptions::default()),
            timings: Timings::default(),
        },
        CatalogSource {
            name: "viglacera-aac".to_string(),
            site: SiteId::ViglaceraAac,
            entry_url: "https://viglacera-aac.vn/collections/tat-ca-san-pham".to_string(),
            item_selector: ".product-title".to_string(),
            link_selector: Some("a".to_string()),
            strategy: Strategy::NavigationPagination(NavigateOptions::new(
                "#pagination a.next, .pagination a[rel=next]",
            )),
            timings: Timings::default(),
        },
        CatalogSource {
            name: "vthm-group".to_string(),
            site: SiteId::Vthm,
            entry_url: "https://vthmgroup.vn/san-pham".to_string(),
            item_selector: "a.block.group.cursor-pointer".to_string(),
            link_selector: None,
            strategy: Strategy::CategoryFanout(FanoutOptions {
                category_selectors: vec!["nav a[href*='/san-pham/']".to_string()],
                hub_patterns: vec![r"^/san-pham/?$".to_string()],
                hub_max_depth: Some(1),
                category_filter: LinkFilterConfig::default(),
                carousel: None,
                per_category: CategoryPagination::Click(ClickOptions::new(
                    "button[aria-label='Next page']",
                )),
            }),
            timings: Timings::default(),
        },
    ]
}

fn default_initial_load_ms() -> u64 {
    2000
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_item_wait_ms() -> u64 {
    10_000
}

fn default_stable_rounds() -> u32 {
    1
}

fn default_max_scrolls() -> u32 {
    200
}

fn default_max_pages() -> u32 {
    50
}

fn default_first_item_retries() -> u32 {
    10
}

fn default_next_attribute() -> String {
    "href".to_string()
}

fn default_navigate_max_pages() -> u32 {
    200
}

fn default_navigate_rechecks() -> u32 {
    1
}

fn default_max_clicks() -> u32 {
    20
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    10
}
