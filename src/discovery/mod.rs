//! Link discovery: drives one browser session through a catalog's pagination
//! and collects a deduplicated set of product URLs.

pub mod click;
pub mod fanout;
pub mod navigate;
pub mod scroll;

#[cfg(test)]
mod tests;

use crate::browser::{BrowserDriver, SessionFactory};
use crate::config::{CatalogSource, Strategy, Timings};
use crate::error::DiscoveryError;
use crate::parsers::html::{first_item_link, item_links};
use crate::progress::Progress;
use crate::results::ProductUrlSet;
use crate::utils::normalize_link;
use url::Url;

/// Outcome of one discovery run
///
/// `urls` holds every link collected before the run ended, even when `error`
/// is set.
#[derive(Debug, Default)]
pub struct Discovery {
    pub urls: ProductUrlSet,
    /// Session failure, or the error that ended pagination early
    pub error: Option<String>,
}

/// State shared by the strategies of one run
pub struct RunContext<'a> {
    pub source: &'a CatalogSource,
    pub origin: Url,
    pub urls: ProductUrlSet,
    pub progress: &'a Progress,
}

impl<'a> RunContext<'a> {
    pub fn new(source: &'a CatalogSource, origin: Url, progress: &'a Progress) -> Self {
        Self {
            source,
            origin,
            urls: ProductUrlSet::new(),
            progress,
        }
    }

    pub fn timings(&self) -> Timings {
        self.source.timings
    }

    /// Absolute form of an href found on a catalog page
    pub fn resolve(&self, href: &str) -> Option<Url> {
        normalize_link(&self.origin, href)
    }

    /// Add every item link of a snapshot, returning how many were new
    pub fn collect(&mut self, html: &str, limit: Option<usize>) -> usize {
        let resolved: Vec<Url> = item_links(
            html,
            &self.source.item_selector,
            self.source.link_selector.as_deref(),
            limit,
        )
        .iter()
        .filter_map(|href| self.resolve(href))
        .collect();
        self.urls.extend(&resolved)
    }

    /// Absolute URL of the first item of a snapshot
    pub fn first_item(&self, html: &str) -> Option<String> {
        first_item_link(
            html,
            &self.source.item_selector,
            self.source.link_selector.as_deref(),
        )
        .and_then(|href| self.resolve(&href))
        .map(String::from)
    }
}

/// Open a session and run the source's strategy to completion
///
/// Never fails: a session that cannot be opened yields an empty set and a
/// diagnostic.
pub async fn discover<F: SessionFactory>(
    factory: &F,
    source: &CatalogSource,
    progress: &Progress,
) -> Discovery {
    progress.status("Starting browser...");

    let driver = match factory.open().await {
        Ok(driver) => driver,
        Err(e) => {
            ::log::error!("Discovery for {} aborted: {}", source.name, e);
            progress.status(format!("Browser error: {}", e));
            return Discovery {
                urls: ProductUrlSet::new(),
                error: Some(e.to_string()),
            };
        }
    };

    discover_with(driver, source, progress).await
}

/// Run the source's strategy on an already opened session, then release it
pub async fn discover_with<D: BrowserDriver>(
    mut driver: D,
    source: &CatalogSource,
    progress: &Progress,
) -> Discovery {
    let origin = match source.origin() {
        Ok(origin) => origin,
        Err(e) => {
            release(driver).await;
            let message = format!("invalid entry URL {}: {}", source.entry_url, e);
            progress.status(format!("Configuration error: {}", message));
            return Discovery {
                urls: ProductUrlSet::new(),
                error: Some(message),
            };
        }
    };

    let mut ctx = RunContext::new(source, origin, progress);
    let result = run_strategy(&mut driver, &mut ctx).await;
    release(driver).await;

    let error = match result {
        Ok(()) => None,
        Err(e) => {
            ::log::warn!("Discovery for {} stopped early: {}", source.name, e);
            progress.status(format!("Stopped early: {}", e));
            Some(e.to_string())
        }
    };

    progress.status(format!("Found {} product links", ctx.urls.len()));
    Discovery {
        urls: ctx.urls,
        error,
    }
}

async fn release<D: BrowserDriver>(driver: D) {
    if let Err(e) = driver.quit().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
}

async fn run_strategy<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
) -> Result<(), DiscoveryError> {
    let source = ctx.source;

    ctx.progress.status(format!("Opening {}", source.entry_url));
    driver.goto(&source.entry_url).await?;
    tokio::time::sleep(source.timings.initial_load()).await;

    ::log::debug!("Using {} for {}", source.strategy.label(), source.name);
    match &source.strategy {
        Strategy::Scroll(options) => scroll::run(driver, ctx, options).await,
        Strategy::ClickPagination(options) => click::run(driver, ctx, options).await,
        Strategy::NavigationPagination(options) => navigate::run(driver, ctx, options).await,
        Strategy::CategoryFanout(options) => fanout::run(driver, ctx, options).await,
    }
}
