use crate::browser::BrowserDriver;
use crate::config::{CarouselOptions, CategoryPagination, FanoutOptions};
use crate::discovery::{RunContext, click, navigate};
use crate::error::DiscoveryError;
use crate::filter::{HubMatcher, LinkFilter};
use crate::parsers::html::region_hrefs;
use std::collections::HashSet;
use url::Url;

/// Collect categories from a hub page and paginate each one
///
/// A leaf entry URL is paginated directly. A failing category is reported and
/// skipped; the others still contribute their links.
pub async fn run<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
    options: &FanoutOptions,
) -> Result<(), DiscoveryError> {
    let entry = Url::parse(&ctx.source.entry_url)
        .map_err(|e| DiscoveryError::Config(format!("entry URL: {}", e)))?;
    let hubs = HubMatcher::new(&options.hub_patterns, options.hub_max_depth)
        .map_err(|e| DiscoveryError::Config(format!("hub pattern: {}", e)))?;

    if !hubs.is_hub(&entry) {
        ctx.progress
            .status("Entry page is a single category, paginating it directly");
        return paginate(driver, ctx, &options.per_category).await;
    }

    let filter = LinkFilter::new(options.category_filter.clone(), ctx.origin.clone())
        .map_err(|e| DiscoveryError::Config(format!("category filter: {}", e)))?;
    let html = driver.source().await?;
    let categories = category_urls(ctx, &html, options, &filter, &entry);
    ctx.progress
        .status(format!("Found {} categories", categories.len()));

    let mut covered: HashSet<String> = HashSet::new();
    if let Some(carousel) = &options.carousel {
        match read_carousel(driver, ctx, carousel).await {
            Ok(Some(category)) => {
                covered.insert(category);
            }
            Ok(None) => {}
            Err(e) => {
                ::log::warn!("Slider shortcut failed: {}", e);
                ctx.progress
                    .status(format!("Slider shortcut failed ({}), crawling every category", e));
            }
        }
    }

    let total = categories.len();
    for (index, category) in categories.iter().enumerate() {
        if covered.contains(category.as_str()) {
            ::log::debug!("Skipping {}, already read from the slider", category);
            continue;
        }

        ctx.progress
            .status(format!("Category {}/{}: {}", index + 1, total, category));
        let before = ctx.urls.len();

        match paginate_category(driver, ctx, category, &options.per_category).await {
            Ok(()) => {
                ctx.progress.status(format!(
                    "{} new links from {}",
                    ctx.urls.len() - before,
                    category
                ));
            }
            Err(e) => {
                ::log::warn!("Category {} failed: {}", category, e);
                ctx.progress
                    .status(format!("Category {} failed: {}, moving on", category, e));
            }
        }
    }

    Ok(())
}

/// Category links of the hub page, deduplicated in page order
fn category_urls(
    ctx: &RunContext<'_>,
    html: &str,
    options: &FanoutOptions,
    filter: &LinkFilter,
    entry: &Url,
) -> Vec<Url> {
    let mut seen = HashSet::new();
    region_hrefs(html, &options.category_selectors)
        .iter()
        .filter_map(|href| ctx.resolve(href))
        .filter(|url| url != entry && filter.accepts(url))
        .filter(|url| seen.insert(url.to_string()))
        .collect()
}

async fn paginate_category<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
    category: &Url,
    pagination: &CategoryPagination,
) -> Result<(), DiscoveryError> {
    driver.goto(category.as_str()).await?;
    tokio::time::sleep(ctx.timings().settle()).await;
    paginate(driver, ctx, pagination).await
}

async fn paginate<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
    pagination: &CategoryPagination,
) -> Result<(), DiscoveryError> {
    match pagination {
        CategoryPagination::Click(options) => click::run(driver, ctx, options).await,
        CategoryPagination::Navigate(options) => navigate::run(driver, ctx, options).await,
    }
}

/// Read a promotional slider on the hub page by clicking through it
///
/// Returns the category URL the slider stands in for. A missing slider is not
/// an error.
pub(super) async fn read_carousel<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
    carousel: &CarouselOptions,
) -> Result<Option<String>, DiscoveryError> {
    if !driver.exists(&carousel.container_selector).await? {
        ::log::debug!("No slider matching {}", carousel.container_selector);
        return Ok(None);
    }

    ctx.progress.status("Reading products from the slider...");
    let settle = ctx.timings().settle();
    let mut clicks = 0;
    let mut gathered = 0;

    loop {
        let hrefs = driver
            .visible_attributes(&carousel.item_selector, "href")
            .await?;
        let resolved: Vec<Url> = hrefs.iter().filter_map(|href| ctx.resolve(href)).collect();
        let added = ctx.urls.extend(&resolved);
        gathered += added;
        ::log::debug!("Slider step {}: {} new links", clicks, added);

        // A step with nothing new means the slider wrapped around
        if clicks > 0 && added == 0 {
            break;
        }
        if clicks >= carousel.max_clicks {
            break;
        }
        if !driver.click(&carousel.next_selector).await? {
            break;
        }
        tokio::time::sleep(settle).await;
        clicks += 1;
    }

    ctx.progress
        .status(format!("Slider gave {} new links", gathered));
    Ok(carousel
        .covers
        .as_deref()
        .and_then(|covers| ctx.resolve(covers))
        .map(String::from))
}
