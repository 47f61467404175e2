use crate::browser::BrowserDriver;
use crate::config::{NavigateOptions, Timings};
use crate::discovery::RunContext;
use crate::error::{BrowserError, DiscoveryError};
use crate::utils::normalize_link;
use url::Url;

/// Paginate a catalog whose "next" control is a real link
///
/// The destination is read from the control and visited directly. A page with
/// no items, a page beyond the first with no new links (after the configured
/// re-checks) or a control without destination ends the catalog.
pub async fn run<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
    options: &NavigateOptions,
) -> Result<(), DiscoveryError> {
    let timings = ctx.timings();
    let mut page: u32 = 1;

    loop {
        if !wait_for_items(driver, &ctx.source.item_selector, &timings).await? {
            ctx.progress
                .status(format!("No products on page {}, catalog finished", page));
            break;
        }

        // Trigger lazily loaded items of this page
        driver.scroll_to_bottom().await?;
        tokio::time::sleep(timings.settle()).await;

        let html = driver.source().await?;
        let mut added = ctx.collect(&html, None);

        if added == 0 && page > 1 {
            for attempt in 1..=options.empty_page_rechecks {
                ::log::debug!("Page {} gave no new links, re-check {}", page, attempt);
                tokio::time::sleep(timings.settle()).await;
                let html = driver.source().await?;
                added = ctx.collect(&html, None);
                if added > 0 {
                    break;
                }
            }
        }

        ctx.progress.status(format!(
            "Page {}: {} new links ({} total)",
            page,
            added,
            ctx.urls.len()
        ));

        if added == 0 && page > 1 {
            ctx.progress
                .status(format!("No new links on page {}, catalog finished", page));
            break;
        }
        if page >= options.max_pages {
            ctx.progress
                .status(format!("Reached the limit of {} pages", options.max_pages));
            break;
        }

        let current = driver.current_url().await?;
        let next = driver
            .attribute(&options.next_selector, &options.next_attribute)
            .await?;
        let Some(next) = next.and_then(|href| next_destination(&current, &ctx.origin, &href)) else {
            ctx.progress.status("No next page link, catalog finished");
            break;
        };
        if Url::parse(&current).is_ok_and(|mut here| {
            here.set_fragment(None);
            here == next
        }) {
            ::log::debug!("Next link points back to {}, stopping", current);
            break;
        }

        driver.goto(next.as_str()).await?;
        page += 1;
    }

    Ok(())
}

/// Resolve the next-page href against the current page, falling back to the origin
fn next_destination(current: &str, origin: &Url, href: &str) -> Option<Url> {
    match Url::parse(current) {
        Ok(base) => normalize_link(&base, href),
        Err(_) => normalize_link(origin, href),
    }
}

/// Poll for at least one catalog item, bounded by the item wait
async fn wait_for_items<D: BrowserDriver>(
    driver: &mut D,
    item_selector: &str,
    timings: &Timings,
) -> Result<bool, BrowserError> {
    let interval = timings.poll_interval().as_millis().max(1);
    let polls = (timings.item_wait().as_millis() / interval).max(1);
    for _ in 0..polls {
        if driver.exists(item_selector).await? {
            return Ok(true);
        }
        tokio::time::sleep(timings.poll_interval()).await;
    }
    Ok(false)
}
