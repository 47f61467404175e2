use crate::browser::BrowserDriver;
use crate::config::ClickOptions;
use crate::discovery::RunContext;
use crate::error::{BrowserError, DiscoveryError};
use std::time::Duration;

/// Paginate a catalog whose "next" control re-renders the item list in place
///
/// Stops on the page cap, on a page beyond the first that adds no new links,
/// when the list never changes after a click, or when the control is gone.
/// Some sites keep the control enabled on the last page, so the absence of new
/// links is the terminal signal and `max_pages` the safety net.
pub async fn run<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
    options: &ClickOptions,
) -> Result<(), DiscoveryError> {
    let timings = ctx.timings();
    let mut page: u32 = 1;
    let mut previous_first: Option<String> = None;

    loop {
        let html = if page == 1 {
            driver.source().await?
        } else {
            match wait_for_fresh_page(
                driver,
                ctx,
                previous_first.as_deref(),
                options.first_item_retries,
                timings.poll_interval(),
            )
            .await?
            {
                Some(html) => html,
                None => {
                    ctx.progress
                        .status(format!("Page {} never replaced the previous items, stopping", page));
                    break;
                }
            }
        };

        previous_first = ctx.first_item(&html);
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
                .status(format!("No new links on page {}, pagination finished", page));
            break;
        }
        if page >= options.max_pages {
            ctx.progress
                .status(format!("Reached the limit of {} pages", options.max_pages));
            break;
        }
        if !driver.click(&options.next_selector).await? {
            ctx.progress.status("No next page control, pagination finished");
            break;
        }

        tokio::time::sleep(timings.settle()).await;
        page += 1;
    }

    Ok(())
}

/// Poll until the first item differs from the previous page's first item
///
/// Returns the fresh snapshot, or `None` once the retries are used up.
async fn wait_for_fresh_page<D: BrowserDriver>(
    driver: &mut D,
    ctx: &RunContext<'_>,
    previous_first: Option<&str>,
    retries: u32,
    backoff: Duration,
) -> Result<Option<String>, BrowserError> {
    for attempt in 1..=retries.max(1) {
        let html = driver.source().await?;
        let first = ctx.first_item(&html);
        if first.is_some() && first.as_deref() != previous_first {
            return Ok(Some(html));
        }
        ::log::debug!("Items not replaced yet (attempt {})", attempt);
        tokio::time::sleep(backoff).await;
    }
    Ok(None)
}
