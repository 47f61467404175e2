use crate::browser::BrowserDriver;
use crate::config::ScrollOptions;
use crate::discovery::RunContext;
use crate::error::DiscoveryError;
use crate::parsers::html::count_matches;

/// Scroll until the page height settles, then read the final snapshot once
pub async fn run<D: BrowserDriver>(
    driver: &mut D,
    ctx: &mut RunContext<'_>,
    options: &ScrollOptions,
) -> Result<(), DiscoveryError> {
    ctx.progress.status("Scrolling to load every item...");

    let settle = ctx.timings().settle();
    let required = options.stable_rounds.max(1);
    let mut last_height = driver.scroll_height().await?;
    let mut unchanged = 0;
    let mut scrolls = 0;

    while scrolls < options.max_scrolls {
        driver.scroll_to_bottom().await?;
        tokio::time::sleep(settle).await;
        scrolls += 1;

        let height = driver.scroll_height().await?;
        ::log::debug!("Scroll {}: height {} -> {}", scrolls, last_height, height);

        if height == last_height {
            unchanged += 1;
            if unchanged >= required {
                break;
            }
        } else {
            unchanged = 0;
            last_height = height;
        }
    }

    if unchanged < required {
        ::log::warn!(
            "Page height still growing after {} scrolls, reading what loaded",
            scrolls
        );
    }

    let html = driver.source().await?;
    let items = count_matches(&html, &ctx.source.item_selector);
    let added = ctx.collect(&html, options.item_limit);

    ctx.progress.status(format!(
        "Found {} product cards, {} links after filtering",
        items, added
    ));
    Ok(())
}
