use super::mock::{MockDriver, MockPage, catalog, products, refs, source, url};
use crate::config::{ScrollOptions, Strategy};
use crate::discovery::discover_with;
use crate::progress::Progress;

fn scroll_page(heights: Vec<u64>, links: &[String]) -> MockPage {
    MockPage {
        heights,
        ..MockPage::single(catalog(&refs(links), None))
    }
}

#[tokio::test(start_paused = true)]
async fn test_stops_when_height_repeats_and_reads_once() {
    let driver = MockDriver::new().page(
        &url("/gach"),
        scroll_page(vec![100, 200, 200], &products(1, 4)),
    );
    let log = driver.log();
    let source = source("/gach", Strategy::Scroll(ScrollOptions::default()));

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    let log = log.lock().unwrap();
    assert_eq!(log.scrolls, 2);
    assert_eq!(log.sources, 1);
    assert!(log.quit);
    assert_eq!(discovery.urls.len(), 4);
    assert!(discovery.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stricter_variant_waits_for_two_equal_readings() {
    let driver = MockDriver::new().page(
        &url("/gach"),
        scroll_page(vec![100, 200, 200, 200, 300], &products(1, 2)),
    );
    let log = driver.log();
    let options = ScrollOptions {
        stable_rounds: 2,
        ..ScrollOptions::default()
    };
    let source = source("/gach", Strategy::Scroll(options));

    discover_with(driver, &source, &Progress::silent()).await;

    assert_eq!(log.lock().unwrap().scrolls, 3);
}

#[tokio::test(start_paused = true)]
async fn test_scroll_cap_bounds_an_endless_page() {
    let heights: Vec<u64> = (1..=100).map(|h| h * 100).collect();
    let driver = MockDriver::new().page(&url("/gach"), scroll_page(heights, &products(1, 3)));
    let log = driver.log();
    let options = ScrollOptions {
        max_scrolls: 5,
        ..ScrollOptions::default()
    };
    let source = source("/gach", Strategy::Scroll(options));

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    let log = log.lock().unwrap();
    assert_eq!(log.scrolls, 5);
    assert_eq!(log.sources, 1);
    assert_eq!(discovery.urls.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_item_limit_slices_the_catalog() {
    let driver = MockDriver::new().page(
        &url("/gach"),
        scroll_page(vec![100, 100], &products(1, 8)),
    );
    let options = ScrollOptions {
        item_limit: Some(6),
        ..ScrollOptions::default()
    };
    let source = source("/gach", Strategy::Scroll(options));

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    assert_eq!(discovery.urls.len(), 6);
    assert!(discovery.urls.contains(&url("/p/6")));
    assert!(!discovery.urls.contains(&url("/p/7")));
}
