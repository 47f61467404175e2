use super::mock::{LateFrame, MockDriver, MockPage, catalog, products, refs, source, url};
use crate::config::{NavigateOptions, Strategy};
use crate::discovery::discover_with;
use crate::progress::Progress;

fn navigate_source() -> crate::config::CatalogSource {
    source(
        "/c",
        Strategy::NavigationPagination(NavigateOptions::new("a.next")),
    )
}

#[tokio::test(start_paused = true)]
async fn test_follows_next_links_until_the_last_page() {
    let driver = MockDriver::new()
        .page(
            &url("/c"),
            MockPage::single(catalog(&refs(&products(1, 3)), Some("/c?page=2"))),
        )
        .page(
            &url("/c?page=2"),
            MockPage::single(catalog(&refs(&products(4, 6)), Some("?page=3"))),
        )
        .page(
            &url("/c?page=3"),
            MockPage::single(catalog(&refs(&products(7, 8)), None)),
        );
    let log = driver.log();

    let discovery = discover_with(driver, &navigate_source(), &Progress::silent()).await;

    assert_eq!(discovery.urls.len(), 8);
    assert_eq!(
        log.lock().unwrap().visits,
        vec![url("/c"), url("/c?page=2"), url("/c?page=3")]
    );
    assert!(discovery.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_next_control_without_destination_keeps_links() {
    let driver = MockDriver::new()
        .page(
            &url("/c"),
            MockPage::single(catalog(&refs(&products(1, 3)), Some("/c?page=2"))),
        )
        .page(
            &url("/c?page=2"),
            MockPage::single(catalog(&refs(&products(4, 5)), Some(""))),
        );

    let discovery = discover_with(driver, &navigate_source(), &Progress::silent()).await;

    assert_eq!(discovery.urls.len(), 5);
    assert!(discovery.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_rechecks_an_empty_page_once_before_stopping() {
    let driver = MockDriver::new()
        .page(
            &url("/c"),
            MockPage::single(catalog(&refs(&products(1, 3)), Some("/c?page=2"))),
        )
        .page(
            &url("/c?page=2"),
            MockPage::single(catalog(&refs(&products(1, 3)), Some("/c?page=3"))),
        )
        .page(
            &url("/c?page=3"),
            MockPage::single(catalog(&refs(&products(4, 6)), None)),
        );
    let log = driver.log();

    let discovery = discover_with(driver, &navigate_source(), &Progress::silent()).await;

    let log = log.lock().unwrap();
    assert_eq!(discovery.urls.len(), 3);
    assert!(!log.visits.contains(&url("/c?page=3")));
    // One read per page plus the re-check of page 2
    assert_eq!(log.sources, 3);
}

#[tokio::test(start_paused = true)]
async fn test_page_without_items_ends_the_catalog() {
    let driver = MockDriver::new().page(
        &url("/c"),
        MockPage::single("<html><body><p>Chưa có sản phẩm</p></body></html>".to_string()),
    );
    let log = driver.log();

    let discovery = discover_with(driver, &navigate_source(), &Progress::silent()).await;

    assert!(discovery.urls.is_empty());
    assert!(discovery.error.is_none());
    assert_eq!(log.lock().unwrap().sources, 0);
}

#[tokio::test(start_paused = true)]
async fn test_next_link_to_same_page_stops() {
    let driver = MockDriver::new().page(
        &url("/c"),
        MockPage::single(catalog(&refs(&products(1, 2)), Some("/c#top"))),
    );
    let log = driver.log();

    let discovery = discover_with(driver, &navigate_source(), &Progress::silent()).await;

    assert_eq!(discovery.urls.len(), 2);
    assert_eq!(log.lock().unwrap().visits, vec![url("/c")]);
}

#[tokio::test(start_paused = true)]
async fn test_recheck_picks_up_a_slow_page() {
    let slow_page = MockPage {
        late_frame: Some(LateFrame {
            frame: 0,
            after_reads: 1,
            html: catalog(&refs(&products(4, 6)), Some("/c?page=3")),
        }),
        ..MockPage::single(catalog(&refs(&products(1, 3)), Some("/c?page=3")))
    };
    let driver = MockDriver::new()
        .page(
            &url("/c"),
            MockPage::single(catalog(&refs(&products(1, 3)), Some("/c?page=2"))),
        )
        .page(&url("/c?page=2"), slow_page)
        .page(
            &url("/c?page=3"),
            MockPage::single(catalog(&refs(&products(7, 7)), None)),
        );
    let log = driver.log();

    let discovery = discover_with(driver, &navigate_source(), &Progress::silent()).await;

    let log = log.lock().unwrap();
    assert_eq!(discovery.urls.len(), 7);
    assert!(discovery.urls.contains(&url("/p/6")));
    assert_eq!(log.visits.last(), Some(&url("/c?page=3")));
    assert_eq!(log.sources, 4);
}

#[tokio::test(start_paused = true)]
async fn test_page_cap_is_a_hard_stop() {
    let mut driver = MockDriver::new();
    for page in 1..=5 {
        let next = format!("/c?page={}", page + 1);
        driver = driver.page(
            &url(&format!("/c?page={}", page)),
            MockPage::single(catalog(&refs(&products(page, page)), Some(next.as_str()))),
        );
    }
    let log = driver.log();
    let options = NavigateOptions {
        max_pages: 3,
        ..NavigateOptions::new("a.next")
    };
    let source = source("/c?page=1", Strategy::NavigationPagination(options));

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    assert_eq!(discovery.urls.len(), 3);
    assert_eq!(log.lock().unwrap().visits.len(), 3);
    assert!(!discovery.urls.contains(&url("/p/4")));
}
