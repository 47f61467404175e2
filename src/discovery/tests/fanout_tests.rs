use super::mock::{MockDriver, MockPage, catalog, clickable, products, refs, source, url};
use crate::config::{
    CarouselOptions, CategoryPagination, ClickOptions, FanoutOptions, Strategy,
};
use crate::browser::BrowserDriver;
use crate::discovery::fanout::read_carousel;
use crate::discovery::{RunContext, discover_with};
use crate::filter::LinkFilterConfig;
use crate::progress::{Progress, ProgressEvent};

const MENU: &str = r#"<nav class="menu">
    <a href="/san-pham/a">A</a>
    <a href="/san-pham/b">B</a>
    <a href="/san-pham/c">C</a>
    <a href="/san-pham/a#top">A again</a>
    <a href="https://facebook.com/shop">Facebook</a>
</nav>"#;

fn fanout_options(carousel: Option<CarouselOptions>) -> FanoutOptions {
    FanoutOptions {
        category_selectors: vec![".menu".to_string()],
        hub_patterns: Vec::new(),
        hub_max_depth: Some(1),
        category_filter: LinkFilterConfig::default(),
        carousel,
        per_category: CategoryPagination::Click(ClickOptions::new("button.next")),
    }
}

fn hub(extra: &str) -> String {
    format!("<html><body>{}{}</body></html>", MENU, extra)
}

fn statuses(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let ProgressEvent::Status(message) = event {
            out.push(message);
        }
    }
    out
}

fn categories() -> MockDriver {
    MockDriver::new()
        .page(
            &url("/san-pham/a"),
            MockPage::new(vec![
                clickable(&refs(&products(1, 2))),
                clickable(&refs(&products(3, 4))),
            ]),
        )
        .page(
            &url("/san-pham/b"),
            MockPage {
                fail_click_at: Some(1),
                ..MockPage::new(vec![
                    clickable(&refs(&products(5, 6))),
                    clickable(&refs(&products(7, 8))),
                ])
            },
        )
        .page(
            &url("/san-pham/c"),
            MockPage::single(catalog(&refs(&products(9, 10)), None)),
        )
}

#[tokio::test(start_paused = true)]
async fn test_failing_category_does_not_stop_the_others() {
    let driver = categories().page(&url("/san-pham"), MockPage::single(hub("")));
    let log = driver.log();
    let source = source("/san-pham", Strategy::CategoryFanout(fanout_options(None)));
    let (progress, mut rx) = Progress::channel();

    let discovery = discover_with(driver, &source, &progress).await;

    for path in ["/p/1", "/p/2", "/p/3", "/p/4", "/p/9", "/p/10"] {
        assert!(discovery.urls.contains(&url(path)), "missing {}", path);
    }
    // Links read from B before it failed are kept
    assert!(discovery.urls.contains(&url("/p/5")));
    assert!(!discovery.urls.contains(&url("/p/7")));
    assert!(discovery.error.is_none());

    let log = log.lock().unwrap();
    assert_eq!(
        log.visits,
        vec![
            url("/san-pham"),
            url("/san-pham/a"),
            url("/san-pham/b"),
            url("/san-pham/c"),
        ]
    );
    assert!(log.quit);
    assert!(
        statuses(&mut rx)
            .iter()
            .any(|s| s.contains("/san-pham/b") && s.contains("failed"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_category_is_skipped() {
    let driver = categories()
        .page(
            &url("/san-pham"),
            MockPage::single(hub(r#"<a class="more" href="/san-pham/d">D</a>"#)),
        )
        .page(
            &url("/san-pham/d"),
            MockPage {
                fail_goto: true,
                ..MockPage::default()
            },
        );
    let mut options = fanout_options(None);
    options.category_selectors.push("a.more".to_string());
    let source = source("/san-pham", Strategy::CategoryFanout(options));

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    assert!(discovery.urls.contains(&url("/p/10")));
    assert!(discovery.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_leaf_entry_is_paginated_directly() {
    let driver = categories();
    let log = driver.log();
    let source = source("/san-pham/a", Strategy::CategoryFanout(fanout_options(None)));

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    assert_eq!(discovery.urls.len(), 4);
    assert_eq!(log.lock().unwrap().visits, vec![url("/san-pham/a")]);
}

#[tokio::test(start_paused = true)]
async fn test_slider_shortcut_covers_its_category() {
    let slider = |links: &[&str]| {
        let slides: String = links
            .iter()
            .map(|l| format!(r#"<a class="slide" href="{}">x</a>"#, l))
            .collect();
        hub(&format!(
            r#"<div class="slider">{}<button class="slide-next">›</button></div>"#,
            slides
        ))
    };
    let hub_page = MockPage::new(vec![
        slider(&["/p/100", "/p/101"]),
        slider(&["/p/102", "/p/103"]),
        slider(&["/p/100", "/p/101"]),
    ]);
    let driver = categories().page(&url("/san-pham"), hub_page);
    let log = driver.log();
    let carousel = CarouselOptions {
        container_selector: ".slider".to_string(),
        item_selector: ".slider a.slide".to_string(),
        next_selector: ".slide-next".to_string(),
        max_clicks: 10,
        covers: Some("/san-pham/a".to_string()),
    };
    let source = source(
        "/san-pham",
        Strategy::CategoryFanout(fanout_options(Some(carousel))),
    );

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    for path in ["/p/100", "/p/101", "/p/102", "/p/103", "/p/9"] {
        assert!(discovery.urls.contains(&url(path)), "missing {}", path);
    }
    let log = log.lock().unwrap();
    assert!(!log.visits.contains(&url("/san-pham/a")));
    assert_eq!(
        log.clicks.iter().filter(|c| c.as_str() == ".slide-next").count(),
        2
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_slider_is_not_an_error() {
    let driver = categories().page(&url("/san-pham"), MockPage::single(hub("")));
    let carousel = CarouselOptions {
        container_selector: ".slider".to_string(),
        item_selector: ".slider a".to_string(),
        next_selector: ".slide-next".to_string(),
        max_clicks: 10,
        covers: Some("/san-pham/a".to_string()),
    };
    let source = source(
        "/san-pham",
        Strategy::CategoryFanout(fanout_options(Some(carousel))),
    );

    let discovery = discover_with(driver, &source, &Progress::silent()).await;

    assert!(discovery.urls.contains(&url("/p/1")));
    assert!(discovery.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_slider_reports_only_the_links_it_added() {
    let hub_page = hub(
        r#"<div class="slider">
            <a class="slide" href="/p/1">x</a>
            <a class="slide" href="/p/200">y</a>
        </div>"#,
    );
    let mut driver = MockDriver::new().page(&url("/san-pham"), MockPage::single(hub_page));
    driver.goto(&url("/san-pham")).await.unwrap();

    let carousel = CarouselOptions {
        container_selector: ".slider".to_string(),
        item_selector: ".slider a.slide".to_string(),
        next_selector: ".slide-next".to_string(),
        max_clicks: 10,
        covers: Some("/san-pham/a".to_string()),
    };
    let source = source("/san-pham", Strategy::CategoryFanout(fanout_options(None)));
    let (progress, mut rx) = Progress::channel();
    let mut ctx = RunContext::new(&source, source.origin().unwrap(), &progress);
    for path in ["/p/1", "/p/2", "/p/3"] {
        ctx.urls.insert(&::url::Url::parse(&url(path)).unwrap());
    }

    let covered = read_carousel(&mut driver, &mut ctx, &carousel).await.unwrap();

    assert_eq!(covered, Some(url("/san-pham/a")));
    assert_eq!(ctx.urls.len(), 4);
    assert!(statuses(&mut rx).contains(&"Slider gave 1 new links".to_string()));
}
