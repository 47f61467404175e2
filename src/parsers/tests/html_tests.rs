use crate::parsers::html::{count_matches, first_item_link, item_links, region_hrefs};

const CATALOG: &str = r#"<html><body>
    <div class="product-box"><a class="link-load" href="/p/1">One</a><a href="/ignored">x</a></div>
    <div class="product-box"><a class="link-load" href="/p/2">Two</a></div>
    <div class="product-box"><span>no link</span></div>
    <div class="product-box"><a class="link-load" href="https://viglaceratiles.vn/p/3">Three</a></div>
</body></html>"#;

#[test]
fn test_item_links_with_link_selector() {
    let links = item_links(CATALOG, ".product-box", Some("a.link-load"), None);
    assert_eq!(links, vec!["/p/1", "/p/2", "https://viglaceratiles.vn/p/3"]);
}

#[test]
fn test_item_is_anchor() {
    let html = r#"<div><a class="block group cursor-pointer" href="/san-pham/a">A</a>
        <a class="block group cursor-pointer" href="/san-pham/b">B</a>
        <a class="other" href="/tin-tuc">News</a></div>"#;
    let links = item_links(html, "a.block.group.cursor-pointer", None, None);
    assert_eq!(links, vec!["/san-pham/a", "/san-pham/b"]);
}

#[test]
fn test_item_limit_applies_before_mapping() {
    // The limit counts items, including the one without a link
    let links = item_links(CATALOG, ".product-box", Some("a.link-load"), Some(3));
    assert_eq!(links, vec!["/p/1", "/p/2"]);
}

#[test]
fn test_invalid_selector_yields_nothing() {
    assert!(item_links(CATALOG, "div[", None, None).is_empty());
    assert!(item_links(CATALOG, ".product-box", Some("a["), None).is_empty());
    assert_eq!(count_matches(CATALOG, "div["), 0);
}

#[test]
fn test_first_item_link_skips_items_without_links() {
    let html = r#"<div class="card"></div><div class="card"><a href="/p/9">9</a></div>"#;
    assert_eq!(first_item_link(html, ".card", Some("a")), Some("/p/9".to_string()));
    assert_eq!(first_item_link("<p></p>", ".card", Some("a")), None);
}

#[test]
fn test_region_hrefs() {
    let html = r#"<nav class="menu">
        <a href="/c/gach">Gạch</a>
        <ul><li><a href="/c/ngoi">Ngói</a></li></ul>
    </nav>
    <a class="see-more" href="/c/aac">Xem thêm</a>"#;
    let hrefs = region_hrefs(html, &[".menu".to_string(), "a.see-more".to_string()]);
    assert_eq!(hrefs, vec!["/c/gach", "/c/ngoi", "/c/aac"]);
}
