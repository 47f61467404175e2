use crate::parsers::text::element_text;
use scraper::{ElementRef, Html, Selector};

/// Parse a CSS selector, logging and returning `None` when it is invalid
pub fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            ::log::warn!("Invalid selector {:?}: {}", selector, e);
            None
        }
    }
}

/// Raw link of one catalog item
///
/// With no link selector the item element itself is the anchor.
fn item_href(item: ElementRef<'_>, link_selector: Option<&Selector>) -> Option<String> {
    let anchor = match link_selector {
        Some(selector) => item.select(selector).next()?,
        None => item,
    };
    anchor
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// Extracts the raw href of every catalog item in a markup snapshot
///
/// `limit` keeps only the first N items before they are mapped to links.
pub fn item_links(
    html: &str,
    item_selector: &str,
    link_selector: Option<&str>,
    limit: Option<usize>,
) -> Vec<String> {
    let Some(items) = parse_selector(item_selector) else {
        return Vec::new();
    };
    let link = match link_selector {
        Some(s) => match parse_selector(s) {
            Some(parsed) => Some(parsed),
            None => return Vec::new(),
        },
        None => None,
    };

    let doc = Html::parse_document(html);
    let links: Vec<String> = doc
        .select(&items)
        .take(limit.unwrap_or(usize::MAX))
        .filter_map(|item| item_href(item, link.as_ref()))
        .collect();

    ::log::debug!("Found {} item links", links.len());
    links
}

/// Raw href of the first catalog item, used to detect that a page changed
pub fn first_item_link(html: &str, item_selector: &str, link_selector: Option<&str>) -> Option<String> {
    let items = parse_selector(item_selector)?;
    let link = match link_selector {
        Some(s) => Some(parse_selector(s)?),
        None => None,
    };

    let doc = Html::parse_document(html);
    doc.select(&items)
        .find_map(|item| item_href(item, link.as_ref()))
}

/// Number of elements matching a selector
pub fn count_matches(html: &str, selector: &str) -> usize {
    let Some(selector) = parse_selector(selector) else {
        return 0;
    };
    Html::parse_document(html).select(&selector).count()
}

/// Every href inside the given page regions
///
/// A region that is itself an anchor contributes its own href, otherwise the
/// anchors it contains are used.
pub fn region_hrefs(html: &str, region_selectors: &[String]) -> Vec<String> {
    let Some(anchor) = parse_selector("a[href]") else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    let mut hrefs = Vec::new();

    for region in region_selectors.iter().filter_map(|s| parse_selector(s)) {
        for element in doc.select(&region) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
                continue;
            }
            hrefs.extend(
                element
                    .select(&anchor)
                    .filter_map(|a| a.value().attr("href"))
                    .map(str::to_string),
            );
        }
    }

    hrefs
}

/// Text of the first element matching `selector`
pub fn select_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = parse_selector(selector)?;
    doc.select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Attribute of the first element matching `selector`
pub fn select_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = parse_selector(selector)?;
    doc.select(&selector)
        .find_map(|e| e.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Image sources of every `img` matching `selector`, lazy-load attributes included
pub fn image_sources(doc: &Html, selector: &str) -> Vec<String> {
    let Some(selector) = parse_selector(selector) else {
        return Vec::new();
    };
    doc.select(&selector)
        .filter_map(|img| {
            let value = img.value();
            value
                .attr("src")
                .filter(|src| !src.trim().is_empty() && !src.starts_with("data:"))
                .or_else(|| value.attr("data-src"))
        })
        .map(|src| src.trim().to_string())
        .collect()
}
