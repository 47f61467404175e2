//! Product pages of viglacera-aac.vn

use crate::parsers::fields;
use crate::parsers::html::{image_sources, parse_selector, select_text};
use crate::parsers::text::{element_text, split_pair};
use crate::parsers::RecordExtractor;
use crate::results::ProductRecord;
use scraper::{ElementRef, Html};

/// Header rows of the technical table start with one of these labels
const HEADER_LABELS: [&str; 3] = ["chỉ tiêu", "thông số", "đơn vị"];

/// Headings introducing the description list
const INFO_HEADINGS: [&str; 2] = ["THÔNG TIN", "TÍNH NĂNG"];

pub struct AacExtractor;

impl RecordExtractor for AacExtractor {
    fn extract(&self, html: &str, url: &str) -> Option<ProductRecord> {
        let doc = Html::parse_document(html);

        let name = select_text(&doc, "h1[itemprop='name']");
        if name.is_none() {
            ::log::debug!("No AAC product name on {}", url);
        }
        let brand = select_text(&doc, ".pro-brand a");
        let product_type = select_text(&doc, ".pro-type a");
        let images = gallery(&doc);

        let mut record = ProductRecord::new();
        record.set_text(fields::URL, url);
        record.set_text(
            fields::PRODUCT_NAME,
            name.unwrap_or_else(|| fields::MISSING.to_string()),
        );
        record.set_text(fields::BRAND, brand.unwrap_or_else(|| fields::MISSING.to_string()));
        record.set_text(
            fields::PRODUCT_TYPE,
            product_type.unwrap_or_else(|| fields::MISSING.to_string()),
        );
        record.set_text(
            fields::MAIN_IMAGE,
            images.first().cloned().unwrap_or_else(|| fields::MISSING.to_string()),
        );
        record.set_list(fields::IMAGES, images);

        for (key, value) in description(&doc) {
            record.set_text(key, value);
        }
        for (key, value) in spec_table(&doc) {
            record.set_text(key, value);
        }
        Some(record)
    }
}

fn with_scheme(src: String) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else {
        src
    }
}

/// Main photo first, then slider images not already listed
fn gallery(doc: &Html) -> Vec<String> {
    let mut images: Vec<String> = image_sources(doc, "#ProductPhoto img")
        .into_iter()
        .take(1)
        .map(with_scheme)
        .collect();

    for src in image_sources(doc, "#sliderproduct img").into_iter().map(with_scheme) {
        if !images.contains(&src) {
            images.push(src);
        }
    }
    images
}

/// Rows of the first table as `key -> value`
///
/// Header rows are skipped; rows with more than two cells fold the middle
/// cells (usually the unit) into the key.
fn spec_table(doc: &Html) -> Vec<(String, String)> {
    let (Some(table_sel), Some(row_sel), Some(cell_sel)) = (
        parse_selector("table"),
        parse_selector("tr"),
        parse_selector("td, th"),
    ) else {
        return Vec::new();
    };
    let Some(table) = doc.select(&table_sel).next() else {
        return Vec::new();
    };

    let mut specs = Vec::new();
    for row in table.select(&row_sel) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();

        let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
            continue;
        };
        let lowered = first.to_lowercase();
        if HEADER_LABELS.iter().any(|label| lowered.contains(label)) {
            continue;
        }
        if cells.len() < 2 {
            continue;
        }

        let key = match cells.get(1..cells.len() - 1) {
            Some(middle) if !middle.is_empty() => format!("{} ({})", first, middle.join(" ")),
            _ => first.clone(),
        };
        specs.push((key, last.clone()));
    }
    specs
}

/// List following an information heading, or the tab content list as fallback
fn description_list<'a>(doc: &'a Html) -> Option<ElementRef<'a>> {
    let heading_sel = parse_selector("h2")?;
    let list_sel = parse_selector("ul")?;

    for heading in doc.select(&heading_sel) {
        let title = element_text(heading).to_uppercase();
        if !INFO_HEADINGS.iter().any(|h| title.contains(h)) {
            continue;
        }
        let sibling = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|e| matches!(e.value().name(), "ul" | "div"));
        let list = sibling.and_then(|e| {
            if e.value().name() == "div" {
                e.select(&list_sel).next()
            } else {
                Some(e)
            }
        });
        if list.is_some() {
            return list;
        }
    }

    let content_sel = parse_selector("div.pro-tabcontent")?;
    doc.select(&content_sel)
        .next()
        .and_then(|content| content.select(&list_sel).next())
}

/// Description bullets; `key: value` lines become fields, others are numbered
fn description(doc: &Html) -> Vec<(String, String)> {
    let (Some(list), Some(item_sel)) = (description_list(doc), parse_selector("li")) else {
        return Vec::new();
    };

    list.select(&item_sel)
        .enumerate()
        .map(|(i, li)| {
            let text = element_text(li);
            split_pair(&text)
                .unwrap_or_else(|| (format!("{} {}", fields::INFO_PREFIX, i + 1), text))
        })
        .collect()
}
