//! Product pages of viglaceratiles.vn

use crate::parsers::fields;
use crate::parsers::html::{image_sources, parse_selector, select_text};
use crate::parsers::text::{element_text, title_case};
use crate::parsers::RecordExtractor;
use crate::results::ProductRecord;
use crate::utils::normalize_link;
use scraper::Html;
use url::Url;

pub struct TilesExtractor;

impl RecordExtractor for TilesExtractor {
    fn extract(&self, html: &str, url: &str) -> Option<ProductRecord> {
        let page = Url::parse(url).ok()?;
        let doc = Html::parse_document(html);

        let code = select_text(&doc, ".title-main h2 strong");
        let collection = select_text(&doc, ".breadcrumb li:last-child a");

        let images: Vec<String> = image_sources(&doc, ".detail-pic img")
            .iter()
            .filter_map(|src| normalize_link(&page, src))
            .map(String::from)
            .collect();

        let specs = spec_items(&doc);

        if code.is_none() && images.is_empty() && specs.is_empty() {
            ::log::debug!("No tiles product content on {}", url);
        }

        let mut record = ProductRecord::new();
        record.set_text(fields::URL, url);
        record.set_text(fields::PRODUCT_CODE, code.unwrap_or_else(|| fields::MISSING.to_string()));
        record.set_text(
            fields::COLLECTION,
            collection.unwrap_or_else(|| fields::MISSING.to_string()),
        );
        record.set_text(
            fields::MAIN_IMAGE,
            images.first().cloned().unwrap_or_else(|| fields::MISSING.to_string()),
        );
        record.set_list(fields::IMAGES, images);
        for (key, value) in specs {
            record.set_text(key, value);
        }
        Some(record)
    }
}

/// `.des-item` blocks hold a label `span` and a value `h3`
fn spec_items(doc: &Html) -> Vec<(String, String)> {
    let (Some(item), Some(label_sel), Some(value_sel)) = (
        parse_selector(".des-item"),
        parse_selector("span"),
        parse_selector("h3"),
    ) else {
        return Vec::new();
    };

    doc.select(&item)
        .filter_map(|block| {
            let key = block.select(&label_sel).next().map(element_text)?;
            let value = block.select(&value_sel).next().map(element_text)?;
            Some((title_case(&key), value))
        })
        .collect()
}
