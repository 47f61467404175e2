//! Product pages of vthmgroup.vn
//!
//! The storefront renders a title, an image gallery and either a technical table or
//! a definition list; no fixed class names are relied upon.

use crate::parsers::fields;
use crate::parsers::html::{image_sources, parse_selector, select_attr, select_text};
use crate::parsers::text::element_text;
use crate::parsers::RecordExtractor;
use crate::results::ProductRecord;
use crate::utils::normalize_link;
use scraper::Html;
use url::Url;

pub struct VthmExtractor;

impl RecordExtractor for VthmExtractor {
    fn extract(&self, html: &str, url: &str) -> Option<ProductRecord> {
        let page = Url::parse(url).ok()?;
        let doc = Html::parse_document(html);

        let name = select_text(&doc, "h1")?;

        let mut images: Vec<String> = Vec::new();
        let candidates = select_attr(&doc, "meta[property='og:image']", "content")
            .into_iter()
            .chain(image_sources(
                &doc,
                "[class*='gallery'] img, [class*='swiper'] img, [class*='product'] img",
            ));
        for src in candidates {
            if let Some(absolute) = normalize_link(&page, &src) {
                let absolute = String::from(absolute);
                if !images.contains(&absolute) {
                    images.push(absolute);
                }
            }
        }

        let mut record = ProductRecord::new();
        record.set_text(fields::URL, url);
        record.set_text(fields::PRODUCT_NAME, name);
        record.set_text(
            fields::MAIN_IMAGE,
            images.first().cloned().unwrap_or_else(|| fields::MISSING.to_string()),
        );
        record.set_list(fields::IMAGES, images);

        for (key, value) in table_pairs(&doc).into_iter().chain(definition_pairs(&doc)) {
            record.set_text(key, value);
        }
        Some(record)
    }
}

fn table_pairs(doc: &Html) -> Vec<(String, String)> {
    let (Some(row_sel), Some(cell_sel)) = (parse_selector("table tr"), parse_selector("td, th"))
    else {
        return Vec::new();
    };

    doc.select(&row_sel)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
            match cells.as_slice() {
                [key, value] if !key.is_empty() && !value.is_empty() => {
                    Some((key.clone(), value.clone()))
                }
                _ => None,
            }
        })
        .collect()
}

fn definition_pairs(doc: &Html) -> Vec<(String, String)> {
    let (Some(term_sel), Some(desc_sel)) = (parse_selector("dl dt"), parse_selector("dl dd"))
    else {
        return Vec::new();
    };

    doc.select(&term_sel)
        .map(element_text)
        .zip(doc.select(&desc_sel).map(element_text))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect()
}
