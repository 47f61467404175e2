use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use url::Url;

/// Deduplicated product URLs in discovery order
///
/// Only parsed absolute URLs can be inserted, and entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct ProductUrlSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ProductUrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a URL, returning `true` when it was not already present
    pub fn insert(&mut self, url: &Url) -> bool {
        let key = url.as_str();
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.order.push(key.to_string());
        true
    }

    /// Insert every URL and return how many were new
    pub fn extend<'a, I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = &'a Url>,
    {
        urls.into_iter().filter(|url| self.insert(url)).count()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// Value of one record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::List(items) => items.serialize(serializer),
        }
    }
}

/// Flat field/value record extracted from one product page
///
/// Fields keep their insertion order; setting an existing field replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    fields: Vec<(String, FieldValue)>,
}

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key.into(), FieldValue::Text(value.into()));
    }

    pub fn set_list(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.set(key.into(), FieldValue::List(values));
    }

    fn set(&mut self, key: String, value: FieldValue) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for ProductRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Serialize records as an indented UTF-8 JSON array
///
/// Non-ASCII text is written verbatim, indentation is four spaces.
pub fn to_pretty_json(records: &[ProductRecord]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_set_deduplicates() {
        let mut set = ProductUrlSet::new();
        let a = Url::parse("https://example.com/p/1").unwrap();
        let b = Url::parse("https://example.com/p/2").unwrap();

        assert!(set.insert(&a));
        assert!(!set.insert(&a));
        assert_eq!(set.extend([&a, &b, &b]), 1);
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["https://example.com/p/1", "https://example.com/p/2"]
        );
    }

    #[test]
    fn test_record_replaces_existing_key() {
        let mut record = ProductRecord::new();
        record.set_text("URL", "https://example.com/p/1");
        record.set_text("Màu", "Trắng");
        record.set_text("URL", "https://example.com/p/2");

        assert_eq!(record.len(), 2);
        assert_eq!(record.text("URL"), Some("https://example.com/p/2"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["URL", "Màu"]);
    }

    #[test]
    fn test_pretty_json_keeps_unicode_and_order() {
        let mut record = ProductRecord::new();
        record.set_text("URL", "https://example.com/p/1");
        record.set_text("Mã Sản Phẩm", "GP-6060");
        record.set_list("Danh Sách Ảnh", vec!["https://example.com/a.jpg".to_string()]);

        let json = to_pretty_json(&[record]).unwrap();
        assert!(json.contains("\"Mã Sản Phẩm\": \"GP-6060\""));
        assert!(json.contains("\n        \"URL\""));
        let url_at = json.find("\"URL\"").unwrap();
        let code_at = json.find("Mã Sản Phẩm").unwrap();
        assert!(url_at < code_at);

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["Danh Sách Ảnh"][0], "https://example.com/a.jpg");
    }
}
