use url::Url;

/// Resolve an href found on a catalog page into an absolute URL
///
/// Relative references are resolved against the catalog origin and the
/// fragment is dropped. Anchors that do not lead to a page (`#`,
/// `javascript:`, `mailto:`, `tel:`) yield `None`.
pub fn normalize_link(origin: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut resolved = origin.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Output file name for a catalog source, e.g. `data_vthm-group.json`
pub fn output_file_name(source_name: &str) -> String {
    format!("data_{}.json", sanitize_filename(source_name))
}

/// Convert a string to a sanitized filename
pub fn sanitize_filename(name: &str) -> String {
    let mut name = name
        .trim()
        .replace("http://", "")
        .replace("https://", "")
        .to_lowercase();
    name = name.replace(['/', ':', '?', '&', '=', '#', '%', ' ', '(', ')'], "_");

    // Limit filename length
    if name.chars().count() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}
