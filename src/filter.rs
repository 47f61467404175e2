use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration deciding which hub-page links count as categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFilterConfig {
    /// Only accept links on the catalog's own origin
    #[serde(default = "default_same_origin")]
    pub same_origin: bool,

    /// Path prefix restriction (if None, all paths are allowed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_path_prefix: Option<String>,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_same_origin() -> bool {
    true
}

fn default_exclude_patterns() -> Vec<String> {
    vec![r"\.(jpg|jpeg|png|gif|webp|css|js|ico|svg|pdf)$".to_string()]
}

impl Default for LinkFilterConfig {
    fn default() -> Self {
        Self {
            same_origin: default_same_origin(),
            required_path_prefix: None,
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Filter that uses regex patterns and origin rules to accept category links
#[derive(Debug)]
pub struct LinkFilter {
    config: LinkFilterConfig,
    origin: Url,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new filter for links found on pages of `origin`
    pub fn new(config: LinkFilterConfig, origin: Url) -> Result<Self, regex::Error> {
        let include_regexes = compile(&config.include_patterns)?;
        let exclude_regexes = compile(&config.exclude_patterns)?;

        Ok(Self {
            config,
            origin,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a link passes every rule
    pub fn accepts(&self, url: &Url) -> bool {
        if self.config.same_origin && url.origin() != self.origin.origin() {
            return false;
        }

        if let Some(prefix) = &self.config.required_path_prefix {
            if !url.path().starts_with(prefix.as_str()) {
                return false;
            }
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|r| r.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|r| r.is_match(url_str))
    }
}

/// Decides whether an entry URL is a hub listing categories or a leaf catalog
#[derive(Debug)]
pub struct HubMatcher {
    patterns: Vec<Regex>,
    max_depth: Option<usize>,
}

impl HubMatcher {
    pub fn new(patterns: &[String], max_depth: Option<usize>) -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: compile(patterns)?,
            max_depth,
        })
    }

    /// A URL is a hub when its path matches a pattern or is shallow enough
    pub fn is_hub(&self, url: &Url) -> bool {
        if self.patterns.iter().any(|r| r.is_match(url.path())) {
            return true;
        }
        match self.max_depth {
            Some(depth) => path_depth(url) <= depth,
            None => false,
        }
    }
}

/// Number of non-empty path segments
pub fn path_depth(url: &Url) -> usize {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).count())
        .unwrap_or(0)
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}
