pub mod web;

use crate::error::BrowserError;

pub use web::{WebDriverConnector, WebDriverSession};

/// A controllable rendering session bound to one page at a time
///
/// Every operation may block for as long as the remote site takes to render;
/// callers add their own settle waits and bounded polls.
#[allow(async_fn_in_trait)]
pub trait BrowserDriver {
    /// Navigate to a URL and wait for the document to load
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn current_url(&mut self) -> Result<String, BrowserError>;

    /// Full markup snapshot of the current document
    async fn source(&mut self) -> Result<String, BrowserError>;

    /// Current `document.body.scrollHeight`
    async fn scroll_height(&mut self) -> Result<u64, BrowserError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError>;

    /// Whether at least one element matches `selector`
    async fn exists(&mut self, selector: &str) -> Result<bool, BrowserError>;

    /// Attribute `name` of the first element matching `selector`
    async fn attribute(&mut self, selector: &str, name: &str)
    -> Result<Option<String>, BrowserError>;

    /// Attribute `name` of every displayed element matching `selector`
    async fn visible_attributes(
        &mut self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<String>, BrowserError>;

    /// Scroll the first match into view and click it from script
    ///
    /// Returns `false` when nothing matches.
    async fn click(&mut self, selector: &str) -> Result<bool, BrowserError>;

    /// Terminate the session
    async fn quit(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}

/// Opens browser sessions for discovery runs
#[allow(async_fn_in_trait)]
pub trait SessionFactory {
    type Driver: BrowserDriver;

    async fn open(&self) -> Result<Self::Driver, BrowserError>;
}
