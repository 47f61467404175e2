use crate::browser::{BrowserDriver, SessionFactory};
use crate::error::BrowserError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};

/// Chrome flags for a windowless session in containers
const CHROME_ARGS: [&str; 5] = [
    "--headless",
    "--disable-gpu",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--window-size=1920,1080",
];

/// Common WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
    "http://localhost:4444",
];

const SCROLL_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";

const SCROLL_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

const CLICK_SCRIPT: &str = r#"
    const el = document.querySelector(arguments[0]);
    if (!el) { return false; }
    el.scrollIntoView({ block: 'center' });
    el.click();
    return true;
"#;

const VISIBLE_ATTRIBUTES_SCRIPT: &str = r#"
    return Array.from(document.querySelectorAll(arguments[0]))
        .filter(el => el.offsetParent !== null || el.getClientRects().length > 0)
        .map(el => el.getAttribute(arguments[1]))
        .filter(value => value !== null && value !== '');
"#;

/// Connects to a WebDriver server (ChromeDriver, Selenium) and requests Chrome
#[derive(Debug, Clone)]
pub struct WebDriverConnector {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverConnector {
    pub fn new(webdriver_url: &str, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            headless,
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, Value> {
        let args: Vec<&str> = CHROME_ARGS
            .iter()
            .copied()
            .filter(|arg| self.headless || *arg != "--headless")
            .collect();

        let mut caps = serde_json::Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    async fn connect(&self, url: &str) -> Result<Client, fantoccini::error::NewSessionError> {
        ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(url)
            .await
    }
}

impl SessionFactory for WebDriverConnector {
    type Driver = WebDriverSession;

    async fn open(&self) -> Result<WebDriverSession, BrowserError> {
        let first_error = match self.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(WebDriverSession { client });
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                e.to_string()
            }
        };

        for url in FALLBACK_URLS.iter() {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = self.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(WebDriverSession { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(BrowserError::Session(format!(
            "{}: {}",
            self.webdriver_url, first_error
        )))
    }
}

/// A live WebDriver session
pub struct WebDriverSession {
    client: Client,
}

impl BrowserDriver for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn source(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.source().await?)
    }

    async fn scroll_height(&mut self) -> Result<u64, BrowserError> {
        let value = self.client.execute(SCROLL_HEIGHT_SCRIPT, Vec::new()).await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.max(0.0) as u64))
            .ok_or_else(|| BrowserError::Script(format!("scroll height was {}", value)))
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.client.execute(SCROLL_BOTTOM_SCRIPT, Vec::new()).await?;
        Ok(())
    }

    async fn exists(&mut self, selector: &str) -> Result<bool, BrowserError> {
        let found = self.client.find_all(Locator::Css(selector)).await?;
        Ok(!found.is_empty())
    }

    async fn attribute(
        &mut self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(element.attr(name).await?),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn visible_attributes(
        &mut self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<String>, BrowserError> {
        let value = self
            .client
            .execute(VISIBLE_ATTRIBUTES_SCRIPT, vec![json!(selector), json!(name)])
            .await?;
        serde_json::from_value(value).map_err(|e| BrowserError::Script(e.to_string()))
    }

    async fn click(&mut self, selector: &str) -> Result<bool, BrowserError> {
        let value = self
            .client
            .execute(CLICK_SCRIPT, vec![json!(selector)])
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn quit(self) -> Result<(), BrowserError> {
        self.client.close().await?;
        Ok(())
    }
}
