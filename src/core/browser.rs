// src/core/browser.rs
//! `Document` over a WebDriver session (geckodriver, chromedriver, msedgedriver,
//! safaridriver).
//!
//! The engine is synchronous; every command is driven to completion on a
//! private current-thread runtime. Queries poll until something matches or the
//! per-query timeout runs out.

use std::time::{Duration, Instant};

use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use tokio::runtime::{Builder, Runtime};

use super::document::{DocError, Document, Query};
use crate::config::consts::{QUERY_POLL_MS, QUERY_TIMEOUT_SECS};
use crate::config::options::BrowserKind;

pub struct WebDriverDocument {
    rt: Runtime,
    client: Client,
    timeout: Duration,
    poll: Duration,
}

impl WebDriverDocument {
    /// Start a browser session through the WebDriver server at `webdriver_url`.
    pub fn connect(
        webdriver_url: &str,
        browser: BrowserKind,
        headless: bool,
    ) -> Result<Self, DocError> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DocError::Session(format!("runtime: {e}")))?;

        let caps = capabilities(browser, headless);
        logd!("Connecting to WebDriver at {webdriver_url} ({browser})");
        let client = rt
            .block_on(ClientBuilder::native().capabilities(caps).connect(webdriver_url))
            .map_err(|e| DocError::Session(format!("could not start {browser} via {webdriver_url}: {e}")))?;

        logf!("{browser} session started");
        Ok(Self {
            rt,
            client,
            timeout: Duration::from_secs(QUERY_TIMEOUT_SECS),
            poll: Duration::from_millis(QUERY_POLL_MS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// End the session and close the browser.
    pub fn close(self) -> Result<(), DocError> {
        let Self { rt, client, .. } = self;
        rt.block_on(client.close()).map_err(|e| DocError::Session(e.to_string()))
    }
}

impl Document for WebDriverDocument {
    type Handle = Element;

    fn navigate(&mut self, url: &str) -> Result<(), DocError> {
        self.rt
            .block_on(self.client.goto(url))
            .map_err(|e| classify(e, None))
    }

    fn find_all(
        &mut self,
        scope: Option<&Element>,
        query: Query,
    ) -> Result<Vec<Element>, DocError> {
        let deadline = Instant::now() + self.timeout;
        let (client, poll) = (&self.client, self.poll);

        self.rt.block_on(async {
            loop {
                let found = match scope {
                    Some(el) => el.find_all(locator(&query)).await,
                    None => client.find_all(locator(&query)).await,
                };
                match found {
                    Ok(v) if !v.is_empty() => return Ok(v),
                    Ok(_) => {}
                    Err(e) => match classify(e, Some(query)) {
                        DocError::NotFound(_) => {}
                        other => return Err(other),
                    },
                }
                if Instant::now() >= deadline {
                    return Ok(Vec::new());
                }
                tokio::time::sleep(poll).await;
            }
        })
    }

    fn text(&mut self, el: &Element) -> Result<String, DocError> {
        self.rt.block_on(el.text()).map_err(|e| classify(e, None))
    }

    fn click(&mut self, el: &Element) -> Result<(), DocError> {
        self.rt.block_on(el.click()).map_err(|e| classify(e, None))
    }
}

fn locator(q: &Query) -> Locator<'static> {
    match *q {
        Query::Css(s) => Locator::Css(s),
        Query::XPath(s) => Locator::XPath(s),
    }
}

fn classify(e: CmdError, query: Option<Query>) -> DocError {
    match e {
        CmdError::Standard(ref w) if matches!(w.error, ErrorStatus::NoSuchElement) => match query {
            Some(q) => DocError::NotFound(q),
            None => DocError::StaleReference,
        },
        CmdError::WaitTimeout => match query {
            Some(q) => DocError::NotFound(q),
            None => DocError::StaleReference,
        },
        CmdError::Standard(ref w) if matches!(w.error, ErrorStatus::StaleElementReference) => {
            DocError::StaleReference
        }
        // an overlay or re-render swallowed the click
        CmdError::Standard(ref w)
            if matches!(w.error, ErrorStatus::ElementClickIntercepted | ErrorStatus::ElementNotInteractable) =>
        {
            DocError::StaleReference
        }
        other => DocError::Session(other.to_string()),
    }
}

fn capabilities(browser: BrowserKind, headless: bool) -> Map<String, Value> {
    let mut caps = Map::new();
    match browser {
        BrowserKind::Firefox => {
            caps.insert(s!("browserName"), json!("firefox"));
            let args: Vec<&str> = if headless { vec!["--headless"] } else { Vec::new() };
            caps.insert(s!("moz:firefoxOptions"), json!({ "args": args }));
        }
        BrowserKind::Chrome | BrowserKind::Edge => {
            let mut args = vec!["--no-sandbox"];
            if headless {
                args.extend(["--headless=new", "--disable-gpu", "--disable-dev-shm-usage"]);
            }
            let (name, key) = match browser {
                BrowserKind::Edge => ("MicrosoftEdge", "ms:edgeOptions"),
                _ => ("chrome", "goog:chromeOptions"),
            };
            caps.insert(s!("browserName"), json!(name));
            caps.insert(s!(key), json!({ "args": args }));
        }
        BrowserKind::Safari => {
            caps.insert(s!("browserName"), json!("safari"));
            if headless {
                logw!("Safari has no headless mode; opening a window");
            }
        }
    }
    caps
}
