use crate::clockin_browser::{cadence::Cadence, hardening::EvasionScripts};
use anyhow::{anyhow, Result};
use fantoccini::{elements::Element, Client, Locator};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// How often fallback chains re-probe the DOM while waiting.
const PROBE_INTERVAL: Duration = Duration::from_millis(250);

/// High-level page wrapper providing element queries with fallback chains.
///
/// The portal's markup is not under our control, so no single selector is
/// trusted: callers hand over an ordered chain and the page tries each in
/// turn, optionally until a deadline.
pub struct PortalPage {
    pub(crate) client: Client,
    pub(crate) cadence: Cadence,
}

impl PortalPage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client, cadence: Cadence) -> Self {
        Self { client, cadence }
    }

    /// Navigate to `url` and apply the evasion script.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        self.cadence.random_delay(300, 1200).await;
        self.client.goto(url).await?;
        self.client
            .execute(EvasionScripts::webdriver_flag(), vec![])
            .await?;
        Ok(())
    }

    /// Find a single element by CSS selector, waiting up to fantoccini's
    /// default deadline.
    pub async fn find_css(&self, selector: &str) -> Result<PortalElement> {
        self.cadence.random_delay(100, 500).await;

        let element = self
            .client
            .wait()
            .for_element(Locator::Css(selector))
            .await?;
        Ok(PortalElement::new(element, &self.cadence))
    }

    /// Try each selector in `chain` once, in order, returning the first hit.
    pub async fn find_first_css(&self, chain: &[&str]) -> Result<PortalElement> {
        for selector in chain {
            match self.client.find(Locator::Css(selector)).await {
                Ok(element) => {
                    debug!(target: "browser.selector", %selector, "selector matched");
                    return Ok(PortalElement::new(element, &self.cadence));
                }
                Err(_) => {
                    debug!(target: "browser.selector", %selector, "selector missed, trying next");
                }
            }
        }
        Err(anyhow!("no selector in chain matched: {chain:?}"))
    }

    /// Re-probe a selector chain until one matches or `timeout` elapses.
    pub async fn wait_for_first_css(
        &self,
        chain: &[&str],
        timeout: Duration,
    ) -> Result<PortalElement> {
        let started = Instant::now();
        loop {
            if let Ok(el) = self.find_first_css(chain).await {
                return Ok(el);
            }
            if started.elapsed() >= timeout {
                warn!(
                    target: "browser.selector",
                    ?chain,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "selector chain never matched"
                );
                return Err(anyhow!(
                    "timed out after {}ms waiting for any of {chain:?}",
                    timeout.as_millis()
                ));
            }
            tokio::time::sleep(PROBE_INTERVAL).await;
        }
    }

    /// Find zero or more elements by CSS selector.
    pub async fn find_all_css(&self, selector: &str) -> Result<Vec<PortalElement>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements
            .into_iter()
            .map(|element| PortalElement::new(element, &self.cadence))
            .collect())
    }

    /// Buttons whose rendered text contains `label`, visible ones only.
    ///
    /// The portal renders several widgets with identical labels (page header
    /// vs. modal); callers pick by position.
    pub async fn find_visible_buttons_with_text(&self, label: &str) -> Result<Vec<PortalElement>> {
        let xpath = format!("//button[contains(normalize-space(.), '{label}')]");
        let elements = self.client.find_all(Locator::XPath(&xpath)).await?;

        let mut visible = Vec::new();
        for element in elements {
            if element.is_displayed().await.unwrap_or(false) {
                visible.push(PortalElement::new(element, &self.cadence));
            }
        }
        debug!(
            target: "browser.selector",
            %label,
            count = visible.len(),
            "visible buttons matched by text"
        );
        Ok(visible)
    }

    /// Execute a JavaScript snippet and return its result.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.client
            .execute(script, args)
            .await
            .map_err(anyhow::Error::from)
    }

    /// Execute a JS probe that reports a status string, and log it.
    pub async fn execute_probe(&self, name: &str, script: &str, args: Vec<Value>) -> Result<String> {
        let value = self.execute(script, args).await?;
        let status = value.as_str().unwrap_or("no_status").to_string();
        info!(target: "browser.probe", probe = name, %status);
        Ok(status)
    }

    /// The page body's rendered text, for phrase-based state inference.
    pub async fn body_text(&self) -> Result<String> {
        let value = self
            .execute("return document.body ? document.body.innerText : '';", vec![])
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Return the current page URL.
    pub async fn current_url(&self) -> Result<Url> {
        self.client.current_url().await.map_err(anyhow::Error::from)
    }

    /// Return the page title.
    pub async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(anyhow::Error::from)
    }

    /// Return the full page HTML source.
    pub async fn source(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    /// PNG screenshot of the current viewport.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.client.screenshot().await.map_err(anyhow::Error::from)
    }

    /// Access the shared pacing engine.
    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }
}

// =========================
// PortalElement
// =========================

#[derive(Clone)]
/// Wrapper for DOM elements providing paced interactions.
pub struct PortalElement {
    pub element: Element,
    cadence: Cadence,
}

impl PortalElement {
    pub fn new(element: Element, cadence: &Cadence) -> Self {
        Self {
            element,
            cadence: cadence.clone(),
        }
    }

    /// Click with a small human-like lead-in delay.
    pub async fn click(&self) -> Result<()> {
        self.cadence.random_delay(100, 400).await;
        self.element.clone().click().await?;
        Ok(())
    }

    /// Type into the element using human-like timings.
    pub async fn type_str(&self, text: &str) -> Result<()> {
        self.cadence
            .type_text_human_like(&self.element, text)
            .await
    }

    /// Clear any prefilled value, then type.
    pub async fn clear_and_type(&self, text: &str) -> Result<()> {
        self.element.clone().clear().await?;
        self.type_str(text).await
    }

    /// Send the WebDriver Enter key (form submit fallback).
    pub async fn send_enter(&self) -> Result<()> {
        self.element.send_keys("\u{E007}").await?;
        Ok(())
    }

    /// Return the element's visible text.
    pub async fn text(&self) -> Result<String> {
        self.element.text().await.map_err(anyhow::Error::from)
    }

    /// Whether the element is rendered and visible.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.element
            .is_displayed()
            .await
            .map_err(anyhow::Error::from)
    }
}
