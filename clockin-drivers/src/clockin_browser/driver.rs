use crate::clockin_browser::{
    cadence::Cadence,
    hardening::{build_chrome_arguments, UserAgentManager},
    page::PortalPage,
};
use anyhow::Result;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use tracing::info;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// One driver is one browser session: acquired at the start of a run and
/// released on every exit path via [`PortalDriver::close`].
pub struct PortalDriver {
    pub client: Client,
    pub cadence: Cadence,
    pub user_agent_manager: UserAgentManager,
}

impl PortalDriver {
    /// Create a new driver connected to a running WebDriver service,
    /// e.g. `http://localhost:9515` for Chromedriver.
    pub async fn launch(webdriver_url: &str, headless: bool) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        let mut user_agent_manager = UserAgentManager::new();
        let profile = user_agent_manager.session_profile();

        let args = build_chrome_arguments(headless, profile);
        chrome_opts.insert("args".to_string(), json!(args));
        chrome_opts.insert("excludeSwitches".to_string(), json!(["enable-automation"]));

        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        info!(
            target: "browser.driver",
            %webdriver_url,
            headless,
            "browser session created"
        );

        Ok(Self {
            client,
            cadence: Cadence::new(),
            user_agent_manager,
        })
    }

    /// Navigate to `url` and return a [`PortalPage`] with the evasion script
    /// applied.
    pub async fn goto(&mut self, url: &str) -> Result<PortalPage> {
        let mut page = PortalPage::new(self.client.clone(), self.cadence.clone());
        page.goto(url).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
