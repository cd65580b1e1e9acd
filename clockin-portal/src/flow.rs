//! One full attendance run, from browser launch to verified outcome.

use clockin_common::{ClockinError, Result, RunOutcome};
use clockin_config::ClockinConfig;
use clockin_drivers::clockin_browser::driver::PortalDriver;
use tracing::{info, warn};

use crate::diagnostics::StageSink;
use crate::markup::PortalMarkup;
use crate::{attendance, login, verify};

/// Orchestrates the stages in order: login, already-signed-in check,
/// sign-in click, location modal, verification.
///
/// The browser session is the only resource this system manages; it is
/// acquired in [`AttendanceFlow::run`] and released on every path out of it.
pub struct AttendanceFlow {
    config: ClockinConfig,
    markup: PortalMarkup,
    sink: Box<dyn StageSink>,
}

impl AttendanceFlow {
    pub fn new(config: ClockinConfig, sink: Box<dyn StageSink>) -> Self {
        Self {
            config,
            markup: PortalMarkup::default(),
            sink,
        }
    }

    /// Swap the markup inventory (tests, portal front-end changes).
    pub fn with_markup(mut self, markup: PortalMarkup) -> Self {
        self.markup = markup;
        self
    }

    /// Run the flow once. The configuration is validated before any browser
    /// process exists, and the session is closed whatever happens after.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.config.validate()?;

        let mut driver = PortalDriver::launch(
            &self.config.browser.webdriver_url,
            self.config.effective_headless(),
        )
        .await?;

        let result = self.execute(&mut driver).await;

        match driver.close().await {
            Ok(()) => info!(target: "portal.flow", "browser session closed"),
            Err(e) => warn!(target: "portal.flow", error = %e, "failed to close browser session"),
        }

        result
    }

    async fn execute(&self, driver: &mut PortalDriver) -> Result<RunOutcome> {
        info!(
            target: "portal.flow",
            url = %self.config.portal.login_url,
            "navigating to login page"
        );
        let page = driver.goto(&self.config.portal.login_url).await?;
        page.cadence().settle(3000).await;

        if let Err(e) = login::login(&page, &self.config.portal, &self.markup).await {
            self.sink.record(&page, "login_error").await;
            return Err(ClockinError::SignIn(format!("login failed: {e:#}")));
        }
        self.sink.record(&page, "after_login").await;

        if attendance::already_signed_in(&page, &self.markup).await? {
            self.sink.record(&page, "final").await;
            return Ok(RunOutcome::AlreadySignedIn);
        }

        if let Err(e) = attendance::click_sign_in(&page, &self.markup).await {
            self.sink.record(&page, "signin_error").await;
            return Err(ClockinError::SignIn(format!("{e:#}")));
        }
        self.sink.record(&page, "after_signin_click").await;

        if let Err(e) =
            attendance::handle_location_modal(&page, &self.markup, &self.config.portal.location)
                .await
        {
            self.sink.record(&page, "modal_error").await;
            return Err(ClockinError::SignIn(format!("{e:#}")));
        }

        let outcome = verify::verify(&page, &self.markup).await?;
        self.sink.record(&page, "final").await;

        let url = page.current_url().await?;
        let title = page.title().await.unwrap_or_default();
        info!(
            target: "portal.flow",
            url = %url,
            title = %title,
            outcome = %outcome,
            "attendance run finished"
        );

        Ok(outcome)
    }
}
