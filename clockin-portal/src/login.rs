//! Credential entry and login form submission.

use anyhow::{Context, Result};
use clockin_config::PortalConfig;
use clockin_drivers::clockin_browser::page::PortalPage;
use std::time::Duration;
use tracing::info;

use crate::markup::PortalMarkup;

/// The portal renders the login form client-side; give it this long.
const LOGIN_FORM_TIMEOUT: Duration = Duration::from_secs(20);

/// Fill credentials and submit the login form.
///
/// The username field is located through the fallback chain (the portal has
/// shipped at least three different input attributes for it); submission
/// prefers a real submit button and falls back to the Enter key.
pub async fn login(page: &PortalPage, portal: &PortalConfig, markup: &PortalMarkup) -> Result<()> {
    info!(target: "portal.login", "looking for username field");
    let username_field = page
        .wait_for_first_css(&markup.username_selectors, LOGIN_FORM_TIMEOUT)
        .await
        .context("username field never appeared")?;
    username_field
        .clear_and_type(&portal.username)
        .await
        .context("typing username")?;
    info!(target: "portal.login", "username entered");

    let password_field = page
        .find_css(markup.password_selector)
        .await
        .context("password field not found")?;
    password_field
        .clear_and_type(&portal.password)
        .await
        .context("typing password")?;
    info!(target: "portal.login", "password entered");

    match page.find_first_css(&markup.submit_selectors).await {
        Ok(submit) => {
            submit.click().await.context("clicking submit button")?;
            info!(target: "portal.login", "submit button clicked");
        }
        Err(_) => {
            // No recognisable button; the form still submits on Enter.
            password_field
                .send_enter()
                .await
                .context("submitting via Enter key")?;
            info!(target: "portal.login", "submitted via Enter key");
        }
    }

    // The dashboard loads attendance widgets well after navigation settles.
    page.cadence().settle(5000).await;

    let url = page.current_url().await?;
    info!(target: "portal.login", url = %url, "login completed");
    Ok(())
}
