//! Sign-in button discovery and the work-location modal.

use anyhow::{bail, Result};
use clockin_drivers::clockin_browser::page::PortalPage;
use serde_json::json;
use tracing::{info, warn};

use crate::markup::PortalMarkup;
use crate::scripts::PortalScripts;

/// Whether the day's attendance is already marked.
///
/// Two independent signals: a visible Sign Out button, or one of the
/// portal's own status phrases in the page body.
pub async fn already_signed_in(page: &PortalPage, markup: &PortalMarkup) -> Result<bool> {
    let sign_out = page
        .find_visible_buttons_with_text(markup.sign_out_label)
        .await?;
    if !sign_out.is_empty() {
        info!(target: "portal.attendance", "Sign Out button found, already signed in");
        return Ok(true);
    }

    let body = page.body_text().await?.to_lowercase();
    for phrase in &markup.already_signed_in_phrases {
        if body.contains(phrase) {
            info!(target: "portal.attendance", phrase, "status phrase found, already signed in");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Find and click the attendance Sign In button.
///
/// Element query first; when the button is rendered inside a custom element
/// the XPath probe misses it and the JS fallback takes over.
pub async fn click_sign_in(page: &PortalPage, markup: &PortalMarkup) -> Result<()> {
    info!(target: "portal.attendance", "looking for Sign In button");
    let buttons = page
        .find_visible_buttons_with_text(markup.sign_in_label)
        .await?;

    if let Some(button) = buttons.first() {
        info!(
            target: "portal.attendance",
            count = buttons.len(),
            "clicking Sign In button"
        );
        button.click().await?;
    } else {
        let status = page
            .execute_probe(
                "click_sign_in",
                PortalScripts::click_button_with_label(),
                vec![json!(markup.sign_in_label)],
            )
            .await?;
        if !status.starts_with("clicked:") {
            bail!("could not find or click Sign In button ({status})");
        }
    }

    // Give the modal time to mount before anything probes for it.
    page.cadence().settle(3000).await;
    Ok(())
}

/// Handle the work-location modal if the portal raised one.
///
/// Absent modal is a normal day, not an error. When the configured location
/// is missing from the dropdown the probe picks the first visible option and
/// we log what it chose.
pub async fn handle_location_modal(
    page: &PortalPage,
    markup: &PortalMarkup,
    location: &str,
) -> Result<()> {
    let body = page.body_text().await?;
    if !body.contains(markup.location_prompt) {
        info!(target: "portal.modal", "no location modal detected");
        return Ok(());
    }
    info!(target: "portal.modal", location, "location modal detected");

    let opened = page
        .execute_probe(
            "open_dropdown",
            PortalScripts::open_location_dropdown(),
            vec![json!(markup.dropdown_tag)],
        )
        .await?;

    if opened.contains("clicked") {
        page.cadence().settle(2000).await;

        let selected = page
            .execute_probe(
                "select_location",
                PortalScripts::select_location_option(),
                vec![json!(location)],
            )
            .await?;
        if let Some(fallback) = selected.strip_prefix("first_option_selected:") {
            warn!(
                target: "portal.modal",
                wanted = location,
                chose = fallback,
                "configured location not in dropdown, took first visible option"
            );
        } else if selected != "location_selected" {
            warn!(target: "portal.modal", status = %selected, "location selection did not land");
        }
        page.cadence().settle(2000).await;
    } else {
        warn!(target: "portal.modal", status = %opened, "dropdown did not open, submitting with portal default");
    }

    let confirmed = page
        .execute_probe(
            "modal_sign_in",
            PortalScripts::click_modal_sign_in(),
            vec![json!(markup.sign_in_label)],
        )
        .await?;
    if confirmed == "no_signin_button" {
        bail!("location modal present but no Sign In button inside it");
    }

    // The portal posts the punch and re-renders the attendance card.
    page.cadence().settle(4000).await;
    Ok(())
}
