//! Heuristic verification of the sign-in result.
//!
//! The portal gives no structured acknowledgement; all we can do is read
//! signals off the page and classify them. Gathering is async and
//! browser-bound, classification is pure and tested exhaustively.

use anyhow::Result;
use clockin_common::RunOutcome;
use clockin_drivers::clockin_browser::page::PortalPage;
use regex::Regex;
use tracing::info;

use crate::markup::PortalMarkup;

/// Everything the classifier looks at, read off the page in one pass.
#[derive(Debug, Clone)]
pub struct VerifySignals {
    /// A visible Sign Out button: the strongest success signal.
    pub sign_out_present: bool,
    /// A visible Sign In button after our click: the flow did not land.
    pub sign_in_still_visible: bool,
    /// The location modal is still open.
    pub modal_open: bool,
    /// Rendered body text, scanned for the portal's status phrases.
    pub body_text: String,
}

/// Read the verification signals from the live page.
pub async fn gather(page: &PortalPage, markup: &PortalMarkup) -> Result<VerifySignals> {
    let sign_out_present = !page
        .find_visible_buttons_with_text(markup.sign_out_label)
        .await?
        .is_empty();
    let sign_in_still_visible = !page
        .find_visible_buttons_with_text(markup.sign_in_label)
        .await?
        .is_empty();
    let modal_open = !page.find_all_css(markup.modal_open_css).await?.is_empty();
    let body_text = page.body_text().await?;

    Ok(VerifySignals {
        sign_out_present,
        sign_in_still_visible,
        modal_open,
        body_text,
    })
}

/// Classify gathered signals into a run outcome.
///
/// Precedence mirrors how reliable each signal is: the Sign Out button
/// beats phrases, phrases beat modal state, and an ambiguous page is
/// reported as unconfirmed rather than assumed successful.
pub fn classify(signals: &VerifySignals, markup: &PortalMarkup) -> RunOutcome {
    if signals.sign_out_present {
        return RunOutcome::SignedIn {
            indicator: "Sign Out button present".to_string(),
        };
    }

    let body = normalize(&signals.body_text);
    for phrase in &markup.success_phrases {
        if body.contains(phrase) {
            return RunOutcome::SignedIn {
                indicator: (*phrase).to_string(),
            };
        }
    }

    if signals.modal_open {
        return RunOutcome::Unconfirmed {
            reason: "location modal still open".to_string(),
        };
    }
    if signals.sign_in_still_visible {
        return RunOutcome::Unconfirmed {
            reason: "Sign In button still visible".to_string(),
        };
    }
    RunOutcome::Unconfirmed {
        reason: "modal closed but sign-in status unclear".to_string(),
    }
}

/// Gather and classify in one step.
pub async fn verify(page: &PortalPage, markup: &PortalMarkup) -> Result<RunOutcome> {
    let signals = gather(page, markup).await?;
    let outcome = classify(&signals, markup);
    info!(
        target: "portal.verify",
        sign_out = signals.sign_out_present,
        sign_in_visible = signals.sign_in_still_visible,
        modal_open = signals.modal_open,
        outcome = %outcome,
        "verification complete"
    );
    Ok(outcome)
}

/// Collapse whitespace and lowercase so phrase scans survive the portal's
/// nested markup.
fn normalize(text: &str) -> String {
    let squashed = Regex::new(r"\s+")
        .expect("static whitespace pattern")
        .replace_all(text, " ");
    squashed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(body: &str) -> VerifySignals {
        VerifySignals {
            sign_out_present: false,
            sign_in_still_visible: false,
            modal_open: false,
            body_text: body.to_string(),
        }
    }

    #[test]
    fn sign_out_button_wins_over_everything() {
        let markup = PortalMarkup::default();
        let mut s = signals("nothing useful here");
        s.sign_out_present = true;
        s.modal_open = true;
        assert!(matches!(
            classify(&s, &markup),
            RunOutcome::SignedIn { indicator } if indicator.contains("Sign Out")
        ));
    }

    #[test]
    fn success_phrase_confirms_sign_in() {
        let markup = PortalMarkup::default();
        let s = signals("You have  Signed In\nSuccessfully at 09:02");
        match classify(&s, &markup) {
            RunOutcome::SignedIn { indicator } => {
                assert_eq!(indicator, "signed in successfully")
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn open_modal_is_unconfirmed() {
        let markup = PortalMarkup::default();
        let mut s = signals("Tell us your work location");
        s.modal_open = true;
        assert!(matches!(
            classify(&s, &markup),
            RunOutcome::Unconfirmed { reason } if reason.contains("modal")
        ));
    }

    #[test]
    fn lingering_sign_in_button_is_unconfirmed() {
        let markup = PortalMarkup::default();
        let mut s = signals("dashboard");
        s.sign_in_still_visible = true;
        assert!(matches!(
            classify(&s, &markup),
            RunOutcome::Unconfirmed { reason } if reason.contains("Sign In")
        ));
    }

    #[test]
    fn ambiguous_page_is_not_assumed_successful() {
        let markup = PortalMarkup::default();
        let s = signals("Welcome back");
        assert!(!classify(&s, &markup).success());
    }

    #[test]
    fn normalization_survives_nested_markup_whitespace() {
        assert_eq!(
            normalize("Attendance\n\t  MARKED  for today"),
            "attendance marked for today"
        );
    }
}
