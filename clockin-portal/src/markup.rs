//! The narrow inventory of everything site-dependent.
//!
//! The portal's markup is unstable and outside our control; when it changes,
//! this is the only file that should need touching.

/// Selectors, widget tags, and phrases for the attendance portal.
#[derive(Debug, Clone)]
pub struct PortalMarkup {
    /// Ordered fallback chain for the login id field.
    pub username_selectors: Vec<&'static str>,
    /// The password field is the one stable selector the portal has.
    pub password_selector: &'static str,
    /// Ordered fallback chain for the login submit button.
    pub submit_selectors: Vec<&'static str>,
    /// Label on the attendance sign-in button (page and modal both).
    pub sign_in_label: &'static str,
    /// Label proving attendance is already marked.
    pub sign_out_label: &'static str,
    /// CSS matching the location modal while it is open.
    pub modal_open_css: &'static str,
    /// Custom-element tag of the location dropdown widget.
    pub dropdown_tag: &'static str,
    /// Phrase the modal shows when asking for a work location.
    pub location_prompt: &'static str,
    /// Lowercase phrases that mean the day's attendance is already marked.
    pub already_signed_in_phrases: Vec<&'static str>,
    /// Lowercase phrases that confirm a fresh sign-in.
    pub success_phrases: Vec<&'static str>,
}

impl Default for PortalMarkup {
    fn default() -> Self {
        Self {
            username_selectors: vec![
                "input[placeholder*=\"Employee\"]",
                "input[name*=\"username\"]",
                "input[id*=\"username\"]",
                "input[type=\"email\"]",
                "input[type=\"text\"]",
            ],
            password_selector: "input[type=\"password\"]",
            submit_selectors: vec![
                "button[type=\"submit\"]",
                "input[type=\"submit\"]",
                "button.btn-primary",
                ".login-btn",
                "#login-button",
            ],
            sign_in_label: "Sign In",
            sign_out_label: "Sign Out",
            modal_open_css: "gt-popup-modal[open]",
            dropdown_tag: "gt-dropdown",
            location_prompt: "Tell us your work location",
            already_signed_in_phrases: vec![
                "already signed in",
                "attendance marked",
                "check out",
                "signed in successfully",
            ],
            success_phrases: vec![
                "signed in successfully",
                "attendance marked",
                "check in successful",
                "already signed in",
                "punch in successful",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_chain_prefers_specific_selectors() {
        let markup = PortalMarkup::default();
        // Generic text inputs must come last or they shadow the real field.
        let generic = markup
            .username_selectors
            .iter()
            .position(|s| *s == "input[type=\"text\"]")
            .unwrap();
        assert_eq!(generic, markup.username_selectors.len() - 1);
    }

    #[test]
    fn phrases_are_lowercase() {
        let markup = PortalMarkup::default();
        for phrase in markup
            .success_phrases
            .iter()
            .chain(&markup.already_signed_in_phrases)
        {
            assert_eq!(*phrase, phrase.to_lowercase());
        }
    }
}
