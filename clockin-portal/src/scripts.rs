//! JavaScript probes for widgets that element queries cannot reach.
//!
//! The location modal is built from custom elements (`gt-popup-modal`,
//! `gt-dropdown`) whose internals render after the click that opens them, so
//! these probes run inside the page and report a status string back; every
//! status is logged by the caller. Parameters arrive via `arguments[n]`,
//! never string interpolation.

/// Probes run while handling the sign-in flow.
pub struct PortalScripts;

impl PortalScripts {
    /// Click the first visible button-like element whose text contains
    /// `arguments[0]` (case-insensitive).
    pub fn click_button_with_label() -> &'static str {
        r#"
            try {
                const label = String(arguments[0]).toLowerCase();
                const buttons = document.querySelectorAll('button, gt-button, [role="button"]');
                for (const btn of buttons) {
                    const text = (btn.innerText || btn.textContent || '').toLowerCase();
                    if (btn.offsetParent !== null && text.includes(label)) {
                        btn.click();
                        return 'clicked:' + text.trim();
                    }
                }
                return 'no_button_found';
            } catch (e) {
                return 'error: ' + e.message;
            }
        "#
    }

    /// Open the location dropdown widget (`arguments[0]` is its tag name).
    pub fn open_location_dropdown() -> &'static str {
        r#"
            try {
                const dropdown = document.querySelector(arguments[0]);
                if (dropdown) {
                    const trigger = dropdown.querySelector('button, [role="button"], .dropdown-button');
                    if (trigger) {
                        trigger.click();
                        return 'dropdown_clicked';
                    }
                }
                const fallback = document.querySelector('button.dropdown-button');
                if (fallback) {
                    fallback.click();
                    return 'any_dropdown_clicked';
                }
                return 'no_dropdown_found';
            } catch (e) {
                return 'error: ' + e.message;
            }
        "#
    }

    /// Select the option whose text equals `arguments[0]` in the expanded
    /// dropdown, falling back to the first visible option.
    pub fn select_location_option() -> &'static str {
        r#"
            try {
                const wanted = String(arguments[0]).trim();
                const all = Array.from(document.querySelectorAll('*'));
                const exact = all.filter(el =>
                    el.textContent.trim() === wanted &&
                    el.tagName !== 'BUTTON' &&
                    el.offsetParent !== null
                );
                if (exact.length > 0) {
                    exact[0].click();
                    return 'location_selected';
                }
                const items = document.querySelectorAll('.dropdown-item, [class*="item"], div[class*="dropdown"]');
                for (const item of items) {
                    if (item.offsetParent !== null) {
                        item.click();
                        return 'first_option_selected:' + (item.textContent || '').trim();
                    }
                }
                return 'location_not_found';
            } catch (e) {
                return 'error: ' + e.message;
            }
        "#
    }

    /// Click the sign-in button inside the modal: when several visible
    /// buttons share the label (`arguments[0]`), the last one is the modal's.
    pub fn click_modal_sign_in() -> &'static str {
        r#"
            try {
                const label = String(arguments[0]).trim();
                const matches = Array.from(document.querySelectorAll('button, gt-button')).filter(btn =>
                    (btn.innerText || btn.textContent || '').trim().includes(label) &&
                    btn.offsetParent !== null
                );
                if (matches.length > 1) {
                    matches[matches.length - 1].click();
                    return 'modal_signin_clicked';
                }
                if (matches.length === 1) {
                    matches[0].click();
                    return 'signin_clicked';
                }
                return 'no_signin_button';
            } catch (e) {
                return 'error: ' + e.message;
            }
        "#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The probes are opaque strings to the compiler; pin the contract the
    // Rust side depends on (status prefixes and parameter passing).

    #[test]
    fn probes_take_parameters_via_arguments() {
        for script in [
            PortalScripts::click_button_with_label(),
            PortalScripts::open_location_dropdown(),
            PortalScripts::select_location_option(),
            PortalScripts::click_modal_sign_in(),
        ] {
            assert!(script.contains("arguments[0]"));
            assert!(script.contains("return 'error: ' + e.message"));
        }
    }

    #[test]
    fn click_statuses_share_the_clicked_marker() {
        assert!(PortalScripts::click_button_with_label().contains("'clicked:'"));
        assert!(PortalScripts::open_location_dropdown().contains("'dropdown_clicked'"));
        assert!(PortalScripts::open_location_dropdown().contains("'any_dropdown_clicked'"));
        assert!(PortalScripts::click_modal_sign_in().contains("'modal_signin_clicked'"));
    }

    #[test]
    fn option_select_reports_fallback_choice() {
        let script = PortalScripts::select_location_option();
        assert!(script.contains("'location_selected'"));
        assert!(script.contains("'first_option_selected:'"));
        assert!(script.contains("'location_not_found'"));
    }
}
