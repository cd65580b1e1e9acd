use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Snapshot of user agent, viewport, and locale characteristics.
pub struct UserAgentProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub platform: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone)]
/// Maintains a small pool of plausible desktop profiles; one is pinned for
/// the lifetime of a session so the portal sees a consistent browser.
pub struct UserAgentManager {
    desktop_profiles: Vec<UserAgentProfile>,
    current_session_profile: Option<UserAgentProfile>,
}

impl Default for UserAgentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgentManager {
    pub fn new() -> Self {
        Self {
            desktop_profiles: vec![
                UserAgentProfile {
                    user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
                    viewport: (1920, 1080),
                    platform: "Win32".to_string(),
                    languages: vec!["en-US".to_string(), "en".to_string()],
                },
                UserAgentProfile {
                    user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
                    viewport: (1920, 1080),
                    platform: "Linux x86_64".to_string(),
                    languages: vec!["en-US".to_string(), "en".to_string()],
                },
            ],
            current_session_profile: None,
        }
    }

    /// Get (or lazily select) the current session profile.
    pub fn session_profile(&mut self) -> &UserAgentProfile {
        if self.current_session_profile.is_none() {
            let mut rng = rand::thread_rng();
            let p = self.desktop_profiles.choose(&mut rng).unwrap().clone();
            self.current_session_profile = Some(p);
        }
        self.current_session_profile.as_ref().unwrap()
    }
}

/// Chrome command-line arguments for an attendance session.
///
/// The flag set is the minimum the portal tolerates from an automated
/// browser: automation banners off, sandbox off for containerised runners,
/// and a pinned window size so the responsive layout renders the desktop
/// sign-in widgets.
pub fn build_chrome_arguments(headless: bool, profile: &UserAgentProfile) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        "--no-first-run".to_string(),
        format!("--user-agent={}", profile.user_agent),
        format!(
            "--window-size={},{}",
            profile.viewport.0, profile.viewport.1
        ),
        format!("--lang={}", profile.languages.join(",")),
    ];
    if headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

/// JavaScript evasions applied after navigation to reduce automation signals.
pub struct EvasionScripts;

impl EvasionScripts {
    /// Hide the `navigator.webdriver` flag the portal's front-end could probe.
    pub fn webdriver_flag() -> &'static str {
        r#"
            Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
            if (!window.chrome) window.chrome = { runtime: {} };
        "#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_adds_only_headless_flags() {
        let mut mgr = UserAgentManager::new();
        let profile = mgr.session_profile().clone();

        let headed = build_chrome_arguments(false, &profile);
        let headless = build_chrome_arguments(true, &profile);

        assert!(!headed.iter().any(|a| a == "--headless"));
        assert!(headless.iter().any(|a| a == "--headless"));
        assert!(headless.iter().any(|a| a == "--disable-gpu"));
        assert_eq!(headless.len(), headed.len() + 2);
    }

    #[test]
    fn arguments_carry_profile_identity() {
        let mut mgr = UserAgentManager::new();
        let profile = mgr.session_profile().clone();
        let args = build_chrome_arguments(true, &profile);

        assert!(args
            .iter()
            .any(|a| a.starts_with("--user-agent=Mozilla/5.0")));
        assert!(args.iter().any(|a| a == "--window-size=1920,1080"));
        assert!(args
            .iter()
            .any(|a| a == "--disable-blink-features=AutomationControlled"));
    }

    #[test]
    fn session_profile_is_stable() {
        let mut mgr = UserAgentManager::new();
        let first = mgr.session_profile().user_agent.clone();
        for _ in 0..8 {
            assert_eq!(mgr.session_profile().user_agent, first);
        }
    }

    #[test]
    fn evasion_script_overrides_webdriver_flag() {
        assert!(EvasionScripts::webdriver_flag().contains("navigator, 'webdriver'"));
    }
}
