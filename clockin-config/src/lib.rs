//! Loader for workspace configuration with YAML + environment overlays.
//!
//! An optional `clockin.yaml` file and `CLOCKIN`-prefixed environment
//! variables are merged over struct defaults; the legacy flat environment
//! interface (`LOGIN_URL`, `LOGIN_ID`, `LOGIN_PASSWORD`, `SIGNIN_LOCATION`,
//! `DEBUG_MODE`, `MANUAL_RUN`) that scheduled runners set wins over all of it.
//! `${VAR}` placeholders inside any string value are expanded after merging,
//! so a checked-in YAML file never has to contain a credential.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use clockin_common::ClockinError;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Portal endpoint and credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Login page of the attendance portal.
    pub login_url: String,
    /// Employee id / username typed into the login form.
    pub username: String,
    /// Password typed into the login form.
    pub password: String,
    /// Work location picked in the sign-in modal when the portal asks.
    pub location: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: String::new(),
            username: String::new(),
            password: String::new(),
            location: "Office".to_string(),
        }
    }
}

/// Where and how the browser session is created.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebDriver endpoint the client connects to (chromedriver default).
    pub webdriver_url: String,
    /// Run without a visible window. Debug mode forces a visible browser,
    /// see [`ClockinConfig::effective_headless`].
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
        }
    }
}

/// Debug-artifact and run-mode switches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Capture screenshot/page-source artifacts at every stage.
    pub enabled: bool,
    /// Operator-triggered run: capture artifacts even on success.
    pub manual_run: bool,
    /// Where artifacts land; system temp dir when unset.
    pub artifact_dir: Option<PathBuf>,
}

/// Configuration for one attendance run, read once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClockinConfig {
    pub portal: PortalConfig,
    pub browser: BrowserConfig,
    pub debug: DebugConfig,
}

impl ClockinConfig {
    /// Headless unless debug mode asks to watch the browser work.
    pub fn effective_headless(&self) -> bool {
        self.browser.headless && !self.debug.enabled
    }

    /// Reject configurations the flow cannot start from. Runs before any
    /// browser process is launched so bad credentials fail fast.
    pub fn validate(&self) -> clockin_common::Result<()> {
        if self.portal.username.is_empty() || self.portal.password.is_empty() {
            return Err(ClockinError::Config(
                "LOGIN_ID and LOGIN_PASSWORD are required".to_string(),
            ));
        }
        if self.portal.login_url.is_empty() {
            return Err(ClockinError::Config("LOGIN_URL is required".to_string()));
        }
        url::Url::parse(&self.portal.login_url).map_err(|e| {
            ClockinError::Config(format!(
                "LOGIN_URL is not a valid URL ({}): {e}",
                self.portal.login_url
            ))
        })?;
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// The flat variable names existing scheduled jobs export. They override
/// everything else so a deployed runner keeps working without a YAML file.
fn apply_legacy_env(cfg: &mut ClockinConfig) {
    if let Ok(v) = std::env::var("LOGIN_URL") {
        cfg.portal.login_url = v;
    }
    if let Ok(v) = std::env::var("LOGIN_ID") {
        cfg.portal.username = v;
    }
    if let Ok(v) = std::env::var("LOGIN_PASSWORD") {
        cfg.portal.password = v;
    }
    if let Ok(v) = std::env::var("SIGNIN_LOCATION") {
        cfg.portal.location = v;
    }
    if let Ok(v) = std::env::var("DEBUG_MODE") {
        cfg.debug.enabled = parse_flag(&v);
    }
    if let Ok(v) = std::env::var("MANUAL_RUN") {
        cfg.debug.manual_run = parse_flag(&v);
    }
}

/// The runners set literal `true`/`false`; anything else reads as off.
fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct ClockinConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ClockinConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockinConfigLoader {
    /// Start with sensible defaults: optional YAML file + `CLOCKIN_` env
    /// overrides.
    ///
    /// ```
    /// use clockin_config::ClockinConfigLoader;
    ///
    /// let config = ClockinConfigLoader::new()
    ///     .with_yaml_str("portal:\n  location: \"Home\"")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.portal.location, "Home");
    /// assert!(config.browser.headless);
    /// ```
    pub fn new() -> Self {
        // FIXME: enable try_parsing on the Environment source so
        // CLOCKIN_BROWSER__HEADLESS=true deserializes as a bool; only the
        // legacy DEBUG_MODE/MANUAL_RUN flags parse booleans today.
        let builder =
            Config::builder().add_source(Environment::with_prefix("CLOCKIN").separator("__"));
        Self { builder }
    }

    /// Attach a config file. The file is optional: headless deployments rely
    /// purely on environment variables.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests and CLI overrides).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and materialise the strongly typed config.
    ///
    /// Merges every source, expands `${VAR}` placeholders, then lets the
    /// legacy flat environment variables win.
    pub fn load(self) -> Result<ClockinConfig, ConfigError> {
        let cfg = self.builder.build()?;

        // Through serde_json::Value so placeholder expansion can walk the tree.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut typed: ClockinConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        apply_legacy_env(&mut typed);

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Pune")), ("FLOOR", Some("4"))], || {
            let mut v = json!(["desk-$FLOOR", { "loc": "${CITY}-${FLOOR}" }, 42, true, null]);
            expand_env_in_value(&mut v);
            assert_eq!(v, json!(["desk-4", { "loc": "Pune-4" }, 42, true, null]));
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("INNER", Some("secret")),
                ("MID", Some("x-${INNER}")),
                ("OUTER", Some("start-${MID}-end")),
            ],
            || {
                let mut v = json!("${OUTER}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("start-x-secret-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles_and_terminates() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn flag_parsing_matches_runner_convention() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(""));
    }

    #[test]
    #[serial]
    fn legacy_env_overrides_yaml() {
        temp_env::with_vars(
            [
                ("LOGIN_URL", Some("https://portal.example.com/")),
                ("LOGIN_ID", Some("E1234")),
                ("LOGIN_PASSWORD", Some("hunter2")),
                ("SIGNIN_LOCATION", Some("Home")),
                ("DEBUG_MODE", Some("true")),
                ("MANUAL_RUN", Some("false")),
            ],
            || {
                let cfg = ClockinConfigLoader::new()
                    .with_yaml_str(
                        r#"
portal:
  login_url: "https://stale.example.com/"
  username: "yaml-user"
  location: "Office"
"#,
                    )
                    .load()
                    .expect("load config");

                assert_eq!(cfg.portal.login_url, "https://portal.example.com/");
                assert_eq!(cfg.portal.username, "E1234");
                assert_eq!(cfg.portal.password, "hunter2");
                assert_eq!(cfg.portal.location, "Home");
                assert!(cfg.debug.enabled);
                assert!(!cfg.debug.manual_run);
                cfg.validate().expect("valid");
            },
        );
    }

    #[test]
    #[serial]
    fn validation_requires_credentials() {
        temp_env::with_vars(
            [
                ("LOGIN_URL", None::<&str>),
                ("LOGIN_ID", None),
                ("LOGIN_PASSWORD", None),
            ],
            || {
                let cfg = ClockinConfigLoader::new().load().expect("load config");
                let err = cfg.validate().unwrap_err();
                assert!(err.to_string().contains("LOGIN_ID"));
            },
        );
    }

    #[test]
    fn validation_rejects_malformed_url() {
        let mut cfg = ClockinConfig::default();
        cfg.portal.username = "u".into();
        cfg.portal.password = "p".into();
        cfg.portal.login_url = "not a url".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_mode_forces_visible_browser() {
        let mut cfg = ClockinConfig::default();
        assert!(cfg.effective_headless());
        cfg.debug.enabled = true;
        assert!(!cfg.effective_headless());
    }
}
