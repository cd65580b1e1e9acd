use clockin_config::ClockinConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load_from_file() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
portal:
  login_url: "https://acme.example.com/"
  username: "${ACME_LOGIN_ID}"
  password: "${ACME_LOGIN_PASSWORD}"
  location: "Office"
browser:
  webdriver_url: "http://localhost:4444"
  headless: true
debug:
  enabled: false
"#;
    let p = write_yaml(&tmp, "clockin.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("ACME_LOGIN_ID", Some("E9001")),
            ("ACME_LOGIN_PASSWORD", Some("s3cret")),
            ("LOGIN_URL", None),
            ("LOGIN_ID", None),
            ("LOGIN_PASSWORD", None),
            ("SIGNIN_LOCATION", None),
        ],
        || {
            let config = ClockinConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.portal.login_url, "https://acme.example.com/");
            assert_eq!(config.portal.username, "E9001");
            assert_eq!(config.portal.password, "s3cret");
            assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
            config.validate().expect("valid config");
        },
    );
}

#[test]
#[serial]
fn test_missing_file_is_fine_when_env_is_complete() {
    temp_env::with_vars(
        [
            ("LOGIN_URL", Some("https://portal.example.com/")),
            ("LOGIN_ID", Some("E42")),
            ("LOGIN_PASSWORD", Some("pw")),
        ],
        || {
            let config = ClockinConfigLoader::new()
                .with_file("/definitely/not/here/clockin.yaml")
                .load()
                .expect("load config without file");

            assert_eq!(config.portal.username, "E42");
            // Untouched defaults survive the overlay.
            assert_eq!(config.portal.location, "Office");
            assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
            config.validate().expect("valid config");
        },
    );
}
