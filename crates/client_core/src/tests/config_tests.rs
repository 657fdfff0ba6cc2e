use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(label: &str, contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("file_actions_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("client.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = env::temp_dir().join("file_actions_missing_dir/never.toml");
    let settings = load_settings_from(&path, no_env).expect("defaults");
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn file_values_override_defaults_and_keep_the_rest() {
    let path = temp_settings_file(
        "file_values",
        r#"
server_url = "https://files.example.com/"
storage_bucket = "uploads"
"#,
    );

    let settings = load_settings_from(&path, no_env).expect("settings");
    assert_eq!(settings.server_url, "https://files.example.com/");
    assert_eq!(settings.server_base(), "https://files.example.com");
    assert_eq!(settings.storage_bucket, "uploads");
    assert_eq!(settings.storage_project, ClientSettings::default().storage_project);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_overrides_file_values() {
    let path = temp_settings_file("env_override", "storage_bucket = \"from-file\"\n");
    let vars: HashMap<&str, &str> = HashMap::from([
        ("FILE_ACTIONS_STORAGE_BUCKET", "from-env"),
        ("APP__LOCATION", "/shared"),
        ("FILE_ACTIONS_REQUEST_TIMEOUT_SECS", "0"),
    ]);

    let settings =
        load_settings_from(&path, |key| vars.get(key).map(|v| v.to_string())).expect("settings");
    assert_eq!(settings.storage_bucket, "from-env");
    assert_eq!(settings.location, "/shared");
    assert_eq!(settings.request_timeout(), None);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_file_is_an_error() {
    let path = temp_settings_file("malformed", "server_url = [");
    assert!(load_settings_from(&path, no_env).is_err());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn storage_base_rejects_non_hierarchical_urls() {
    let settings = ClientSettings {
        storage_endpoint: "mailto:files@example.com".into(),
        ..ClientSettings::default()
    };
    assert!(settings.storage_base().is_err());
    assert!(ClientSettings::default().storage_base().is_ok());
}
