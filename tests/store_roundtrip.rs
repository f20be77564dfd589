use std::fs;
use std::path::PathBuf;

use flatpak_browser_integration::error::Error;
use flatpak_browser_integration::registry::{BrowserFamily, Registry};
use flatpak_browser_integration::store::{config_path, load, save, ConfigRecord};

const FLOORP: &str = "one.ablaze.floorp";

fn sample_record(home: &std::path::Path) -> ConfigRecord {
    ConfigRecord {
        flatpak_browser_id: FLOORP.to_string(),
        browser_type: BrowserFamily::Firefox,
        wrapper_path: home.join(".var/app").join(FLOORP).join("data/bin/1password-wrapper.sh"),
        manifest_path: home
            .join(".var/app")
            .join(FLOORP)
            .join(".mozilla/native-messaging-hosts/com.1password.1password.json"),
    }
}

#[test]
fn save_then_load_round_trips() {
    let td = tempfile::tempdir().unwrap();
    let home = td.path();
    let registry = Registry::with_installed(vec![FLOORP.to_string()]);

    let record = sample_record(home);
    save(home, &record).unwrap();

    let loaded = load(home, &registry).unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn load_returns_none_when_no_record_exists() {
    let td = tempfile::tempdir().unwrap();
    let registry = Registry::with_installed(vec![FLOORP.to_string()]);
    assert!(load(td.path(), &registry).unwrap().is_none());
}

#[test]
fn stale_record_for_uninstalled_browser_is_fatal() {
    let td = tempfile::tempdir().unwrap();
    let home = td.path();
    let registry = Registry::with_installed(vec!["com.google.Chrome".to_string()]);

    let record = ConfigRecord {
        flatpak_browser_id: "com.example.Removed".to_string(),
        browser_type: BrowserFamily::Chromium,
        wrapper_path: PathBuf::from("/tmp/wrapper.sh"),
        manifest_path: PathBuf::from("/tmp/manifest.json"),
    };
    save(home, &record).unwrap();

    let err = load(home, &registry).expect_err("stale record must not be reused");
    assert!(matches!(err, Error::BrowserNotInstalled(id) if id == "com.example.Removed"));
}

#[test]
fn save_never_overwrites_an_existing_record() {
    let td = tempfile::tempdir().unwrap();
    let home = td.path();
    let registry = Registry::with_installed(vec![FLOORP.to_string()]);

    let original = sample_record(home);
    save(home, &original).unwrap();

    let mut replacement = original.clone();
    replacement.flatpak_browser_id = "com.google.Chrome".to_string();
    save(home, &replacement).unwrap();

    let loaded = load(home, &registry).unwrap().unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn record_uses_the_original_json_keys() {
    let td = tempfile::tempdir().unwrap();
    let home = td.path();
    save(home, &sample_record(home)).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config_path(home)).unwrap()).unwrap();
    assert_eq!(json["flatpak_browser_id"], FLOORP);
    assert_eq!(json["browser_type"], "firefox");
    assert!(json.get("wrapper_path").is_some());
    assert!(json.get("manifest_path").is_some());
    assert_eq!(json.as_object().unwrap().len(), 4);
}
