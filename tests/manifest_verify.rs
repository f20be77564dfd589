mod common;

use std::fs;
use std::path::Path;

use common::FakeOps;
use flatpak_browser_integration::manifest::{
    render, verify, AllowList, CHROMIUM_ALLOWED_ORIGINS, FIREFOX_ALLOWED_EXTENSIONS, MANIFEST_FILE,
};

const FIREFOX_ALLOW: AllowList = AllowList::Extensions(FIREFOX_ALLOWED_EXTENSIONS);
const CHROMIUM_ALLOW: AllowList = AllowList::Origins(CHROMIUM_ALLOWED_ORIGINS);

#[test]
fn render_is_byte_stable_across_calls() {
    let wrapper = Path::new("/abs/path/1password-wrapper.sh");
    let a = render(wrapper, FIREFOX_ALLOW).unwrap();
    let b = render(wrapper, FIREFOX_ALLOW).unwrap();
    assert_eq!(a, b);
}

#[test]
fn rendered_manifests_have_the_family_specific_allow_list() {
    let wrapper = Path::new("/abs/path/1password-wrapper.sh");

    let chromium: serde_json::Value =
        serde_json::from_str(&render(wrapper, CHROMIUM_ALLOW).unwrap()).unwrap();
    assert_eq!(chromium["name"], "com.1password.1password");
    assert_eq!(chromium["description"], "1Password BrowserSupport");
    assert_eq!(chromium["path"], "/abs/path/1password-wrapper.sh");
    assert_eq!(chromium["type"], "stdio");
    assert!(chromium.get("allowed_origins").is_some());
    assert!(chromium.get("allowed_extensions").is_none());

    let firefox: serde_json::Value =
        serde_json::from_str(&render(wrapper, FIREFOX_ALLOW).unwrap()).unwrap();
    assert!(firefox.get("allowed_extensions").is_some());
    assert!(firefox.get("allowed_origins").is_none());
    assert_eq!(
        firefox["allowed_extensions"].as_array().unwrap().len(),
        FIREFOX_ALLOWED_EXTENSIONS.len()
    );
}

#[test]
fn verify_is_false_without_touching_attributes_when_wrapper_is_missing() {
    let td = tempfile::tempdir().unwrap();
    let dir = td.path();
    let wrapper = dir.join("missing-wrapper.sh");

    // Manifest content would match if the wrapper existed.
    fs::write(
        dir.join(MANIFEST_FILE),
        render(&wrapper, FIREFOX_ALLOW).unwrap(),
    )
    .unwrap();

    let ops = FakeOps::new();
    let ok = verify(&wrapper, FIREFOX_ALLOW, dir, true, &ops).unwrap();
    assert!(!ok);
    assert_eq!(ops.call_count(), 0, "existence check must come first");
}

#[test]
fn verify_is_false_when_manifest_is_missing() {
    let td = tempfile::tempdir().unwrap();
    let dir = td.path();
    let wrapper = dir.join("wrapper.sh");
    fs::write(&wrapper, "#!/bin/bash\n").unwrap();

    let ops = FakeOps::new();
    assert!(!verify(&wrapper, FIREFOX_ALLOW, dir, false, &ops).unwrap());
}

#[test]
fn verify_requires_the_immutability_attribute_when_asked() {
    let td = tempfile::tempdir().unwrap();
    let dir = td.path();
    let wrapper = dir.join("wrapper.sh");
    fs::write(&wrapper, "#!/bin/bash\n").unwrap();
    let manifest_file = dir.join(MANIFEST_FILE);
    fs::write(&manifest_file, render(&wrapper, FIREFOX_ALLOW).unwrap()).unwrap();

    let ops = FakeOps::new();
    assert!(!verify(&wrapper, FIREFOX_ALLOW, dir, true, &ops).unwrap());
    assert!(verify(&wrapper, FIREFOX_ALLOW, dir, false, &ops).unwrap());

    ops.mark_immutable(&manifest_file);
    assert!(verify(&wrapper, FIREFOX_ALLOW, dir, true, &ops).unwrap());
}

#[test]
fn verify_is_false_on_content_mismatch() {
    let td = tempfile::tempdir().unwrap();
    let dir = td.path();
    let wrapper = dir.join("wrapper.sh");
    fs::write(&wrapper, "#!/bin/bash\n").unwrap();

    // Same wrapper but the wrong family's allow-list.
    fs::write(
        dir.join(MANIFEST_FILE),
        render(&wrapper, CHROMIUM_ALLOW).unwrap(),
    )
    .unwrap();

    let ops = FakeOps::new();
    assert!(!verify(&wrapper, FIREFOX_ALLOW, dir, false, &ops).unwrap());
}
