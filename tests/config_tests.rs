// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use depthcap::Config;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.gallery_enabled, true,
        "Gallery saves should be enabled by default"
    );
    assert!(
        !config.save_folder.is_empty(),
        "Save folder name should not be empty"
    );
    assert!(
        config.export_dir.is_none(),
        "Export directory should default to the documents directory"
    );
}

#[test]
fn test_config_json_roundtrip() {
    let config = Config::default();
    let text = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
