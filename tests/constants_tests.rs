// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use depthcap::constants::SidecarKind;
use std::collections::HashSet;

#[test]
fn test_sidecar_kinds_complete() {
    // One export set is exactly five sidecar files
    assert_eq!(SidecarKind::ALL.len(), 5);
}

#[test]
fn test_sidecar_suffixes_unique() {
    let suffixes: HashSet<&str> = SidecarKind::ALL.iter().map(|k| k.suffix()).collect();
    assert_eq!(
        suffixes.len(),
        SidecarKind::ALL.len(),
        "Sidecar suffixes must be distinct"
    );
}

#[test]
fn test_sidecar_suffix_shapes() {
    for kind in SidecarKind::ALL {
        let suffix = kind.suffix();
        assert!(
            suffix.starts_with('_'),
            "Suffix {:?} should start with an underscore",
            suffix
        );
        assert!(
            suffix.ends_with(".txt") || suffix.ends_with(".bin"),
            "Suffix {:?} should carry a known extension",
            suffix
        );
    }
}

#[test]
fn test_depth_buffer_written_first() {
    // Write order puts the bulk payload first so a metadata failure still
    // leaves the depth plane on disk
    assert_eq!(SidecarKind::ALL[0], SidecarKind::DepthBuffer);
}

#[test]
fn test_sidecar_display_names() {
    for kind in SidecarKind::ALL {
        assert!(
            !kind.display_name().is_empty(),
            "Kind {:?} has empty display name",
            kind
        );
    }
}
