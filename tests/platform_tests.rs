//! Tests for platform resolution and the native artifact map.
//!
//! Validates pair-string formatting, full coverage of the artifact map, and
//! the shared-slice aliasing between related platforms.

use warmstart::Platform;

// =============================================================================
// Platform Resolution Tests
// =============================================================================

#[test]
fn test_current_platform_matches_compile_target() {
    let platform = Platform::current().expect("host platform should resolve");

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    assert_eq!(platform, Platform::X86_64Linux);

    #[cfg(all(target_os = "macos", target_arch = "x86_64"))]
    assert_eq!(platform, Platform::X86_64Darwin);

    #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
    assert_eq!(platform, Platform::Arm64Darwin);

    #[cfg(all(target_os = "windows", target_arch = "x86_64"))]
    assert_eq!(platform, Platform::X86_64Win32);

    let _ = platform;
}

#[test]
fn test_pair_is_arch_dash_os() {
    for platform in Platform::all() {
        let pair = platform.pair();
        assert!(
            pair.contains('-'),
            "pair '{}' should be '{{arch}}-{{os}}'",
            pair
        );
        assert_eq!(pair, format!("{}", platform));
    }
}

#[test]
fn test_pairs_are_unique() {
    let mut pairs: Vec<&str> = Platform::all().iter().map(|p| p.pair()).collect();
    pairs.sort_unstable();
    pairs.dedup();
    assert_eq!(pairs.len(), Platform::all().len());
}

// =============================================================================
// Native Artifact Map Tests
// =============================================================================

#[test]
fn test_every_platform_is_in_the_artifact_map() {
    // For all supported platforms, resolution yields a populated artifact set.
    for platform in Platform::all() {
        let artifacts = platform.native_artifacts();
        assert!(
            !artifacts.is_empty(),
            "platform {} has no artifacts",
            platform
        );
    }
}

#[test]
fn test_aliased_platforms_share_one_set() {
    // Aliases are shared references to one static slice, not copies.
    let x86 = Platform::X86Linux.native_artifacts();
    let x86_64 = Platform::X86_64Linux.native_artifacts();
    assert!(std::ptr::eq(x86, x86_64));

    let darwin_x86_64 = Platform::X86_64Darwin.native_artifacts();
    let darwin_arm64 = Platform::Arm64Darwin.native_artifacts();
    assert!(std::ptr::eq(darwin_x86_64, darwin_arm64));

    let win_x86 = Platform::X86Win32.native_artifacts();
    let win_x86_64 = Platform::X86_64Win32.native_artifacts();
    assert!(std::ptr::eq(win_x86, win_x86_64));
}

#[test]
fn test_artifact_names_match_platform_conventions() {
    for name in Platform::X86_64Linux.native_artifacts() {
        assert!(name.ends_with(".so"), "unexpected linux artifact {}", name);
    }
    for name in Platform::Arm64Darwin.native_artifacts() {
        assert!(
            name.ends_with(".dylib"),
            "unexpected darwin artifact {}",
            name
        );
    }
    for name in Platform::X86_64Win32.native_artifacts() {
        assert!(name.ends_with(".dll"), "unexpected win32 artifact {}", name);
    }
}
