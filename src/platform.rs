//! Platform detection and the native artifact map.
//!
//! Resolves the current OS/architecture pair once at process start and maps
//! each supported pair to the native binary artifacts it requires.

use crate::error::{Error, Result};

/// A supported OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    X86Linux,
    X86_64Linux,
    Arm64Linux,
    X86_64Darwin,
    Arm64Darwin,
    X86Win32,
    X86_64Win32,
}

/// Native artifacts shared by all Linux platforms.
static LINUX_ARTIFACTS: &[&str] = &[
    "librender_gl.so",
    "librender_vk.so",
    "libwindow_x11.so",
    "libwindow_wayland.so",
    "libinput_evdev.so",
    "libcodec_av.so",
];

/// Native artifacts shared by all Darwin platforms.
static DARWIN_ARTIFACTS: &[&str] = &[
    "librender_gl.dylib",
    "librender_mtl.dylib",
    "libwindow_cocoa.dylib",
    "libwindow_offscreen.dylib",
    "libinput_hid.dylib",
    "libcodec_av.dylib",
];

/// Native artifacts shared by all Windows platforms.
static WIN32_ARTIFACTS: &[&str] = &[
    "render_gl.dll",
    "render_d3d.dll",
    "window_win32.dll",
    "window_offscreen.dll",
    "input_rawinput.dll",
    "codec_av.dll",
];

impl Platform {
    /// Resolves the current platform from compile-time environment
    /// introspection.
    ///
    /// Fails with [`Error::UnsupportedPlatform`] on an unrecognized pair;
    /// bring-up must abort rather than silently skip native setup.
    pub fn current() -> Result<Self> {
        #[cfg(all(target_os = "linux", target_arch = "x86"))]
        return Ok(Self::X86Linux);

        #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
        return Ok(Self::X86_64Linux);

        #[cfg(all(target_os = "linux", target_arch = "aarch64"))]
        return Ok(Self::Arm64Linux);

        #[cfg(all(target_os = "macos", target_arch = "x86_64"))]
        return Ok(Self::X86_64Darwin);

        #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
        return Ok(Self::Arm64Darwin);

        #[cfg(all(target_os = "windows", target_arch = "x86"))]
        return Ok(Self::X86Win32);

        #[cfg(all(target_os = "windows", target_arch = "x86_64"))]
        return Ok(Self::X86_64Win32);

        #[cfg(not(any(
            all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")),
            all(target_os = "macos", any(target_arch = "x86_64", target_arch = "aarch64")),
            all(target_os = "windows", any(target_arch = "x86", target_arch = "x86_64")),
        )))]
        return Err(Error::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        });
    }

    /// All supported platforms.
    pub fn all() -> &'static [Platform] {
        &[
            Self::X86Linux,
            Self::X86_64Linux,
            Self::Arm64Linux,
            Self::X86_64Darwin,
            Self::Arm64Darwin,
            Self::X86Win32,
            Self::X86_64Win32,
        ]
    }

    /// Returns the `{arch}-{os}` pair string used in the resource layout
    /// (e.g. `"x86_64-linux"`).
    pub fn pair(&self) -> &'static str {
        match self {
            Self::X86Linux => "x86-linux",
            Self::X86_64Linux => "x86_64-linux",
            Self::Arm64Linux => "arm64-linux",
            Self::X86_64Darwin => "x86_64-darwin",
            Self::Arm64Darwin => "arm64-darwin",
            Self::X86Win32 => "x86-win32",
            Self::X86_64Win32 => "x86_64-win32",
        }
    }

    /// Returns the native artifacts this platform requires.
    ///
    /// Platforms of the same OS family alias one shared `'static` slice
    /// rather than carrying copies; the map is fully populated before use
    /// and never mutated.
    pub fn native_artifacts(&self) -> &'static [&'static str] {
        match self {
            Self::X86Linux | Self::X86_64Linux | Self::Arm64Linux => LINUX_ARTIFACTS,
            Self::X86_64Darwin | Self::Arm64Darwin => DARWIN_ARTIFACTS,
            Self::X86Win32 | Self::X86_64Win32 => WIN32_ARTIFACTS,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pair())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform_is_supported() {
        let platform = Platform::current().expect("host platform should be supported");
        assert!(Platform::all().contains(&platform));
    }

    #[test]
    fn test_every_platform_has_artifacts() {
        for platform in Platform::all() {
            assert!(
                !platform.native_artifacts().is_empty(),
                "platform {} has no artifact set",
                platform
            );
        }
    }
}
