//! # Bootstrap Constants
//!
//! Timing, layout, and naming constants for the bring-up sequence. These are
//! the single source of truth for values shared between the extractor, the
//! pool, and the controller.
//!
//! ## Cross-References
//!
//! - [`crate::extract`]: Uses the resource layout and temp-dir naming.
//! - [`crate::pool`]: Uses the pool capacity.
//! - [`crate::bootstrap`]: Uses the warm-up delay.
//! - [`crate::instance`]: Uses the entry symbol.
//! - [`crate::config`]: Uses the env vars and file locations.

use std::time::Duration;

// =============================================================================
// Warm-up & Pool
// =============================================================================

/// Delay before a background warm-up starts constructing the next instance.
///
/// **Rationale**: the currently-starting instance is loading its project and
/// competing for CPU; deferring the next construction keeps the visible
/// startup fast. The very first instance is built with no delay.
pub const WARMUP_DELAY: Duration = Duration::from_millis(3000);

/// Capacity of the instance hand-off pool.
///
/// **Invariant**: exactly 1. A producer awaiting on a full slot is what
/// enforces at-most-one-instance-ahead pre-warming; raising this would
/// silently build instances nobody asked for.
pub const POOL_CAPACITY: usize = 1;

// =============================================================================
// Native Resource Layout
// =============================================================================

/// Directory under the resource root holding native artifacts.
///
/// Layout: `{resource_root}/lib/{platform-pair}/{artifact-filename}`.
/// Absence of an artifact for a platform is expected, not an error.
pub const NATIVE_RESOURCE_DIR: &str = "lib";

/// Prefix for the uniquely-named temp directory native artifacts are
/// extracted into. The directory is left for OS temp cleanup; deleting it at
/// exit would race native code still mapped from it.
pub const NATIVE_DIR_PREFIX: &str = "warmstart-native";

// =============================================================================
// Application Entry Contract
// =============================================================================

/// Constructor symbol the application library must export.
///
/// Signature: `fn(BootstrapHandle, ContextHandle) -> Result<Box<dyn AppInstance>>`.
/// This is the sole static coupling between the launcher and the application.
pub const APP_ENTRY_SYMBOL: &[u8] = b"warmstart_app_create";

// =============================================================================
// Environment Variables
// =============================================================================

/// Code search path for application libraries, split like `PATH`.
///
/// Plays the role the JVM's `java.class.path` plays for the original
/// launcher: the list of locations an isolated context resolves code from.
pub const APP_PATH_ENV: &str = "WARMSTART_APP_PATH";

/// Override for the bundled resource root directory.
pub const RESOURCE_ROOT_ENV: &str = "WARMSTART_RESOURCE_ROOT";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration directory name under the user's home directory.
pub const CONFIG_DIR: &str = ".warmstart";

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.json";
