//! Native dependency extraction.
//!
//! Copies the current platform's native artifacts from the bundled resource
//! tree into a fresh temporary directory and publishes that directory as the
//! process-wide native library search location. Extraction is best-effort per
//! artifact: a missing resource is expected, a failed copy is logged, and the
//! task as a whole still completes. The controller waits on completion, not
//! on per-file success.

use crate::constants::{NATIVE_DIR_PREFIX, NATIVE_RESOURCE_DIR};
use crate::error::{Error, Result};
use crate::platform::Platform;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Outcome of a completed extraction run.
///
/// The temp directory is written once and read-only afterwards. It is never
/// deleted by this subsystem: native code stays mapped from it for the life
/// of the process, so cleanup is deliberately left to the OS temp reaper.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Absolute path of the directory holding the extracted artifacts.
    pub lib_dir: PathBuf,
    /// Number of artifacts actually copied (listed minus missing).
    pub copied: usize,
}

// =============================================================================
// Process-wide native configuration
// =============================================================================
//
// Written exactly once by the extraction task, read by any later code that
// resolves native libraries. A OnceLock keeps the write-once/read-only
// discipline without touching process environment variables.
// =============================================================================

static NATIVE_SEARCH_PATH: OnceLock<PathBuf> = OnceLock::new();
static NATIVE_TEMP_CACHE_DISABLED: AtomicBool = AtomicBool::new(false);

/// Publishes the extraction directory as the process-wide native search path
/// and disables the secondary native temp-cache mechanism.
///
/// A second publication in the same process is ignored with a warning; the
/// first extraction wins.
pub fn publish_native_search_path(result: &ExtractionResult) {
    if NATIVE_SEARCH_PATH.set(result.lib_dir.clone()).is_err() {
        warn!(
            "native search path already published, ignoring {}",
            result.lib_dir.display()
        );
        return;
    }
    NATIVE_TEMP_CACHE_DISABLED.store(true, Ordering::Release);
    info!("native search path: {}", result.lib_dir.display());
}

/// Returns the published native library search path, if extraction has
/// completed and published one.
pub fn native_search_path() -> Option<&'static Path> {
    NATIVE_SEARCH_PATH.get().map(PathBuf::as_path)
}

/// Returns true once the secondary native temp-cache mechanism has been
/// disabled (set alongside the search path publication).
pub fn native_temp_cache_disabled() -> bool {
    NATIVE_TEMP_CACHE_DISABLED.load(Ordering::Acquire)
}

// =============================================================================
// Extractor
// =============================================================================

/// Copies platform native artifacts out of the bundled resource tree.
///
/// Artifacts are looked up under `{resource_root}/lib/{pair}/{name}`; not
/// every artifact ships for every platform, so absences are skipped silently.
pub struct NativeExtractor {
    resource_root: PathBuf,
}

impl NativeExtractor {
    /// Creates an extractor reading from the given resource root.
    pub fn new(resource_root: impl Into<PathBuf>) -> Self {
        Self {
            resource_root: resource_root.into(),
        }
    }

    /// Extracts the current platform's artifacts into a fresh temp directory.
    pub fn extract(&self) -> Result<ExtractionResult> {
        let platform = Platform::current()?;
        self.extract_for(platform)
    }

    /// Extracts the given platform's artifacts into a fresh temp directory.
    pub fn extract_for(&self, platform: Platform) -> Result<ExtractionResult> {
        let lib_dir = std::env::temp_dir().join(format!(
            "{}-{}",
            NATIVE_DIR_PREFIX,
            uuid::Uuid::now_v7()
        ));
        fs::create_dir_all(&lib_dir).map_err(|e| Error::NativeDirSetup {
            path: lib_dir.clone(),
            source: e,
        })?;
        debug!("native library dir: {}", lib_dir.display());

        let mut copied = 0;
        for name in platform.native_artifacts() {
            let resource = self
                .resource_root
                .join(NATIVE_RESOURCE_DIR)
                .join(platform.pair())
                .join(name);
            if !resource.is_file() {
                // Expected: not every artifact exists for every platform.
                continue;
            }
            debug!("extracting {}", resource.display());
            match fs::copy(&resource, lib_dir.join(name)) {
                Ok(_) => copied += 1,
                Err(e) => warn!("failed to extract {}: {}", resource.display(), e),
            }
        }

        info!(
            "extracted {} native artifacts for {} into {}",
            copied,
            platform,
            lib_dir.display()
        );
        Ok(ExtractionResult { lib_dir, copied })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_empty_resource_root_completes() {
        // No resources at all: extraction still completes with zero files.
        let root = std::env::temp_dir().join(format!("warmstart-empty-{}", uuid::Uuid::now_v7()));
        let extractor = NativeExtractor::new(&root);
        let result = extractor.extract_for(Platform::X86_64Linux).unwrap();
        assert_eq!(result.copied, 0);
        assert!(result.lib_dir.is_dir());
    }
}
