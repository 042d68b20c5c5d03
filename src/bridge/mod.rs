//! Device bridge adapter
//!
//! Wraps the external `adb` executable behind a trait seam so the
//! coordinator can be exercised against a mock bridge in tests.

mod adb;

pub use adb::{AdbBridge, PROXY_DISABLE_SENTINEL};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::Device;

#[cfg(windows)]
pub const ADB_EXECUTABLE: &str = "adb.exe";
#[cfg(not(windows))]
pub const ADB_EXECUTABLE: &str = "adb";

/// Operations the coordinator needs from the device bridge
///
/// Implementations never raise: a failed or impossible invocation degrades
/// to an empty listing or a `false` result and logs the cause.
#[async_trait]
pub trait DeviceBridge: Send + Sync {
    /// Enumerate connected devices, with model names for online ones
    async fn list_devices(&self) -> Vec<Device>;

    /// Write the global proxy setting on a device; true on exit code zero
    async fn set_device_proxy(&self, device_id: &str, host: &str, port: u16) -> bool;

    /// Disable the global proxy setting on a device
    async fn clear_device_proxy(&self, device_id: &str) -> bool;
}

/// Locate the adb executable
///
/// Order: explicit override, `platform-tools/` next to the running
/// executable, the executable's own directory, then PATH. Returns `None`
/// when nothing resolves; bridge operations then degrade instead of
/// crashing.
pub fn locate_adb(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!(
            "Configured bridge executable {} does not exist, falling back to discovery",
            path.display()
        );
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(found) = locate_near(dir) {
                return Some(found);
            }
        }
    }

    find_in_path()
}

/// Resolve adb relative to an install directory (bundled or loose layout)
fn locate_near(dir: &Path) -> Option<PathBuf> {
    let bundled = dir.join("platform-tools").join(ADB_EXECUTABLE);
    if bundled.is_file() {
        return Some(bundled);
    }

    let loose = dir.join(ADB_EXECUTABLE);
    if loose.is_file() {
        return Some(loose);
    }

    None
}

fn find_in_path() -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(ADB_EXECUTABLE))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_locate_near_prefers_platform_tools() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("platform-tools")).unwrap();
        fs::write(dir.path().join("platform-tools").join(ADB_EXECUTABLE), "").unwrap();
        fs::write(dir.path().join(ADB_EXECUTABLE), "").unwrap();

        let found = locate_near(dir.path()).unwrap();
        assert_eq!(
            found,
            dir.path().join("platform-tools").join(ADB_EXECUTABLE)
        );
    }

    #[test]
    fn test_locate_near_falls_back_to_loose_layout() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(ADB_EXECUTABLE), "").unwrap();

        let found = locate_near(dir.path()).unwrap();
        assert_eq!(found, dir.path().join(ADB_EXECUTABLE));
    }

    #[test]
    fn test_locate_near_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(locate_near(dir.path()).is_none());
    }

    #[test]
    fn test_locate_adb_honors_override() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("my-adb");
        fs::write(&custom, "").unwrap();

        assert_eq!(locate_adb(Some(&custom)), Some(custom));
    }
}
