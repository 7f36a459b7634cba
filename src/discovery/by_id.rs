//! Stable-alias discovery via `/dev/serial/by-id`.
//!
//! udev keys the entries in this directory by vendor/product strings, so a
//! case-insensitive containment check on the entry name is enough to pick
//! out the MAKCU. The symlink is resolved to the real device node before
//! being returned.

use super::{LocateStrategy, USB_VENDOR_ID};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Marker substring identifying the device class in alias names.
const BY_ID_MARKER: &str = "usb_single_serial";

/// Locate strategy scanning the stable-alias directory.
pub struct ByIdAliases {
    /// Directory of by-id symlinks; overridable for tests.
    root: PathBuf,
}

impl ByIdAliases {
    /// Create a strategy scanning a specific alias directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ByIdAliases {
    fn default() -> Self {
        Self::with_root("/dev/serial/by-id")
    }
}

impl LocateStrategy for ByIdAliases {
    fn name(&self) -> &'static str {
        "by_id_aliases"
    }

    fn locate(&self) -> Option<PathBuf> {
        let entries = fs::read_dir(&self.root).ok()?;

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if !(name.contains(USB_VENDOR_ID) && name.contains(BY_ID_MARKER)) {
                continue;
            }

            // Resolve the symlink to the real device node.
            if let Ok(real) = fs::canonicalize(entry.path()) {
                debug!(
                    "Found device via by-id: {} -> {}",
                    entry.path().display(),
                    real.display()
                );
                return Some(real);
            }
        }

        None
    }
}
