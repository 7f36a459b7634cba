//! Sysfs attribute discovery via `/sys/class/tty`.
//!
//! Walks the `ttyUSB*` and `ttyACM*` naming families, resolves each node's
//! backing hardware description, and compares the `idVendor`/`idProduct`
//! attribute files against the MAKCU's identifiers. For interface-level
//! nodes (common with ttyACM) the attributes live one directory up, so the
//! parent of the resolved path is checked as well.

use super::{LocateStrategy, USB_PRODUCT_ID, USB_VENDOR_ID};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locate strategy inspecting sysfs hardware attributes.
pub struct SysfsUsbIds {
    /// The tty class directory, normally `/sys/class/tty`.
    class_root: PathBuf,
    /// Prefix for the returned device path, normally `/dev`.
    dev_root: PathBuf,
}

impl SysfsUsbIds {
    /// Create a strategy with explicit sysfs and /dev roots.
    pub fn with_roots(class_root: impl Into<PathBuf>, dev_root: impl Into<PathBuf>) -> Self {
        Self {
            class_root: class_root.into(),
            dev_root: dev_root.into(),
        }
    }

    /// Read a sysfs attribute file, trimming the trailing newline.
    fn read_attribute(path: &Path) -> Option<String> {
        fs::read_to_string(path)
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Check whether a hardware directory carries the MAKCU's VID/PID.
    fn matches_ids(hw_dir: &Path) -> bool {
        let vendor = match Self::read_attribute(&hw_dir.join("idVendor")) {
            Some(v) => v,
            None => return false,
        };
        let product = match Self::read_attribute(&hw_dir.join("idProduct")) {
            Some(p) => p,
            None => return false,
        };

        vendor.eq_ignore_ascii_case(USB_VENDOR_ID) && product.eq_ignore_ascii_case(USB_PRODUCT_ID)
    }
}

impl Default for SysfsUsbIds {
    fn default() -> Self {
        Self::with_roots("/sys/class/tty", "/dev")
    }
}

impl LocateStrategy for SysfsUsbIds {
    fn name(&self) -> &'static str {
        "sysfs_usb_ids"
    }

    fn locate(&self) -> Option<PathBuf> {
        let entries = fs::read_dir(&self.class_root).ok()?;

        for entry in entries.flatten() {
            let dev_name = entry.file_name().to_string_lossy().to_string();
            if !(dev_name.starts_with("ttyUSB") || dev_name.starts_with("ttyACM")) {
                continue;
            }

            let real = match fs::canonicalize(entry.path().join("device")) {
                Ok(p) => p,
                Err(_) => continue,
            };

            // The IDs sit either on the device itself or on its parent
            // (interface nodes point one level below the USB device).
            let mut candidates = vec![real.clone()];
            if let Some(parent) = real.parent() {
                candidates.push(parent.to_path_buf());
            }

            for hw_dir in &candidates {
                if Self::matches_ids(hw_dir) {
                    debug!(
                        "Found device via sysfs: {} ({}:{})",
                        dev_name, USB_VENDOR_ID, USB_PRODUCT_ID
                    );
                    return Some(self.dev_root.join(&dev_name));
                }
            }
        }

        None
    }
}
