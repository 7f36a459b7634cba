//! Device discovery for the MAKCU accessory.
//!
//! Locating the device is a two-phase best-effort search: the stable-alias
//! directory under `/dev/serial/by-id` is preferred, with sysfs VID/PID
//! attribute inspection as the fallback of record (not every OS/driver
//! combination publishes the alias directory). Each phase is a
//! [`LocateStrategy`]; the [`DeviceLocator`] tries them in order and the
//! first match wins.

pub mod by_id;
pub mod sysfs;

pub use by_id::ByIdAliases;
pub use sysfs::SysfsUsbIds;

use crate::error::{DriverError, DriverResult};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// USB vendor id of the MAKCU's serial bridge (WCH CH343), as the plain-text
/// hex string sysfs publishes.
pub const USB_VENDOR_ID: &str = "1a86";

/// USB product id of the MAKCU's serial bridge.
pub const USB_PRODUCT_ID: &str = "55d3";

/// Trait for device-location strategies.
///
/// A strategy inspects one host enumeration source and either produces a
/// candidate device path or nothing. Errors while scanning (missing
/// directories, unreadable attribute files) are treated as "no match" so the
/// next strategy in line gets its turn.
pub trait LocateStrategy: Send + Sync {
    /// Get the name of this strategy (for logging and debugging).
    fn name(&self) -> &'static str;

    /// Attempt to locate the device, returning its resolved path.
    fn locate(&self) -> Option<PathBuf>;
}

/// Ordered device locator.
///
/// Holds a list of strategies and tries them in sequence. The default set
/// preserves the canonical fallback order: by-id aliases first, then sysfs
/// attribute inspection.
pub struct DeviceLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl DeviceLocator {
    /// Create a locator with the default strategies.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(ByIdAliases::default()),
                Box::new(SysfsUsbIds::default()),
            ],
        }
    }

    /// Create a locator with a custom strategy list, tried in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn LocateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Get all registered strategies.
    pub fn strategies(&self) -> &[Box<dyn LocateStrategy>] {
        &self.strategies
    }

    /// Search every enumeration source for the device.
    ///
    /// Returns the resolved device path of the first match, or
    /// [`DriverError::DeviceNotFound`] once every strategy is exhausted.
    /// There is no partial result: a caller either gets a path or an error.
    pub fn find(&self) -> DriverResult<PathBuf> {
        for strategy in &self.strategies {
            debug!("Trying discovery strategy '{}'", strategy.name());

            if let Some(path) = strategy.locate() {
                info!(
                    "Found MAKCU via strategy '{}': {}",
                    strategy.name(),
                    path.display()
                );
                return Ok(path);
            }

            debug!("Strategy '{}' found no candidate", strategy.name());
        }

        warn!(
            "All {} discovery strategies failed to locate a MAKCU",
            self.strategies.len()
        );
        Err(DriverError::DeviceNotFound)
    }
}

impl Default for DeviceLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverMatches;

    impl LocateStrategy for NeverMatches {
        fn name(&self) -> &'static str {
            "never_matches"
        }

        fn locate(&self) -> Option<PathBuf> {
            None
        }
    }

    struct AlwaysMatches(&'static str);

    impl LocateStrategy for AlwaysMatches {
        fn name(&self) -> &'static str {
            "always_matches"
        }

        fn locate(&self) -> Option<PathBuf> {
            Some(PathBuf::from(self.0))
        }
    }

    #[test]
    fn test_default_strategy_order() {
        let locator = DeviceLocator::new();
        let strategies = locator.strategies();
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].name(), "by_id_aliases");
        assert_eq!(strategies[1].name(), "sysfs_usb_ids");
    }

    #[test]
    fn test_first_match_wins() {
        let locator = DeviceLocator::with_strategies(vec![
            Box::new(NeverMatches),
            Box::new(AlwaysMatches("/dev/ttyACM0")),
            Box::new(AlwaysMatches("/dev/ttyACM9")),
        ]);

        let path = locator.find().unwrap();
        assert_eq!(path, PathBuf::from("/dev/ttyACM0"));
    }

    #[test]
    fn test_exhaustion_is_not_found() {
        let locator = DeviceLocator::with_strategies(vec![Box::new(NeverMatches)]);
        assert!(matches!(locator.find(), Err(DriverError::DeviceNotFound)));
    }
}
