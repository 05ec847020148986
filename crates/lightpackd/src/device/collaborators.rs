//! Collaborators the API engine drives or polls.
//!
//! Implementations are called while the engine holds its state mutex, so they
//! must return promptly and must not call back into the engine.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::DEVICE_TARGET;
use super::state::{BacklightStatus, Rgb};

/// Settings store that owns the profile catalogue.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore: Send + Sync {
    /// Ordered profile names.
    fn profiles(&self) -> Vec<String>;

    /// Name of the active profile.
    fn current_profile(&self) -> String;

    /// Makes `name` the active profile. Unknown names are the store's concern.
    fn activate(&self, name: &str);
}

/// Receives validated lighting values.
#[cfg_attr(test, mockall::automock)]
pub trait LightingSink: Send + Sync {
    /// Full, gamma-corrected LED array.
    fn apply_colors(&self, colors: &[Rgb]);

    /// New gamma value.
    fn apply_gamma(&self, gamma: f64);

    /// New smoothing level.
    fn apply_smooth(&self, smooth: u8);

    /// Requested backlight status.
    fn apply_status(&self, status: BacklightStatus);

    /// Brightness percentage.
    fn apply_brightness(&self, brightness: u8);
}

/// Reports the live backlight status.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSource: Send + Sync {
    /// Current status.
    fn current_status(&self) -> BacklightStatus;
}

#[derive(Debug)]
struct ProfileCatalog {
    names: Vec<String>,
    current: String,
}

/// In-memory profile catalogue.
#[derive(Debug)]
pub struct MemoryProfileStore {
    catalog: Mutex<ProfileCatalog>,
}

impl MemoryProfileStore {
    /// Builds a store with `names` in order and `current` active.
    #[must_use]
    pub fn new(names: Vec<String>, current: impl Into<String>) -> Self {
        Self {
            catalog: Mutex::new(ProfileCatalog {
                names,
                current: current.into(),
            }),
        }
    }

    /// Builds a store holding a single active profile.
    #[must_use]
    pub fn single(name: &str) -> Self {
        Self::new(vec![name.to_owned()], name)
    }
}

impl ProfileStore for MemoryProfileStore {
    fn profiles(&self) -> Vec<String> {
        let catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        catalog.names.clone()
    }

    fn current_profile(&self) -> String {
        let catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        catalog.current.clone()
    }

    fn activate(&self, name: &str) {
        let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        name.clone_into(&mut catalog.current);
    }
}

/// Status cell shared between a sink and the status source.
#[derive(Debug, Default)]
pub struct SharedStatus {
    status: Mutex<BacklightStatus>,
}

impl SharedStatus {
    /// Builds a cell holding `status`.
    #[must_use]
    pub fn new(status: BacklightStatus) -> Self {
        Self {
            status: Mutex::new(status),
        }
    }

    /// Replaces the stored status.
    pub fn set(&self, status: BacklightStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

impl StatusSource for SharedStatus {
    fn current_status(&self) -> BacklightStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sink that logs applied values and mirrors status into a [`SharedStatus`].
///
/// Used when no hardware pipeline is attached.
#[derive(Debug, Clone)]
pub struct TracingLightingSink {
    status: Arc<SharedStatus>,
}

impl TracingLightingSink {
    /// Builds a sink that publishes status changes to `status`.
    #[must_use]
    pub fn new(status: Arc<SharedStatus>) -> Self {
        Self { status }
    }
}

impl LightingSink for TracingLightingSink {
    fn apply_colors(&self, colors: &[Rgb]) {
        debug!(
            target: DEVICE_TARGET,
            leds = colors.len(),
            colors = ?colors,
            "colours applied"
        );
    }

    fn apply_gamma(&self, gamma: f64) {
        debug!(target: DEVICE_TARGET, gamma, "gamma applied");
    }

    fn apply_smooth(&self, smooth: u8) {
        debug!(target: DEVICE_TARGET, smooth, "smoothing applied");
    }

    fn apply_status(&self, status: BacklightStatus) {
        self.status.set(status);
        debug!(target: DEVICE_TARGET, status = %status, "status applied");
    }

    fn apply_brightness(&self, brightness: u8) {
        debug!(target: DEVICE_TARGET, brightness, "brightness applied");
    }
}
