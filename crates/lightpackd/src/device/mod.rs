//! Lighting device model and the collaborators that back it.

mod collaborators;
mod gamma;
mod state;

pub use self::collaborators::{
    LightingSink, MemoryProfileStore, ProfileStore, SharedStatus, StatusSource,
    TracingLightingSink,
};
#[cfg(test)]
pub(crate) use self::collaborators::{MockLightingSink, MockProfileStore, MockStatusSource};
pub use self::gamma::{correct, correct_channel};
pub use self::state::{
    BacklightStatus, DEFAULT_BRIGHTNESS, DEFAULT_GAMMA, DEFAULT_SMOOTH, DeviceState, Rgb,
};

const DEVICE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::device");
