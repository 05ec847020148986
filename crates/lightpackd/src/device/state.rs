//! Device state shared by every API session.

use std::fmt;

/// Gamma applied to colours until a client sets another value.
pub const DEFAULT_GAMMA: f64 = 2.0;

/// Smoothing applied until a client sets another value.
pub const DEFAULT_SMOOTH: u8 = 100;

/// Brightness percentage applied until a client sets another value.
pub const DEFAULT_BRIGHTNESS: u8 = 100;

/// Colour of a single LED.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// All channels off.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Builds a colour from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{},{},{}", self.red, self.green, self.blue)
    }
}

/// Backlight power state as reported over the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BacklightStatus {
    /// Backlight is driving the LEDs.
    On,
    /// Backlight is switched off.
    #[default]
    Off,
    /// The device driver reported a failure.
    DeviceError,
}

impl BacklightStatus {
    /// Token used after `status:` in `getstatus` replies.
    #[must_use]
    pub const fn wire_token(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::DeviceError => "device error",
        }
    }
}

impl fmt::Display for BacklightStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.wire_token())
    }
}

/// Mutable lighting state owned by the API engine.
///
/// Every field is changed only through a validated command, so a snapshot is
/// always internally consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    status: BacklightStatus,
    led_colors: Vec<Rgb>,
    gamma: f64,
    smooth: u8,
    brightness: u8,
    current_profile: String,
}

impl DeviceState {
    /// Builds the initial state for `led_count` LEDs, all black.
    #[must_use]
    pub fn new(led_count: usize, profile: impl Into<String>) -> Self {
        Self {
            status: BacklightStatus::default(),
            led_colors: vec![Rgb::BLACK; led_count],
            gamma: DEFAULT_GAMMA,
            smooth: DEFAULT_SMOOTH,
            brightness: DEFAULT_BRIGHTNESS,
            current_profile: profile.into(),
        }
    }

    /// Last status requested through `setstatus`.
    #[must_use]
    pub const fn status(&self) -> BacklightStatus {
        self.status
    }

    /// Gamma-corrected colours for every LED.
    #[must_use]
    pub fn led_colors(&self) -> &[Rgb] {
        &self.led_colors
    }

    /// Number of addressable LEDs.
    #[must_use]
    pub fn led_count(&self) -> usize {
        self.led_colors.len()
    }

    /// Gamma used to correct incoming colours.
    #[must_use]
    pub const fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Smoothing level.
    #[must_use]
    pub const fn smooth(&self) -> u8 {
        self.smooth
    }

    /// Brightness percentage.
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Profile most recently selected through the API.
    #[must_use]
    pub fn current_profile(&self) -> &str {
        &self.current_profile
    }

    pub(crate) fn set_status(&mut self, status: BacklightStatus) {
        self.status = status;
    }

    /// Writes corrected colours by zero-based LED index.
    ///
    /// Callers validate indices beforehand; out-of-range entries are skipped.
    pub(crate) fn set_colors(&mut self, updates: impl IntoIterator<Item = (usize, Rgb)>) {
        for (index, color) in updates {
            if let Some(slot) = self.led_colors.get_mut(index) {
                *slot = color;
            }
        }
    }

    pub(crate) fn set_gamma(&mut self, gamma: f64) {
        self.gamma = gamma;
    }

    pub(crate) fn set_smooth(&mut self, smooth: u8) {
        self.smooth = smooth;
    }

    pub(crate) fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub(crate) fn set_current_profile(&mut self, profile: &str) {
        profile.clone_into(&mut self.current_profile);
    }
}
