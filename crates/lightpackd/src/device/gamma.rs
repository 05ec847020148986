//! Gamma correction applied to colours before they reach the lighting sink.

use super::state::Rgb;

/// Corrects a single channel: `round(256 * (value / 256) ^ gamma)`, clamped to
/// the channel range.
#[must_use]
pub fn correct_channel(value: u8, gamma: f64) -> u8 {
    let normalised = f64::from(value) / 256.0;
    let corrected = (256.0 * normalised.powf(gamma)).round();
    corrected.clamp(0.0, 255.0) as u8
}

/// Corrects every channel of `color`.
#[must_use]
pub fn correct(color: Rgb, gamma: f64) -> Rgb {
    Rgb::new(
        correct_channel(color.red, gamma),
        correct_channel(color.green, gamma),
        correct_channel(color.blue, gamma),
    )
}
