//! Beacon palette
//!
//! The light is a single RGB pixel, so colors are plain 8-bit triples.

pub use smart_leds::RGB8;

pub type Color = RGB8;

/// Light off. Also the resting color when every builder is healthy.
pub const OFF: Color = Color { r: 0, g: 0, b: 0 };

/// Fetch or parse problem on our side, not in the build fleet.
pub const TRANSIENT_ERROR: Color = Color { r: 0, g: 0, b: 200 };

pub const FAILURE: Color = Color { r: 255, g: 0, b: 0 };

/// Infrastructure failures.
pub const EXCEPTION: Color = Color { r: 180, g: 0, b: 180 };

/// Lit half of the emergency pulse; the other half is [`OFF`].
pub const EMERGENCY: Color = Color { r: 255, g: 255, b: 0 };

/// Startup liveness flash.
pub const ATTENTION: Color = Color { r: 180, g: 180, b: 180 };

/// Linear blend between two colors, `amount` in `0..=255`.
///
/// `0` returns `from`, `255` returns `to`.
pub fn blend(from: Color, to: Color, amount: u8) -> Color {
    let mix = |a: u8, b: u8| -> u8 {
        let a = u16::from(a);
        let b = u16::from(b);
        let t = u16::from(amount);
        ((a * (255 - t) + b * t + 127) / 255) as u8
    };
    Color {
        r: mix(from.r, to.r),
        g: mix(from.g, to.g),
        b: mix(from.b, to.b),
    }
}
