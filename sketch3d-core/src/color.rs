/// RGB colors and `#RRGGBB` hex parsing
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res, opt},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::ColorParseError;

/// Divisor applied to 8-bit channels. `0xFF` therefore maps to 0.996, not 1.0.
pub const CHANNEL_DIVISOR: f32 = 256.0;

/// Three color channels, always in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    red: f32,
    green: f32,
    blue: f32,
}

impl Color {
    /// Channels are clamped into `[0, 1]`.
    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red: clamp_channel(red),
            green: clamp_channel(green),
            blue: clamp_channel(blue),
        }
    }

    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red as f32 / CHANNEL_DIVISOR,
            green as f32 / CHANNEL_DIVISOR,
            blue as f32 / CHANNEL_DIVISOR,
        )
    }

    /// Parse `#RRGGBB` (the `#` is optional, digits are case-insensitive).
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        match all_consuming(hex_color)(input.trim()) {
            Ok((_, (r, g, b))) => Ok(Self::from_rgb8(r, g, b)),
            Err(_) => Err(ColorParseError {
                input: input.to_string(),
            }),
        }
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            to_channel8(self.red),
            to_channel8(self.green),
            to_channel8(self.blue),
        )
    }

    /// Uppercase `#RRGGBB`; inverse of [`Color::from_hex`].
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    pub fn channels(&self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }

    /// Channels plus opaque alpha, as handed to a rendering backend.
    pub fn to_rgba(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, 1.0]
    }

    /// Rec. 601 luma.
    pub fn luminance(&self) -> f32 {
        luma(self.red, self.green, self.blue)
    }

    pub fn red() -> Self {
        Self::from_rgb8(0xFF, 0x00, 0x00)
    }

    pub fn green() -> Self {
        Self::from_rgb8(0x00, 0xFF, 0x00)
    }

    pub fn blue() -> Self {
        Self::from_rgb8(0x00, 0x00, 0xFF)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::red()
    }
}

/// Rec. 601 luma of raw channels; backends that only keep `[f32; 4]`
/// pick glyphs or gray levels with it.
pub fn luma(red: f32, green: f32, blue: f32) -> f32 {
    0.299 * red + 0.587 * green + 0.114 * blue
}

fn clamp_channel(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn to_channel8(value: f32) -> u8 {
    (value * CHANNEL_DIVISOR).round().clamp(0.0, 255.0) as u8
}

fn hex_channel(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |digits: &str| u8::from_str_radix(digits, 16),
    )(input)
}

fn hex_color(input: &str) -> IResult<&str, (u8, u8, u8)> {
    preceded(opt(char('#')), tuple((hex_channel, hex_channel, hex_channel)))(input)
}
