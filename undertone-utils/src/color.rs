//! Strict hex color handling used by the undertone classifier and the skin analyzer.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing color strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The input is not a six-digit hexadecimal color.
    #[error("invalid hex code '{input}': {reason}")]
    InvalidFormat {
        /// The raw input as received.
        input: String,
        /// Human readable reason.
        reason: &'static str,
    },
}

/// Simple RGB color stored in 8-bit channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse a `#RRGGBB` / `RRGGBB` string.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let (red, green, blue) = hex_to_rgb(input)?;
        Ok(Self::new(red, green, blue))
    }

    /// Format as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        to_hex(self.red, self.green, self.blue)
    }

    pub const fn channels(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Convert a six-digit hex color into RGB channels.
///
/// A single leading `#` is optional. Anything other than exactly six
/// hexadecimal digits after it is rejected with [`ColorError::InvalidFormat`].
///
/// ```rust
/// # use undertone_utils::color::hex_to_rgb;
/// assert_eq!(hex_to_rgb("#FF0000").unwrap(), (255, 0, 0));
/// assert!(hex_to_rgb("FFF").is_err());
/// ```
pub fn hex_to_rgb(input: &str) -> Result<(u8, u8, u8), ColorError> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() != 6 {
        return Err(ColorError::InvalidFormat {
            input: input.to_string(),
            reason: "must be 6 characters long (e.g. 'EDBEAB')",
        });
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidFormat {
            input: input.to_string(),
            reason: "contains non-hexadecimal characters",
        });
    }

    // All six bytes are ASCII hex digits, so slicing on byte offsets is safe.
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| ColorError::InvalidFormat {
            input: input.to_string(),
            reason: "contains non-hexadecimal characters",
        })
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format RGB channels as an uppercase `#RRGGBB` string.
pub fn to_hex(red: u8, green: u8, blue: u8) -> String {
    format!("#{red:02X}{green:02X}{blue:02X}")
}
