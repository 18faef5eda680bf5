use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PipelineError, PipelineResult};

/// Single RGB series color, sent to the service as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    /// Plotly's first palette entry, used as the default series color.
    pub const DEFAULT: RgbColor = RgbColor::rgb(0x1f, 0x77, 0xb4);

    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#rrggbb`, `rrggbb`, or the `#rgb` shorthand.
    pub fn from_hex(input: &str) -> PipelineResult<Self> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid_hex(input));
        }

        match digits.len() {
            6 => {
                let channel = |range: std::ops::Range<usize>| {
                    u8::from_str_radix(&digits[range], 16).map_err(|_| invalid_hex(input))
                };
                Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
            }
            3 => {
                let channel = |index: usize| {
                    u8::from_str_radix(&digits[index..=index], 16)
                        .map(|nibble| nibble * 0x11)
                        .map_err(|_| invalid_hex(input))
                };
                Ok(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid_hex(input)),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

fn invalid_hex(input: &str) -> PipelineError {
    PipelineError::InvalidData(format!("color `{input}` is not a hex RGB value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(RgbColor::from_hex("#1f77b4").unwrap(), RgbColor::DEFAULT);
        assert_eq!(RgbColor::from_hex("1F77B4").unwrap(), RgbColor::DEFAULT);
        assert_eq!(
            RgbColor::from_hex("#f0a").unwrap(),
            RgbColor::rgb(0xff, 0x00, 0xaa)
        );
    }

    #[test]
    fn rejects_malformed_values() {
        for input in ["", "#", "#12345", "#1234567", "#gg0000", "red"] {
            assert!(RgbColor::from_hex(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn hex_output_is_lowercase_with_hash() {
        assert_eq!(RgbColor::rgb(255, 0, 10).to_hex(), "#ff000a");
        let json = serde_json::to_string(&RgbColor::DEFAULT).unwrap();
        assert_eq!(json, "\"#1f77b4\"");
    }
}
