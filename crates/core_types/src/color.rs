use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// An 8-bit RGB color, persisted as uppercase `#RRGGBB` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl HexColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn encode(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for HexColor {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(ValidationError::new(
                "color",
                format!("`{value}` is not a #RRGGBB color"),
            ));
        }

        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| ValidationError::new("color", format!("`{value}` is not a #RRGGBB color")))?;

        Ok(Self {
            red: ((packed >> 16) & 0xFF) as u8,
            green: ((packed >> 8) & 0xFF) as u8,
            blue: (packed & 0xFF) as u8,
        })
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_uppercase_with_leading_hash() {
        let color = HexColor::new(0x1A, 0x2B, 0x3C);
        assert_eq!(color.encode(), "#1A2B3C");
    }

    #[test]
    fn round_trips_through_hex_text() {
        let color = HexColor::new(255, 0, 127);
        let encoded = color.encode();
        let decoded: HexColor = encoded.parse().expect("decode");
        assert_eq!(decoded, color);
        assert_eq!(decoded.encode(), encoded);
    }

    #[test]
    fn accepts_lowercase_and_missing_hash() {
        let decoded: HexColor = "a0b1c2".parse().expect("decode");
        assert_eq!(decoded, HexColor::new(0xA0, 0xB1, 0xC2));
        assert_eq!("#a0b1c2".parse::<HexColor>().expect("decode"), decoded);
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "#12345", "#1234567", "#GGGGGG", "red"] {
            let err = bad.parse::<HexColor>().expect_err("should reject");
            assert_eq!(err.field, "color");
        }
    }

    #[test]
    fn serde_uses_the_hex_text() {
        let color = HexColor::new(0, 128, 255);
        let json = serde_json::to_string(&color).expect("serialize");
        assert_eq!(json, "\"#0080FF\"");
        let back: HexColor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, color);
    }
}
