//! Colour type, parsing, and packed pixel conversions.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{PakError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RGBA` (4 digits, expanded to 8)
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        let nibbles = hex.chars().map(parse_hex_digit).collect::<Result<Vec<u8>>>()?;

        let channels: Vec<u8> = match nibbles.len() {
            3 | 4 => nibbles.iter().map(|&n| n << 4 | n).collect(),
            6 | 8 => nibbles.chunks(2).map(|pair| pair[0] << 4 | pair[1]).collect(),
            _ => {
                return Err(PakError::Parse {
                    message: format!("Invalid hex colour: {}", s),
                    help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
                })
            }
        };
        let alpha = channels.get(3).copied().unwrap_or(255);
        Ok(Self::new(channels[0], channels[1], channels[2], alpha))
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Read a colour stored as B, G, R, A bytes.
    pub fn from_bgra(bytes: [u8; 4]) -> Self {
        Self::new(bytes[2], bytes[1], bytes[0], bytes[3])
    }

    /// Write the colour as B, G, R, A bytes.
    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    /// Unpack an `A RRRRR GGGGG BBBBB` pixel.
    pub fn from_argb1555(v: u16) -> Self {
        let expand = |c: u16| -> u8 {
            let c = (c & 0x1F) as u8;
            (c << 3) | (c >> 2)
        };
        let a = if v & 0x8000 != 0 { 255 } else { 0 };
        Self::new(expand(v >> 10), expand(v >> 5), expand(v), a)
    }

    /// Pack into `A RRRRR GGGGG BBBBB`. Alpha survives as a single bit.
    pub fn to_argb1555(self) -> u16 {
        let a = if self.a >= 128 { 0x8000 } else { 0 };
        a | ((self.r as u16 >> 3) << 10) | ((self.g as u16 >> 3) << 5) | (self.b as u16 >> 3)
    }

    /// Unpack an `AAAA RRRR GGGG BBBB` pixel.
    pub fn from_argb4444(v: u16) -> Self {
        let nibble = |shift: u16| ((v >> shift) & 0xF) as u8 * 17;
        Self::new(nibble(8), nibble(4), nibble(0), nibble(12))
    }

    /// Pack into `AAAA RRRR GGGG BBBB`.
    pub fn to_argb4444(self) -> u16 {
        let nibble = |c: u8| (c as u16 + 8) / 17;
        (nibble(self.a) << 12) | (nibble(self.r) << 8) | (nibble(self.g) << 4) | nibble(self.b)
    }

    /// Squared RGBA distance, used for nearest-palette matching.
    pub fn distance(self, other: Colour) -> u32 {
        let d = |a: u8, b: u8| {
            let diff = a as i32 - b as i32;
            (diff * diff) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b) + d(self.a, other.a)
    }
}

impl From<image::Rgba<u8>> for Colour {
    fn from(px: image::Rgba<u8>) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }
}

impl From<Colour> for image::Rgba<u8> {
    fn from(c: Colour) -> Self {
        image::Rgba(c.to_rgba())
    }
}

impl Serialize for Colour {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pixel classification of an entity, stored as an `i32` tag on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKind {
    Argb1555,
    Argb4444,
    Argb8888,
    /// Reference to another entity's image.
    Link,
}

impl ColorKind {
    pub const fn tag(self) -> i32 {
        match self {
            ColorKind::Argb1555 => 0x0E,
            ColorKind::Argb4444 => 0x0F,
            ColorKind::Argb8888 => 0x10,
            ColorKind::Link => 0x11,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            0x0E => Ok(ColorKind::Argb1555),
            0x0F => Ok(ColorKind::Argb4444),
            0x10 => Ok(ColorKind::Argb8888),
            0x11 => Ok(ColorKind::Link),
            _ => Err(PakError::decode(format!("Unknown colour kind 0x{:02X}", tag))),
        }
    }

    /// Bytes per pixel of an unpaletted payload.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorKind::Argb8888 => 4,
            ColorKind::Argb1555 | ColorKind::Argb4444 => 2,
            ColorKind::Link => 0,
        }
    }
}

impl FromStr for ColorKind {
    type Err = PakError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "argb1555" | "1555" => Ok(ColorKind::Argb1555),
            "argb4444" | "4444" => Ok(ColorKind::Argb4444),
            "argb8888" | "8888" => Ok(ColorKind::Argb8888),
            "link" => Ok(ColorKind::Link),
            _ => Err(PakError::Parse {
                message: format!("Unknown colour kind: {}", s),
                help: Some("Use argb1555, argb4444, argb8888 or link".to_string()),
            }),
        }
    }
}

impl fmt::Display for ColorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorKind::Argb1555 => "argb1555",
            ColorKind::Argb4444 => "argb4444",
            ColorKind::Argb8888 => "argb8888",
            ColorKind::Link => "link",
        };
        f.write_str(name)
    }
}

/// Payload compression tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Zlib,
}

impl Compression {
    pub const fn tag(self) -> i32 {
        match self {
            Compression::None => 0x05,
            Compression::Zlib => 0x06,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            0x05 => Ok(Compression::None),
            0x06 => Ok(Compression::Zlib),
            _ => Err(PakError::decode(format!("Unknown compression tag 0x{:02X}", tag))),
        }
    }
}

impl FromStr for Colour {
    type Err = PakError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| PakError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        let c = Colour::from_hex("#FF0000").unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 0));

        let c = Colour::from_hex("#1a1a2e").unwrap();
        assert_eq!(c, Colour::rgb(0x1a, 0x1a, 0x2e));
    }

    #[test]
    fn test_from_hex_3digit() {
        let c = Colour::from_hex("#F00").unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 0));

        let c = Colour::from_hex("#ABC").unwrap();
        assert_eq!(c, Colour::rgb(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn test_from_hex_8digit() {
        let c = Colour::from_hex("#FF000080").unwrap();
        assert_eq!(c, Colour::new(255, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_4digit() {
        let c = Colour::from_hex("#F008").unwrap();
        assert_eq!(c, Colour::new(255, 0, 0, 136)); // 0x88
    }

    #[test]
    fn test_from_hex_no_hash() {
        let c = Colour::from_hex("FF0000").unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 0));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGG").is_err());
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Colour::rgb(255, 0, 0)), "#FF0000");
        assert_eq!(format!("{}", Colour::new(255, 0, 0, 128)), "#FF000080");
    }

    #[test]
    fn test_bgra_order() {
        let c = Colour::from_bgra([1, 2, 3, 4]);
        assert_eq!(c, Colour::new(3, 2, 1, 4));
        assert_eq!(c.to_bgra(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_argb1555_repacks_exactly() {
        for v in [0x0000u16, 0x8000, 0xFFFF, 0x7C00, 0x83E0, 0x801F, 0x1234 | 0x8000] {
            assert_eq!(Colour::from_argb1555(v).to_argb1555(), v);
        }
        assert_eq!(Colour::from_argb1555(0xFC00), Colour::rgb(255, 0, 0));
    }

    #[test]
    fn test_argb4444_repacks_exactly() {
        for v in [0x0000u16, 0xFFFF, 0xF00F, 0x1234, 0x8A5C] {
            assert_eq!(Colour::from_argb4444(v).to_argb4444(), v);
        }
        assert_eq!(Colour::from_argb4444(0xFF00), Colour::rgb(255, 0, 0));
        // channels round to the nearest nibble
        assert_eq!(Colour::new(16, 8, 9, 255).to_argb4444(), 0xF101);
        assert_eq!(Colour::new(25, 26, 0, 0).to_argb4444(), 0x0120);
    }

    #[test]
    fn test_color_kind_tags() {
        for kind in [ColorKind::Argb1555, ColorKind::Argb4444, ColorKind::Argb8888, ColorKind::Link] {
            assert_eq!(ColorKind::from_tag(kind.tag()).unwrap(), kind);
        }
        assert!(ColorKind::from_tag(0x42).is_err());
        assert_eq!("ARGB4444".parse::<ColorKind>().unwrap(), ColorKind::Argb4444);
    }

    #[test]
    fn test_compression_tags() {
        assert_eq!(Compression::from_tag(0x05).unwrap(), Compression::None);
        assert_eq!(Compression::from_tag(0x06).unwrap(), Compression::Zlib);
        assert!(Compression::from_tag(0).is_err());
    }

    #[test]
    fn test_constants() {
        assert_eq!(Colour::BLACK, Colour::rgb(0, 0, 0));
        assert_eq!(Colour::WHITE, Colour::rgb(255, 255, 255));
        assert!(Colour::new(9, 9, 9, 0).is_transparent());
        assert!(Colour::BLACK.is_opaque());
        assert_eq!(Colour::new(1, 2, 3, 4).to_string(), "#01020304");
    }
}
