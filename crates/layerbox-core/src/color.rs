use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawColor", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Darkens the color channels by `amount`, clamping at zero. Alpha is kept.
    pub fn fade(self, amount: i32) -> Self {
        let ch = |v: u8| (i32::from(v) - amount).clamp(0, 255) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b), self.a)
    }

    /// `#rrggbb` form, ignoring alpha.
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `0..=1` opacity.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

fn named_color(name: &str) -> Option<Rgba> {
    let c = match name {
        "transparent" => Rgba::TRANSPARENT,
        "white" => Rgba::WHITE,
        "black" => Rgba::BLACK,
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "lime" => Rgba::rgb(0, 255, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "yellow" => Rgba::rgb(255, 255, 0),
        "orange" => Rgba::rgb(255, 165, 0),
        "purple" => Rgba::rgb(128, 0, 128),
        "pink" => Rgba::rgb(255, 192, 203),
        "brown" => Rgba::rgb(165, 42, 42),
        "cyan" | "aqua" => Rgba::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Rgba::rgb(255, 0, 255),
        "navy" => Rgba::rgb(0, 0, 128),
        "teal" => Rgba::rgb(0, 128, 128),
        "olive" => Rgba::rgb(128, 128, 0),
        "maroon" => Rgba::rgb(128, 0, 0),
        "silver" => Rgba::rgb(192, 192, 192),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "lightgray" | "lightgrey" => Rgba::rgb(211, 211, 211),
        "darkgray" | "darkgrey" => Rgba::rgb(169, 169, 169),
        _ => return None,
    };
    Some(c)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some(Rgba::rgb(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
        )),
        4 => Some(Rgba::new(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            hex1(bytes[3])?,
        )),
        6 => Some(Rgba::rgb(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
        )),
        8 => Some(Rgba::new(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        )),
        _ => None,
    }
}

fn parse_functional(s: &str) -> Option<Rgba> {
    let (args, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else {
        (s.strip_prefix("rgb(")?.strip_suffix(')')?, false)
    };
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |p: &str| p.parse::<u8>().ok();
    match (parts.as_slice(), has_alpha) {
        ([r, g, b], false) => Some(Rgba::rgb(channel(r)?, channel(g)?, channel(b)?)),
        ([r, g, b, a], true) => {
            // CSS alpha is a 0..1 float.
            let a = a.parse::<f64>().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            Some(Rgba::new(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (a * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let s = text.trim().to_ascii_lowercase();
        let parsed = if let Some(hex) = s.strip_prefix('#') {
            parse_hex(hex)
        } else if s.starts_with("rgb") {
            parse_functional(&s)
        } else {
            named_color(&s)
        };
        parsed.ok_or_else(|| Error::InvalidColor {
            value: text.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawColor {
    Text(String),
    Channels(Vec<u8>),
}

impl TryFrom<RawColor> for Rgba {
    type Error = Error;

    fn try_from(raw: RawColor) -> Result<Self, Self::Error> {
        match raw {
            RawColor::Text(text) => text.parse(),
            RawColor::Channels(ch) => match ch.as_slice() {
                [r, g, b] => Ok(Rgba::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Rgba::new(*r, *g, *b, *a)),
                _ => Err(Error::InvalidColor {
                    value: format!("{ch:?}"),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_named_and_functional_colors() {
        assert_eq!("#ffd166".parse::<Rgba>().unwrap(), Rgba::rgb(255, 209, 102));
        assert_eq!("#FFF".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!(
            "#00000080".parse::<Rgba>().unwrap(),
            Rgba::new(0, 0, 0, 128)
        );
        assert_eq!("White".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!(
            "rgb(1, 2, 3)".parse::<Rgba>().unwrap(),
            Rgba::rgb(1, 2, 3)
        );
        assert_eq!(
            "rgba(1,2,3,0)".parse::<Rgba>().unwrap(),
            Rgba::new(1, 2, 3, 0)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("not-a-color".parse::<Rgba>().is_err());
        assert!("rgba(1,2,3,4)".parse::<Rgba>().is_err());
    }

    #[test]
    fn fade_clamps_at_zero_and_keeps_alpha() {
        let c = Rgba::new(5, 100, 255, 7);
        assert_eq!(c.fade(10), Rgba::new(0, 90, 245, 7));
    }

    #[test]
    fn deserializes_from_strings_and_arrays() {
        let c: Rgba = serde_json::from_str(r##""#118ab2""##).unwrap();
        assert_eq!(c, Rgba::rgb(0x11, 0x8a, 0xb2));
        let c: Rgba = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(c, Rgba::new(1, 2, 3, 4));
        assert!(serde_json::from_str::<Rgba>("[1, 2]").is_err());
    }
}
