/*
 *  display/color.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Named colors as used in configuration, mapped to Rgb888
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fmt;
use std::str::FromStr;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

/// Color value accepted from configuration.
///
/// Names follow the Tk color database for the handful of colors the
/// layouts use; anything else can be given as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Black,
    White,
    Grey,
    DarkGrey,
    LightGrey,
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Navy,

    /// Explicit 24-bit value
    Rgb(u8, u8, u8),
}

impl Color {
    /// Convert to the framebuffer color type
    pub fn to_rgb888(self) -> Rgb888 {
        match self {
            Color::Black => Rgb888::BLACK,
            Color::White => Rgb888::WHITE,
            // Tk "grey" is 190/190/190, not 50%
            Color::Grey => Rgb888::new(190, 190, 190),
            Color::DarkGrey => Rgb888::new(169, 169, 169),
            Color::LightGrey => Rgb888::new(211, 211, 211),
            Color::Red => Rgb888::RED,
            Color::Green => Rgb888::new(0, 128, 0),
            Color::Blue => Rgb888::BLUE,
            Color::Yellow => Rgb888::YELLOW,
            Color::Orange => Rgb888::new(255, 165, 0),
            Color::Navy => Rgb888::new(0, 0, 128),
            Color::Rgb(r, g, b) => Rgb888::new(r, g, b),
        }
    }

    /// Perceived brightness (0-255), used to pick readable foregrounds
    pub fn luminance(self) -> u8 {
        let c = self.to_rgb888();
        ((u32::from(c.r()) * 299 + u32::from(c.g()) * 587 + u32::from(c.b()) * 114) / 1000) as u8
    }

    /// White on dark backgrounds, black on light ones
    pub fn contrasting(self) -> Color {
        if self.luminance() >= 128 { Color::Black } else { Color::White }
    }
}

impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        color.to_rgb888()
    }
}

/// Error for unknown color names or malformed hex values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color '{0}' (use a name like 'black' or '#rrggbb')")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let color = match name.as_str() {
            "black" => Color::Black,
            "white" => Color::White,
            "grey" | "gray" => Color::Grey,
            "darkgrey" | "darkgray" => Color::DarkGrey,
            "lightgrey" | "lightgray" => Color::LightGrey,
            "red" => Color::Red,
            "green" => Color::Green,
            "blue" => Color::Blue,
            "yellow" => Color::Yellow,
            "orange" => Color::Orange,
            "navy" => Color::Navy,
            hex if hex.starts_with('#') => {
                let digits = &hex[1..];
                if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ParseColorError(s.to_string()));
                }
                let value = u32::from_str_radix(digits, 16).map_err(|_| ParseColorError(s.to_string()))?;
                let [_, r, g, b] = value.to_be_bytes();
                Color::Rgb(r, g, b)
            }
            _ => return Err(ParseColorError(s.to_string())),
        };
        Ok(color)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
            Color::Grey => write!(f, "grey"),
            Color::DarkGrey => write!(f, "darkgrey"),
            Color::LightGrey => write!(f, "lightgrey"),
            Color::Red => write!(f, "red"),
            Color::Green => write!(f, "green"),
            Color::Blue => write!(f, "blue"),
            Color::Yellow => write!(f, "yellow"),
            Color::Orange => write!(f, "orange"),
            Color::Navy => write!(f, "navy"),
            Color::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!("black".parse::<Color>().unwrap(), Color::Black);
        assert_eq!("Gray".parse::<Color>().unwrap(), Color::Grey);
        assert_eq!(" RED ".parse::<Color>().unwrap(), Color::Red);
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!("#1e90ff".parse::<Color>().unwrap(), Color::Rgb(0x1e, 0x90, 0xff));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zz0000".parse::<Color>().is_err());
        assert!("#+12345".parse::<Color>().is_err());
        assert_eq!(Color::Rgb(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn test_non_ascii_hex_is_rejected() {
        // seven bytes, but not seven characters
        assert_eq!("#a\u{e9}\u{e9}b".len(), 7);
        let err = "#a\u{e9}\u{e9}b".parse::<Color>().unwrap_err();
        assert_eq!(err, ParseColorError("#a\u{e9}\u{e9}b".to_string()));
        assert!("#\u{e9}\u{e9}\u{e9}".parse::<Color>().is_err());

        let yaml = "layouts:\n  - kind: solid_color\n    color: \"#a\u{e9}\u{e9}b\"\n";
        assert!(crate::config::parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_rgb888_conversion() {
        assert_eq!(Color::Black.to_rgb888(), Rgb888::BLACK);
        assert_eq!(Rgb888::from(Color::Rgb(10, 20, 30)), Rgb888::new(10, 20, 30));
    }

    #[test]
    fn test_contrasting() {
        assert_eq!(Color::Black.contrasting(), Color::White);
        assert_eq!(Color::White.contrasting(), Color::Black);
        assert_eq!(Color::Navy.contrasting(), Color::White);
    }

    #[test]
    fn test_serde_as_string() {
        let c: Color = serde_yaml::from_str("navy").unwrap();
        assert_eq!(c, Color::Navy);
        let yaml = serde_yaml::to_string(&Color::Rgb(255, 0, 0)).unwrap();
        assert!(yaml.contains("#ff0000"));
        assert_eq!(serde_yaml::from_str::<Color>(&yaml).unwrap(), Color::Rgb(255, 0, 0));
    }
}
