/*
 *  display/region.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Monitor rectangle: size plus position in the virtual desktop
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

use embedded_graphics::geometry::Size;
use serde::{Deserialize, Serialize};

use super::error::DisplayError;

/// One physical display as reported by the enumerator.
///
/// Written and parsed in X geometry form, `1920x1080+1920+0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Region {
    pub const fn new(width: u32, height: u32, x: i32, y: i32) -> Self {
        Self { width, height, x, y }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)?;
        for offset in [self.x, self.y] {
            if offset < 0 {
                write!(f, "{}", offset)?;
            } else {
                write!(f, "+{}", offset)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Region {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || DisplayError::InvalidRegion(s.to_string());
        let s = s.trim();

        let (width, rest) = s.split_once('x').ok_or_else(bad)?;
        let size_end = rest.find(['+', '-']).ok_or_else(bad)?;
        let (height, offsets) = rest.split_at(size_end);

        // offsets look like "+1920+0" or "-1280+0"
        let second = offsets[1..].find(['+', '-']).map(|i| i + 1).ok_or_else(bad)?;
        let (x, y) = offsets.split_at(second);

        let width: u32 = width.parse().map_err(|_| bad())?;
        let height: u32 = height.parse().map_err(|_| bad())?;
        let x: i32 = x.trim_start_matches('+').parse().map_err(|_| bad())?;
        let y: i32 = y.trim_start_matches('+').parse().map_err(|_| bad())?;

        Ok(Region { width, height, x, y })
    }
}

impl TryFrom<String> for Region {
    type Error = DisplayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_x_geometry() {
        assert_eq!("1920x1080+0+0".parse::<Region>().unwrap(), Region::new(1920, 1080, 0, 0));
        assert_eq!("1920x1080+3840+0".parse::<Region>().unwrap(), Region::new(1920, 1080, 3840, 0));
        assert_eq!("1280x1024-1280+56".parse::<Region>().unwrap(), Region::new(1280, 1024, -1280, 56));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "1920x1080", "1920+0+0", "axb+0+0", "1920x1080+0", "1920x1080+x+0"] {
            assert!(bad.parse::<Region>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn display_matches_parse() {
        let r = Region::new(2560, 1440, -2560, 0);
        assert_eq!(r.to_string(), "2560x1440-2560+0");
        assert_eq!(r.to_string().parse::<Region>().unwrap(), r);
    }

    #[test]
    fn size_and_emptiness() {
        let r = Region::new(1920, 1080, 1920, 0);
        assert_eq!(r.size(), Size::new(1920, 1080));
        assert!(!r.is_empty());
        assert!(Region::new(0, 10, 0, 0).is_empty());
    }
}
