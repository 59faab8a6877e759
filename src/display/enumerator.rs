/*
 *  display/enumerator.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Monitor discovery: winit, xrandr, or a fixed list
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

use std::process::Command;

use log::{debug, warn};

use crate::display::error::DisplayError;
use crate::display::region::Region;

/// Source of the ordered list of connected displays
pub trait DisplayEnumerator {
    fn displays(&self) -> Result<Vec<Region>, DisplayError>;
}

/// Displays given up front (config file, command line, tests)
#[derive(Debug, Clone, Default)]
pub struct FixedDisplays(pub Vec<Region>);

impl DisplayEnumerator for FixedDisplays {
    fn displays(&self) -> Result<Vec<Region>, DisplayError> {
        Ok(self.0.clone())
    }
}

/// Runs `xrandr` and reads the geometry of every connected output
#[derive(Debug, Clone)]
pub struct XrandrEnumerator {
    program: String,
}

impl Default for XrandrEnumerator {
    fn default() -> Self {
        Self { program: "xrandr".to_string() }
    }
}

impl XrandrEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn query(&self) -> Result<String, DisplayError> {
        let output = Command::new(&self.program)
            .output()
            .map_err(|e| DisplayError::Enumeration(format!("cannot run {}: {}", self.program, e)))?;
        if !output.status.success() {
            return Err(DisplayError::Enumeration(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl DisplayEnumerator for XrandrEnumerator {
    fn displays(&self) -> Result<Vec<Region>, DisplayError> {
        let regions = parse_xrandr_connected(&self.query()?);
        debug!("xrandr reports {} connected display(s)", regions.len());
        Ok(regions)
    }
}

/// Geometry of every " connected " output line, in output order.
///
/// `DisplayPort-0 connected primary 1920x1080+0+0 (normal left ...) 480mm x 270mm`
/// yields `1920x1080+0+0`. Connected outputs without a geometry (disabled)
/// are skipped.
pub fn parse_xrandr_connected(output: &str) -> Vec<Region> {
    output
        .lines()
        .filter(|line| line.contains(" connected"))
        .filter_map(|line| {
            let region = line
                .split_whitespace()
                .find_map(|token| token.parse::<Region>().ok());
            if region.is_none() {
                warn!("xrandr output without geometry: {}", line.trim());
            }
            region
        })
        .collect()
}

/// Monitors as winit sees them (requires a live event loop)
#[cfg(feature = "windowed")]
pub struct WinitEnumerator<'a> {
    target: &'a winit::event_loop::EventLoopWindowTarget<()>,
}

#[cfg(feature = "windowed")]
impl<'a> WinitEnumerator<'a> {
    pub fn new(target: &'a winit::event_loop::EventLoopWindowTarget<()>) -> Self {
        Self { target }
    }
}

#[cfg(feature = "windowed")]
impl DisplayEnumerator for WinitEnumerator<'_> {
    fn displays(&self) -> Result<Vec<Region>, DisplayError> {
        let regions: Vec<Region> = self
            .target
            .available_monitors()
            .map(|monitor| {
                let size = monitor.size();
                let position = monitor.position();
                debug!(
                    "monitor {} {}x{}+{}+{}",
                    monitor.name().unwrap_or_else(|| "?".to_string()),
                    size.width, size.height, position.x, position.y
                );
                Region::new(size.width, size.height, position.x, position.y)
            })
            .collect();
        Ok(regions)
    }
}
