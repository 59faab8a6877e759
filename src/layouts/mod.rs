/*
 *  layouts/mod.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Layout contract, shared lifecycle component and the closed set of layouts
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
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::LayoutSpec;
use crate::display::{Color, DisplayError, Region, Surface, SurfaceHost, SurfaceId, SurfaceOptions};

pub mod solid_color;
pub mod digital_clock;
pub mod analog_clock;
pub mod calendar;

pub use solid_color::SolidColorLayout;
pub use digital_clock::DigitalClockLayout;
pub use analog_clock::{AnalogClockLayout, AnalogClockOptions};
pub use calendar::{CalendarLayout, CalendarOptions, WeekConvention};

/// The available layout variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    SolidColor,
    DigitalClock,
    AnalogClock,
    Calendar,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::SolidColor,
        LayoutKind::DigitalClock,
        LayoutKind::AnalogClock,
        LayoutKind::Calendar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::SolidColor => "solid_color",
            LayoutKind::DigitalClock => "digital_clock",
            LayoutKind::AnalogClock => "analog_clock",
            LayoutKind::Calendar => "calendar",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "solid_color" | "solid" | "color" => Ok(LayoutKind::SolidColor),
            "digital_clock" | "digital" | "clock" => Ok(LayoutKind::DigitalClock),
            "analog_clock" | "analog" => Ok(LayoutKind::AnalogClock),
            "calendar" => Ok(LayoutKind::Calendar),
            other => Err(format!(
                "unknown layout '{}' (expected one of: solid_color, digital_clock, analog_clock, calendar)",
                other
            )),
        }
    }
}

/// Lifecycle: Unconfigured -> Configured -> Destroyed, never backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Unconfigured,
    Configured,
    Destroyed,
}

/// A visual behavior bound to one display region.
///
/// `configure` attaches a surface and returns the delay before the first
/// redraw, `None` for static layouts. `redraw` returns the delay until the
/// next one. Both treat a surface the host already tore down as the end of
/// the layout: it moves to Destroyed and `Ok(None)` comes back.
pub trait Layout {
    fn kind(&self) -> LayoutKind;

    fn state(&self) -> LayoutState;

    /// Surface the layout draws on, while configured
    fn surface_id(&self) -> Option<SurfaceId>;

    fn configure(
        &mut self,
        host: &mut dyn SurfaceHost,
        region: Region,
        now: &DateTime<Local>,
    ) -> Result<Option<Duration>, DisplayError>;

    fn redraw(&mut self, now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError>;

    /// Release the surface. Safe to call in any state, any number of times.
    fn destroy(&mut self);
}

/// Lifecycle and surface ownership shared by every layout
#[derive(Debug)]
pub struct LayoutBase {
    kind: LayoutKind,
    state: LayoutState,
    background: Color,
    surface: Option<Surface>,
}

impl LayoutBase {
    pub fn new(kind: LayoutKind, background: Color) -> Self {
        Self {
            kind,
            state: LayoutState::Unconfigured,
            background,
            surface: None,
        }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        self.surface.as_ref().map(Surface::id)
    }

    /// Ask the host for a full-screen surface over `region`, cleared to the
    /// background.
    pub fn attach(&mut self, host: &mut dyn SurfaceHost, region: Region) -> Result<&mut Surface, DisplayError> {
        if self.state != LayoutState::Unconfigured {
            return Err(DisplayError::InvalidState(format!(
                "{} layout cannot be configured while {:?}",
                self.kind, self.state
            )));
        }
        if region.is_empty() {
            return Err(DisplayError::InvalidRegion(region.to_string()));
        }

        let options = SurfaceOptions {
            title: format!("idlewall {}", self.kind),
            background: self.background.to_rgb888(),
            ..SurfaceOptions::default()
        };
        let surface = host.create_surface(region, options)?;
        info!("{} layout configured on surface {} at {}", self.kind, surface.id(), region);

        self.state = LayoutState::Configured;
        Ok(self.surface.insert(surface))
    }

    /// The surface, if configured and still alive. A surface the host closed
    /// under us destroys the layout.
    pub fn live_surface(&mut self) -> Option<&mut Surface> {
        if self.state != LayoutState::Configured {
            return None;
        }
        if !self.surface.as_ref().is_some_and(Surface::is_alive) {
            warn!("{} layout lost its surface, destroying", self.kind);
            self.destroy();
            return None;
        }
        self.surface.as_mut()
    }

    /// Publish the canvas. False when the surface turned out to be stale,
    /// in which case the layout is now destroyed.
    pub fn present(&mut self) -> Result<bool, DisplayError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(false);
        };
        match surface.present() {
            Ok(()) => Ok(true),
            Err(e) if e.is_stale() => {
                warn!("{} layout: {}, destroying", self.kind, e);
                self.destroy();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn destroy(&mut self) {
        if self.state == LayoutState::Destroyed {
            return;
        }
        if let Some(mut surface) = self.surface.take() {
            if surface.close() {
                debug!("{} layout closed surface {}", self.kind, surface.id());
            } else {
                debug!("{} layout surface {} was already gone", self.kind, surface.id());
            }
        }
        self.state = LayoutState::Destroyed;
    }
}

/// Closed set of layouts, dispatched by match
#[derive(Debug)]
pub enum AnyLayout {
    SolidColor(SolidColorLayout),
    DigitalClock(DigitalClockLayout),
    AnalogClock(AnalogClockLayout),
    Calendar(CalendarLayout),
}

impl AnyLayout {
    /// Unconfigured layout for a configuration entry
    pub fn from_spec(spec: &LayoutSpec) -> Self {
        match spec {
            LayoutSpec::SolidColor { color } => AnyLayout::SolidColor(SolidColorLayout::new(*color)),
            LayoutSpec::DigitalClock { background, foreground } => {
                AnyLayout::DigitalClock(DigitalClockLayout::new(*background, *foreground))
            }
            LayoutSpec::AnalogClock { background, dial, interval_ms } => {
                AnyLayout::AnalogClock(AnalogClockLayout::new(AnalogClockOptions {
                    background: *background,
                    dial: *dial,
                    interval: Duration::from_millis(*interval_ms),
                }))
            }
            LayoutSpec::Calendar { background, week_start, accent_day, muted_day, follow_date } => {
                AnyLayout::Calendar(CalendarLayout::new(CalendarOptions {
                    background: *background,
                    week: WeekConvention {
                        week_start: *week_start,
                        accent_day: *accent_day,
                        muted_day: *muted_day,
                    },
                    follow_date: *follow_date,
                }))
            }
        }
    }

    fn inner(&self) -> &dyn Layout {
        match self {
            AnyLayout::SolidColor(l) => l,
            AnyLayout::DigitalClock(l) => l,
            AnyLayout::AnalogClock(l) => l,
            AnyLayout::Calendar(l) => l,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Layout {
        match self {
            AnyLayout::SolidColor(l) => l,
            AnyLayout::DigitalClock(l) => l,
            AnyLayout::AnalogClock(l) => l,
            AnyLayout::Calendar(l) => l,
        }
    }
}

impl Layout for AnyLayout {
    fn kind(&self) -> LayoutKind {
        self.inner().kind()
    }

    fn state(&self) -> LayoutState {
        self.inner().state()
    }

    fn surface_id(&self) -> Option<SurfaceId> {
        self.inner().surface_id()
    }

    fn configure(
        &mut self,
        host: &mut dyn SurfaceHost,
        region: Region,
        now: &DateTime<Local>,
    ) -> Result<Option<Duration>, DisplayError> {
        self.inner_mut().configure(host, region, now)
    }

    fn redraw(&mut self, now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError> {
        self.inner_mut().redraw(now)
    }

    fn destroy(&mut self) {
        self.inner_mut().destroy()
    }
}
