/*
 *  layouts/digital_clock.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  HH:MM:SS clock sized to the monitor width
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

use std::fmt::Write;
use std::time::Duration;

use arrayvec::ArrayString;
use chrono::{DateTime, Local, Timelike};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, trace};

use crate::display::{Color, DisplayError, Region, SurfaceHost, SurfaceId};
use crate::draw::fill_region;
use crate::layouts::{Layout, LayoutBase, LayoutKind, LayoutState};
use crate::scaled_font::ScaledFont;

/// Widest possible reading, used for sizing
const SIZING_TEXT: &str = "00:00:00";

/// Share of the surface width the text may take
const WIDTH_FILL: f32 = 0.7;

pub const REDRAW_INTERVAL: Duration = Duration::from_millis(1000);

/// 24-hour, zero padded, always 8 characters
pub fn format_hms<T: Timelike>(time: &T) -> ArrayString<8> {
    let mut text = ArrayString::new();
    // three two-digit fields and two colons fill the buffer exactly
    let _ = write!(text, "{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second());
    text
}

/// Font scale for a surface `width` pixels wide: the line height that
/// makes "00:00:00" span `WIDTH_FILL` of the width, re-derived from the
/// font's own metrics.
pub fn fit_font(font: &mut ScaledFont, width: u32) {
    font.set_scale(1);
    let measured = font.measure(SIZING_TEXT).width.max(1) as f32;
    let proportion = font.linespace() as f32 / measured;
    let target = WIDTH_FILL * width as f32 * proportion;
    font.set_pixel_height(target as u32);
}

#[derive(Debug)]
pub struct DigitalClockLayout {
    base: LayoutBase,
    foreground: Color,
    font: ScaledFont,
    size: Size,
    /// Area covered by the last drawn text
    drawn: Option<Rectangle>,
    last_text: ArrayString<8>,
}

impl DigitalClockLayout {
    pub fn new(background: Color, foreground: Color) -> Self {
        Self {
            base: LayoutBase::new(LayoutKind::DigitalClock, background),
            foreground,
            font: ScaledFont::default(),
            size: Size::zero(),
            drawn: None,
            last_text: ArrayString::new(),
        }
    }

    pub fn font(&self) -> &ScaledFont {
        &self.font
    }

    /// Text shown by the last redraw
    pub fn text(&self) -> &str {
        &self.last_text
    }

    /// Where the text goes: centered on the surface
    fn text_origin(&self, text_size: Size) -> Point {
        Point::new(
            (self.size.width as i32 - text_size.width as i32) / 2,
            (self.size.height as i32 - text_size.height as i32) / 2,
        )
    }

    fn render(&mut self, now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError> {
        let text = format_hms(&now.time());
        let background = self.base.background().to_rgb888();
        let foreground = self.foreground.to_rgb888();
        let origin = self.text_origin(self.font.measure(&text));

        let Some(surface) = self.base.live_surface() else {
            return Ok(None);
        };

        if let Some(old) = self.drawn.take() {
            fill_region(surface, old, background)?;
        }
        let drawn = self.font.draw(surface, &text, origin, foreground)?;
        self.drawn = Some(drawn);
        self.last_text = text;
        trace!("digital clock {}", text);

        Ok(self.base.present()?.then_some(REDRAW_INTERVAL))
    }
}

impl Layout for DigitalClockLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::DigitalClock
    }

    fn state(&self) -> LayoutState {
        self.base.state()
    }

    fn surface_id(&self) -> Option<SurfaceId> {
        self.base.surface_id()
    }

    fn configure(
        &mut self,
        host: &mut dyn SurfaceHost,
        region: Region,
        now: &DateTime<Local>,
    ) -> Result<Option<Duration>, DisplayError> {
        self.base.attach(host, region)?;
        self.size = region.size();
        fit_font(&mut self.font, region.width);
        debug!(
            "digital clock font scale {} ({}px line) for {}px width",
            self.font.scale(),
            self.font.linespace(),
            region.width
        );
        self.render(now)
    }

    fn redraw(&mut self, now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError> {
        if self.base.state() != LayoutState::Configured {
            return Ok(None);
        }
        self.render(now)
    }

    fn destroy(&mut self) {
        self.base.destroy();
        self.drawn = None;
    }
}
