/*
 *  layouts/analog_clock.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Analog clock face with a sweeping second hand
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

use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use log::{debug, trace};

use crate::display::hand::polar_point;
use crate::display::{ClockHand, Color, DisplayError, Region, Surface, SurfaceHost, SurfaceId};
use crate::draw::{draw_disc, draw_line, draw_ring};
use crate::layouts::{Layout, LayoutBase, LayoutKind, LayoutState};
use crate::vframebuf::VarFrameBuf;

pub const HOUR_TICKS: u32 = 12;
pub const MINUTE_TICKS_PER_HOUR: u32 = 5;
pub const SUBTICKS_PER_TICK: u32 = 4;

pub const TICK_COUNT: u32 = HOUR_TICKS * MINUTE_TICKS_PER_HOUR * SUBTICKS_PER_TICK;

const HOUR_ANGLE: f32 = 360.0 / HOUR_TICKS as f32;
const MINUTE_ANGLE: f32 = 360.0 / (HOUR_TICKS * MINUTE_TICKS_PER_HOUR) as f32;
pub const SUBTICK_ANGLE: f32 = 360.0 / TICK_COUNT as f32;

/// Second hand lags by two and a half subticks to sit between marks
const SECOND_HAND_OFFSET: f32 = SUBTICK_ANGLE * 2.5;

/// Space kept between the face and the shorter surface edge
const FACE_PADDING: u32 = 100;
const PIVOT_DIAMETER: u32 = 20;
const DIAL_STROKE: u32 = 10;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Hour,
    Minute,
    Subtick,
}

impl TickKind {
    /// Where the mark starts, as a fraction of the face radius; all marks
    /// run out to the rim
    pub fn inner_fraction(self) -> f32 {
        match self {
            TickKind::Hour => 0.85,
            TickKind::Minute => 0.90,
            TickKind::Subtick => 0.95,
        }
    }

    pub fn stroke_width(self) -> u32 {
        match self {
            TickKind::Hour => 5,
            TickKind::Minute => 3,
            TickKind::Subtick => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub angle: f32,
    pub kind: TickKind,
}

/// Every mark on the dial, hour by minute-group by subtick
pub fn dial_ticks() -> Vec<Tick> {
    let mut ticks = Vec::with_capacity(TICK_COUNT as usize);
    for h in 0..HOUR_TICKS {
        for m in 0..MINUTE_TICKS_PER_HOUR {
            for s in 0..SUBTICKS_PER_TICK {
                let angle = h as f32 * HOUR_ANGLE + m as f32 * MINUTE_ANGLE + s as f32 * SUBTICK_ANGLE;
                let kind = match (m, s) {
                    (0, 0) => TickKind::Hour,
                    (_, 0) => TickKind::Minute,
                    _ => TickKind::Subtick,
                };
                ticks.push(Tick { angle, kind });
            }
        }
    }
    ticks
}

/// Face placement on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceGeometry {
    pub center: Point,
    pub diameter: u32,
}

impl FaceGeometry {
    pub fn for_size(size: Size) -> Self {
        Self {
            center: Point::new((size.width / 2) as i32, (size.height / 2) as i32),
            diameter: size.width.min(size.height).saturating_sub(FACE_PADDING),
        }
    }

    pub fn radius(&self) -> f32 {
        (self.diameter / 2) as f32
    }

    /// End points of a mark, inner then outer
    pub fn tick_line(&self, tick: &Tick) -> (Point, Point) {
        let r = self.radius();
        (
            polar_point(self.center, r * tick.kind.inner_fraction(), tick.angle),
            polar_point(self.center, r, tick.angle),
        )
    }
}

/// Hand positions in degrees clockwise from 12
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    /// Hour and minute hands jump; the second hand sweeps with millisecond
    /// resolution
    pub fn at(now: &DateTime<Local>) -> Self {
        let millis = now.timestamp_millis().rem_euclid(60_000);
        Self {
            hour: HOUR_ANGLE * (now.hour() % HOUR_TICKS) as f32,
            minute: MINUTE_ANGLE * now.minute() as f32,
            second: 6.0 * (millis as f32 / 1000.0) - SECOND_HAND_OFFSET,
        }
    }
}

/// The three hands, erased and redrawn as one
#[derive(Debug)]
struct ClockHands {
    hour: ClockHand<Rgb888>,
    minute: ClockHand<Rgb888>,
    second: ClockHand<Rgb888>,
}

impl ClockHands {
    fn new(face: &FaceGeometry) -> Self {
        let r = face.radius();
        Self {
            hour: ClockHand::new(face.center, r * 0.6, 10, Rgb888::WHITE),
            minute: ClockHand::new(face.center, r * 0.8, 10, Rgb888::WHITE),
            second: ClockHand::new(face.center, r * 0.8, 1, Rgb888::RED),
        }
    }

    fn erase(&mut self, fb: &mut VarFrameBuf<Rgb888>) {
        // reverse of draw order, so overlapping saves unwind cleanly
        self.second.erase(fb);
        self.minute.erase(fb);
        self.hour.erase(fb);
    }

    fn draw(&mut self, fb: &mut VarFrameBuf<Rgb888>, angles: &HandAngles) {
        self.erase(fb);
        self.hour.draw_at(fb, angles.hour);
        self.minute.draw_at(fb, angles.minute);
        self.second.draw_at(fb, angles.second);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnalogClockOptions {
    pub background: Color,
    /// Draw the outer ring
    pub dial: bool,
    pub interval: Duration,
}

impl Default for AnalogClockOptions {
    fn default() -> Self {
        Self {
            background: Color::Black,
            dial: false,
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug)]
pub struct AnalogClockLayout {
    base: LayoutBase,
    options: AnalogClockOptions,
    face: Option<FaceGeometry>,
    hands: Option<ClockHands>,
}

impl AnalogClockLayout {
    pub fn new(options: AnalogClockOptions) -> Self {
        Self {
            base: LayoutBase::new(LayoutKind::AnalogClock, options.background),
            options,
            face: None,
            hands: None,
        }
    }

    pub fn face(&self) -> Option<FaceGeometry> {
        self.face
    }

    fn draw_face(surface: &mut Surface, face: &FaceGeometry, dial: bool) -> Result<(), DisplayError> {
        let gray = Color::Grey.to_rgb888();
        if dial {
            draw_ring(surface, face.center, face.diameter, gray, DIAL_STROKE)?;
        }
        draw_disc(surface, face.center, PIVOT_DIAMETER, gray)?;
        for tick in dial_ticks() {
            let (inner, outer) = face.tick_line(&tick);
            draw_line(surface, inner, outer, gray, tick.kind.stroke_width())?;
        }
        Ok(())
    }

    fn render(&mut self, now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError> {
        let angles = HandAngles::at(now);
        let Some(surface) = self.base.live_surface() else {
            return Ok(None);
        };
        if let Some(hands) = self.hands.as_mut() {
            hands.draw(surface.canvas_mut(), &angles);
        }
        trace!("analog clock {:?}", angles);
        Ok(self.base.present()?.then_some(self.options.interval))
    }
}

impl Layout for AnalogClockLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::AnalogClock
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
        let surface = self.base.attach(host, region)?;
        let face = FaceGeometry::for_size(region.size());
        debug!("analog clock face {}px at {:?}", face.diameter, face.center);

        Self::draw_face(surface, &face, self.options.dial)?;
        self.hands = Some(ClockHands::new(&face));
        self.face = Some(face);
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
        self.hands = None;
    }
}
