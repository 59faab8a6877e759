/*
 *  display/hand.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Clock hand with save/restore blit
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

use core::cmp::{max, min};
use embedded_graphics::{
    geometry::Point,
    pixelcolor::PixelColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};

use crate::vframebuf::{SavedRegion, VarFrameBuf};

/// Point at `radius` from `center`, `angle_deg` clockwise from 12 o'clock.
pub fn polar_point(center: Point, radius: f32, angle_deg: f32) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point::new(
        (center.x as f32 + radius * sin).round() as i32,
        (center.y as f32 - radius * cos).round() as i32,
    )
}

/// A radial segment from the pivot that can be moved without repainting the
/// face: the pixels under the last drawn hand are kept and put back first.
#[derive(Debug)]
pub struct ClockHand<C: PixelColor> {
    pub pivot: Point,
    pub length: f32,
    pub stroke_width: u32,
    pub color: C,
    saved: Option<SavedRegion<C>>,
}

impl<C: PixelColor> ClockHand<C> {
    pub fn new(pivot: Point, length: f32, stroke_width: u32, color: C) -> Self {
        Self {
            pivot,
            length,
            stroke_width: stroke_width.max(1),
            color,
            saved: None,
        }
    }

    /// Put back what was under the hand. No-op when nothing is drawn.
    pub fn erase(&mut self, fb: &mut VarFrameBuf<C>) {
        if let Some(saved) = self.saved.take() {
            fb.restore_region(&saved);
        }
    }

    /// Save the background under the new position, then draw.
    /// Overlapping hands must be erased in reverse draw order before any
    /// of them is redrawn.
    pub fn draw_at(&mut self, fb: &mut VarFrameBuf<C>, angle_deg: f32) {
        self.erase(fb);
        let tip = polar_point(self.pivot, self.length, angle_deg);
        let pad = (self.stroke_width as i32 + 1) / 2 + 1;
        self.saved = fb.save_region(inflate_rect(rect_from_line(self.pivot, tip), pad));

        let style = PrimitiveStyle::with_stroke(self.color, self.stroke_width);
        // VarFrameBuf drawing is infallible
        let _ = Line::new(self.pivot, tip).into_styled(style).draw(fb);
    }

    pub fn is_drawn(&self) -> bool {
        self.saved.is_some()
    }
}

fn rect_from_line(a: Point, b: Point) -> Rectangle {
    Rectangle::with_corners(
        Point::new(min(a.x, b.x), min(a.y, b.y)),
        Point::new(max(a.x, b.x), max(a.y, b.y)),
    )
}

fn inflate_rect(r: Rectangle, pad: i32) -> Rectangle {
    let br = r.bottom_right().unwrap_or(r.top_left);
    Rectangle::with_corners(
        Point::new(r.top_left.x - pad, r.top_left.y - pad),
        Point::new(br.x + pad, br.y + pad),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::Rgb888;

    #[test]
    fn polar_follows_clock_convention() {
        let c = Point::new(100, 100);
        assert_eq!(polar_point(c, 50.0, 0.0), Point::new(100, 50));
        assert_eq!(polar_point(c, 50.0, 90.0), Point::new(150, 100));
        assert_eq!(polar_point(c, 50.0, 180.0), Point::new(100, 150));
        assert_eq!(polar_point(c, 50.0, 270.0), Point::new(50, 100));
    }

    #[test]
    fn erase_restores_background() {
        let mut fb = VarFrameBuf::new(64, 64, Rgb888::BLACK);
        fb.fill_solid(&Rectangle::new(Point::new(40, 30), Size::new(4, 4)), Rgb888::BLUE).unwrap();
        let face = fb.as_slice().to_vec();

        let mut hand = ClockHand::new(Point::new(32, 32), 20.0, 3, Rgb888::WHITE);
        hand.draw_at(&mut fb, 90.0);
        assert_eq!(fb.pixel(Point::new(45, 32)), Some(Rgb888::WHITE));
        assert!(hand.is_drawn());

        hand.erase(&mut fb);
        assert_eq!(fb.as_slice(), &face[..]);
        assert!(!hand.is_drawn());

        // a second erase has nothing to restore
        hand.erase(&mut fb);
        assert_eq!(fb.as_slice(), &face[..]);
    }

    #[test]
    fn moving_hand_leaves_no_trail() {
        let mut fb = VarFrameBuf::new(64, 64, Rgb888::BLACK);
        let mut hand = ClockHand::new(Point::new(32, 32), 25.0, 1, Rgb888::RED);

        hand.draw_at(&mut fb, 0.0);
        hand.erase(&mut fb);
        hand.draw_at(&mut fb, 180.0);

        assert_eq!(fb.pixel(Point::new(32, 10)), Some(Rgb888::BLACK));
        assert_eq!(fb.pixel(Point::new(32, 50)), Some(Rgb888::RED));
    }
}
