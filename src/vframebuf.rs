/*
 *  vframebuf.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Runtime-sized framebuffer with region save/restore
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A runtime-sized framebuffer for embedded-graphics.
#[derive(Debug, Clone)]
pub struct VarFrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

/// Row-major copy of a rectangle taken out of a [`VarFrameBuf`].
#[derive(Debug, Clone)]
pub struct SavedRegion<C: PixelColor> {
    rect: Rectangle,
    pixels: Vec<C>,
}

impl<C: PixelColor> SavedRegion<C> {
    pub fn rect(&self) -> Rectangle { self.rect }
}

impl<C: PixelColor> VarFrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Mutable raw access
    pub fn as_mut_slice(&mut self) -> &mut [C] { &mut self.buf }

    /// Immutable raw access
    pub fn as_slice(&self) -> &[C] { &self.buf }

    /// Clear to a color
    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    /// Pixel at (x, y), None when outside the buffer
    pub fn pixel(&self, p: Point) -> Option<C> {
        self.idx(p).map(|i| self.buf[i])
    }

    /// Full buffer as a rectangle anchored at the origin
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(self.w as u32, self.h as u32))
    }

    /// Copy the pixels under `rect` (clipped to the buffer).
    /// Returns None when nothing of `rect` is visible.
    pub fn save_region(&self, rect: Rectangle) -> Option<SavedRegion<C>> {
        let clipped = rect.intersection(&self.bounds());
        let Size { width, height } = clipped.size;
        if width == 0 || height == 0 {
            return None;
        }

        let x0 = clipped.top_left.x as usize;
        let y0 = clipped.top_left.y as usize;
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for row in 0..(height as usize) {
            let base = (y0 + row) * self.w + x0;
            pixels.extend_from_slice(&self.buf[base..base + width as usize]);
        }

        Some(SavedRegion { rect: clipped, pixels })
    }

    /// Write a previously saved region back in place.
    pub fn restore_region(&mut self, saved: &SavedRegion<C>) {
        let Size { width, height } = saved.rect.size;
        let row_len = width as usize;
        let x0 = saved.rect.top_left.x as usize;
        let y0 = saved.rect.top_left.y as usize;

        for (row, src) in saved.pixels.chunks_exact(row_len).take(height as usize).enumerate() {
            let base = (y0 + row) * self.w + x0;
            if base + row_len <= self.buf.len() {
                self.buf[base..base + row_len].copy_from_slice(src);
            }
        }
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl<C: PixelColor> OriginDimensions for VarFrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor> DrawTarget for VarFrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // fast path: clipped row fills, the hot case for backgrounds and scaled glyphs
        let area = area.intersection(&self.bounds());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 { return Ok(()); }
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        for row in 0..height as usize {
            let base = (y0 + row) * self.w + x0;
            self.buf[base..base + width as usize].fill(color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::Rgb888;

    #[test]
    fn fill_solid_clips_to_buffer() {
        let mut fb = VarFrameBuf::new(8, 4, Rgb888::BLACK);
        fb.fill_solid(&Rectangle::new(Point::new(6, 2), Size::new(10, 10)), Rgb888::RED).unwrap();

        assert_eq!(fb.pixel(Point::new(7, 3)), Some(Rgb888::RED));
        assert_eq!(fb.pixel(Point::new(5, 3)), Some(Rgb888::BLACK));
        assert_eq!(fb.pixel(Point::new(8, 3)), None);
        assert_eq!(fb.as_slice().iter().filter(|&&c| c == Rgb888::RED).count(), 4);
    }

    #[test]
    fn save_and_restore_region() {
        let mut fb = VarFrameBuf::new(16, 16, Rgb888::BLACK);
        fb.fill_solid(&Rectangle::new(Point::new(2, 2), Size::new(4, 4)), Rgb888::BLUE).unwrap();
        let before = fb.as_slice().to_vec();

        let saved = fb.save_region(Rectangle::new(Point::new(0, 0), Size::new(8, 8))).unwrap();
        fb.clear_color(Rgb888::WHITE);
        fb.restore_region(&saved);

        // only the saved 8x8 block comes back
        for row in 0..8 {
            let line = row * 16..row * 16 + 8;
            assert_eq!(&fb.as_slice()[line.clone()], &before[line]);
        }
        assert_eq!(fb.pixel(Point::new(8, 0)), Some(Rgb888::WHITE));
        assert_eq!(fb.pixel(Point::new(12, 12)), Some(Rgb888::WHITE));
    }

    #[test]
    fn save_region_outside_is_none() {
        let fb = VarFrameBuf::new(4, 4, Rgb888::BLACK);
        assert!(fb.save_region(Rectangle::new(Point::new(10, 10), Size::new(2, 2))).is_none());

        let partial = fb.save_region(Rectangle::new(Point::new(-2, -2), Size::new(4, 4))).unwrap();
        assert_eq!(partial.rect(), Rectangle::new(Point::zero(), Size::new(2, 2)));
    }
}
