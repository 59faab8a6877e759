/*
 *  scaled_font.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Mono fonts blown up to monitor-sized text, with measurement
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

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::PixelColor,
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, renderer::TextRenderer},
};

/// A mono font at an integer multiple of its native size.
///
/// Sizes are expressed the way a toolkit font is asked for "N pixels tall":
/// [`ScaledFont::set_pixel_height`] picks the largest scale whose line
/// height fits.
#[derive(Clone, Copy)]
pub struct ScaledFont {
    base: &'static MonoFont<'static>,
    scale: u32,
}

impl Default for ScaledFont {
    fn default() -> Self {
        Self::new(&FONT_10X20)
    }
}

impl std::fmt::Debug for ScaledFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaledFont")
            .field("glyph", &self.base.character_size)
            .field("scale", &self.scale)
            .finish()
    }
}

impl ScaledFont {
    pub fn new(base: &'static MonoFont<'static>) -> Self {
        Self { base, scale: 1 }
    }

    pub fn base(&self) -> &'static MonoFont<'static> {
        self.base
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale.max(1);
    }

    /// Native style; color is irrelevant for measuring
    fn native_style(&self) -> MonoTextStyle<'static, embedded_graphics::pixelcolor::BinaryColor> {
        MonoTextStyle::new(self.base, embedded_graphics::pixelcolor::BinaryColor::On)
    }

    /// Distance between baselines, in surface pixels
    pub fn linespace(&self) -> u32 {
        self.native_style().line_height() * self.scale
    }

    /// Size of `text` when drawn, in surface pixels
    pub fn measure(&self, text: &str) -> Size {
        let metrics = self.native_style().measure_string(text, Point::zero(), Baseline::Top);
        metrics.bounding_box.size * self.scale
    }

    /// Largest scale whose line height is at most `px` (never below 1)
    pub fn set_pixel_height(&mut self, px: u32) {
        let native = self.native_style().line_height().max(1);
        self.scale = (px / native).max(1);
    }

    /// Draw `text` with its top-left corner at `top_left` (surface pixels).
    /// Returns the drawn bounding box.
    pub fn draw<C, D>(&self, target: &mut D, text: &str, top_left: Point, color: C) -> Result<Rectangle, D::Error>
    where
        C: PixelColor,
        D: DrawTarget<Color = C>,
    {
        let style = MonoTextStyle::new(self.base, color);
        let mut scaled = ScaledTarget::new(target, top_left, self.scale);
        embedded_graphics::text::Text::with_baseline(text, Point::zero(), style, Baseline::Top)
            .draw(&mut scaled)?;
        Ok(Rectangle::new(top_left, self.measure(text)))
    }
}

/// Draw target adapter: every pixel drawn into it becomes a
/// `scale x scale` block on the inner target, offset by `origin`.
pub struct ScaledTarget<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<'a, D> ScaledTarget<'a, D> {
    pub fn new(inner: &'a mut D, origin: Point, scale: u32) -> Self {
        Self { inner, origin, scale: scale.max(1) }
    }
}

impl<D: DrawTarget> Dimensions for ScaledTarget<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let outer = self.inner.bounding_box();
        let s = self.scale as i32;
        Rectangle::new(
            Point::new((outer.top_left.x - self.origin.x) / s, (outer.top_left.y - self.origin.y) / s),
            outer.size / self.scale,
        )
    }
}

impl<D: DrawTarget> DrawTarget for ScaledTarget<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(p, color) in pixels {
            let top_left = self.origin + p * self.scale as i32;
            self.inner.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let top_left = self.origin + area.top_left * self.scale as i32;
        self.inner.fill_solid(&Rectangle::new(top_left, area.size * self.scale), color)
    }
}
