/*
 *  draw.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Drawing helpers shared by the layouts
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
    mono_font::MonoTextStyle,
    pixelcolor::PixelColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
};

use embedded_text::{
    TextBox,
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::TextBoxStyleBuilder,
};

use crate::scaled_font::{ScaledFont, ScaledTarget};

/// Fill a rectangle with a flat color
pub fn fill_region<D, C>(target: &mut D, region: Rectangle, color: C) -> Result<(), D::Error>
where
    C: PixelColor,
    D: DrawTarget<Color = C>,
{
    region
        .into_styled(PrimitiveStyleBuilder::new().fill_color(color).build())
        .draw(target)
}

pub fn draw_line<D, C>(target: &mut D, start: Point, end: Point, color: C, width: u32) -> Result<(), D::Error>
where
    C: PixelColor,
    D: DrawTarget<Color = C>,
{
    Line::new(start, end)
        .into_styled(PrimitiveStyle::with_stroke(color, width))
        .draw(target)
}

/// Filled disc centered on `center`
pub fn draw_disc<D, C>(target: &mut D, center: Point, diameter: u32, color: C) -> Result<(), D::Error>
where
    C: PixelColor,
    D: DrawTarget<Color = C>,
{
    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

/// Circle outline centered on `center`
pub fn draw_ring<D, C>(target: &mut D, center: Point, diameter: u32, color: C, width: u32) -> Result<(), D::Error>
where
    C: PixelColor,
    D: DrawTarget<Color = C>,
{
    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_stroke(color, width))
        .draw(target)
}

/// Text centered both ways inside `cell`, rendered with a scaled font
pub fn draw_text_centered<D, C>(
    target: &mut D,
    text: &str,
    cell: Rectangle,
    font: &ScaledFont,
    color: C,
) -> Result<(), D::Error>
where
    C: PixelColor,
    D: DrawTarget<Color = C>,
{
    let scale = font.scale();
    let character_style = MonoTextStyle::new(font.base(), color);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(HorizontalAlignment::Center)
        .vertical_alignment(VerticalAlignment::Middle)
        .build();

    // lay out in native font units, the scaled target blows it up
    let native = Rectangle::new(Point::zero(), cell.size / scale);
    let mut scaled = ScaledTarget::new(target, cell.top_left, scale);
    TextBox::with_textbox_style(text, native, character_style, textbox_style).draw(&mut scaled)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vframebuf::VarFrameBuf;
    use embedded_graphics::pixelcolor::Rgb888;

    fn lit(fb: &VarFrameBuf<Rgb888>, color: Rgb888) -> Vec<Point> {
        (0..fb.height() as i32)
            .flat_map(|y| (0..fb.width() as i32).map(move |x| Point::new(x, y)))
            .filter(|&p| fb.pixel(p) == Some(color))
            .collect()
    }

    #[test]
    fn centered_text_stays_in_cell() {
        let mut fb = VarFrameBuf::new(200, 200, Rgb888::BLACK);
        let mut font = ScaledFont::default();
        font.set_scale(2);
        let cell = Rectangle::new(Point::new(50, 50), Size::new(100, 80));

        draw_text_centered(&mut fb, "28", cell, &font, Rgb888::WHITE).unwrap();

        let pixels = lit(&fb, Rgb888::WHITE);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|p| cell.contains(*p)));

        // horizontally centered: ink on both halves of the cell
        assert!(pixels.iter().any(|p| p.x < 100));
        assert!(pixels.iter().any(|p| p.x >= 100));
    }

    #[test]
    fn disc_and_region() {
        let mut fb = VarFrameBuf::new(40, 40, Rgb888::BLACK);
        fill_region(&mut fb, Rectangle::new(Point::zero(), Size::new(40, 40)), Rgb888::BLUE).unwrap();
        draw_disc(&mut fb, Point::new(20, 20), 10, Rgb888::RED).unwrap();
        assert_eq!(fb.pixel(Point::new(20, 20)), Some(Rgb888::RED));
        assert_eq!(fb.pixel(Point::new(2, 2)), Some(Rgb888::BLUE));
    }
}
