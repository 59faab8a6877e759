/*
 *  display/surface.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Drawable surface owned by a layout, shared with its host
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

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::error::DisplayError;
use crate::display::region::Region;
use crate::vframebuf::VarFrameBuf;

/// Host-assigned identifier of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The single input trigger that ends the screensaver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitGesture {
    Escape,
}

/// Presentation attributes requested at configure time
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    /// Window title (also used in snapshot file names)
    pub title: String,

    /// Cover the whole monitor without decorations
    pub fullscreen: bool,

    /// Hide the pointer while over the surface
    pub hide_cursor: bool,

    /// Trigger that tears everything down
    pub exit_gesture: ExitGesture,

    /// Initial fill
    pub background: Rgb888,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            title: "idlewall".to_string(),
            fullscreen: true,
            hide_cursor: true,
            exit_gesture: ExitGesture::Escape,
            background: Rgb888::BLACK,
        }
    }
}

/// State shared between a [`Surface`] and the host that shows it
#[derive(Debug)]
pub struct SurfaceState {
    pub id: SurfaceId,
    pub region: Region,
    pub options: SurfaceOptions,

    /// Last presented frame, row-major, `region.width * region.height`
    pub buffer: Vec<Rgb888>,

    /// Set by present(), cleared by the host once it has shown the frame
    pub dirty: bool,

    /// Set once either side tears the surface down
    pub closed: bool,

    /// Number of frames presented
    pub frame_count: u64,
}

pub type SharedSurface = Rc<RefCell<SurfaceState>>;

/// Drawable surface handed to a layout by a host.
///
/// Layouts draw into the private canvas and call [`Surface::present`] to
/// publish the frame to the host.
pub struct Surface {
    canvas: VarFrameBuf<Rgb888>,
    state: SharedSurface,
    id: SurfaceId,
    region: Region,
}

impl Surface {
    /// Create a surface and the state handle its host keeps
    pub fn new(id: SurfaceId, region: Region, options: SurfaceOptions) -> (Self, SharedSurface) {
        let background = options.background;
        let pixels = region.width as usize * region.height as usize;
        let state = Rc::new(RefCell::new(SurfaceState {
            id,
            region,
            options,
            buffer: vec![background; pixels],
            dirty: false,
            closed: false,
            frame_count: 0,
        }));

        let surface = Self {
            canvas: VarFrameBuf::new(region.width, region.height, background),
            state: Rc::clone(&state),
            id,
            region,
        };
        (surface, state)
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// False once the host or the owner has closed the surface
    pub fn is_alive(&self) -> bool {
        !self.state.borrow().closed
    }

    pub fn canvas(&self) -> &VarFrameBuf<Rgb888> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut VarFrameBuf<Rgb888> {
        &mut self.canvas
    }

    /// Publish the canvas to the host
    pub fn present(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(DisplayError::StaleSurface(self.id));
        }
        state.buffer.copy_from_slice(self.canvas.as_slice());
        state.dirty = true;
        state.frame_count += 1;
        Ok(())
    }

    /// Mark the surface closed. Returns false if it already was.
    pub fn close(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        let was_open = !state.closed;
        state.closed = true;
        was_open
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl DrawTarget for Surface {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.canvas.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.canvas.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.canvas.clear(color)
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size {
        self.region.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> (Surface, SharedSurface) {
        Surface::new(SurfaceId(7), Region::new(4, 3, 0, 0), SurfaceOptions::default())
    }

    #[test]
    fn present_publishes_canvas() {
        let (mut surface, state) = small();
        surface.clear(Rgb888::RED).unwrap();
        assert!(state.borrow().buffer.iter().all(|&c| c == Rgb888::BLACK));

        surface.present().unwrap();
        let state = state.borrow();
        assert!(state.dirty);
        assert_eq!(state.frame_count, 1);
        assert!(state.buffer.iter().all(|&c| c == Rgb888::RED));
    }

    #[test]
    fn close_is_idempotent() {
        let (mut surface, _state) = small();
        assert!(surface.close());
        assert!(!surface.close());
        assert!(!surface.is_alive());
    }

    #[test]
    fn present_after_host_close_is_stale() {
        let (mut surface, state) = small();
        state.borrow_mut().closed = true;
        let err = surface.present().unwrap_err();
        assert!(err.is_stale());
    }
}
