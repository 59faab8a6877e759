/*
 *  display/window.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Borderless full-screen windows, one per surface, and the event loop
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

use std::time::Instant;

use chrono::Local;
use embedded_graphics::prelude::*;
use log::{debug, error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{Event, VirtualKeyCode},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Fullscreen, Window, WindowBuilder, WindowId},
};
use winit_input_helper::WinitInputHelper;

use crate::display::enumerator::{DisplayEnumerator, WinitEnumerator};
use crate::display::error::DisplayError;
use crate::display::host::SurfaceHost;
use crate::display::region::Region;
use crate::display::surface::{ExitGesture, SharedSurface, Surface, SurfaceId, SurfaceOptions};
use crate::screensaver::Screensaver;

/// Key bound to an exit gesture
fn exit_key(gesture: ExitGesture) -> VirtualKeyCode {
    match gesture {
        ExitGesture::Escape => VirtualKeyCode::Escape,
    }
}

/// A window showing one surface
struct Presenter {
    // dropped before the window it draws into
    pixels: Pixels,
    window: Window,
    state: SharedSurface,
}

impl Presenter {
    fn window_id(&self) -> WindowId {
        self.window.id()
    }

    fn is_dirty(&self) -> bool {
        self.state.borrow().dirty
    }

    fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    fn exit_key(&self) -> VirtualKeyCode {
        exit_key(self.state.borrow().options.exit_gesture)
    }

    /// Copy the last presented frame to the window
    fn render(&mut self) -> Result<(), DisplayError> {
        {
            let state = self.state.borrow();
            for (px, c) in self.pixels.frame_mut().chunks_exact_mut(4).zip(state.buffer.iter()) {
                px.copy_from_slice(&[c.r(), c.g(), c.b(), 0xff]);
            }
        }
        self.pixels
            .render()
            .map_err(|e| DisplayError::Render(e.to_string()))?;
        self.state.borrow_mut().dirty = false;
        Ok(())
    }
}

/// Surface host backed by real windows.
///
/// Each surface becomes a borderless window placed on the monitor whose
/// origin matches the region, switched to borderless fullscreen there.
pub struct WindowHost<'a> {
    target: &'a EventLoopWindowTarget<()>,
    presenters: Vec<Presenter>,
    next_id: u32,
}

impl<'a> WindowHost<'a> {
    pub fn new(target: &'a EventLoopWindowTarget<()>) -> Self {
        Self { target, presenters: Vec::new(), next_id: 0 }
    }

    pub fn window_count(&self) -> usize {
        self.presenters.len()
    }

    fn into_presenters(self) -> Vec<Presenter> {
        self.presenters
    }
}

impl SurfaceHost for WindowHost<'_> {
    fn create_surface(&mut self, region: Region, options: SurfaceOptions) -> Result<Surface, DisplayError> {
        let monitor = self
            .target
            .available_monitors()
            .find(|m| m.position() == PhysicalPosition::new(region.x, region.y));
        if monitor.is_none() {
            warn!("no monitor at {},{}; placing window without fullscreen target", region.x, region.y);
        }

        let mut builder = WindowBuilder::new()
            .with_title(options.title.as_str())
            .with_position(PhysicalPosition::new(region.x, region.y))
            .with_inner_size(PhysicalSize::new(region.width, region.height))
            .with_decorations(false)
            .with_resizable(false);
        if options.fullscreen {
            builder = builder.with_fullscreen(Some(Fullscreen::Borderless(monitor)));
        }
        let window = builder
            .build(self.target)
            .map_err(|e| DisplayError::Window(e.to_string()))?;
        window.set_cursor_visible(!options.hide_cursor);

        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        let pixels = Pixels::new(region.width, region.height, surface_texture)
            .map_err(|e| DisplayError::Window(e.to_string()))?;

        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        debug!("window {} '{}' at {}", id, options.title, region);

        let (surface, state) = Surface::new(id, region, options);
        self.presenters.push(Presenter { pixels, window, state });
        Ok(surface)
    }
}

/// Open one window per display and run until the exit gesture.
///
/// `displays` overrides monitor discovery; without it the monitors winit
/// reports are used. A surface's exit gesture (Escape) in any window, or
/// closing one, shuts every layout down and ends the process.
pub fn run(mut saver: Screensaver, displays: Option<&dyn DisplayEnumerator>) -> Result<(), DisplayError> {
    let event_loop = EventLoop::new();

    let regions = match displays {
        Some(enumerator) => enumerator.displays()?,
        None => WinitEnumerator::new(&event_loop).displays()?,
    };
    if regions.is_empty() {
        return Err(DisplayError::Enumeration("no displays found".to_string()));
    }

    let mut presenters = {
        let mut host = WindowHost::new(&event_loop);
        saver.configure(&regions, &mut host, Instant::now(), &Local::now())?;
        info!("{} window(s) open, press Escape to exit", host.window_count());
        host.into_presenters()
    };

    let mut input = WinitInputHelper::new();

    event_loop.run(move |event, _, control_flow| {
        if let Event::RedrawRequested(window_id) = event {
            if let Some(presenter) = presenters.iter_mut().find(|p| p.window_id() == window_id) {
                if let Err(err) = presenter.render() {
                    error!("{}", err);
                    saver.shutdown();
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }
        }

        if input.update(&event) {
            let gesture = presenters.iter().any(|p| input.key_pressed(p.exit_key()));
            if gesture || input.close_requested() {
                info!("exit requested");
                saver.shutdown();
                *control_flow = ControlFlow::Exit;
                return;
            }

            if let Err(err) = saver.tick(Instant::now(), &Local::now()) {
                error!("{}", err);
                saver.shutdown();
                *control_flow = ControlFlow::Exit;
                return;
            }

            presenters.retain(|p| !p.is_closed());
            for presenter in presenters.iter().filter(|p| p.is_dirty()) {
                presenter.window.request_redraw();
            }

            *control_flow = if !saver.is_running() {
                ControlFlow::Exit
            } else {
                match saver.next_deadline() {
                    Some(deadline) => ControlFlow::WaitUntil(deadline),
                    None => ControlFlow::Wait,
                }
            };
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_gesture_is_the_escape_key() {
        assert_eq!(exit_key(ExitGesture::Escape), VirtualKeyCode::Escape);
        assert_eq!(exit_key(SurfaceOptions::default().exit_gesture), VirtualKeyCode::Escape);
    }
}
