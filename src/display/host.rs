/*
 *  display/host.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Surface hosts: the container layouts attach to
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

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use embedded_graphics::prelude::*;
use log::debug;

use crate::display::error::DisplayError;
use crate::display::region::Region;
use crate::display::surface::{SharedSurface, Surface, SurfaceId, SurfaceOptions, SurfaceState};

/// Toolkit adapter: creates one surface per configured region.
///
/// Layouts only ever see this trait, so the windowing toolkit stays behind
/// the host implementation.
pub trait SurfaceHost {
    fn create_surface(&mut self, region: Region, options: SurfaceOptions) -> Result<Surface, DisplayError>;
}

/// In-memory host, no windowing system required.
///
/// Used by tests and by snapshot rendering. It keeps every surface state so
/// frames can be inspected or written out, and can tear a surface down the
/// way a window manager would.
#[derive(Default)]
pub struct HeadlessHost {
    surfaces: Vec<SharedSurface>,
    next_id: u32,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All surfaces created so far, in creation order
    pub fn surfaces(&self) -> &[SharedSurface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&SharedSurface> {
        self.surfaces.iter().find(|s| s.borrow().id == id)
    }

    /// Close a surface behind its owner's back
    pub fn invalidate(&mut self, id: SurfaceId) -> bool {
        match self.surface(id) {
            Some(state) => {
                state.borrow_mut().closed = true;
                true
            }
            None => false,
        }
    }

    /// Surfaces nobody has closed yet
    pub fn open_count(&self) -> usize {
        self.surfaces.iter().filter(|s| !s.borrow().closed).count()
    }
}

impl SurfaceHost for HeadlessHost {
    fn create_surface(&mut self, region: Region, options: SurfaceOptions) -> Result<Surface, DisplayError> {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        debug!("headless surface {} '{}' at {}", id, options.title, region);

        let (surface, state) = Surface::new(id, region, options);
        self.surfaces.push(Rc::clone(&state));
        Ok(surface)
    }
}

/// Write the last presented frame as a binary PPM (P6)
pub fn save_to_ppm(state: &SurfaceState, path: &Path) -> Result<(), DisplayError> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "P6")?;
    writeln!(file, "{} {}", state.region.width, state.region.height)?;
    writeln!(file, "255")?;

    let mut row = Vec::with_capacity(state.region.width as usize * 3);
    for line in state.buffer.chunks(state.region.width.max(1) as usize) {
        row.clear();
        for c in line {
            row.extend_from_slice(&[c.r(), c.g(), c.b()]);
        }
        file.write_all(&row)?;
    }
    file.flush()?;
    Ok(())
}
