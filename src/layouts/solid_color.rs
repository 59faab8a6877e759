/*
 *  layouts/solid_color.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Flat color fill
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

use chrono::{DateTime, Local};

use crate::display::{Color, DisplayError, Region, SurfaceHost, SurfaceId};
use crate::layouts::{Layout, LayoutBase, LayoutKind, LayoutState};

#[derive(Debug)]
pub struct SolidColorLayout {
    base: LayoutBase,
}

impl SolidColorLayout {
    pub fn new(color: Color) -> Self {
        Self { base: LayoutBase::new(LayoutKind::SolidColor, color) }
    }

    pub fn color(&self) -> Color {
        self.base.background()
    }
}

impl Layout for SolidColorLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::SolidColor
    }

    fn state(&self) -> LayoutState {
        self.base.state()
    }

    fn surface_id(&self) -> Option<SurfaceId> {
        self.base.surface_id()
    }

    // surface starts out filled with the background, one present and done
    fn configure(
        &mut self,
        host: &mut dyn SurfaceHost,
        region: Region,
        _now: &DateTime<Local>,
    ) -> Result<Option<Duration>, DisplayError> {
        self.base.attach(host, region)?;
        self.base.present()?;
        Ok(None)
    }

    fn redraw(&mut self, _now: &DateTime<Local>) -> Result<Option<Duration>, DisplayError> {
        Ok(None)
    }

    fn destroy(&mut self) {
        self.base.destroy();
    }
}
