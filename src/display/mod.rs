/*
 *  display/mod.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Display subsystem - monitors, surfaces and the hosts that show them
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

// Core types
pub mod error;
pub mod color;
pub mod region;

// Monitor discovery
pub mod enumerator;

// Surfaces and hosts
pub mod surface;
pub mod host;

// Clock hand blit
pub mod hand;

// Window host (only with windowed feature)
#[cfg(feature = "windowed")]
pub mod window;

// Re-exports for convenience
pub use error::DisplayError;
pub use color::{Color, ParseColorError};
pub use region::Region;
pub use enumerator::{DisplayEnumerator, FixedDisplays, XrandrEnumerator};
pub use surface::{ExitGesture, SharedSurface, Surface, SurfaceId, SurfaceOptions, SurfaceState};
pub use host::{HeadlessHost, SurfaceHost, save_to_ppm};
pub use hand::ClockHand;

#[cfg(feature = "windowed")]
pub use enumerator::WinitEnumerator;
#[cfg(feature = "windowed")]
pub use window::WindowHost;
