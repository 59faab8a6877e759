/*
 *  display/error.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Unified error types for the display subsystem
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

use thiserror::Error;

use super::surface::SurfaceId;

/// Unified error type for surface, layout and host operations
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The surface was already torn down by its host or by destroy()
    #[error("surface {0} is no longer valid")]
    StaleSurface(SurfaceId),

    /// Operation not allowed in the layout's current lifecycle state
    #[error("invalid layout state: {0}")]
    InvalidState(String),

    /// Monitor discovery failed
    #[error("display enumeration failed: {0}")]
    Enumeration(String),

    /// Malformed geometry such as "1920x1080+0+0"
    #[error("invalid region '{0}' (expected WxH+X+Y)")]
    InvalidRegion(String),

    /// Window creation or event loop failure
    #[error("window error: {0}")]
    Window(String),

    /// Presenting a frame on screen failed
    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DisplayError {
    /// Stale handles are the one error class callers swallow
    pub fn is_stale(&self) -> bool {
        matches!(self, DisplayError::StaleSurface(_))
    }
}

// Drawing on in-memory canvases cannot fail
impl From<std::convert::Infallible> for DisplayError {
    fn from(e: std::convert::Infallible) -> Self {
        match e {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_is_recognised() {
        assert!(DisplayError::StaleSurface(SurfaceId(3)).is_stale());
        assert!(!DisplayError::Render("gpu lost".into()).is_stale());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = DisplayError::InvalidRegion("12x".into());
        assert_eq!(err.to_string(), "invalid region '12x' (expected WxH+X+Y)");
        assert_eq!(DisplayError::StaleSurface(SurfaceId(1)).to_string(), "surface #1 is no longer valid");
    }
}
