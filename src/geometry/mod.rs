//! Window geometry - screen coordinates, the host surface service, and
//! scale-corrected window placement.
//!
//! Positions are kept as fractions of the screen so they survive resolution
//! and scale changes. Hosts report placement in pixels relative to the screen
//! centre; [`ScreenPoint::from_pixels`] converts back.

mod calibrator;

pub use calibrator::{
    Calibration, CalibrationCache, CalibrationState, GeometryCalibrator, OpenOutcome,
    OpenRequest, SCALE_TOLERANCE,
};

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::view::ViewNode;

/// A point as a fraction of the screen, `(0, 0)` top-left, `(1, 1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal fraction.
    pub x: f32,
    /// Vertical fraction.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert a host pixel position (relative to screen centre) to a fraction.
    pub fn from_pixels(pixels: PixelPoint, screen: ScreenSize) -> Self {
        let frac = |v: f32, extent: f32| if extent > 0.0 { v / extent + 0.5 } else { 0.5 };
        Self {
            x: frac(pixels.x, screen.width),
            y: frac(pixels.y, screen.height),
        }
    }

    /// Convert to a host pixel position relative to screen centre.
    pub fn to_pixels(self, screen: ScreenSize) -> PixelPoint {
        PixelPoint {
            x: (self.x - 0.5) * screen.width,
            y: (self.y - 0.5) * screen.height,
        }
    }
}

/// Difference between two screen points, in screen fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenOffset {
    /// Horizontal difference.
    pub dx: f32,
    /// Vertical difference.
    pub dy: f32,
}

impl Sub for ScreenPoint {
    type Output = ScreenOffset;

    fn sub(self, rhs: ScreenPoint) -> ScreenOffset {
        ScreenOffset {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

impl Sub<ScreenOffset> for ScreenPoint {
    type Output = ScreenPoint;

    fn sub(self, rhs: ScreenOffset) -> ScreenPoint {
        ScreenPoint::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

impl Add<ScreenOffset> for ScreenPoint {
    type Output = ScreenPoint;

    fn add(self, rhs: ScreenOffset) -> ScreenPoint {
        ScreenPoint::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

/// Host pixel position, relative to the centre of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    /// Pixels right of centre.
    pub x: f32,
    /// Pixels below centre.
    pub y: f32,
}

impl PixelPoint {
    /// Create a pixel position.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen extent in host pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Window size in host pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Requested placement of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    /// Anchor position as a screen fraction.
    pub position: ScreenPoint,
    /// Size in pixels.
    pub size: WindowSize,
}

/// Visual style of a spawned surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSkin {
    /// The regular overlay window.
    Standard,
    /// Borderless, contentless surface used only for measurement.
    Probe,
}

/// Everything the host needs to put a surface on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Window title.
    pub title: String,
    /// Requested geometry.
    pub geometry: WindowGeometry,
    /// Visual style.
    pub skin: SurfaceSkin,
    /// Declarative content tree.
    pub content: ViewNode,
}

/// Opaque identifier of a spawned surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// The host windowing service.
///
/// Placement may be distorted by the host's UI scale; callers learn the real
/// position only through [`SurfaceHost::current_actual_position`] or a
/// scheduled measurement, which the host reports on a later frame.
pub trait SurfaceHost {
    /// Put a surface on screen.
    fn spawn_surface(&mut self, surface: Surface) -> SurfaceHandle;

    /// Remove a surface. Unknown handles are ignored.
    fn dismiss(&mut self, handle: SurfaceHandle);

    /// Where the surface actually is, if it still exists.
    fn current_actual_position(&self, handle: SurfaceHandle) -> Option<PixelPoint>;

    /// Global UI scale factor.
    fn scale_factor(&self) -> f32;

    /// Screen extent in pixels.
    fn screen_size(&self) -> ScreenSize;

    /// Ask the host to report the placed position of `handle` on a later frame.
    fn schedule_measurement(&mut self, handle: SurfaceHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1920.0,
        height: 1080.0,
    };

    #[test]
    fn pixel_conversion_is_centre_relative() {
        let centre = ScreenPoint::from_pixels(PixelPoint::new(0.0, 0.0), SCREEN);
        assert_eq!(centre, ScreenPoint::new(0.5, 0.5));

        let p = ScreenPoint::new(0.25, 0.75);
        let back = ScreenPoint::from_pixels(p.to_pixels(SCREEN), SCREEN);
        assert!((back.x - p.x).abs() < 1e-6);
        assert!((back.y - p.y).abs() < 1e-6);
    }

    #[test]
    fn degenerate_screen_maps_to_centre() {
        let zero = ScreenSize {
            width: 0.0,
            height: 0.0,
        };
        assert_eq!(
            ScreenPoint::from_pixels(PixelPoint::new(10.0, 10.0), zero),
            ScreenPoint::new(0.5, 0.5)
        );
    }

    #[test]
    fn offsets_apply_and_undo() {
        let a = ScreenPoint::new(0.6, 0.4);
        let b = ScreenPoint::new(0.5, 0.5);
        let offset = a - b;
        let back = b + offset;
        assert!((back.x - a.x).abs() < 1e-6 && (back.y - a.y).abs() < 1e-6);
        let undone = a - offset;
        assert!((undone.x - b.x).abs() < 1e-6 && (undone.y - b.y).abs() < 1e-6);
    }
}
