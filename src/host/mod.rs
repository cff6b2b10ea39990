//! Simulated host surface service.
//!
//! Emulates a windowing host whose global UI scale shifts every surface away
//! from its requested position. The shift grows with the square of the scale
//! so no linear correction recovers it; only measurement does. Measurements
//! scheduled with [`SurfaceHost::schedule_measurement`] are delivered by
//! [`SimulatedHost::tick`] a configurable number of frames later.

use crate::geometry::{
    PixelPoint, ScreenSize, Surface, SurfaceHandle, SurfaceHost, SurfaceSkin,
};

/// A surface currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSurface {
    /// Handle returned at spawn.
    pub handle: SurfaceHandle,
    /// What was requested.
    pub surface: Surface,
    /// Where the host actually put it, relative to screen centre.
    pub actual: PixelPoint,
}

/// A completed placement measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Measured surface.
    pub handle: SurfaceHandle,
    /// Its actual position.
    pub actual: PixelPoint,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledMeasurement {
    handle: SurfaceHandle,
    frames_left: u32,
}

/// In-memory [`SurfaceHost`] with scale-dependent placement distortion.
#[derive(Debug)]
pub struct SimulatedHost {
    screen: ScreenSize,
    scale_factor: f32,
    measurement_delay: u32,
    stalled: bool,
    next_handle: u64,
    surfaces: Vec<PlacedSurface>,
    scheduled: Vec<ScheduledMeasurement>,
    spawn_history: Vec<SurfaceSkin>,
}

impl SimulatedHost {
    /// Create a host with a `screen` of pixels at `scale_factor`.
    pub fn new(screen: ScreenSize, scale_factor: f32) -> Self {
        Self {
            screen,
            scale_factor,
            measurement_delay: 1,
            stalled: false,
            next_handle: 1,
            surfaces: Vec::new(),
            scheduled: Vec::new(),
            spawn_history: Vec::new(),
        }
    }

    /// Deliver measurements after `frames` ticks.
    pub fn with_measurement_delay(mut self, frames: u32) -> Self {
        self.measurement_delay = frames;
        self
    }

    /// Change the UI scale. Surfaces already on screen stay where they are.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor.max(0.1);
    }

    /// Resize the screen.
    pub fn set_screen_size(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    /// Stop delivering measurements, as a failing host would.
    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    /// Surfaces on screen, oldest first.
    pub fn surfaces(&self) -> &[PlacedSurface] {
        &self.surfaces
    }

    /// A surface by handle.
    pub fn surface(&self, handle: SurfaceHandle) -> Option<&PlacedSurface> {
        self.surfaces.iter().find(|s| s.handle == handle)
    }

    /// Skins of every surface ever spawned, in order.
    pub fn spawn_history(&self) -> &[SurfaceSkin] {
        &self.spawn_history
    }

    /// Number of probes ever spawned.
    pub fn probe_count(&self) -> usize {
        self.spawn_history
            .iter()
            .filter(|&&skin| skin == SurfaceSkin::Probe)
            .count()
    }

    /// Drag a surface by a pixel delta, as a user would.
    pub fn move_surface(&mut self, handle: SurfaceHandle, dx: f32, dy: f32) {
        if let Some(placed) = self.surfaces.iter_mut().find(|s| s.handle == handle) {
            placed.actual.x += dx;
            placed.actual.y += dy;
        }
    }

    /// Shift the host applies at the current scale.
    pub fn placement_shift(&self) -> PixelPoint {
        let s = self.scale_factor;
        PixelPoint::new(
            (s * s - 1.0) * 0.1 * self.screen.width,
            (s * s - 1.0) * -0.08 * self.screen.height,
        )
    }

    /// Advance one frame, returning measurements that came due.
    pub fn tick(&mut self) -> Vec<Measurement> {
        if self.stalled {
            return Vec::new();
        }

        let mut due = Vec::new();
        self.scheduled.retain_mut(|scheduled| {
            if scheduled.frames_left > 0 {
                scheduled.frames_left -= 1;
                return true;
            }
            due.push(scheduled.handle);
            false
        });

        due.into_iter()
            .filter_map(|handle| {
                self.surface(handle).map(|placed| Measurement {
                    handle,
                    actual: placed.actual,
                })
            })
            .collect()
    }
}

impl SurfaceHost for SimulatedHost {
    fn spawn_surface(&mut self, surface: Surface) -> SurfaceHandle {
        let handle = SurfaceHandle(self.next_handle);
        self.next_handle += 1;

        let requested = surface.geometry.position.to_pixels(self.screen);
        let shift = self.placement_shift();
        let actual = PixelPoint::new(requested.x + shift.x, requested.y + shift.y);
        tracing::debug!(
            "Spawned {:?} {:?} at ({:.1}, {:.1})",
            surface.skin,
            handle,
            actual.x,
            actual.y
        );

        self.spawn_history.push(surface.skin);
        self.surfaces.push(PlacedSurface {
            handle,
            surface,
            actual,
        });
        handle
    }

    fn dismiss(&mut self, handle: SurfaceHandle) {
        self.surfaces.retain(|s| s.handle != handle);
        self.scheduled.retain(|s| s.handle != handle);
    }

    fn current_actual_position(&self, handle: SurfaceHandle) -> Option<PixelPoint> {
        self.surface(handle).map(|s| s.actual)
    }

    fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    fn schedule_measurement(&mut self, handle: SurfaceHandle) {
        self.scheduled.push(ScheduledMeasurement {
            handle,
            frames_left: self.measurement_delay,
        });
    }
}
