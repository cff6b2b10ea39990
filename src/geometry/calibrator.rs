//! Two-phase window placement under a host UI scale.
//!
//! The host's scale transform moves surfaces by an amount that cannot be
//! predicted, so the first open at a new scale spawns a probe surface at the
//! requested position and waits for the host to report where it really
//! landed. The measured offset is cached together with the scale, and every
//! later open at that scale commits the real window at `requested - offset`.

use std::cell::Cell;
use std::rc::Rc;

use super::{
    PixelPoint, ScreenOffset, ScreenPoint, Surface, SurfaceHandle, SurfaceHost, SurfaceSkin,
    WindowGeometry,
};
use crate::util::WindowLayoutConfig;
use crate::view::ViewNode;

/// Largest scale difference for which a cached offset stays valid.
pub const SCALE_TOLERANCE: f32 = 0.05;

/// A measured placement correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Actual minus requested position, in screen fractions.
    pub offset: ScreenOffset,
    /// Scale factor the offset was measured at.
    pub scale_factor: f32,
}

impl Calibration {
    /// Check whether this correction applies at `scale_factor`.
    pub fn matches(&self, scale_factor: f32) -> bool {
        (scale_factor - self.scale_factor).abs() <= SCALE_TOLERANCE
    }
}

thread_local! {
    static SHARED_CACHE: CalibrationCache = CalibrationCache::new();
}

/// Shared slot holding the latest [`Calibration`].
///
/// Clones refer to the same slot. [`CalibrationCache::shared`] hands out the
/// process-wide slot, so every window reuses one correction per scale.
#[derive(Debug, Clone, Default)]
pub struct CalibrationCache(Rc<Cell<Option<Calibration>>>);

impl CalibrationCache {
    /// Create an isolated, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn shared() -> Self {
        SHARED_CACHE.with(Clone::clone)
    }

    /// Latest calibration, if any.
    pub fn get(&self) -> Option<Calibration> {
        self.0.get()
    }

    fn store(&self, calibration: Calibration) {
        self.0.set(Some(calibration));
    }

    /// Calibration usable at `scale_factor`.
    pub fn valid_for(&self, scale_factor: f32) -> Option<Calibration> {
        self.get().filter(|c| c.matches(scale_factor))
    }
}

/// Where the calibrator stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    /// No valid offset for the current scale.
    Uncalibrated,
    /// A probe is on screen, waiting for its measurement.
    Probing,
    /// A valid offset is cached for the current scale.
    Calibrated,
}

/// What the caller wants on screen.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    /// Window title.
    pub title: String,
    /// Window content.
    pub content: ViewNode,
    /// Selects the wide size preset.
    pub has_controllable_vessel: bool,
}

/// Result of [`GeometryCalibrator::request_open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The real window was committed.
    Committed(SurfaceHandle),
    /// A probe was spawned; the window follows its measurement.
    Probing(SurfaceHandle),
    /// A probe from an earlier request is still waiting.
    AwaitingProbe(SurfaceHandle),
    /// The window is already open.
    AlreadyOpen(SurfaceHandle),
}

#[derive(Debug, Clone, Copy)]
struct PendingProbe {
    handle: SurfaceHandle,
    scale_factor: f32,
    requested: ScreenPoint,
}

/// Owns the placement protocol for one window.
#[derive(Debug)]
pub struct GeometryCalibrator {
    cache: CalibrationCache,
    layout: WindowLayoutConfig,
    requested: ScreenPoint,
    probe: Option<PendingProbe>,
    window: Option<SurfaceHandle>,
}

impl GeometryCalibrator {
    /// Create a calibrator placing its window at `requested`.
    pub fn new(cache: CalibrationCache, layout: WindowLayoutConfig, requested: ScreenPoint) -> Self {
        Self {
            cache,
            layout,
            requested,
            probe: None,
            window: None,
        }
    }

    /// Position the next open will aim for.
    pub fn requested_position(&self) -> ScreenPoint {
        self.requested
    }

    /// Handle of the committed window, if open.
    pub fn window(&self) -> Option<SurfaceHandle> {
        self.window
    }

    /// Handle of the probe awaiting measurement, if any.
    pub fn pending_probe(&self) -> Option<SurfaceHandle> {
        self.probe.map(|p| p.handle)
    }

    /// Shared cache this calibrator reads and writes.
    pub fn cache(&self) -> &CalibrationCache {
        &self.cache
    }

    /// Current protocol state at `scale_factor`.
    pub fn state(&self, scale_factor: f32) -> CalibrationState {
        if self.probe.is_some() {
            CalibrationState::Probing
        } else if self.cache.valid_for(scale_factor).is_some() {
            CalibrationState::Calibrated
        } else {
            CalibrationState::Uncalibrated
        }
    }

    /// Open the window, probing first if the scale has no valid calibration.
    pub fn request_open<H: SurfaceHost + ?Sized>(
        &mut self,
        host: &mut H,
        request: OpenRequest,
    ) -> OpenOutcome {
        if let Some(window) = self.window {
            return OpenOutcome::AlreadyOpen(window);
        }
        if let Some(probe) = self.probe {
            tracing::debug!("Open requested while probe {:?} is pending", probe.handle);
            return OpenOutcome::AwaitingProbe(probe.handle);
        }

        let scale_factor = host.scale_factor();
        match self.cache.valid_for(scale_factor) {
            Some(calibration) => {
                let position = self.requested - calibration.offset;
                let handle = host.spawn_surface(Surface {
                    title: request.title,
                    geometry: WindowGeometry {
                        position,
                        size: self.layout.window_size(request.has_controllable_vessel),
                    },
                    skin: SurfaceSkin::Standard,
                    content: request.content,
                });
                tracing::info!(
                    "Committed window {:?} at ({:.3}, {:.3}) for scale {:.2}",
                    handle,
                    position.x,
                    position.y,
                    scale_factor
                );
                self.window = Some(handle);
                OpenOutcome::Committed(handle)
            },
            None => {
                let handle = host.spawn_surface(Surface {
                    title: String::new(),
                    geometry: WindowGeometry {
                        position: self.requested,
                        size: self.layout.probe_size,
                    },
                    skin: SurfaceSkin::Probe,
                    content: ViewNode::Empty,
                });
                host.schedule_measurement(handle);
                tracing::info!(
                    "Scale {:.2} has no calibration, probing with {:?}",
                    scale_factor,
                    handle
                );
                self.probe = Some(PendingProbe {
                    handle,
                    scale_factor,
                    requested: self.requested,
                });
                OpenOutcome::Probing(handle)
            },
        }
    }

    /// Record the host's measurement of a probe.
    ///
    /// Returns `true` when the measurement belonged to the pending probe and
    /// the caller should request the open again.
    pub fn probe_measured<H: SurfaceHost + ?Sized>(
        &mut self,
        host: &mut H,
        handle: SurfaceHandle,
        actual: PixelPoint,
    ) -> bool {
        let Some(probe) = self.probe.filter(|p| p.handle == handle) else {
            tracing::debug!("Ignoring measurement for stale surface {:?}", handle);
            return false;
        };

        let actual = ScreenPoint::from_pixels(actual, host.screen_size());
        let calibration = Calibration {
            offset: actual - probe.requested,
            scale_factor: probe.scale_factor,
        };
        tracing::info!(
            "Probe {:?} measured offset ({:.4}, {:.4}) at scale {:.2}",
            handle,
            calibration.offset.dx,
            calibration.offset.dy,
            calibration.scale_factor
        );
        self.cache.store(calibration);
        host.dismiss(handle);
        self.probe = None;
        true
    }

    /// Close the window and any pending probe.
    ///
    /// Returns the window's actual position as a screen fraction when a
    /// window was open and the host still knew where it was; that position
    /// becomes the target of the next open. The calibration is kept.
    pub fn close<H: SurfaceHost + ?Sized>(&mut self, host: &mut H) -> Option<ScreenPoint> {
        if let Some(probe) = self.probe.take() {
            tracing::debug!("Dropping pending probe {:?}", probe.handle);
            host.dismiss(probe.handle);
        }

        let window = self.window.take()?;
        let position = host
            .current_actual_position(window)
            .map(|pixels| ScreenPoint::from_pixels(pixels, host.screen_size()));
        if let Some(position) = position {
            self.requested = position;
        }
        host.dismiss(window);
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScreenSize;
    use crate::host::SimulatedHost;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1600.0,
        height: 900.0,
    };

    fn request() -> OpenRequest {
        OpenRequest {
            title: "Transfers".to_string(),
            content: ViewNode::Empty,
            has_controllable_vessel: true,
        }
    }

    fn calibrator(cache: &CalibrationCache) -> GeometryCalibrator {
        GeometryCalibrator::new(
            cache.clone(),
            WindowLayoutConfig::default(),
            ScreenPoint::new(0.4, 0.6),
        )
    }

    /// Run a full probe cycle and return the committed window.
    fn calibrate(cal: &mut GeometryCalibrator, host: &mut SimulatedHost) -> SurfaceHandle {
        let OpenOutcome::Probing(_) = cal.request_open(host, request()) else {
            panic!("expected a probe");
        };
        let measurement = loop {
            if let Some(m) = host.tick().pop() {
                break m;
            }
        };
        assert!(cal.probe_measured(host, measurement.handle, measurement.actual));
        match cal.request_open(host, request()) {
            OpenOutcome::Committed(handle) => handle,
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn first_open_spawns_single_probe() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.2);
        let mut cal = calibrator(&cache);

        let OpenOutcome::Probing(probe) = cal.request_open(&mut host, request()) else {
            panic!("expected a probe");
        };
        assert_eq!(cal.state(1.2), CalibrationState::Probing);
        assert_eq!(
            cal.request_open(&mut host, request()),
            OpenOutcome::AwaitingProbe(probe)
        );
        assert_eq!(host.probe_count(), 1);
        assert!(cal.window().is_none());
        assert_eq!(host.spawn_history(), &[SurfaceSkin::Probe]);
    }

    #[test]
    fn measured_offset_corrects_commit() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.2);
        let mut cal = calibrator(&cache);

        let window = calibrate(&mut cal, &mut host);
        assert_eq!(cal.state(1.2), CalibrationState::Calibrated);
        assert!(host.surfaces().iter().all(|s| s.surface.skin == SurfaceSkin::Standard));

        let actual = ScreenPoint::from_pixels(host.current_actual_position(window).unwrap(), SCREEN);
        assert!((actual.x - 0.4).abs() < 1e-4, "{:?}", actual);
        assert!((actual.y - 0.6).abs() < 1e-4, "{:?}", actual);
        let placed = host.surface(window).unwrap();
        assert_eq!(placed.surface.geometry.size, WindowLayoutConfig::default().window_size(true));
    }

    #[test]
    fn matching_scale_commits_without_probe() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.0);
        let mut cal = calibrator(&cache);
        calibrate(&mut cal, &mut host);
        cal.close(&mut host);

        let probes = host.probe_count();
        assert!(matches!(
            cal.request_open(&mut host, request()),
            OpenOutcome::Committed(_)
        ));
        assert_eq!(host.probe_count(), probes);
    }

    #[test]
    fn scale_change_beyond_tolerance_reprobes() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.0);
        let mut cal = calibrator(&cache);
        calibrate(&mut cal, &mut host);
        cal.close(&mut host);

        host.set_scale_factor(1.04);
        assert!(matches!(
            cal.request_open(&mut host, request()),
            OpenOutcome::Committed(_)
        ));
        cal.close(&mut host);

        host.set_scale_factor(1.2);
        assert_eq!(cal.state(1.2), CalibrationState::Uncalibrated);
        let probes = host.probe_count();
        assert!(matches!(
            cal.request_open(&mut host, request()),
            OpenOutcome::Probing(_)
        ));
        assert_eq!(host.probe_count(), probes + 1);
        assert!(cal.window().is_none());
    }

    #[test]
    fn close_while_probing_allows_fresh_probe() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.2).with_measurement_delay(0);
        let mut cal = calibrator(&cache);

        let OpenOutcome::Probing(stale) = cal.request_open(&mut host, request()) else {
            panic!("expected a probe");
        };
        assert_eq!(cal.close(&mut host), None);
        assert!(cal.pending_probe().is_none());
        assert!(host.surfaces().is_empty());

        // A late report for the dismissed probe changes nothing.
        assert!(!cal.probe_measured(&mut host, stale, PixelPoint::new(5.0, 5.0)));
        assert!(cache.get().is_none());

        let OpenOutcome::Probing(fresh) = cal.request_open(&mut host, request()) else {
            panic!("expected a probe");
        };
        assert_ne!(fresh, stale);
        assert_eq!(host.probe_count(), 2);
    }

    #[test]
    fn stalled_probe_never_opens_window() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.2).with_measurement_delay(0);
        host.set_stalled(true);
        let mut cal = calibrator(&cache);

        cal.request_open(&mut host, request());
        for _ in 0..10 {
            assert!(host.tick().is_empty());
            assert!(matches!(
                cal.request_open(&mut host, request()),
                OpenOutcome::AwaitingProbe(_)
            ));
        }
        assert!(cal.window().is_none());
        assert_eq!(host.probe_count(), 1);
    }

    #[test]
    fn close_remembers_moved_position_and_keeps_cache() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.2);
        let mut cal = calibrator(&cache);
        let window = calibrate(&mut cal, &mut host);
        let calibration = cache.get();

        host.move_surface(window, 160.0, -90.0);
        let closed = cal.close(&mut host).unwrap();
        assert!((closed.x - 0.5).abs() < 1e-4);
        assert!((closed.y - 0.5).abs() < 1e-4);
        assert_eq!(cal.requested_position(), closed);
        assert_eq!(cache.get(), calibration);
        assert!(host.surfaces().is_empty());

        let OpenOutcome::Committed(reopened) = cal.request_open(&mut host, request()) else {
            panic!("expected commit");
        };
        let actual = ScreenPoint::from_pixels(host.current_actual_position(reopened).unwrap(), SCREEN);
        assert!((actual.x - 0.5).abs() < 1e-4);
        assert!((actual.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn calibrators_sharing_cache_share_correction() {
        let cache = CalibrationCache::new();
        let mut host = SimulatedHost::new(SCREEN, 1.2);
        let mut first = calibrator(&cache);
        calibrate(&mut first, &mut host);

        let mut second = calibrator(&cache);
        assert_eq!(second.state(1.2), CalibrationState::Calibrated);
        let probes = host.probe_count();
        assert!(matches!(
            second.request_open(&mut host, request()),
            OpenOutcome::Committed(_)
        ));
        assert_eq!(host.probe_count(), probes);

        let isolated = calibrator(&CalibrationCache::new());
        assert_eq!(isolated.state(1.2), CalibrationState::Uncalibrated);
    }
}
