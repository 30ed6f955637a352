//! Satellite marker state
//!
//! A marker is the live visual stand-in for one supplied satellite spec. It
//! carries the only mutable animation state in the system: a scale-in growth
//! value and a Cartesian position that homes toward the spec's orbital slot.

use glam::DVec3;
use rand::Rng;

use crate::consts::{DRIFT_MAGNITUDE, GROWTH_STEP, HOMING_FACTOR};
use crate::geo::{project_point, GeoPoint};

/// One satellite as supplied by the data provider
///
/// Identity is positional in the supplied sequence; `id` is carried for
/// display/debugging, not for reconciliation (any list change rebuilds the
/// whole marker group).
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteSpec {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Orbit height as a fraction of the globe radius
    pub alt: f64,
    pub color: [f32; 4],
}

/// Live animation state for one displayed satellite
#[derive(Debug, Clone)]
pub struct SatelliteMarker {
    /// Current position in the satellite group's local space
    pub position: DVec3,
    /// Assigned orbital slot
    pub target: GeoPoint,
    pub target_alt: f64,
    /// Scale-in easing, 0 at creation, clamped at 1; cosmetic only
    pub growth: f64,
    pub color: [f32; 4],
}

impl SatelliteMarker {
    /// Create a marker parked on its orbital slot with growth 0
    pub fn new(spec: &SatelliteSpec) -> Self {
        let target = GeoPoint::new(spec.lat, spec.lng);
        Self {
            position: project_point(target, 1.0 + spec.alt),
            target,
            target_alt: spec.alt,
            growth: 0.0,
            color: spec.color,
        }
    }

    /// The slot position this marker homes toward
    #[inline]
    pub fn target_position(&self) -> DVec3 {
        project_point(self.target, 1.0 + self.target_alt)
    }

    /// Advance the scale-in easing one step
    pub fn grow_step(&mut self) {
        if self.growth < 1.0 {
            self.growth = (self.growth + GROWTH_STEP).min(1.0);
        }
    }

    /// Move a fixed fraction of the remaining distance toward the slot
    pub fn home_step(&mut self) {
        let target = self.target_position();
        self.position += (target - self.position) * HOMING_FACTOR;
    }

    /// Knock the marker off course by a small random offset per axis
    ///
    /// The offset is never target-tracked; homing absorbs it over the
    /// following frames.
    pub fn drift<R: Rng>(&mut self, rng: &mut R) {
        self.position.x += (rng.random::<f64>() - 0.5) * DRIFT_MAGNITUDE;
        self.position.y += (rng.random::<f64>() - 0.5) * DRIFT_MAGNITUDE;
        self.position.z += (rng.random::<f64>() - 0.5) * DRIFT_MAGNITUDE;
    }
}
