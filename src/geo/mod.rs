//! Pure geographic geometry
//!
//! Everything in here is deterministic and side-effect free:
//! - `project`: latitude/longitude/radius -> Cartesian point
//! - `dots`: procedural surface dot matrix
//! - `boundary`: GeoJSON boundary tessellation
//! - `arc`: raised Bezier connection arcs

pub mod arc;
pub mod boundary;
pub mod dots;

pub use arc::{make_arc, ArcSpec, Polyline};
pub use boundary::{tessellate, Feature, FeatureCollection, Geometry, LineLoop};
pub use dots::dot_matrix;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::deg_to_rad;

/// A geographic coordinate in degrees
///
/// Latitude is [-90, 90], longitude [-180, 180]. Out-of-range values are not
/// rejected; the trig in [`project`] maps them periodically and callers are
/// responsible for valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Project a geographic coordinate onto a sphere of the given radius
///
/// The axis convention matches equirectangular textures wrapped on a Y-up
/// sphere: the north pole is +Y, and longitude winds so that lng = -180 sits
/// on +X.
pub fn project(lat: f64, lng: f64, radius: f64) -> DVec3 {
    let phi = deg_to_rad(90.0 - lat);
    let theta = deg_to_rad(lng + 180.0);

    DVec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Project a [`GeoPoint`] at the given radius
#[inline]
pub fn project_point(point: GeoPoint, radius: f64) -> DVec3 {
    project(point.lat, point.lng, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_project_equator_prime_meridian() {
        // lat 0, lng 0: phi = 90deg, theta = 180deg -> (1, 0, ~0)
        let p = project(0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_project_north_pole_ignores_longitude() {
        for lng in [-180.0, -73.5, 0.0, 42.0, 180.0] {
            let p = project(90.0, lng, 1.0);
            assert!((p.y - 1.0).abs() < 1e-12);
            assert!((p.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_project_scales_with_radius() {
        let unit = project(48.85, 2.35, 1.0);
        let scaled = project(48.85, 2.35, 2.5);
        assert!((scaled - unit * 2.5).length() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_projection_preserves_radius(
            lat in -90.0f64..=90.0,
            lng in -180.0f64..=180.0,
            radius in 0.01f64..=100.0,
        ) {
            let p = project(lat, lng, radius);
            let rel = (p.length() - radius).abs() / radius;
            prop_assert!(rel < 1e-9);
        }
    }
}
