//! Surface dot matrix generation
//!
//! Decorative point cloud covering the globe at roughly uniform angular
//! density: each latitude band contributes dots in proportion to its
//! circumference, so the equator is densest and the poles taper off.

use glam::DVec3;

use super::project;
use crate::consts::{DOT_BAND_STEP_DEG, DOT_DENSITY};
use crate::deg_to_rad;

/// Generate the dot matrix for a unit sphere
///
/// Deterministic: same constants, same points, same order (south to north,
/// then east by longitude step within each band).
pub fn dot_matrix() -> Vec<DVec3> {
    let mut points = Vec::new();

    let mut lat: f64 = -90.0;
    while lat <= 90.0 {
        let band_radius = deg_to_rad(lat.abs()).cos();
        let circumference = band_radius * std::f64::consts::TAU;
        let dots_at_latitude = (circumference * DOT_DENSITY).floor() as i64;

        // Polar bands can round down to nothing
        if dots_at_latitude > 0 {
            let step = 360.0 / dots_at_latitude as f64;
            let mut lng = 0.0;
            while lng < 360.0 {
                points.push(project(lat, lng, 1.0));
                lng += step;
            }
        }

        lat += DOT_BAND_STEP_DEG;
    }

    points
}

/// Sample count for a single latitude band (exposed for tests)
pub fn band_sample_count(lat: f64) -> i64 {
    let circumference = deg_to_rad(lat.abs()).cos() * std::f64::consts::TAU;
    (circumference * DOT_DENSITY).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_dots_on_unit_sphere() {
        let points = dot_matrix();
        assert!(!points.is_empty());
        for p in &points {
            assert!((p.length() - 1.0).abs() < 1e-9, "dot off sphere: {p:?}");
        }
    }

    #[test]
    fn test_density_falls_off_toward_poles() {
        let mut lat = 0.0;
        let mut prev = band_sample_count(0.0);
        while lat <= 90.0 {
            let count = band_sample_count(lat);
            assert!(count <= prev, "band at {lat} denser than closer-to-equator band");
            prev = count;
            lat += DOT_BAND_STEP_DEG;
        }
    }

    #[test]
    fn test_equator_band_is_densest() {
        let equator = band_sample_count(0.0);
        let mut lat = -90.0;
        while lat <= 90.0 {
            assert!(band_sample_count(lat) <= equator);
            lat += DOT_BAND_STEP_DEG;
        }
    }

    #[test]
    fn test_polar_bands_skipped() {
        // cos(90deg) = 0 -> zero circumference -> no dots
        assert_eq!(band_sample_count(90.0), 0);
        assert_eq!(band_sample_count(-90.0), 0);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(dot_matrix(), dot_matrix());
    }
}
