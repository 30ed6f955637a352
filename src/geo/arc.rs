//! Connection arc generation
//!
//! An arc is a quadratic Bezier between two surface points, with the control
//! point at their midpoint raised along +Y by `radius * altitude`. One-shot,
//! stateless: a spec tessellates to a polyline and that is the whole story
//! (draw-in animation is a presentation concern, not handled here).

use glam::DVec3;

use super::{project_point, GeoPoint};
use crate::consts::{ARC_SEGMENTS, GLOBE_RADIUS};

/// One connection arc, supplied by the data provider
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSpec {
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Apex lift as a fraction of the globe radius; 0 hugs the chord
    pub altitude: f64,
    pub color: [f32; 4],
}

/// A tessellated open polyline with a single color
#[derive(Debug, Clone)]
pub struct Polyline {
    pub points: Vec<DVec3>,
    pub color: [f32; 4],
}

/// Tessellate an arc spec into a polyline
pub fn make_arc(spec: &ArcSpec) -> Polyline {
    let start = project_point(spec.start, GLOBE_RADIUS);
    let end = project_point(spec.end, GLOBE_RADIUS);

    let control = DVec3::new(
        (start.x + end.x) * 0.5,
        (start.y + end.y) * 0.5 + GLOBE_RADIUS * spec.altitude,
        (start.z + end.z) * 0.5,
    );

    let points = (0..=ARC_SEGMENTS)
        .map(|i| {
            let t = f64::from(i) / f64::from(ARC_SEGMENTS);
            quadratic_bezier(start, control, end, t)
        })
        .collect();

    Polyline {
        points,
        color: spec.color,
    }
}

fn quadratic_bezier(p0: DVec3, p1: DVec3, p2: DVec3, t: f64) -> DVec3 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(altitude: f64) -> ArcSpec {
        ArcSpec {
            start: GeoPoint::new(51.5072, -0.1276),
            end: GeoPoint::new(40.7128, -74.006),
            altitude,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    #[test]
    fn test_endpoints_on_surface() {
        let line = make_arc(&spec(0.3));
        let first = line.points.first().unwrap();
        let last = line.points.last().unwrap();
        assert!((first.length() - 1.0).abs() < 1e-9);
        assert!((last.length() - 1.0).abs() < 1e-9);
        assert_eq!(line.points.len(), 51);
    }

    #[test]
    fn test_flat_arc_midpoint_on_chord() {
        let s = spec(0.0);
        let line = make_arc(&s);
        let start = project_point(s.start, 1.0);
        let end = project_point(s.end, 1.0);
        let chord_mid = (start + end) * 0.5;
        let mid = line.points[line.points.len() / 2];
        assert!((mid - chord_mid).length() < 1e-9);
    }

    #[test]
    fn test_raised_arc_clears_surface_and_peaks_at_apex() {
        let line = make_arc(&spec(0.3));
        let lengths: Vec<f64> = line.points.iter().map(|p| p.length()).collect();

        for len in &lengths {
            assert!(*len >= 1.0 - 1e-9, "sample dipped below surface: {len}");
        }

        // Apex (t = 0.5) is the farthest sample from the origin
        let apex = lengths[lengths.len() / 2];
        let max = lengths.iter().cloned().fold(f64::MIN, f64::max);
        assert!((apex - max).abs() < 1e-9);
    }
}
