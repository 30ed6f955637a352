//! Country boundary tessellation
//!
//! Consumes a GeoJSON-shaped feature collection (Polygon / MultiPolygon with
//! (longitude, latitude) ring coordinates) and turns each polygon's outer
//! ring into a closed line loop floating just above the globe surface.
//!
//! Interior rings (holes) are ignored; downstream visual parity depends on
//! that, so it is a documented simplification rather than a bug. Geometry
//! types other than Polygon/MultiPolygon deserialize into [`Geometry::Unsupported`]
//! and tessellate to nothing.

use glam::DVec3;
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::project;

/// A (longitude, latitude) pair as GeoJSON orders them
///
/// Deserializes from a coordinate array, tolerating and discarding any
/// trailing elements (some data sets carry altitude as a third member).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat(pub f64, pub f64);

impl<'de> Deserialize<'de> for LngLat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LngLatVisitor;

        impl<'de> Visitor<'de> for LngLatVisitor {
            type Value = LngLat;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a [longitude, latitude, ...] array")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<LngLat, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let lng: f64 = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                let lat: f64 = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                // Swallow altitude or anything else trailing
                while seq.next_element::<serde::de::IgnoredAny>()?.is_some() {}
                Ok(LngLat(lng, lat))
            }
        }

        deserializer.deserialize_seq(LngLatVisitor)
    }
}

/// An ordered ring of coordinates; GeoJSON rings repeat the first point last,
/// but nothing here depends on that
pub type Ring = Vec<LngLat>;

/// Feature geometry, tagged the way GeoJSON tags it
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    /// Anything else (Point, LineString, ...) is deliberately not rendered
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Parse a GeoJSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A closed line loop with a single color (last point connects to first)
#[derive(Debug, Clone)]
pub struct LineLoop {
    pub points: Vec<DVec3>,
    pub color: [f32; 4],
}

/// Tessellate one geometry into closed loops at `radius * 1.001`
///
/// One loop per outer ring: a Polygon contributes at most one, a
/// MultiPolygon one per constituent polygon. Rings with fewer than two
/// points pass through as trivial loops that draw nothing.
pub fn tessellate(geometry: &Geometry, radius: f64, color: [f32; 4]) -> Vec<LineLoop> {
    match geometry {
        Geometry::Polygon { coordinates } => outer_ring(coordinates, radius, color)
            .into_iter()
            .collect(),
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .filter_map(|polygon| outer_ring(polygon, radius, color))
            .collect(),
        Geometry::Unsupported => Vec::new(),
    }
}

/// Tessellate every feature of a collection
pub fn tessellate_collection(
    collection: &FeatureCollection,
    radius: f64,
    color: [f32; 4],
) -> Vec<LineLoop> {
    collection
        .features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .flat_map(|g| tessellate(g, radius, color))
        .collect()
}

fn outer_ring(rings: &[Ring], radius: f64, color: [f32; 4]) -> Option<LineLoop> {
    let ring = rings.first()?;
    let lifted = radius * crate::consts::BOUNDARY_LIFT;
    let points = ring
        .iter()
        .map(|&LngLat(lng, lat)| project(lat, lng, lifted))
        .collect();
    Some(LineLoop { points, color })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn square_ring() -> Ring {
        vec![
            LngLat(0.0, 0.0),
            LngLat(10.0, 0.0),
            LngLat(10.0, 10.0),
            LngLat(0.0, 10.0),
        ]
    }

    #[test]
    fn test_polygon_outer_ring_projected_and_lifted() {
        let geometry = Geometry::Polygon {
            coordinates: vec![square_ring()],
        };
        let loops = tessellate(&geometry, 1.0, WHITE);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].points.len(), 4);
        for p in &loops[0].points {
            assert!((p.length() - 1.001).abs() < 1e-9);
        }
    }

    #[test]
    fn test_polygon_holes_ignored() {
        let hole = vec![LngLat(2.0, 2.0), LngLat(8.0, 2.0), LngLat(8.0, 8.0)];
        let geometry = Geometry::Polygon {
            coordinates: vec![square_ring(), hole],
        };
        let loops = tessellate(&geometry, 1.0, WHITE);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].points.len(), 4);
    }

    #[test]
    fn test_multi_polygon_independent_loops() {
        let shifted: Ring = square_ring()
            .iter()
            .map(|&LngLat(lng, lat)| LngLat(lng + 90.0, lat))
            .collect();
        let geometry = Geometry::MultiPolygon {
            coordinates: vec![vec![square_ring()], vec![shifted]],
        };
        let loops = tessellate(&geometry, 1.0, WHITE);
        assert_eq!(loops.len(), 2);
        for a in &loops[0].points {
            for b in &loops[1].points {
                assert!((*a - *b).length() > 1e-6, "loops share a point");
            }
        }
    }

    #[test]
    fn test_unsupported_geometry_is_noop() {
        let json = r#"{
            "features": [
                { "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] } },
                { "geometry": null }
            ]
        }"#;
        let collection = FeatureCollection::from_json(json).unwrap();
        assert!(matches!(
            collection.features[0].geometry,
            Some(Geometry::Unsupported)
        ));
        assert!(tessellate_collection(&collection, 1.0, WHITE).is_empty());
    }

    #[test]
    fn test_parse_real_shape() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "NAME": "Squareland" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
                }
            }]
        }"#;
        let collection = FeatureCollection::from_json(json).unwrap();
        let loops = tessellate_collection(&collection, 1.0, WHITE);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].points.len(), 5);
    }

    #[test]
    fn test_three_element_positions_tolerated() {
        let json = r#"[[0, 0, 123.0], [10, 0, 5]]"#;
        let ring: Ring = serde_json::from_str(json).unwrap();
        assert_eq!(ring, vec![LngLat(0.0, 0.0), LngLat(10.0, 0.0)]);
    }

    #[test]
    fn test_degenerate_ring_passes_through() {
        let geometry = Geometry::Polygon {
            coordinates: vec![vec![LngLat(0.0, 0.0)]],
        };
        let loops = tessellate(&geometry, 1.0, WHITE);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].points.len(), 1);
    }
}
