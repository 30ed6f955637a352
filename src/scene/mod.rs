//! Scene graph ownership
//!
//! The [`SceneGraph`] owns everything that gets drawn: the static globe body,
//! atmosphere shell and lighting rig (built once per composition), and three
//! mutable groups (arcs, boundaries, satellites) that are rebuilt wholesale
//! whenever their backing data changes. The frame loop reads the graph, but
//! only marker state and group rotations mutate between data updates.

use glam::DVec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GlobeConfig;
use crate::consts::{AUTO_ROTATE_FACTOR, GLOBE_RADIUS};
use crate::geo::{self, ArcSpec, FeatureCollection, LineLoop, Polyline};
use crate::sim::{self, SatelliteMarker, SatelliteSpec};

/// Globe body material parameters
#[derive(Debug, Clone)]
pub struct GlobeBody {
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    pub emissive_intensity: f32,
    pub shininess: f32,
}

/// Optional atmosphere shell
#[derive(Debug, Clone)]
pub struct Atmosphere {
    pub color: [f32; 4],
    /// Shell height above the surface as a fraction of the globe radius
    pub altitude: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 4],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub color: [f32; 4],
    /// Unit vector from the surface toward the light
    pub direction: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub color: [f32; 4],
    pub position: [f32; 3],
    pub intensity: f32,
}

/// The four-light rig: ambient, two directionals, one point
#[derive(Debug, Clone)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directionals: [DirectionalLight; 2],
    pub point: PointLight,
}

/// Decorative dot matrix; built once, rotates with the auto-rotate group
pub struct DotGroup {
    pub points: Vec<DVec3>,
    pub color: [f32; 4],
    /// Rendered point size in pixels
    pub size: f32,
    pub rotation_y: f64,
}

/// Connection arcs; rebuilt on every [`SceneGraph::set_arcs`]
pub struct ArcGroup {
    pub lines: Vec<Polyline>,
}

/// Country boundaries; rebuilt on every [`SceneGraph::set_boundaries`]
pub struct BoundaryGroup {
    pub loops: Vec<LineLoop>,
    pub color: [f32; 4],
    pub rotation_y: f64,
}

/// Satellite markers plus the seeded RNG that drives drift
pub struct SatelliteGroup {
    pub markers: Vec<SatelliteMarker>,
    pub rotation_y: f64,
    rng: Pcg32,
}

/// The complete owned scene
pub struct SceneGraph {
    pub globe: GlobeBody,
    pub atmosphere: Option<Atmosphere>,
    pub lights: LightRig,
    pub dots: DotGroup,
    pub arcs: ArcGroup,
    pub boundaries: BoundaryGroup,
    pub satellites: SatelliteGroup,
}

impl SceneGraph {
    /// Build the static scene elements from configuration
    ///
    /// Composition is a pure construction: running it again yields a fresh
    /// graph and the previous one drops, so static elements can never
    /// accumulate across re-composition.
    pub fn compose(config: &GlobeConfig, seed: u64) -> Self {
        let atmosphere = config.show_atmosphere.then(|| Atmosphere {
            color: config.atmosphere_color,
            altitude: config.atmosphere_altitude,
        });

        let lights = LightRig {
            ambient: AmbientLight {
                color: config.ambient_light,
                intensity: 0.5,
            },
            directionals: [
                DirectionalLight {
                    color: config.directional_left_light,
                    direction: [-1.0, 0.0, 0.0],
                    intensity: 0.5,
                },
                DirectionalLight {
                    color: config.directional_top_light,
                    direction: [0.0, 1.0, 0.0],
                    intensity: 0.5,
                },
            ],
            point: PointLight {
                color: config.point_light,
                position: [5.0, 3.0, 5.0],
                intensity: 1.0,
            },
        };

        Self {
            globe: GlobeBody {
                color: config.globe_color,
                emissive: config.emissive,
                emissive_intensity: config.emissive_intensity,
                shininess: config.shininess,
            },
            atmosphere,
            lights,
            dots: DotGroup {
                points: geo::dot_matrix(),
                color: config.polygon_color,
                size: config.point_size,
                rotation_y: 0.0,
            },
            arcs: ArcGroup { lines: Vec::new() },
            boundaries: BoundaryGroup {
                loops: Vec::new(),
                color: config.polygon_color,
                rotation_y: 0.0,
            },
            satellites: SatelliteGroup {
                markers: Vec::new(),
                rotation_y: 0.0,
                rng: Pcg32::seed_from_u64(seed),
            },
        }
    }

    /// Replace the arc group's contents
    pub fn set_arcs(&mut self, specs: &[ArcSpec]) {
        self.arcs.lines = specs.iter().map(geo::make_arc).collect();
        log::info!("arc group rebuilt: {} arcs", self.arcs.lines.len());
    }

    /// Replace the boundary group's contents from a feature collection
    pub fn set_boundaries(&mut self, collection: &FeatureCollection) {
        self.boundaries.loops =
            geo::boundary::tessellate_collection(collection, GLOBE_RADIUS, self.boundaries.color);
        log::info!(
            "boundary group rebuilt: {} loops from {} features",
            self.boundaries.loops.len(),
            collection.features.len()
        );
    }

    /// Replace the satellite group's contents
    ///
    /// Whole-group replacement: every marker is discarded and rebuilt with
    /// growth 0, even for specs identical to ones already displayed. Cheap
    /// and simple at the cost of per-marker continuity across updates.
    pub fn set_satellites(&mut self, specs: &[SatelliteSpec]) {
        self.satellites.markers = specs.iter().map(SatelliteMarker::new).collect();
        log::debug!(
            "satellite group rebuilt: {} markers",
            self.satellites.markers.len()
        );
    }

    /// Advance one frame: auto-rotation and marker motion
    ///
    /// The camera controller is advanced separately by the frame loop; this
    /// touches only scene-owned state.
    pub fn advance(&mut self, config: &GlobeConfig) {
        if config.auto_rotate {
            let step = config.auto_rotate_speed * AUTO_ROTATE_FACTOR;
            self.dots.rotation_y += step;
            self.boundaries.rotation_y += step;
            self.satellites.rotation_y += step;
        }

        sim::advance(&mut self.satellites.markers, &mut self.satellites.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn sat(id: &str, lat: f64, lng: f64) -> SatelliteSpec {
        SatelliteSpec {
            id: id.into(),
            lat,
            lng,
            alt: 0.05,
            color: WHITE,
        }
    }

    #[test]
    fn test_compose_builds_static_elements() {
        let scene = SceneGraph::compose(&GlobeConfig::default(), 1);
        assert!(!scene.dots.points.is_empty());
        assert!(scene.atmosphere.is_some());
        assert!(scene.arcs.lines.is_empty());
        assert!(scene.boundaries.loops.is_empty());
        assert!(scene.satellites.markers.is_empty());
    }

    #[test]
    fn test_atmosphere_toggle() {
        let config = GlobeConfig {
            show_atmosphere: false,
            ..GlobeConfig::default()
        };
        assert!(SceneGraph::compose(&config, 1).atmosphere.is_none());
    }

    #[test]
    fn test_set_arcs_rebuilds_group() {
        let mut scene = SceneGraph::compose(&GlobeConfig::default(), 1);
        let arc = ArcSpec {
            start: GeoPoint::new(0.0, 0.0),
            end: GeoPoint::new(10.0, 10.0),
            altitude: 0.1,
            color: WHITE,
        };
        scene.set_arcs(&[arc.clone(), arc.clone()]);
        assert_eq!(scene.arcs.lines.len(), 2);
        scene.set_arcs(&[arc]);
        assert_eq!(scene.arcs.lines.len(), 1);
        scene.set_arcs(&[]);
        assert!(scene.arcs.lines.is_empty());
    }

    #[test]
    fn test_satellite_replacement_resets_growth() {
        let mut scene = SceneGraph::compose(&GlobeConfig::default(), 1);
        scene.set_satellites(&[sat("a", 10.0, 20.0), sat("b", -30.0, 40.0)]);

        let config = GlobeConfig::default();
        for _ in 0..20 {
            scene.advance(&config);
        }
        assert!(scene.satellites.markers.iter().all(|m| m.growth == 1.0));

        // Value-identical list still rebuilds every marker from scratch
        scene.set_satellites(&[sat("a", 10.0, 20.0), sat("b", -30.0, 40.0)]);
        assert!(scene.satellites.markers.iter().all(|m| m.growth == 0.0));
    }

    #[test]
    fn test_auto_rotation_spins_three_groups() {
        let config = GlobeConfig {
            auto_rotate: true,
            auto_rotate_speed: 2.0,
            ..GlobeConfig::default()
        };
        let mut scene = SceneGraph::compose(&config, 1);
        for _ in 0..10 {
            scene.advance(&config);
        }
        let expected = 2.0 * AUTO_ROTATE_FACTOR * 10.0;
        assert!((scene.dots.rotation_y - expected).abs() < 1e-12);
        assert!((scene.boundaries.rotation_y - expected).abs() < 1e-12);
        assert!((scene.satellites.rotation_y - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_disabled_stays_still() {
        let config = GlobeConfig {
            auto_rotate: false,
            ..GlobeConfig::default()
        };
        let mut scene = SceneGraph::compose(&config, 1);
        for _ in 0..10 {
            scene.advance(&config);
        }
        assert_eq!(scene.dots.rotation_y, 0.0);
    }

    #[test]
    fn test_boundary_rebuild_from_collection() {
        let mut scene = SceneGraph::compose(&GlobeConfig::default(), 1);
        let json = r#"{
            "features": [{
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0, 0], [10, 0], [10, 10]]],
                        [[[90, 0], [100, 0], [100, 10]]]
                    ]
                }
            }]
        }"#;
        let collection = FeatureCollection::from_json(json).unwrap();
        scene.set_boundaries(&collection);
        assert_eq!(scene.boundaries.loops.len(), 2);

        scene.set_boundaries(&FeatureCollection { features: vec![] });
        assert!(scene.boundaries.loops.is_empty());
    }
}
