//! Geometry generation for scene groups
//!
//! Converts scene-graph contents into vertex lists each frame. Group
//! rotations are applied on the CPU here, so the shaders never see per-group
//! model matrices.

use glam::{DMat3, DVec3, Vec3};

use super::vertex::{palette, FlatVertex, MeshVertex};
use crate::consts::{GLOBE_RADIUS, SAT_ANTENNA_HEIGHT, SAT_BODY_SIZE, SPHERE_SEGMENTS};
use crate::scene::{ArcGroup, BoundaryGroup, DotGroup, SatelliteGroup, SceneGraph};

/// Opacity multipliers matching the layer materials
const GLOBE_OPACITY: f32 = 0.9;
const ATMOSPHERE_OPACITY: f32 = 0.1;
const DOT_OPACITY: f32 = 0.6;
const BOUNDARY_OPACITY: f32 = 0.3;
const ARC_OPACITY: f32 = 0.8;

/// World-units-per-pixel factor for the dot size config value
const DOT_SIZE_SCALE: f32 = 0.005;

fn with_alpha(color: [f32; 4], opacity: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * opacity]
}

fn to_f32(p: DVec3) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

/// Tessellate a UV sphere into a triangle list
///
/// `inward` flips winding and normals for shells that should only show their
/// far side (the atmosphere, mirroring back-side rendering).
pub fn uv_sphere(
    radius: f64,
    segments: u32,
    color: [f32; 4],
    emissive: [f32; 4],
    inward: bool,
) -> Vec<MeshVertex> {
    let mut vertices = Vec::with_capacity((segments * segments * 6) as usize);
    let seg = f64::from(segments);

    let point_at = |ix: u32, iy: u32| -> DVec3 {
        let u = f64::from(ix) / seg;
        let v = f64::from(iy) / seg;
        let theta = u * std::f64::consts::TAU;
        let phi = v * std::f64::consts::PI;
        DVec3::new(
            -radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        )
    };

    let mut push = |p: DVec3| {
        let n = p.normalize_or_zero();
        let normal = if inward { -n } else { n };
        vertices.push(MeshVertex {
            position: to_f32(p),
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            color,
            emissive,
        });
    };

    for iy in 0..segments {
        for ix in 0..segments {
            let a = point_at(ix, iy);
            let b = point_at(ix + 1, iy);
            let c = point_at(ix + 1, iy + 1);
            let d = point_at(ix, iy + 1);

            if inward {
                push(a);
                push(c);
                push(b);
                push(a);
                push(d);
                push(c);
            } else {
                push(a);
                push(b);
                push(c);
                push(a);
                push(c);
                push(d);
            }
        }
    }

    vertices
}

/// Axis-aligned cuboid triangle list with face normals
pub fn cuboid(center: Vec3, half: Vec3, color: [f32; 4]) -> Vec<MeshVertex> {
    let mut vertices = Vec::with_capacity(36);

    // (normal, two in-plane axes) per face
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    for (normal, u, v) in faces {
        let face_center = center + normal * (normal.abs().dot(half));
        let eu = u * (u.abs().dot(half));
        let ev = v * (v.abs().dot(half));

        let p00 = face_center - eu - ev;
        let p10 = face_center + eu - ev;
        let p11 = face_center + eu + ev;
        let p01 = face_center - eu + ev;

        for p in [p00, p10, p11, p00, p11, p01] {
            vertices.push(MeshVertex {
                position: p.to_array(),
                normal: normal.to_array(),
                color,
                emissive: [0.0; 4],
            });
        }
    }

    vertices
}

/// Globe body mesh
pub fn static_mesh_globe(scene: &SceneGraph) -> Vec<MeshVertex> {
    let emissive = {
        let e = scene.globe.emissive;
        let i = scene.globe.emissive_intensity;
        [e[0] * i, e[1] * i, e[2] * i, 0.0]
    };

    uv_sphere(
        GLOBE_RADIUS,
        SPHERE_SEGMENTS,
        with_alpha(scene.globe.color, GLOBE_OPACITY),
        emissive,
        false,
    )
}

/// Atmosphere shell mesh; empty when the atmosphere is disabled
pub fn static_mesh_atmosphere(scene: &SceneGraph) -> Vec<MeshVertex> {
    match &scene.atmosphere {
        Some(atmosphere) => uv_sphere(
            GLOBE_RADIUS + atmosphere.altitude,
            SPHERE_SEGMENTS,
            with_alpha(atmosphere.color, ATMOSPHERE_OPACITY),
            [0.0; 4],
            true,
        ),
        None => Vec::new(),
    }
}

/// Dot matrix as surface-tangent quads
///
/// WebGPU point primitives are a single pixel, so each dot becomes a small
/// quad spanning the band-local east/north directions.
pub fn dot_quads(dots: &DotGroup) -> Vec<FlatVertex> {
    let rot = DMat3::from_rotation_y(dots.rotation_y);
    let color = with_alpha(dots.color, DOT_OPACITY);
    let half = f64::from(dots.size * DOT_SIZE_SCALE) / 2.0;

    let mut vertices = Vec::with_capacity(dots.points.len() * 6);
    for &p in &dots.points {
        let up = p.normalize_or_zero();
        let east = DVec3::Y.cross(up).normalize_or_zero();
        if east == DVec3::ZERO {
            continue;
        }
        let north = up.cross(east);

        let corner = |su: f64, sv: f64| rot * (p + east * (su * half) + north * (sv * half));
        let p00 = corner(-1.0, -1.0);
        let p10 = corner(1.0, -1.0);
        let p11 = corner(1.0, 1.0);
        let p01 = corner(-1.0, 1.0);

        for q in [p00, p10, p11, p00, p11, p01] {
            vertices.push(FlatVertex::new(to_f32(q), color));
        }
    }

    vertices
}

/// Boundary loops as line-list segments, closed and group-rotated
pub fn boundary_lines(boundaries: &BoundaryGroup) -> Vec<FlatVertex> {
    let rot = DMat3::from_rotation_y(boundaries.rotation_y);
    let mut vertices = Vec::new();

    for line_loop in &boundaries.loops {
        let color = with_alpha(line_loop.color, BOUNDARY_OPACITY);
        let n = line_loop.points.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            let a = rot * line_loop.points[i];
            let b = rot * line_loop.points[(i + 1) % n];
            vertices.push(FlatVertex::new(to_f32(a), color));
            vertices.push(FlatVertex::new(to_f32(b), color));
        }
    }

    vertices
}

/// Connection arcs as line-list segments; arcs do not auto-rotate
pub fn arc_lines(arcs: &ArcGroup) -> Vec<FlatVertex> {
    let mut vertices = Vec::new();

    for line in &arcs.lines {
        let color = with_alpha(line.color, ARC_OPACITY);
        for pair in line.points.windows(2) {
            vertices.push(FlatVertex::new(to_f32(pair[0]), color));
            vertices.push(FlatVertex::new(to_f32(pair[1]), color));
        }
    }

    vertices
}

/// Satellite bodies and antenna masts, scaled by growth
pub fn satellite_mesh(satellites: &SatelliteGroup) -> Vec<MeshVertex> {
    let rot = DMat3::from_rotation_y(satellites.rotation_y);
    let mut vertices = Vec::with_capacity(satellites.markers.len() * 72);

    let body_half = Vec3::new(
        SAT_BODY_SIZE[0] as f32 / 2.0,
        SAT_BODY_SIZE[1] as f32 / 2.0,
        SAT_BODY_SIZE[2] as f32 / 2.0,
    );
    let antenna_half = Vec3::new(0.001, SAT_ANTENNA_HEIGHT as f32 / 2.0, 0.001);

    for marker in &satellites.markers {
        let growth = marker.growth as f32;
        if growth <= 0.0 {
            continue;
        }
        let center = (rot * marker.position).as_vec3();

        vertices.extend(cuboid(center, body_half * growth, marker.color));
        vertices.extend(cuboid(
            center + Vec3::Y * (SAT_ANTENNA_HEIGHT as f32 / 2.0) * growth,
            antenna_half * growth,
            palette::ANTENNA,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobeConfig;
    use crate::scene::SceneGraph;
    use crate::sim::SatelliteSpec;

    #[test]
    fn test_sphere_vertices_on_radius() {
        let verts = uv_sphere(2.0, 8, [1.0; 4], [0.0; 4], false);
        assert_eq!(verts.len(), 8 * 8 * 6);
        for v in &verts {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_inward_sphere_normals_point_in() {
        let verts = uv_sphere(1.0, 8, [1.0; 4], [0.0; 4], true);
        for v in &verts {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            if p.length() > 1e-3 {
                assert!(p.dot(n) < 0.0);
            }
        }
    }

    #[test]
    fn test_cuboid_has_six_faces() {
        let verts = cuboid(Vec3::ZERO, Vec3::splat(0.5), [1.0; 4]);
        assert_eq!(verts.len(), 36);
        for v in &verts {
            for c in v.position {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_zero_growth_markers_are_invisible() {
        let mut scene = SceneGraph::compose(&GlobeConfig::default(), 1);
        scene.set_satellites(&[SatelliteSpec {
            id: "a".into(),
            lat: 0.0,
            lng: 0.0,
            alt: 0.05,
            color: [1.0; 4],
        }]);
        assert!(satellite_mesh(&scene.satellites).is_empty());

        let config = GlobeConfig::default();
        scene.advance(&config);
        assert!(!satellite_mesh(&scene.satellites).is_empty());
    }

    #[test]
    fn test_boundary_segments_close_the_loop() {
        let mut scene = SceneGraph::compose(&GlobeConfig::default(), 1);
        let json = r#"{
            "features": [{
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10]]]
                }
            }]
        }"#;
        let collection = crate::geo::FeatureCollection::from_json(json).unwrap();
        scene.set_boundaries(&collection);

        let verts = boundary_lines(&scene.boundaries);
        // 4 points -> 4 segments -> 8 vertices, last segment ends where the
        // first begins
        assert_eq!(verts.len(), 8);
        assert_eq!(verts[verts.len() - 1].position, verts[0].position);
    }

    #[test]
    fn test_arc_segments_count() {
        let mut scene = SceneGraph::compose(&GlobeConfig::default(), 1);
        scene.set_arcs(&[crate::geo::ArcSpec {
            start: crate::geo::GeoPoint::new(0.0, 0.0),
            end: crate::geo::GeoPoint::new(10.0, 10.0),
            altitude: 0.2,
            color: [1.0; 4],
        }]);
        // 51 points -> 50 segments -> 100 line vertices
        assert_eq!(arc_lines(&scene.arcs).len(), 100);
    }
}
