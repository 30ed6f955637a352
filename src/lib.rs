//! Globewire - an interactive 3D network globe
//!
//! Core modules:
//! - `geo`: Pure geographic geometry (projection, dot matrix, boundaries, arcs)
//! - `sim`: Deterministic satellite marker simulation (growth, homing, drift)
//! - `scene`: Scene graph ownership and group rebuilds
//! - `camera`: Damped orbit camera controller
//! - `renderer`: WebGPU rendering pipeline
//! - `catalog`: Demo data provider (sample arcs, mutating satellite fleet)

pub mod camera;
pub mod catalog;
pub mod config;
pub mod geo;
pub mod renderer;
pub mod scene;
pub mod sim;

pub use config::GlobeConfig;
pub use geo::GeoPoint;
pub use scene::SceneGraph;

/// Globe geometry and animation constants
pub mod consts {
    /// Globe radius; everything else is expressed relative to this
    pub const GLOBE_RADIUS: f64 = 1.0;
    /// Sphere tessellation for the globe body and atmosphere shell
    pub const SPHERE_SEGMENTS: u32 = 64;

    /// Latitude band step for the surface dot matrix (degrees)
    pub const DOT_BAND_STEP_DEG: f64 = 15.0;
    /// Dots per unit of band circumference
    pub const DOT_DENSITY: f64 = 2.0;

    /// Boundary rings float slightly above the globe surface to avoid
    /// z-fighting with the solid body mesh
    pub const BOUNDARY_LIFT: f64 = 1.001;

    /// Bezier subdivisions per connection arc (51 points inclusive)
    pub const ARC_SEGMENTS: u32 = 50;

    /// Per-frame growth increment for a newly created satellite marker
    pub const GROWTH_STEP: f64 = 0.05;
    /// Fraction of remaining distance a marker covers toward its target
    /// each frame (exponential-decay homing)
    pub const HOMING_FACTOR: f64 = 0.05;
    /// Per-frame probability that a marker gets knocked off course
    pub const DRIFT_PROBABILITY: f64 = 0.001;
    /// Full width of the uniform per-axis drift offset
    pub const DRIFT_MAGNITUDE: f64 = 0.0005;

    /// Radians of group rotation per frame per unit of auto-rotate speed
    pub const AUTO_ROTATE_FACTOR: f64 = 0.001;

    /// Satellite body dimensions (width, height, depth) and antenna height
    pub const SAT_BODY_SIZE: [f64; 3] = [0.02, 0.01, 0.01];
    pub const SAT_ANTENNA_HEIGHT: f64 = 0.02;
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Build an RGBA color from 8-bit channel values
#[inline]
pub const fn rgb8(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Same as [`rgb8`] with an explicit alpha
#[inline]
pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}
