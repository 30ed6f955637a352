//! Globe configuration
//!
//! An immutable-per-render bag of colors, sizes, and toggles, owned by the
//! caller and consumed read-only by the scene composer and frame loop.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::{rgb8, rgba8};

/// Everything the caller can tune about the globe's appearance and motion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobeConfig {
    // === Surface ===
    /// Dot matrix point size in pixels (scaled by 0.005 world units)
    pub point_size: f32,
    pub globe_color: [f32; 4],
    /// Self-illumination of the globe body
    pub emissive: [f32; 4],
    pub emissive_intensity: f32,
    pub shininess: f32,
    /// Shared color for the dot matrix and country boundary lines
    pub polygon_color: [f32; 4],

    // === Atmosphere ===
    pub show_atmosphere: bool,
    pub atmosphere_color: [f32; 4],
    /// Shell height above the surface as a fraction of the globe radius
    pub atmosphere_altitude: f64,

    // === Lighting rig ===
    pub ambient_light: [f32; 4],
    pub directional_left_light: [f32; 4],
    pub directional_top_light: [f32; 4],
    pub point_light: [f32; 4],

    // === Camera / motion ===
    /// Where the camera initially faces
    pub initial_position: GeoPoint,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            point_size: 10.0,
            globe_color: rgb8(0x06, 0x20, 0x56),
            emissive: rgb8(0x06, 0x20, 0x56),
            emissive_intensity: 0.1,
            shininess: 0.9,
            polygon_color: rgba8(255, 255, 255, 0.7),

            show_atmosphere: true,
            atmosphere_color: rgb8(255, 255, 255),
            atmosphere_altitude: 0.1,

            ambient_light: rgb8(0x38, 0xbd, 0xf8),
            directional_left_light: rgb8(255, 255, 255),
            directional_top_light: rgb8(255, 255, 255),
            point_light: rgb8(255, 255, 255),

            initial_position: GeoPoint::new(22.3193, 114.1694),
            auto_rotate: true,
            auto_rotate_speed: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_json() {
        let config = GlobeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GlobeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.point_size, config.point_size);
        assert_eq!(back.globe_color, config.globe_color);
        assert_eq!(back.auto_rotate, config.auto_rotate);
        assert_eq!(back.initial_position, config.initial_position);
    }
}
