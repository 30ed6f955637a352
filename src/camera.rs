//! Damped orbit camera
//!
//! The camera orbits the origin on a sphere, driven by externally supplied
//! rotate/zoom deltas with inertial damping, plus an optional auto-rotate.
//! Input capture (mouse/touch) is not handled here; callers feed deltas in
//! and call [`OrbitController::update`] once per frame.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::geo::{project_point, GeoPoint};

/// Vertical field of view (degrees)
const FOV_Y_DEG: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Initial orbit distance from the globe center
const START_DISTANCE: f32 = 2.5;
const MIN_DISTANCE: f32 = 1.5;
const MAX_DISTANCE: f32 = 4.0;

/// Scale applied to incoming rotate deltas
const ROTATE_SPEED: f32 = 0.5;
/// Fraction of rotational inertia kept each frame
const DAMPING_FACTOR: f32 = 0.05;

/// Camera data as the shader sees it
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
}

/// Orbiting camera with damped inertia
pub struct OrbitController {
    /// Azimuth around +Y, radians
    theta: f32,
    /// Polar angle from +Y, radians; clamped away from the poles
    phi: f32,
    distance: f32,
    /// Pending rotation, decayed by damping each update
    delta_theta: f32,
    delta_phi: f32,
    aspect: f32,
    auto_rotate: bool,
    auto_rotate_speed: f32,
}

impl OrbitController {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,
            distance: START_DISTANCE,
            delta_theta: 0.0,
            delta_phi: 0.0,
            aspect: width as f32 / height as f32,
            auto_rotate: false,
            auto_rotate_speed: 0.0,
        }
    }

    /// Aim the camera at a geographic point on the globe
    pub fn look_at_geo(&mut self, point: GeoPoint) {
        let p = project_point(point, 1.0).as_vec3();
        self.phi = (p.y / p.length()).acos();
        self.theta = p.x.atan2(p.z);
    }

    /// Configure auto-rotation; speed 2.0 completes one orbit per 30 s at
    /// 60 fps
    pub fn set_auto_rotate(&mut self, enabled: bool, speed: f64) {
        self.auto_rotate = enabled;
        self.auto_rotate_speed = speed as f32;
    }

    /// Feed an orbit delta (radians, pre-scaling); accumulates into inertia
    pub fn rotate_by(&mut self, d_theta: f32, d_phi: f32) {
        self.delta_theta += d_theta * ROTATE_SPEED;
        self.delta_phi += d_phi * ROTATE_SPEED;
    }

    /// Zoom toward/away from the globe; clamped to the orbit band
    pub fn zoom_by(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance damping/inertia and auto-rotation by one frame
    pub fn update(&mut self) {
        if self.auto_rotate {
            let tau = std::f32::consts::TAU;
            self.delta_theta += tau / 60.0 / 60.0 * self.auto_rotate_speed;
        }

        self.theta += self.delta_theta;
        self.phi = (self.phi + self.delta_phi).clamp(0.05, std::f32::consts::PI - 0.05);

        self.delta_theta *= 1.0 - DAMPING_FACTOR;
        self.delta_phi *= 1.0 - DAMPING_FACTOR;
    }

    /// Update the projection aspect ratio from the surface pixel size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn eye(&self) -> Vec3 {
        self.distance
            * Vec3::new(
                self.phi.sin() * self.theta.sin(),
                self.phi.cos(),
                self.phi.sin() * self.theta.cos(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEG.to_radians(), self.aspect, NEAR, FAR)
    }

    pub fn uniform(&self) -> CameraUniform {
        let view_proj = self.projection_matrix() * self.view_matrix();
        let eye = self.eye();
        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_change_updates_aspect() {
        let mut camera = OrbitController::new(800, 600);
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);

        camera.set_viewport(1920, 1080);
        assert!((camera.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_viewport_ignored() {
        let mut camera = OrbitController::new(800, 600);
        camera.set_viewport(0, 1080);
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_damping_decays_inertia() {
        let mut camera = OrbitController::new(800, 600);
        camera.rotate_by(1.0, 0.0);
        let mut last_theta = 0.0;
        let mut prev_step = f32::MAX;
        for _ in 0..50 {
            camera.update();
            let step = camera.theta - last_theta;
            assert!(step >= 0.0);
            assert!(step <= prev_step, "inertia should decay monotonically");
            prev_step = step;
            last_theta = camera.theta;
        }
        // Inertia has mostly bled off by now
        assert!(prev_step < 0.05);
    }

    #[test]
    fn test_auto_rotate_advances_azimuth() {
        let mut camera = OrbitController::new(800, 600);
        camera.set_auto_rotate(true, 2.0);
        let before = camera.theta;
        for _ in 0..60 {
            camera.update();
        }
        assert!(camera.theta > before);
    }

    #[test]
    fn test_zoom_clamped_to_orbit_band() {
        let mut camera = OrbitController::new(800, 600);
        camera.zoom_by(100.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
        camera.zoom_by(0.0001);
        assert_eq!(camera.distance, MIN_DISTANCE);
    }

    #[test]
    fn test_eye_distance_matches_orbit_radius() {
        let mut camera = OrbitController::new(800, 600);
        camera.look_at_geo(GeoPoint::new(22.3193, 114.1694));
        assert!((camera.eye().length() - START_DISTANCE).abs() < 1e-5);
    }
}
