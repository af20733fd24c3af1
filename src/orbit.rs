//! Keyboard-driven orbit camera
//!
//! The camera lives on a horizontal circle around a fixed center and always
//! faces it. Its whole state is one angle: 0 puts the camera on the +Z side
//! of the center, PI (the default) on the -Z side looking towards +Z.

use serde::{Deserialize, Serialize};
use crate::rasterizer::{Camera, Vec3};

/// Orbit parameters (world units and radians)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub center_x: f64,
    pub center_z: f64,
    pub radius: f64,
    /// Camera Y (world Y grows downwards)
    pub height: f64,
    /// Angle change per key press in radians
    pub step: f64,
    /// Shift multiplies the step by this and treats the result as degrees
    pub coarse_factor: f64,
    pub start_angle_deg: f64,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            center_x: 167.5,
            center_z: 0.0,
            radius: 500.0,
            height: 125.0,
            step: 0.05,
            coarse_factor: 200.0,
            start_angle_deg: 180.0,
        }
    }
}

/// Round to two decimals, halves rounding up
fn round2(x: f64) -> f64 {
    (x * 100.0 + 0.5).floor() / 100.0
}

pub struct OrbitCamera {
    angle: f64,
    settings: OrbitSettings,
}

impl OrbitCamera {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            angle: settings.start_angle_deg.to_radians(),
            settings,
        }
    }

    /// Current angle in radians
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    fn step(&self, coarse: bool) -> f64 {
        if coarse {
            (self.settings.step * self.settings.coarse_factor).to_radians()
        } else {
            self.settings.step
        }
    }

    /// Orbit counter-clockwise (seen from above); `coarse` is the Shift step
    pub fn rotate_left(&mut self, coarse: bool) {
        self.angle = round2(self.angle + self.step(coarse));
    }

    /// Orbit clockwise (seen from above); `coarse` is the Shift step
    pub fn rotate_right(&mut self, coarse: bool) {
        self.angle = round2(self.angle - self.step(coarse));
    }

    /// Snap to the nearest multiple of 45 degrees
    pub fn snap_to_45(&mut self) {
        let degrees = self.angle.to_degrees();
        let nearest = (degrees / 45.0 + 0.5).floor() * 45.0;
        self.angle = nearest.to_radians();
    }

    /// Camera (x, z) on the orbit circle
    pub fn position(&self) -> (f64, f64) {
        let s = &self.settings;
        (
            s.center_x + s.radius * self.angle.sin(),
            s.center_z + s.radius * self.angle.cos(),
        )
    }

    /// Yaw in degrees that turns the camera towards the center
    pub fn facing_degrees(&self) -> f64 {
        round2(self.angle.to_degrees() + 180.0)
    }

    /// Place a rasterizer camera at the current orbit position
    pub fn apply(&self, camera: &mut Camera) {
        let (x, z) = self.position();
        camera.position = Vec3::new(x as f32, self.settings.height as f32, z as f32);
        camera.set_yaw(self.facing_degrees().to_radians() as f32);
    }
}
