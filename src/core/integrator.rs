// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Per-path estimator output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathResult {
    pub radiance: RGBSpectrum,
    pub depth: u32,
    /// Whether the terminal interaction of the path was a valid hit.
    pub is_valid: bool,
}

impl PathResult {
    pub fn invalid() -> Self {
        Self { radiance: RGBSpectrum::default(), depth: 1, is_valid: false }
    }
}

pub trait Integrator: Sync {
    /// Run one complete path starting from `ray`.
    fn trace_path(&self, scene: &Scene, ray: Ray3f, rng: &mut LcgRng) -> PathResult;

    fn samples_per_pixel(&self) -> u32;

    /// One jittered camera sample through `pixel`.
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor,
                         pixel: Vector2f, rng: &mut LcgRng) -> RGBSpectrum {
        let bmp = sensor.bitmap();
        let width = bmp.width() as Float;
        let height = bmp.height() as Float;
        let u = Vector2f::new((pixel.x + rng.next_f32()) / width,
                              (pixel.y + rng.next_f32()) / height);
        let ray = sensor.sample_ray(&u);
        self.trace_path(scene, ray, rng).radiance
    }
}
