// Copyright @yucwang 2026

use crate::core::emitter::{Emitter, EmitterType, LightSample};
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

pub struct DirectionalEmitter {
    /// Direction the light travels in.
    direction: Vector3f,
    irradiance: RGBSpectrum,
    world_radius: Float,
}

impl DirectionalEmitter {
    pub fn new(direction: Vector3f, irradiance: RGBSpectrum) -> Self {
        Self {
            direction: direction.normalize(),
            irradiance,
            world_radius: 1e4,
        }
    }
}

impl Emitter for DirectionalEmitter {
    fn emitter_type(&self) -> EmitterType {
        EmitterType::Directional
    }

    fn set_scene_bounds(&mut self, bounds: &AABB) {
        let radius = bounds.radius();
        if radius > 0.0 {
            self.world_radius = radius;
        }
    }

    fn sample_li(&self, ref_p: &Vector3f, _u: &Vector2f) -> LightSample {
        let wi = -self.direction;
        // Any point beyond the scene acts as "infinitely" far away.
        let dist = 2.0 * self.world_radius;

        LightSample {
            wi,
            dist,
            li: self.irradiance,
            pdf: 1.0,
            p: *ref_p + wi * dist,
            n: self.direction,
            emitter_type: EmitterType::Directional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_emitter_sample() {
        let mut emitter = DirectionalEmitter::new(Vector3f::new(0.0, -1.0, 0.0),
                                                  RGBSpectrum::splat(3.0));
        emitter.set_scene_bounds(&AABB::new(Vector3f::new(-1.0, -1.0, -1.0),
                                            Vector3f::new(1.0, 1.0, 1.0)));

        let sample = emitter.sample_li(&Vector3f::zeros(), &Vector2f::new(0.0, 0.0));
        assert!(sample.emitter_type.is_delta());
        assert_eq!(sample.pdf, 1.0);
        assert!((sample.wi - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-5);
        assert!(sample.dist > 3.0);
        assert_eq!(sample.li, RGBSpectrum::splat(3.0));
    }
}
