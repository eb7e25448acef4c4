// Copyright @yucwang 2026

use crate::core::emitter::{Emitter, EmitterType, LightSample};
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

pub struct PointEmitter {
    position: Vector3f,
    intensity: RGBSpectrum,
}

impl PointEmitter {
    pub fn new(position: Vector3f, intensity: RGBSpectrum) -> Self {
        Self { position, intensity }
    }
}

impl Emitter for PointEmitter {
    fn emitter_type(&self) -> EmitterType {
        EmitterType::Point
    }

    fn sample_li(&self, ref_p: &Vector3f, _u: &Vector2f) -> LightSample {
        let to_light = self.position - *ref_p;
        let dist2 = to_light.dot(&to_light);
        if dist2 <= 0.0 {
            return LightSample::empty(EmitterType::Point);
        }
        let dist = dist2.sqrt();
        let wi = to_light / dist;

        LightSample {
            wi,
            dist,
            li: self.intensity / dist2,
            pdf: 1.0,
            p: self.position,
            n: -wi,
            emitter_type: EmitterType::Point,
        }
    }
}
