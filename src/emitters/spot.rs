// Copyright @yucwang 2026

use crate::core::emitter::{Emitter, EmitterType, LightSample};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

pub struct SpotEmitter {
    position: Vector3f,
    /// Cone axis, pointing away from the emitter.
    direction: Vector3f,
    intensity: RGBSpectrum,
    cos_falloff_start: Float,
    cos_total_width: Float,
}

impl SpotEmitter {
    pub fn new(position: Vector3f, direction: Vector3f, intensity: RGBSpectrum,
               falloff_start_radians: Float, total_width_radians: Float) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            intensity,
            cos_falloff_start: falloff_start_radians.cos(),
            cos_total_width: total_width_radians.cos(),
        }
    }

    fn falloff(&self, cos_theta: Float) -> Float {
        if cos_theta >= self.cos_falloff_start {
            return 1.0;
        }
        if cos_theta <= self.cos_total_width {
            return 0.0;
        }
        let delta = (cos_theta - self.cos_total_width)
            / (self.cos_falloff_start - self.cos_total_width);
        delta * delta * delta * delta
    }
}

impl Emitter for SpotEmitter {
    fn emitter_type(&self) -> EmitterType {
        EmitterType::Spot
    }

    fn sample_li(&self, ref_p: &Vector3f, _u: &Vector2f) -> LightSample {
        let to_light = self.position - *ref_p;
        let dist2 = to_light.dot(&to_light);
        if dist2 <= 0.0 {
            return LightSample::empty(EmitterType::Spot);
        }
        let dist = dist2.sqrt();
        let wi = to_light / dist;

        let cos_theta = self.direction.dot(&(-wi));
        let falloff = self.falloff(cos_theta);
        LightSample {
            wi,
            dist,
            li: self.intensity * (falloff / dist2),
            pdf: 1.0,
            p: self.position,
            n: self.direction,
            emitter_type: EmitterType::Spot,
        }
    }
}
