// Copyright @yucwang 2026

use crate::core::emitter::{Emitter, EmitterType, LightSample};
use crate::core::shape::Shape;
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use std::sync::Arc;

pub struct AreaEmitter {
    shape: Arc<dyn Shape>,
    radiance: RGBSpectrum,
}

impl AreaEmitter {
    pub fn from_shape(shape: Arc<dyn Shape>, radiance: RGBSpectrum) -> Self {
        Self { shape, radiance }
    }
}

impl Emitter for AreaEmitter {
    fn emitter_type(&self) -> EmitterType {
        EmitterType::Area
    }

    fn sample_li(&self, ref_p: &Vector3f, u: &Vector2f) -> LightSample {
        let record = self.shape.sample(u);
        let p = record.interaction().p();
        let n = record.interaction().geo_normal();

        let to_light = p - *ref_p;
        let dist2 = to_light.dot(&to_light);
        if dist2 <= 0.0 || record.pdf() <= 0.0 {
            return LightSample::empty(EmitterType::Area);
        }
        let dist = dist2.sqrt();
        let wi = to_light / dist;

        // Back side of the emitter radiates nothing.
        let cos_light = n.dot(&(-wi));
        if cos_light <= 0.0 {
            return LightSample::empty(EmitterType::Area);
        }

        // Area pdf converted to solid angle at the reference point.
        let pdf = record.pdf() * dist2 / cos_light;
        LightSample {
            wi,
            dist,
            li: self.radiance,
            pdf,
            p,
            n,
            emitter_type: EmitterType::Area,
        }
    }
}
