// Copyright @yucwang 2023

use crate::core::bsdf::{BSDFSample, BSDF};
use crate::math::constants::{Float, Vector2f, Vector3f, INV_PI};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};

pub struct LambertianDiffuseBSDF {
    albedo: RGBSpectrum,
}

impl LambertianDiffuseBSDF {
    pub fn new(albedo: RGBSpectrum) -> Self {
        Self { albedo }
    }
}

impl BSDF for LambertianDiffuseBSDF {
    // Two-sided diffuse lobe; the returned value includes the outgoing
    // cosine.
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> RGBSpectrum {
        if wi.z * wo.z <= 0.0 {
            return RGBSpectrum::default();
        }
        self.albedo * (INV_PI * wo.z.abs())
    }

    fn pdf(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        if wi.z * wo.z <= 0.0 {
            return 0.0;
        }
        sample_cosine_hemisphere_pdf(wo.z.abs())
    }

    fn sample(&self, wi: &Vector3f, u: &Vector2f) -> BSDFSample {
        let mut wo = sample_cosine_hemisphere(u);
        if wi.z < 0.0 {
            wo.z = -wo.z;
        }
        let pdf = sample_cosine_hemisphere_pdf(wo.z.abs());
        if pdf <= 0.0 {
            return BSDFSample::default();
        }

        // eval / pdf collapses to the albedo for a cosine-sampled lobe.
        BSDFSample { wo, pdf, weight: self.albedo }
    }
}
