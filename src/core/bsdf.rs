// Copyright @yucwang 2023

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

// All directions are expressed in the local shading frame with the normal
// along +z. `wi` points toward the previous path vertex, `wo` toward the
// next one. Eval values include the outgoing cosine.
#[derive(Debug, PartialEq)]
pub struct BSDFSample {
    pub wo: Vector3f,
    pub pdf: Float,
    /// Pre-divided sample weight: eval(wi, wo) / pdf.
    pub weight: RGBSpectrum,
}

impl Default for BSDFSample {
    fn default() -> Self {
        Self {
            wo: Vector3f::zeros(),
            pdf: 0.0,
            weight: RGBSpectrum::default(),
        }
    }
}

pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> RGBSpectrum;
    fn pdf(&self, wi: &Vector3f, wo: &Vector3f) -> Float;
    fn sample(&self, wi: &Vector3f, u: &Vector2f) -> BSDFSample;
}
