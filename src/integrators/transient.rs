// Copyright @yucwang 2026

use crate::core::histogram::TransientHistogram;
use crate::core::integrator::{Integrator, PathResult};
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::common::{
    emitter_hit_mis_weight, russian_roulette, sample_direct_light, PathTraceConfig,
};
use crate::math::constants::{Float, Vector2f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

use std::sync::Arc;

/// Path tracer that additionally bins every emitter contribution into a
/// (bounce depth, travelled distance) histogram. The histogram is a pure
/// side output shared across render threads; it never feeds back into the
/// radiance estimate.
pub struct TransientPathIntegrator {
    config: PathTraceConfig,
    histogram: Arc<TransientHistogram>,
    samples_per_pixel: u32,
}

impl TransientPathIntegrator {
    pub fn new(config: PathTraceConfig, histogram: Arc<TransientHistogram>,
               samples_per_pixel: u32) -> Self {
        Self { config, histogram, samples_per_pixel }
    }

    pub fn histogram(&self) -> &Arc<TransientHistogram> {
        &self.histogram
    }
}

impl Integrator for TransientPathIntegrator {
    fn trace_path(&self, scene: &Scene, mut ray: Ray3f, rng: &mut LcgRng) -> PathResult {
        let cfg = &self.config;
        let hist = self.histogram.as_ref();
        let mut emission_weight: Float = 1.0;
        let mut throughput = RGBSpectrum::splat(1.0);
        let mut result = RGBSpectrum::default();
        let mut path_length: Float = 0.0;

        let mut current = scene.ray_intersection(&ray);
        if let Some(hit) = &current {
            path_length += hit.t();
        }

        let mut depth: u32 = 1;
        loop {
            let hit = match &current {
                Some(hit) => {
                    let emission = hit.le() * throughput * emission_weight;
                    result += emission;
                    if !emission.is_black() {
                        // Direct or BSDF-sampled emitter hit, binned by the
                        // path length up to this vertex.
                        let bucket = hist.bucket_of(path_length);
                        hist.add(depth as usize - 1, bucket, emission.luminance());
                    }
                    hit.clone()
                }
                None => break,
            };

            if depth >= cfg.max_depth || hit.le().sum() > 0.0 {
                break;
            }

            if depth >= cfg.rr_begin_depth && !russian_roulette(&mut throughput, rng) {
                break;
            }

            if cfg.enable_nee {
                if let Some(direct) =
                    sample_direct_light(scene, &hit, cfg.scene_epsilon, ray.time, rng)
                {
                    let contribution = direct.radiance * throughput;
                    result += contribution;
                    // The next-event segment extends the path by the
                    // sampled light distance.
                    let bucket = hist.bucket_of(path_length + direct.light_dist);
                    hist.add(depth as usize, bucket, contribution.luminance());
                }
            }

            let material = match hit.material() {
                Some(material) => material,
                None => break,
            };
            let n = hit.sh_normal();
            let (tangent, bitangent) = build_tangent_frame(&n);
            let wi_local = world_to_local(&hit.wi(), &tangent, &bitangent, &n);
            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            let bs = material.sample(&wi_local, &u);
            if bs.pdf <= 0.0 {
                break;
            }
            throughput *= bs.weight;
            if throughput.is_black() {
                break;
            }

            let wo_world = local_to_world(&bs.wo, &tangent, &bitangent, &n);
            ray = Ray3f::new(hit.p(), wo_world, Some(cfg.scene_epsilon), None)
                .with_time(ray.time);

            current = scene.ray_intersection(&ray);
            if let Some(next) = &current {
                path_length += next.t();
                if cfg.enable_nee {
                    emission_weight =
                        emitter_hit_mis_weight(scene, next, &ray.origin(), bs.pdf);
                }
            }

            depth += 1;
        }

        PathResult {
            radiance: result,
            depth,
            is_valid: current.is_some(),
        }
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::histogram::TransientConfig;
    use crate::core::scene::SceneObject;
    use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
    use crate::math::constants::Vector3f;
    use crate::shapes::sphere::Sphere;

    fn sphere_light_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::with_emission(
            Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, 6.0), 1.0)),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5))),
            RGBSpectrum::new(1.0, 1.0, 1.0),
        ));
        scene.build();
        scene
    }

    fn histogram(max_depth: usize) -> Arc<TransientHistogram> {
        Arc::new(TransientHistogram::new(
            max_depth,
            TransientConfig { dist_min: 0.0, dist_max: 10.0, bin_num: 10 },
        ))
    }

    #[test]
    fn test_transient_direct_hit_scenario() {
        // Unit sphere light hit head-on at distance 5; its luminance lands
        // in bucket 5 of depth 0.
        let scene = sphere_light_scene();
        let hist = histogram(1);
        let config = PathTraceConfig { max_depth: 1, ..Default::default() };
        let integrator = TransientPathIntegrator::new(config, hist.clone(), 1);
        let mut rng = LcgRng::new(1);

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let result = integrator.trace_path(&scene, ray, &mut rng);

        assert!(result.is_valid);
        assert_eq!(result.depth, 1);
        assert!((result.radiance.luminance() - 1.0).abs() < 1e-5);
        assert!((hist.value(0, 5) - 1.0).abs() < 1e-5);

        for bucket in 0..hist.bin_num() {
            if bucket != 5 {
                assert_eq!(hist.value(0, bucket), 0.0);
            }
        }
    }

    #[test]
    fn test_transient_histogram_conservation_single_bounce() {
        // With one directly visible emitter and max_depth = 1, everything
        // the path returns is also in the depth-0 histogram row.
        let scene = sphere_light_scene();
        let hist = histogram(1);
        let config = PathTraceConfig { max_depth: 1, ..Default::default() };
        let integrator = TransientPathIntegrator::new(config, hist.clone(), 1);
        let mut rng = LcgRng::new(1);

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let result = integrator.trace_path(&scene, ray, &mut rng);

        assert!((hist.depth_sum(0) - result.radiance.luminance()).abs() < 1e-5);
    }

    #[test]
    fn test_transient_miss_writes_nothing() {
        let scene = sphere_light_scene();
        let hist = histogram(2);
        let integrator =
            TransientPathIntegrator::new(PathTraceConfig::default(), hist.clone(), 1);
        let mut rng = LcgRng::new(1);

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
        let result = integrator.trace_path(&scene, ray, &mut rng);

        assert!(!result.is_valid);
        assert_eq!(result.depth, 1);
        assert!(result.radiance.is_black());
        assert_eq!(hist.total(), 0.0);
    }

    #[test]
    fn test_transient_nee_bins_at_bounce_depth() {
        // Diffuse floor lit by the sphere light: the next-event sample at
        // the first bounce is recorded at depth index 1.
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(
            Arc::new(crate::shapes::rectangle::Rectangle::new(
                Vector3f::new(-5.0, -5.0, 0.0),
                Vector3f::new(10.0, 0.0, 0.0),
                Vector3f::new(0.0, 10.0, 0.0),
            )),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.7))),
        ));
        scene.add_object(SceneObject::with_emission(
            Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, 6.0), 1.0)),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5))),
            RGBSpectrum::new(5.0, 5.0, 5.0),
        ));
        scene.build();

        let hist = histogram(4);
        let config = PathTraceConfig { max_depth: 4, ..Default::default() };
        let integrator = TransientPathIntegrator::new(config, hist.clone(), 1);

        let mut found_depth1 = false;
        for seed in 0..64 {
            let mut rng = LcgRng::new(seed);
            let ray = Ray3f::new(Vector3f::new(3.0, 0.0, 3.0),
                                 Vector3f::new(-0.6, 0.0, -1.0), None, None);
            integrator.trace_path(&scene, ray, &mut rng);
            if hist.depth_sum(1) > 0.0 {
                found_depth1 = true;
                break;
            }
        }
        assert!(found_depth1);
    }
}
