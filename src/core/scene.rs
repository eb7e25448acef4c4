// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::emitter::{Emitter, LightSample};
use crate::core::interaction::SurfaceInteraction;
use crate::core::rng::LcgRng;
use crate::core::shape::Shape;
use crate::emitters::area::AreaEmitter;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn BSDF>,
    pub emission: RGBSpectrum,
    /// Rigid linear motion over the exposure; a ray with time `t`
    /// intersects this object displaced by `velocity * t`.
    pub velocity: Vector3f,
    pub name: Option<String>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: Arc<dyn BSDF>) -> Self {
        Self { shape, material, emission: RGBSpectrum::default(),
               velocity: Vector3f::zeros(), name: None }
    }

    pub fn with_emission(shape: Arc<dyn Shape>, material: Arc<dyn BSDF>, emission: RGBSpectrum) -> Self {
        Self { shape, material, emission, velocity: Vector3f::zeros(), name: None }
    }

    pub fn with_velocity(mut self, velocity: Vector3f) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
    emitters: Vec<Box<dyn Emitter>>,
    scene_bounds: AABB,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            emitters: Vec::new(),
            scene_bounds: AABB::default(),
        }
    }

    pub fn with_objects(objects: Vec<SceneObject>) -> Self {
        let emitters = Self::emitters_from_objects(&objects);
        Self {
            objects,
            emitters,
            scene_bounds: AABB::default(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        let emitter = if !object.emission.is_black() {
            Some(AreaEmitter::from_shape(object.shape.clone(), object.emission))
        } else {
            None
        };
        self.objects.push(object);
        if let Some(emitter) = emitter {
            self.emitters.push(Box::new(emitter));
        }
    }

    pub fn objects(&self) -> &Vec<SceneObject> {
        &self.objects
    }

    pub fn add_emitter(&mut self, emitter: Box<dyn Emitter>) {
        self.emitters.push(emitter);
    }

    pub fn emitters(&self) -> &Vec<Box<dyn Emitter>> {
        &self.emitters
    }

    pub fn num_emitters(&self) -> usize {
        self.emitters.len()
    }

    pub fn scene_bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Finalize the scene before a render pass: computes world bounds and
    /// lets emitters size themselves to them.
    pub fn build(&mut self) {
        let mut scene_bounds = AABB::default();
        for obj in &self.objects {
            scene_bounds.expand_by_aabb(&obj.shape.bounding_box());
        }
        self.scene_bounds = scene_bounds;

        for emitter in &mut self.emitters {
            emitter.set_scene_bounds(&scene_bounds);
        }
    }

    fn emitters_from_objects(objects: &[SceneObject]) -> Vec<Box<dyn Emitter>> {
        let mut emitters: Vec<Box<dyn Emitter>> = Vec::new();
        for object in objects {
            if !object.emission.is_black() {
                emitters.push(Box::new(AreaEmitter::from_shape(
                    object.shape.clone(),
                    object.emission,
                )));
            }
        }
        emitters
    }

    /// Nearest-hit query, evaluated as of `ray.time`. A moving object is
    /// intersected in its rest frame by back-shifting the ray origin, then
    /// the hit point is advanced to where the surface sits at that time.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceInteraction> {
        let mut closest: Option<(usize, SurfaceInteraction)> = None;
        let mut max_t = ray.max_t;

        for (idx, object) in self.objects.iter().enumerate() {
            let offset = object.velocity * ray.time;
            let local_ray = Ray3f::new(ray.origin() - offset, ray.dir(),
                                       Some(ray.min_t), Some(max_t));
            if let Some(hit) = object.shape.ray_intersection(&local_ray) {
                max_t = hit.t();
                closest = Some((idx, hit.offset_p(offset)));
            }
        }

        let (idx, hit) = closest?;
        let object = &self.objects[idx];
        Some(hit
            .with_le(object.emission)
            .with_material(object.material.clone())
            .with_object_index(Some(idx))
            .with_velocity(object.velocity)
            .with_wi(-ray.dir()))
    }

    /// Binary occlusion query over `[ray.min_t, ray.max_t]` at `ray.time`.
    pub fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        for object in &self.objects {
            let offset = object.velocity * ray.time;
            let local_ray = Ray3f::new(ray.origin() - offset, ray.dir(),
                                       Some(ray.min_t), Some(ray.max_t));
            if object.shape.ray_intersection_t(&local_ray) {
                return true;
            }
        }
        false
    }

    /// Solid-angle pdf of having hit the emissive object behind
    /// `interaction` by chance from `ref_p`, including the uniform 1/N
    /// emitter-selection factor. Used to MIS-weight emitter hits found by
    /// BSDF sampling against next-event estimation.
    pub fn pdf_light(&self, interaction: &SurfaceInteraction, ref_p: &Vector3f) -> Option<Float> {
        let obj_idx = interaction.object_index()?;
        if self.emitters.is_empty() {
            return None;
        }
        let object = self.objects.get(obj_idx)?;
        if object.emission.is_black() {
            return None;
        }
        let area = object.shape.surface_area();
        if area <= 0.0 {
            return None;
        }

        let to_light = interaction.p() - *ref_p;
        let dist2 = to_light.dot(&to_light);
        if dist2 <= 0.0 {
            return None;
        }
        let dir = to_light / dist2.sqrt();
        let cos_light = interaction.geo_normal().dot(&(-dir)).abs();
        if cos_light <= 0.0 {
            return None;
        }

        let select_pdf = 1.0 / (self.emitters.len() as Float);
        let area_pdf = 1.0 / area;
        Some(area_pdf * select_pdf * dist2 / cos_light)
    }

    /// Uniformly select one emitter and importance-sample it. The returned
    /// pdf includes the 1/N selection factor. `None` when the scene has no
    /// emitters; callers short-circuit next-event estimation in that case.
    pub fn sample_emitter(&self, ref_p: &Vector3f, rng: &mut LcgRng) -> Option<LightSample> {
        if self.emitters.is_empty() {
            return None;
        }

        let emitter_count = self.emitters.len();
        let mut emitter_index = (rng.next_f32() * emitter_count as Float) as usize;
        if emitter_index >= emitter_count {
            emitter_index = emitter_count - 1;
        }

        let u = Vector2f::new(rng.next_f32(), rng.next_f32());
        let mut sample = self.emitters[emitter_index].sample_li(ref_p, &u);
        sample.pdf /= emitter_count as Float;
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interaction::SurfaceSampleRecord;
    use crate::math::constants::{Float, Vector2f, Vector3f};

    struct TestShape {
        t: Float,
    }

    impl TestShape {
        fn new(t: Float) -> Self {
            Self { t }
        }
    }

    impl Shape for TestShape {
        fn bounding_box(&self) -> AABB {
            AABB::new(Vector3f::zeros(), Vector3f::zeros())
        }

        fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceInteraction> {
            if self.t < ray.min_t || self.t > ray.max_t {
                return None;
            }

            let p = ray.at(self.t);
            let n = Vector3f::new(0.0, 0.0, 1.0);
            let uv = Vector2f::new(0.0, 0.0);
            Some(SurfaceInteraction::new(p, n, n, uv, self.t, RGBSpectrum::default()))
        }

        fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
            self.t >= ray.min_t && self.t <= ray.max_t
        }

        fn sample(&self, _u: &Vector2f) -> SurfaceSampleRecord {
            let p = Vector3f::zeros();
            let n = Vector3f::new(0.0, 0.0, 1.0);
            let uv = Vector2f::new(0.0, 0.0);
            let interaction = SurfaceInteraction::new(p, n, n, uv, self.t, RGBSpectrum::default());
            SurfaceSampleRecord::new(interaction, 1.0)
        }

        fn surface_area(&self) -> Float {
            1.0
        }
    }

    struct TestBSDF;

    impl BSDF for TestBSDF {
        fn eval(&self, _wi: &Vector3f, _wo: &Vector3f) -> RGBSpectrum {
            RGBSpectrum::default()
        }

        fn pdf(&self, _wi: &Vector3f, _wo: &Vector3f) -> Float {
            0.0
        }

        fn sample(&self, _wi: &Vector3f, _u: &Vector2f) -> crate::core::bsdf::BSDFSample {
            crate::core::bsdf::BSDFSample::default()
        }
    }

    #[test]
    fn test_scene_ray_intersection_closest_hit() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(5.0)), Arc::new(TestBSDF)));
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(2.0)), Arc::new(TestBSDF)));
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(10.0)), Arc::new(TestBSDF)));
        scene.build();

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = scene.ray_intersection(&ray).expect("expected intersection");

        assert_eq!(hit.t(), 2.0);
        assert!((hit.wi() + Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_scene_miss_is_none() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(5.0)), Arc::new(TestBSDF)));
        scene.build();

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, Some(1.0));
        assert!(scene.ray_intersection(&ray).is_none());
    }

    #[test]
    fn test_scene_emitter_auto_registration() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(Arc::new(TestShape::new(5.0)), Arc::new(TestBSDF)));
        assert_eq!(scene.num_emitters(), 0);

        scene.add_object(SceneObject::with_emission(
            Arc::new(TestShape::new(2.0)),
            Arc::new(TestBSDF),
            RGBSpectrum::new(1.0, 1.0, 1.0),
        ));
        assert_eq!(scene.num_emitters(), 1);
    }

    #[test]
    fn test_scene_sample_emitter_empty() {
        let scene = Scene::new();
        let mut rng = LcgRng::new(1);
        assert!(scene.sample_emitter(&Vector3f::zeros(), &mut rng).is_none());
    }
}
