//! Sphere-cast probe along the gaze ray

use gaze_hud_config::ProbeConfig;

use super::{ObjectId, Scene, Shape};
use crate::spatial::{Point3D, Ray, Vector3D};

const EPSILON: f32 = 1e-6;

/// A surface the swept sphere touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub object: ObjectId,
    /// Contact point on the object's surface
    pub point: Point3D,
    /// Surface normal at the contact, facing the ray origin
    pub normal: Vector3D,
    /// Distance of the contact point along the ray
    pub distance: f32,
    /// How far the sphere centre travelled before touching
    pub sweep_distance: f32,
}

/// Outcome of a probe: a hit, or a synthesized point at the fallback distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeResult {
    Hit(ProbeHit),
    Miss { point: Point3D, distance: f32 },
}

impl ProbeResult {
    pub fn point(&self) -> Point3D {
        match self {
            ProbeResult::Hit(hit) => hit.point,
            ProbeResult::Miss { point, .. } => *point,
        }
    }

    pub fn distance(&self) -> f32 {
        match self {
            ProbeResult::Hit(hit) => hit.distance,
            ProbeResult::Miss { distance, .. } => *distance,
        }
    }

    pub fn hit(&self) -> Option<&ProbeHit> {
        match self {
            ProbeResult::Hit(hit) => Some(hit),
            ProbeResult::Miss { .. } => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, ProbeResult::Hit(_))
    }
}

/// Sweep a sphere of `config.radius` along `ray` and report the nearest hit.
///
/// Objects the sphere already overlaps at the ray origin are skipped. When
/// nothing is hit within `config.max_distance` the result is a miss at
/// `config.fallback_distance`.
pub fn probe(scene: &Scene, ray: &Ray, config: &ProbeConfig) -> ProbeResult {
    let radius = config.radius.max(0.0);
    let mut closest: Option<ProbeHit> = None;
    let mut closest_sweep = config.max_distance;

    for object in scene.objects() {
        let contact = match object.shape {
            Shape::Sphere { center, radius: r } => sweep_sphere(ray, radius, center, r),
            Shape::Box {
                center,
                half_extents,
            } => sweep_box(ray, radius, center, half_extents),
            Shape::Plane { point, normal } => sweep_plane(ray, radius, point, normal),
        };

        if let Some(contact) = contact {
            // Only consider hits in front and within range
            if contact.t >= 0.0 && contact.t <= closest_sweep {
                closest = Some(ProbeHit {
                    object: object.id,
                    point: contact.point,
                    normal: contact.normal,
                    distance: ray.distance_along(contact.point),
                    sweep_distance: contact.t,
                });
                closest_sweep = contact.t;
            }
        }
    }

    match closest {
        Some(hit) => ProbeResult::Hit(hit),
        None => ProbeResult::Miss {
            point: ray.point_at(config.fallback_distance),
            distance: config.fallback_distance,
        },
    }
}

struct Contact {
    /// Sweep distance of the sphere centre
    t: f32,
    point: Point3D,
    normal: Vector3D,
}

/// Sphere against sphere: a ray against the sphere grown by the probe radius
fn sweep_sphere(ray: &Ray, radius: f32, center: Point3D, sphere_radius: f32) -> Option<Contact> {
    let combined = sphere_radius + radius;
    let to_origin = ray.origin - center;
    let c = to_origin.magnitude_squared() - combined * combined;
    if c <= 0.0 {
        // Already overlapping at the start
        return None;
    }

    let b = to_origin.dot(&ray.direction());
    let discriminant = b * b - c;
    if b > 0.0 || discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    let sphere_at_contact = ray.point_at(t);
    let normal = (sphere_at_contact - center).try_normalize()?;
    Some(Contact {
        t,
        point: center + normal * sphere_radius,
        normal,
    })
}

/// Sphere against a plane: the plane shifted towards the ray origin by the radius
fn sweep_plane(ray: &Ray, radius: f32, point: Point3D, normal: Vector3D) -> Option<Contact> {
    let signed = (ray.origin - point).dot(&normal);
    if signed.abs() <= radius {
        return None;
    }

    // Face the side the ray starts on
    let facing = if signed > 0.0 { normal } else { -normal };
    let approach = -ray.direction().dot(&facing);
    if approach <= EPSILON {
        return None;
    }

    let t = (signed.abs() - radius) / approach;
    Some(Contact {
        t,
        point: ray.point_at(t) - facing * radius,
        normal: facing,
    })
}

/// Sphere against an axis aligned box, using the box inflated by the radius.
/// Exact on faces, slightly conservative near edges and corners.
fn sweep_box(ray: &Ray, radius: f32, center: Point3D, half_extents: Vector3D) -> Option<Contact> {
    let half = half_extents + Vector3D::splat(radius);
    let local = ray.origin - center;
    let dir = ray.direction();

    let origin = [local.x, local.y, local.z];
    let direction = [dir.x, dir.y, dir.z];
    let extent = [half.x, half.y, half.z];

    if (0..3).all(|axis| origin[axis].abs() < extent[axis]) {
        // Already overlapping at the start
        return None;
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;

    for axis in 0..3 {
        if direction[axis].abs() < EPSILON {
            // Parallel to this slab: must already be between its planes
            if origin[axis].abs() > extent[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction[axis];
        let t1 = (-extent[axis] - origin[axis]) * inv;
        let t2 = (extent[axis] - origin[axis]) * inv;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        if near > t_enter {
            t_enter = near;
            enter_axis = axis;
        }
        t_exit = t_exit.min(far);
    }

    if t_enter > t_exit || t_enter < 0.0 {
        return None;
    }

    let mut n = [0.0_f32; 3];
    n[enter_axis] = -direction[enter_axis].signum();
    let normal = Vector3D::new(n[0], n[1], n[2]);

    Some(Contact {
        t: t_enter,
        point: ray.point_at(t_enter) - normal * radius,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;

    fn config() -> ProbeConfig {
        ProbeConfig {
            radius: 0.1,
            max_distance: 50.0,
            fallback_distance: 2.0,
        }
    }

    fn scene_with(shape: Shape) -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let id = scene.insert(SceneObject::new("target", shape));
        (scene, id)
    }

    #[test]
    fn test_plane_hit_reports_surface_distance() {
        let (scene, id) = scene_with(Shape::plane(
            Point3D::new(0.0, 0.0, 5.0),
            -Vector3D::FORWARD,
        ));
        let result = probe(&scene, &Ray::forward(), &config());

        let hit = result.hit().unwrap();
        assert_eq!(hit.object, id);
        assert!((hit.distance - 5.0).abs() < 1e-4);
        assert!((hit.sweep_distance - 4.9).abs() < 1e-4);
        assert!((hit.point.z - 5.0).abs() < 1e-4);
        assert_eq!(hit.normal, -Vector3D::FORWARD);
    }

    #[test]
    fn test_plane_seen_from_behind() {
        // Normal points away from the viewer; the contact still faces the ray
        let (scene, _) = scene_with(Shape::plane(Point3D::new(0.0, 0.0, 3.0), Vector3D::FORWARD));
        let hit = *probe(&scene, &Ray::forward(), &config()).hit().unwrap();

        assert!((hit.distance - 3.0).abs() < 1e-4);
        assert_eq!(hit.normal, -Vector3D::FORWARD);
    }

    #[test]
    fn test_sphere_hit_reports_front_surface() {
        let (scene, _) = scene_with(Shape::sphere(Point3D::new(0.0, 0.0, 4.0), 0.5));
        let result = probe(&scene, &Ray::forward(), &config());

        assert!(result.is_hit());
        assert!((result.distance() - 3.5).abs() < 1e-4);
        assert!((result.point().z - 3.5).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_grazed_within_probe_radius() {
        // Surface passes 0.05 m beside the ray, inside the 0.1 m probe
        let (scene, _) = scene_with(Shape::sphere(Point3D::new(0.55, 0.0, 4.0), 0.5));
        assert!(probe(&scene, &Ray::forward(), &config()).is_hit());

        let (scene, _) = scene_with(Shape::sphere(Point3D::new(0.7, 0.0, 4.0), 0.5));
        assert!(!probe(&scene, &Ray::forward(), &config()).is_hit());
    }

    #[test]
    fn test_box_hit_reports_face_distance() {
        let (scene, _) = scene_with(Shape::cuboid(Point3D::new(0.0, 0.0, 6.0), Vector3D::splat(1.0)));
        let hit = *probe(&scene, &Ray::forward(), &config()).hit().unwrap();

        assert!((hit.distance - 5.0).abs() < 1e-4);
        assert!((hit.sweep_distance - 4.9).abs() < 1e-4);
        assert_eq!(hit.normal, Vector3D::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_miss_uses_fallback_distance() {
        let (scene, _) = scene_with(Shape::sphere(Point3D::new(0.0, 0.0, -4.0), 0.5));
        let result = probe(&scene, &Ray::forward(), &config());

        assert!(!result.is_hit());
        assert_eq!(result.distance(), 2.0);
        assert_eq!(result.point(), Point3D::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_beyond_max_distance_is_a_miss() {
        let (scene, _) = scene_with(Shape::plane(Point3D::new(0.0, 0.0, 60.0), -Vector3D::FORWARD));
        assert!(!probe(&scene, &Ray::forward(), &config()).is_hit());
    }

    #[test]
    fn test_overlapping_objects_are_ignored() {
        let mut scene = Scene::new();
        scene.insert(SceneObject::new("around", Shape::sphere(Point3D::ORIGIN, 1.0)));
        scene.insert(SceneObject::new(
            "inside box",
            Shape::cuboid(Point3D::ORIGIN, Vector3D::splat(0.5)),
        ));
        let wall = scene.insert(SceneObject::new(
            "wall",
            Shape::plane(Point3D::new(0.0, 0.0, 3.0), -Vector3D::FORWARD),
        ));

        let hit = *probe(&scene, &Ray::forward(), &config()).hit().unwrap();
        assert_eq!(hit.object, wall);
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut scene = Scene::new();
        scene.insert(SceneObject::new(
            "far",
            Shape::plane(Point3D::new(0.0, 0.0, 9.0), -Vector3D::FORWARD),
        ));
        let near = scene.insert(SceneObject::new(
            "near",
            Shape::sphere(Point3D::new(0.0, 0.0, 3.0), 0.2),
        ));

        let hit = *probe(&scene, &Ray::forward(), &config()).hit().unwrap();
        assert_eq!(hit.object, near);
    }
}
