//! Scene objects the gaze can hit
//!
//! A small stand-in for the physics world of the host engine: shapes the
//! probe sweeps against, tags, and simple rigid bodies that gaze pushes move.

mod probe;
mod push;

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::spatial::{Point3D, Vector3D};

pub use probe::{probe, ProbeHit, ProbeResult};
pub use push::GazePush;

/// Velocity below which a body is considered at rest
const REST_SPEED: f32 = 1e-3;

/// Stable handle to a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { center: Point3D, radius: f32 },
    /// Axis aligned box
    Box { center: Point3D, half_extents: Vector3D },
    /// Infinite plane; `normal` is unit length
    Plane { point: Point3D, normal: Vector3D },
}

impl Shape {
    pub fn sphere(center: Point3D, radius: f32) -> Self {
        Shape::Sphere { center, radius }
    }

    pub fn cuboid(center: Point3D, half_extents: Vector3D) -> Self {
        Shape::Box {
            center,
            half_extents,
        }
    }

    /// Plane through `point`. A zero normal falls back to +Y.
    pub fn plane(point: Point3D, normal: Vector3D) -> Self {
        Shape::Plane {
            point,
            normal: normal.try_normalize().unwrap_or(Vector3D::UP),
        }
    }

    /// Reference point: centre for solids, anchor point for planes
    pub fn center(&self) -> Point3D {
        match *self {
            Shape::Sphere { center, .. } | Shape::Box { center, .. } => center,
            Shape::Plane { point, .. } => point,
        }
    }

    /// Extent of the shape along a unit direction, measured from its centre
    fn support(&self, direction: Vector3D) -> f32 {
        match *self {
            Shape::Sphere { radius, .. } => radius,
            Shape::Box { half_extents, .. } => {
                half_extents.x * direction.x.abs()
                    + half_extents.y * direction.y.abs()
                    + half_extents.z * direction.z.abs()
            }
            Shape::Plane { .. } => 0.0,
        }
    }

    fn translate(&mut self, delta: Vector3D) {
        match self {
            Shape::Sphere { center, .. } | Shape::Box { center, .. } => *center = *center + delta,
            Shape::Plane { point, .. } => *point = *point + delta,
        }
    }
}

/// Dynamic state of a movable object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// Mass in kilograms, always positive
    pub mass: f32,
    pub velocity: Vector3D,
    /// Fraction of velocity lost per second
    pub linear_damping: f32,
}

impl RigidBody {
    pub fn new(mass: f32) -> Self {
        Self {
            mass: mass.max(1e-3),
            velocity: Vector3D::ZERO,
            linear_damping: 2.0,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping.max(0.0);
        self
    }

    pub fn is_resting(&self) -> bool {
        self.velocity.magnitude_squared() < REST_SPEED * REST_SPEED
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub shape: Shape,
    pub tags: BTreeSet<String>,
    /// `None` for static geometry
    pub body: Option<RigidBody>,
}

impl SceneObject {
    /// A static untagged object. The id is assigned when it is inserted.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: ObjectId(0),
            name: name.into(),
            shape,
            tags: BTreeSet::new(),
            body: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_dynamic(&self) -> bool {
        self.body.is_some()
    }
}

/// Collection of objects with a minimal integrator
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its assigned id
    pub fn insert(&mut self, mut object: SceneObject) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        object.id = id;
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Apply a force at a world point for `dt` seconds.
    ///
    /// Only the linear part is integrated. Returns `false` for static or
    /// unknown objects.
    pub fn apply_force_at(&mut self, id: ObjectId, force: Vector3D, point: Point3D, dt: f32) -> bool {
        let Some(object) = self.get_mut(id) else {
            return false;
        };
        let Some(body) = object.body.as_mut() else {
            return false;
        };
        body.velocity += force * (dt / body.mass);
        debug!(
            "Force {} applied to {} at {}",
            force.format(2),
            object.name,
            point.format(2)
        );
        true
    }

    /// Advance dynamic objects by `dt` seconds.
    ///
    /// Bodies move by their velocity, lose velocity to damping, and are kept
    /// on the positive side of every plane.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let planes: Vec<(Point3D, Vector3D)> = self
            .objects
            .iter()
            .filter_map(|o| match o.shape {
                Shape::Plane { point, normal } => Some((point, normal)),
                _ => None,
            })
            .collect();

        for object in &mut self.objects {
            let Some(body) = object.body.as_mut() else {
                continue;
            };
            if matches!(object.shape, Shape::Plane { .. }) {
                continue;
            }

            object.shape.translate(body.velocity * dt);
            let retain = (1.0 - body.linear_damping * dt).max(0.0);
            body.velocity = body.velocity * retain;

            for &(point, normal) in &planes {
                let clearance = (object.shape.center() - point).dot(&normal)
                    - object.shape.support(normal);
                if clearance < 0.0 {
                    object.shape.translate(normal * -clearance);
                    let into_plane = body.velocity.dot(&normal);
                    if into_plane < 0.0 {
                        body.velocity = body.velocity - normal * into_plane;
                    }
                }
            }

            if body.is_resting() {
                body.velocity = Vector3D::ZERO;
            }
        }
    }

    /// Room used by the terminal demo: floor, back wall, a pillar and a few
    /// interactive props in front of a standing user at the origin.
    pub fn demo(interactive_tag: &str) -> Self {
        let mut scene = Self::new();
        scene.insert(SceneObject::new(
            "floor",
            Shape::plane(Point3D::ORIGIN, Vector3D::UP),
        ));
        scene.insert(SceneObject::new(
            "back wall",
            Shape::plane(Point3D::new(0.0, 0.0, 8.0), -Vector3D::FORWARD),
        ));
        scene.insert(SceneObject::new(
            "pillar",
            Shape::cuboid(Point3D::new(2.0, 1.5, 5.0), Vector3D::new(0.3, 1.5, 0.3)),
        ));
        scene.insert(
            SceneObject::new("orb", Shape::sphere(Point3D::new(0.0, 1.6, 3.0), 0.3))
                .with_tag(interactive_tag)
                .with_body(RigidBody::new(2.0).with_damping(4.0)),
        );
        scene.insert(
            SceneObject::new(
                "crate",
                Shape::cuboid(Point3D::new(-1.2, 0.5, 4.0), Vector3D::splat(0.5)),
            )
            .with_tag(interactive_tag)
            .with_body(RigidBody::new(5.0)),
        );
        scene.insert(
            SceneObject::new("ball", Shape::sphere(Point3D::new(1.0, 0.4, 2.5), 0.4))
                .with_tag(interactive_tag)
                .with_body(RigidBody::new(1.0)),
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_scene() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        scene.insert(SceneObject::new("floor", Shape::plane(Point3D::ORIGIN, Vector3D::UP)));
        let id = scene.insert(
            SceneObject::new("ball", Shape::sphere(Point3D::new(0.0, 1.0, 0.0), 0.5))
                .with_tag("interactive")
                .with_body(RigidBody::new(2.0).with_damping(0.0)),
        );
        (scene, id)
    }

    #[test]
    fn test_ids_are_unique() {
        let (scene, id) = ball_scene();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(id).unwrap().name, "ball");
        assert_ne!(scene.objects()[0].id, id);
    }

    #[test]
    fn test_force_integrates_velocity() {
        let (mut scene, id) = ball_scene();
        assert!(scene.apply_force_at(id, Vector3D::new(4.0, 0.0, 0.0), Point3D::ORIGIN, 0.5));

        let body = scene.get(id).unwrap().body.unwrap();
        assert!((body.velocity.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_force_ignored_by_static_objects() {
        let (mut scene, _) = ball_scene();
        let floor = scene.objects()[0].id;
        assert!(!scene.apply_force_at(floor, Vector3D::UP, Point3D::ORIGIN, 1.0));
        assert!(!scene.apply_force_at(ObjectId(99), Vector3D::UP, Point3D::ORIGIN, 1.0));
    }

    #[test]
    fn test_step_moves_body() {
        let (mut scene, id) = ball_scene();
        scene.get_mut(id).unwrap().body.as_mut().unwrap().velocity = Vector3D::new(0.0, 0.0, 2.0);
        scene.step(0.5);

        let center = scene.get(id).unwrap().shape.center();
        assert!((center.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_damping_slows_body() {
        let mut scene = Scene::new();
        let id = scene.insert(
            SceneObject::new("orb", Shape::sphere(Point3D::ORIGIN, 0.1))
                .with_body(RigidBody::new(1.0).with_damping(1.0)),
        );
        scene.get_mut(id).unwrap().body.as_mut().unwrap().velocity = Vector3D::FORWARD;
        scene.step(0.5);

        let body = scene.get(id).unwrap().body.unwrap();
        assert!((body.velocity.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_planes_stop_bodies() {
        let (mut scene, id) = ball_scene();
        scene.get_mut(id).unwrap().body.as_mut().unwrap().velocity = Vector3D::new(0.0, -10.0, 0.0);
        scene.step(1.0);

        let object = scene.get(id).unwrap();
        assert!((object.shape.center().y - 0.5).abs() < 1e-5);
        assert!(object.body.unwrap().is_resting());
    }

    #[test]
    fn test_demo_scene() {
        let scene = Scene::demo("interactive");
        assert!(scene.objects().iter().any(|o| o.has_tag("interactive")));
        assert!(scene.objects().iter().any(|o| !o.is_dynamic()));
    }
}
