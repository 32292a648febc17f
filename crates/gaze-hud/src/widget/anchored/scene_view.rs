//! Scene objects drawn as projected glyphs

use crate::context::FrameContext;
use crate::renderer::{Color, RenderBackend, RenderGlyph};
use crate::scene::{ObjectId, Shape};
use crate::spatial::{Point3D, Vector3D};
use crate::widget::HudWidget;

/// Half extent of the dot grid drawn for planes, in grid steps
const PLANE_GRID_STEPS: i32 = 10;
const PLANE_GRID_SPACING: f32 = 1.0;

#[derive(Debug, Clone)]
struct ObjectSnapshot {
    id: ObjectId,
    shape: Shape,
    interactive: bool,
}

/// World view of the scene with the gazed-at object highlighted
pub struct SceneView {
    id: String,
    interactive_tag: String,
    objects: Vec<ObjectSnapshot>,
    highlighted: Option<ObjectId>,
}

impl SceneView {
    pub fn new(id: impl Into<String>, interactive_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            interactive_tag: interactive_tag.into(),
            objects: Vec::new(),
            highlighted: None,
        }
    }

    fn color(&self, object: &ObjectSnapshot) -> Color {
        if self.highlighted == Some(object.id) {
            Color::GAZE_AMBER
        } else if object.interactive {
            Color::HUD_CYAN
        } else {
            Color::DarkGrey
        }
    }

    fn draw_sphere(backend: &mut dyn RenderBackend, center: Point3D, radius: f32, color: Color) {
        let symbol = match backend.project(center) {
            Some((_, _, depth)) if backend.apparent_rows(radius * 2.0, depth) >= 2.0 => "●",
            Some(_) => "•",
            None => return,
        };
        backend.draw_glyph(&RenderGlyph::new(symbol, center).with_color(color));
    }

    fn draw_box(backend: &mut dyn RenderBackend, center: Point3D, half: Vector3D, color: Color) {
        let corner = |sx: f32, sy: f32, sz: f32| {
            center + Vector3D::new(half.x * sx, half.y * sy, half.z * sz)
        };
        let signs = [-1.0, 1.0];
        for &a in &signs {
            for &b in &signs {
                backend.draw_line(corner(-1.0, a, b), corner(1.0, a, b), color);
                backend.draw_line(corner(a, -1.0, b), corner(a, 1.0, b), color);
                backend.draw_line(corner(a, b, -1.0), corner(a, b, 1.0), color);
            }
        }
    }

    fn draw_plane(backend: &mut dyn RenderBackend, point: Point3D, normal: Vector3D, color: Color) {
        let reference = if normal.dot(&Vector3D::UP).abs() > 0.9 {
            Vector3D::FORWARD
        } else {
            Vector3D::UP
        };
        let u = normal.cross(&reference).normalize();
        let v = normal.cross(&u).normalize();

        // Centre the grid on the camera's footprint so it follows the viewer
        let camera = backend.camera().position;
        let offset = camera - point;
        let snap = |value: f32| (value / PLANE_GRID_SPACING).round() * PLANE_GRID_SPACING;
        let origin = point + u * snap(offset.dot(&u)) + v * snap(offset.dot(&v));

        for i in -PLANE_GRID_STEPS..=PLANE_GRID_STEPS {
            for j in -PLANE_GRID_STEPS..=PLANE_GRID_STEPS {
                let p = origin
                    + u * (i as f32 * PLANE_GRID_SPACING)
                    + v * (j as f32 * PLANE_GRID_SPACING);
                backend.draw_glyph(&RenderGlyph::new("·", p).with_color(color));
            }
        }
    }
}

impl HudWidget for SceneView {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>) {
        self.objects = ctx
            .scene
            .objects()
            .iter()
            .map(|object| ObjectSnapshot {
                id: object.id,
                shape: object.shape,
                interactive: object.has_tag(&self.interactive_tag),
            })
            .collect();
        self.highlighted = ctx
            .output
            .and_then(|output| output.probe.hit().map(|hit| hit.object));
    }

    fn render(&self, backend: &mut dyn RenderBackend) {
        for object in &self.objects {
            let color = self.color(object);
            match object.shape {
                Shape::Sphere { center, radius } => Self::draw_sphere(backend, center, radius, color),
                Shape::Box {
                    center,
                    half_extents,
                } => Self::draw_box(backend, center, half_extents, color),
                Shape::Plane { point, normal } => Self::draw_plane(backend, point, normal, color),
            }
        }
    }
}
