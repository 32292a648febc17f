//! Perspective projection from world space to terminal cells

use crate::spatial::{Point3D, Transform};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Perspective projection for a camera looking along its +Z axis
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_vertical: f32,
    /// Near clipping distance
    pub near: f32,
    /// Far clipping distance
    pub far: f32,
    /// Surface size in cells
    pub columns: u32,
    pub rows: u32,
}

impl Projection {
    pub fn perspective(fov_vertical_degrees: f32, columns: u32, rows: u32) -> Self {
        Self {
            fov_vertical: fov_vertical_degrees.to_radians(),
            near: 0.05,
            far: 200.0,
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    pub fn resize(&mut self, columns: u32, rows: u32) {
        self.columns = columns.max(1);
        self.rows = rows.max(1);
    }

    /// Width over height of the visible area, accounting for cell shape
    fn aspect(&self) -> f32 {
        self.columns as f32 / (self.rows as f32 * CELL_ASPECT)
    }

    /// Project to normalized device coordinates (-1 to 1) and view depth.
    /// `None` for points outside the frustum.
    pub fn project(&self, point: Point3D, camera: &Transform) -> Option<(f32, f32, f32)> {
        let local = camera.inverse_transform_point(point);
        if local.z <= self.near || local.z >= self.far {
            return None;
        }

        let tan_half = (self.fov_vertical / 2.0).tan();
        let x_ndc = local.x / (local.z * tan_half * self.aspect());
        let y_ndc = local.y / (local.z * tan_half);
        if x_ndc.abs() > 1.0 || y_ndc.abs() > 1.0 {
            return None;
        }

        Some((x_ndc, y_ndc, local.z))
    }

    /// Convert normalized device coordinates to a cell, clamped to the surface
    pub fn ndc_to_cell(&self, x_ndc: f32, y_ndc: f32) -> (u16, u16) {
        let x = ((x_ndc + 1.0) / 2.0 * self.columns as f32).round().max(0.0) as u32;
        let y = ((1.0 - y_ndc) / 2.0 * self.rows as f32).round().max(0.0) as u32;
        let x = x.min(self.columns - 1).min(u16::MAX as u32) as u16;
        let y = y.min(self.rows - 1).min(u16::MAX as u32) as u16;
        (x, y)
    }

    /// Project a point straight to a cell plus its view depth
    pub fn project_to_cell(&self, point: Point3D, camera: &Transform) -> Option<(u16, u16, f32)> {
        let (x_ndc, y_ndc, depth) = self.project(point, camera)?;
        let (x, y) = self.ndc_to_cell(x_ndc, y_ndc);
        Some((x, y, depth))
    }

    /// Rows covered by an object `size` meters tall at view depth `depth`
    pub fn apparent_rows(&self, size: f32, depth: f32) -> f32 {
        if depth <= self.near {
            return self.rows as f32;
        }
        let tan_half = (self.fov_vertical / 2.0).tan();
        size / (2.0 * depth * tan_half) * self.rows as f32
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(70.0, 80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ahead_projects_to_center() {
        let proj = Projection::perspective(90.0, 80, 40);
        let (x, y, depth) = proj
            .project(Point3D::new(0.0, 0.0, 5.0), &Transform::identity())
            .unwrap();
        assert!(x.abs() < 1e-3);
        assert!(y.abs() < 1e-3);
        assert!((depth - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_behind_camera() {
        let proj = Projection::default();
        assert!(proj
            .project(Point3D::new(0.0, 0.0, -5.0), &Transform::identity())
            .is_none());
    }

    #[test]
    fn test_cell_coordinates() {
        let proj = Projection::perspective(70.0, 100, 50);
        assert_eq!(proj.ndc_to_cell(0.0, 0.0), (50, 25));
        assert_eq!(proj.ndc_to_cell(-1.0, 1.0), (0, 0));
        assert_eq!(proj.ndc_to_cell(1.0, -1.0), (99, 49));
    }

    #[test]
    fn test_camera_offset() {
        let proj = Projection::perspective(90.0, 80, 40);
        let camera = Transform::from_position_rotation(Point3D::new(0.0, 1.6, 0.0), Default::default());
        let (_, y, _) = proj.project(Point3D::new(0.0, 1.6, 3.0), &camera).unwrap();
        assert!(y.abs() < 1e-3);
    }

    #[test]
    fn test_apparent_size_shrinks_with_depth() {
        let proj = Projection::perspective(90.0, 80, 40);
        // At 90 degrees the view spans 2 m vertically at 1 m depth
        assert!((proj.apparent_rows(1.0, 1.0) - 20.0).abs() < 1e-3);
        assert!((proj.apparent_rows(1.0, 2.0) - 10.0).abs() < 1e-3);
    }
}
