//! Gaze indicator placement

use gaze_hud_config::IndicatorConfig;

use crate::scene::{ObjectId, ProbeResult};
use crate::spatial::{Ray, Transform};

/// Place the indicator at a probe result.
///
/// The marker backs off the surface along the ray by `surface_offset`, faces
/// the ray origin, and scales uniformly with distance so its apparent size
/// stays constant.
pub fn place(result: &ProbeResult, ray: &Ray, config: &IndicatorConfig) -> Transform {
    let position = result.point() - ray.direction() * config.surface_offset;
    let mut transform = Transform::identity();
    transform.position = position;
    transform.look_at(ray.origin);
    transform.with_uniform_scale(result.distance() * config.scale_factor)
}

/// Marker state carried between ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub transform: Transform,
    pub visible: bool,
    /// Object under the marker, if the probe hit one
    pub target: Option<ObjectId>,
    /// Probe distance the marker was placed at
    pub distance: f32,
}

impl Indicator {
    pub fn new(visible: bool) -> Self {
        Self {
            transform: Transform::identity(),
            visible,
            target: None,
            distance: 0.0,
        }
    }

    /// Move the marker to a new probe result
    pub fn update(&mut self, result: &ProbeResult, ray: &Ray, config: &IndicatorConfig) {
        self.transform = place(result, ray, config);
        self.target = result.hit().map(|hit| hit.object);
        self.distance = result.distance();
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Uniform scale of the marker
    pub fn scale(&self) -> f32 {
        self.transform.scale.x
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new(true)
    }
}
