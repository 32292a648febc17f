//! Pushing interactive objects with the gaze

use gaze_hud_config::{PushConfig, PushMode};
use tracing::debug;

use super::{ObjectId, ProbeResult, Scene};
use crate::spatial::Ray;

/// Applies a force along the gaze ray to tagged objects it rests on
#[derive(Debug, Clone)]
pub struct GazePush {
    config: PushConfig,
    /// Object hit on the previous tick
    last_target: Option<ObjectId>,
}

impl GazePush {
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            last_target: None,
        }
    }

    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Object the gaze rested on at the last call
    pub fn last_target(&self) -> Option<ObjectId> {
        self.last_target
    }

    /// Push the hit object if it carries the interactive tag.
    ///
    /// Returns the id of the object that received a force this call.
    pub fn apply(
        &mut self,
        scene: &mut Scene,
        result: &ProbeResult,
        ray: &Ray,
        dt: f32,
    ) -> Option<ObjectId> {
        let hit = result.hit().copied();
        let previous = self.last_target;
        self.last_target = hit.map(|h| h.object);

        let hit = hit?;
        if !self.config.enabled {
            return None;
        }
        if self.config.mode == PushMode::OnEnter && previous == Some(hit.object) {
            return None;
        }

        let tagged = scene
            .get(hit.object)
            .is_some_and(|object| object.has_tag(&self.config.tag));
        if !tagged {
            return None;
        }

        let force = ray.direction() * self.config.force;
        if scene.apply_force_at(hit.object, force, hit.point, dt) {
            debug!("Gaze pushed {}", hit.object);
            Some(hit.object)
        } else {
            None
        }
    }
}
