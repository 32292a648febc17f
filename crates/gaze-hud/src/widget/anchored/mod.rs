//! World-anchored widgets drawn through the camera projection

mod marker;
mod scene_view;

pub use marker::GazeMarker;
pub use scene_view::SceneView;
