//! Snap tolerance configuration.

/// Proximity tolerances for snap tests, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapConfig {
    /// Maximum ray-to-snap distance for a candidate to win the pick.
    pub snap_radius: f32,
    /// Maximum ray-to-snap distance for hint geometry to appear.
    pub hint_radius: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_radius: 0.1,
            hint_radius: 0.25,
        }
    }
}
