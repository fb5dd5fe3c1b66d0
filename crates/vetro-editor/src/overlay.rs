//! Transient visualization: pick markers and snap hints.

use glam::Vec3;
use uuid::Uuid;
use vetro_snap::Hint;

/// Handle to a transient overlay object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(Uuid);

impl OverlayId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Kinds of transient objects controllers draw.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayObject {
    /// The marker tracking the current snap point.
    Marker { position: Vec3 },
    /// Geometry hinting at a nearby snap.
    Hint(Hint),
}

/// Scene layer for short-lived interaction visuals. Objects added here are
/// never part of the document.
pub trait SceneOverlay {
    fn add(&self, object: OverlayObject) -> OverlayId;

    fn set_position(&self, id: OverlayId, position: Vec3);

    fn remove(&self, id: OverlayId);
}
