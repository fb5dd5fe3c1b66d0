//! The viewport surface interactive controllers bind to.

use vetro_snap::{PlaneSnap, Ray};

use crate::signal::Signal;

/// Pointer button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer input already resolved to a world-space ray by the viewport's
/// camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { ray: Ray },
    Pressed { ray: Ray, button: PointerButton },
}

/// One live viewport.
///
/// Controllers subscribe to the pointer stream and take the navigation lock
/// while an interaction owns input; the locks nest.
pub trait Viewport {
    /// The viewport's ambient working plane.
    fn construction_plane(&self) -> PlaneSnap;

    fn pointer_events(&self) -> &Signal<PointerEvent>;

    /// Suspend default navigation (orbit/pan/zoom) while an interaction
    /// owns pointer input.
    fn disable_controls(&self);

    fn enable_controls(&self);
}
