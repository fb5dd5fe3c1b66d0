//! Interactive command layer of the vetro editor.
//!
//! Binds the cancellation framework (`vetro-exec`) and the snap algebra
//! (`vetro-snap`) to live viewports: the point-picker controller, drag
//! gizmos, parameter dialogs, geometry factories, and the command catalog.
//! Rendering and the solid-modeling kernel stay behind the traits in
//! [`viewport`], [`overlay`], and [`db`].

pub mod commands;
pub mod db;
pub mod dialog;
pub mod editor;
pub mod factory;
pub mod gizmo;
pub mod harness;
pub mod overlay;
pub mod picker;
pub mod signal;
pub mod viewport;

pub use db::{GeometryDb, ItemId, TempId};
pub use dialog::Dialog;
pub use editor::Editor;
pub use factory::{Factory, PrimitiveParams};
pub use gizmo::{DragGizmo, GizmoMode};
pub use overlay::{OverlayId, OverlayObject, SceneOverlay};
pub use picker::{PickMode, PointInfo, PointPicker, PointResult};
pub use signal::{EditorSignals, Signal};
pub use viewport::{PointerButton, PointerEvent, Viewport};
