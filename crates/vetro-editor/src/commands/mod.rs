//! The command catalog.
//!
//! Each command is a straight-line async body sequencing pick, gizmo, and
//! dialog steps. Interruption of any awaited step unwinds the body; the
//! runner then tears down whatever the command had registered.

pub mod corner_box;
pub mod fillet;
pub mod polyline;
pub mod sphere;

pub use corner_box::CornerBoxCommand;
pub use fillet::{FilletCommand, FilletParams};
pub use polyline::PolylineCommand;
pub use sphere::SphereCommand;
