//! Snap and restriction algebra for interactive point picking.
//!
//! While the user moves the pointer, the picker casts a world-space ray and
//! asks the active [`PickerModel`] for candidate points of interest
//! ([`Snap`]s) near that ray. Hard constraints ([`Restriction`]s) then
//! project the winning candidate onto the allowed subspace. The model
//! evolves as points are accepted: every picked point sprouts axis snaps in
//! the configured straight directions.

pub mod config;
pub mod curve;
pub mod model;
pub mod ray;
pub mod restriction;
pub mod snap;

pub use config::SnapConfig;
pub use curve::{EdgeCurve, EdgeId};
pub use model::PickerModel;
pub use ray::Ray;
pub use restriction::{OrRestriction, Restriction};
pub use snap::{AxisSnap, EdgeSnap, Hint, LineSnap, PlaneSnap, PointSnap, Snap, SnapHit};
