//! The geometry database boundary.
//!
//! The solid-modeling kernel stays behind this trait: commands address
//! geometry through opaque handles and primitive parameter sets, never
//! through kernel types.

use uuid::Uuid;
use vetro_exec::OpResult;
use vetro_snap::{EdgeCurve, EdgeId};

use crate::factory::PrimitiveParams;

/// Handle to a committed document item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub Uuid);

/// Handle to a temporary preview object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempId(pub Uuid);

impl TempId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Lookup and mutation over the document's geometry.
pub trait GeometryDb {
    /// Resolve an edge handle to its sampled curve.
    fn lookup_edge(&self, edge: EdgeId) -> Option<EdgeCurve>;

    /// Insert or replace a temporary preview object.
    fn upsert_temporary(&self, id: TempId, params: &PrimitiveParams);

    fn remove_temporary(&self, id: TempId);

    /// Commit parameters as a permanent item.
    fn commit(&self, params: &PrimitiveParams) -> OpResult<ItemId>;
}
