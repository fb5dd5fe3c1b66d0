//! Geometry factories: primitive parameters, preview, and commit.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use vetro_exec::{Cancellable, OpError, OpResult};
use vetro_snap::{EdgeId, PlaneSnap};

use crate::db::{GeometryDb, ItemId, TempId};
use crate::signal::EditorSignals;

/// Extents below this are rejected as degenerate.
const MIN_EXTENT: f32 = 1e-4;

/// Parameters of one constructible primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveParams {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// Box spanned by a plane-diagonal and an extrusion height along the
    /// plane normal.
    CornerBox {
        p1: Vec3,
        p2: Vec3,
        height: f32,
        plane: PlaneSnap,
    },
    Polyline {
        points: Vec<Vec3>,
        closed: bool,
    },
    Fillet {
        edges: Vec<EdgeId>,
        distance: f32,
    },
}

/// Check parameters before preview or commit.
pub fn validate(params: &PrimitiveParams) -> OpResult<()> {
    match params {
        PrimitiveParams::Sphere { radius, .. } if *radius <= MIN_EXTENT => {
            Err(OpError::Validation("sphere radius is degenerate".into()))
        }
        PrimitiveParams::CornerBox { p1, p2, .. } if p1.distance_squared(*p2) <= MIN_EXTENT => {
            Err(OpError::Validation("box diagonal is degenerate".into()))
        }
        PrimitiveParams::CornerBox { height, .. } if height.abs() <= MIN_EXTENT => {
            Err(OpError::Validation("box height is degenerate".into()))
        }
        PrimitiveParams::Polyline { points, .. } if points.len() < 2 => {
            Err(OpError::Validation("polyline needs at least two points".into()))
        }
        PrimitiveParams::Fillet { edges, .. } if edges.is_empty() => {
            Err(OpError::Validation("fillet needs at least one edge".into()))
        }
        PrimitiveParams::Fillet { distance, .. } if *distance <= 0.0 => {
            Err(OpError::Validation("fillet distance must be positive".into()))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Building,
    Committed,
}

struct Inner {
    db: Rc<dyn GeometryDb>,
    signals: Rc<EditorSignals>,
    temp: TempId,
    has_preview: bool,
    params: Option<PrimitiveParams>,
    state: State,
}

/// Shared handle to one in-progress construction.
///
/// While building, [`Factory::update`] keeps a temporary preview in the
/// database; [`Factory::commit`] validates and replaces it with a permanent
/// item. Discarding drops the preview but keeps the parameters, so a late
/// commit after the owning command finished still works.
#[derive(Clone)]
pub struct Factory {
    inner: Rc<RefCell<Inner>>,
}

impl Factory {
    pub fn new(db: Rc<dyn GeometryDb>, signals: Rc<EditorSignals>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                db,
                signals,
                temp: TempId::new(),
                has_preview: false,
                params: None,
                state: State::Building,
            })),
        }
    }

    pub fn set_params(&self, params: PrimitiveParams) {
        self.inner.borrow_mut().params = Some(params);
    }

    pub fn params(&self) -> Option<PrimitiveParams> {
        self.inner.borrow().params.clone()
    }

    /// Recompute the temporary preview from the current parameters.
    /// Incomplete or degenerate parameters drop the preview instead of
    /// failing; only commit is strict.
    pub fn update(&self) {
        let (db, signals, temp, params) = {
            let inner = self.inner.borrow();
            if inner.state != State::Building {
                return;
            }
            (
                inner.db.clone(),
                inner.signals.clone(),
                inner.temp,
                inner.params.clone(),
            )
        };

        let valid = params.as_ref().map(validate);
        match (params, valid) {
            (Some(params), Some(Ok(()))) => {
                db.upsert_temporary(temp, &params);
                self.inner.borrow_mut().has_preview = true;
            }
            (_, Some(Err(e))) => {
                tracing::debug!(error = %e, "skipping preview of invalid parameters");
                self.drop_preview();
            }
            _ => self.drop_preview(),
        }
        signals.factory_updated.emit(&());
    }

    /// Validate and commit the parameters as a permanent item.
    pub fn commit(&self) -> OpResult<ItemId> {
        let (db, signals, params) = {
            let inner = self.inner.borrow();
            if inner.state == State::Committed {
                return Err(OpError::Validation("factory already committed".into()));
            }
            let Some(params) = inner.params.clone() else {
                return Err(OpError::Validation("no parameters to commit".into()));
            };
            (inner.db.clone(), inner.signals.clone(), params)
        };

        validate(&params)?;
        self.drop_preview();
        let item = db.commit(&params)?;
        self.inner.borrow_mut().state = State::Committed;
        signals.factory_committed.emit(&());
        tracing::debug!(?item, "factory committed");
        Ok(item)
    }

    /// Remove the preview without committing.
    pub fn discard(&self) {
        self.drop_preview();
    }

    fn drop_preview(&self) {
        let (db, temp) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.has_preview {
                return;
            }
            inner.has_preview = false;
            (inner.db.clone(), inner.temp)
        };
        db.remove_temporary(temp);
    }
}

impl Cancellable for Factory {
    fn cancel(&self) {
        self.discard();
    }

    fn finish(&self) {
        self.discard();
    }
}
