//! Hard constraints on the resolved pick point.
//!
//! Snaps suggest candidates; restrictions are non-negotiable. The final
//! point is the winning candidate projected through every active
//! restriction.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;

use crate::curve::EdgeId;
use crate::snap::{EdgeSnap, LineSnap, PlaneSnap};

/// Disjunction over edge restrictions: the point may land on any member.
///
/// Callers keep a handle to inspect which member actually matched, which is
/// how an edge-bound command recovers the edge and parameter under the
/// cursor.
#[derive(Debug)]
pub struct OrRestriction {
    members: Vec<Rc<EdgeSnap>>,
    matched: Cell<Option<usize>>,
}

impl OrRestriction {
    pub fn new(members: Vec<Rc<EdgeSnap>>) -> Rc<Self> {
        Rc::new(Self {
            members,
            matched: Cell::new(None),
        })
    }

    pub fn members(&self) -> &[Rc<EdgeSnap>] {
        &self.members
    }

    /// Edge and normalized parameter of the member the last projection
    /// landed on.
    pub fn matched(&self) -> Option<(EdgeId, f32)> {
        self.matched
            .get()
            .and_then(|i| self.members.get(i))
            .map(|m| (m.edge, m.last_t()))
    }

    /// Project onto the closest member.
    pub fn project(&self, p: Vec3) -> Vec3 {
        let mut best: Option<(usize, Vec3, f32)> = None;
        for (i, member) in self.members.iter().enumerate() {
            let q = member.project(p);
            let d = (q - p).length_squared();
            if best.as_ref().is_none_or(|(_, _, bd)| d < *bd) {
                best = Some((i, q, d));
            }
        }
        match best {
            Some((i, q, _)) => {
                self.matched.set(Some(i));
                q
            }
            None => p,
        }
    }
}

/// A constraint the resolved point must satisfy exactly.
#[derive(Debug, Clone)]
pub enum Restriction {
    Plane(PlaneSnap),
    Line(LineSnap),
    Edge(Rc<EdgeSnap>),
    Any(Rc<OrRestriction>),
}

impl Restriction {
    /// Project an unconstrained point onto the allowed subspace.
    pub fn project(&self, p: Vec3) -> Vec3 {
        match self {
            Restriction::Plane(plane) => plane.project(p),
            Restriction::Line(line) => line.project(p),
            Restriction::Edge(edge) => edge.project(p),
            Restriction::Any(any) => any.project(p),
        }
    }
}
