//! The evolving pick state: active snaps, restrictions, and pick history.

use std::cmp::Ordering;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::config::SnapConfig;
use crate::restriction::{OrRestriction, Restriction};
use crate::snap::{AxisSnap, EdgeSnap, LineSnap, PlaneSnap, PointSnap, Snap, SnapHit};
use crate::ray::Ray;

// A direction this short is treated as parallel when deriving the helper
// plane of a line restriction.
const DEGENERATE_LEN_SQ: f32 = 1e-4;

/// Pick-sequence state for one point picker.
///
/// Accumulates picked points, the straight directions that sprout axis snaps
/// from the latest pick, ad-hoc snaps added by commands, and the active
/// restrictions. The model is pure state and geometry; event wiring lives in
/// the controller that owns it.
#[derive(Debug)]
pub struct PickerModel {
    picked: Vec<PointSnap>,
    straight_snaps: Vec<AxisSnap>,
    added_snaps: Vec<Snap>,
    restrictions: Vec<Restriction>,
    restriction_point: Option<Vec3>,
    restriction_plane: Option<PlaneSnap>,
    restrict_to_construction_plane: bool,
    config: SnapConfig,
}

impl Default for PickerModel {
    fn default() -> Self {
        Self::new(SnapConfig::default())
    }
}

impl PickerModel {
    pub fn new(config: SnapConfig) -> Self {
        Self {
            picked: Vec::new(),
            straight_snaps: vec![AxisSnap::x(), AxisSnap::y(), AxisSnap::z()],
            added_snaps: Vec::new(),
            restrictions: Vec::new(),
            restriction_point: None,
            restriction_plane: None,
            restrict_to_construction_plane: false,
            config,
        }
    }

    // ---- straight snap directions --------------------------------------

    pub fn straight_snaps(&self) -> &[AxisSnap] {
        &self.straight_snaps
    }

    /// Add a straight direction; duplicates (up to sign) are ignored.
    pub fn add_straight_snap(&mut self, axis: AxisSnap) {
        if !self.straight_snaps.iter().any(|s| s.same_direction(&axis)) {
            self.straight_snaps.push(axis);
        }
    }

    pub fn remove_straight_snap(&mut self, axis: &AxisSnap) {
        self.straight_snaps.retain(|s| !s.same_direction(axis));
    }

    pub fn clear_straight_snaps(&mut self) {
        self.straight_snaps.clear();
    }

    // ---- ad-hoc snaps --------------------------------------------------

    pub fn add_snap(&mut self, snap: Snap) {
        self.added_snaps.push(snap);
    }

    /// Add axis snaps through `point` for every straight direction, rotated
    /// by `orientation`.
    pub fn add_axes_at(&mut self, point: Vec3, orientation: Quat) {
        let rotated: Vec<AxisSnap> = self
            .straight_snaps
            .iter()
            .map(|s| s.rotate(orientation))
            .collect();
        self.added_snaps
            .extend(PointSnap::new(point).axes(&rotated));
    }

    /// Snaps currently active: axes sprouting from the last picked point
    /// plus everything added ad hoc.
    pub fn snaps(&self) -> Vec<Snap> {
        let mut out = match self.picked.last() {
            Some(last) => last.axes(&self.straight_snaps),
            None => Vec::new(),
        };
        out.extend(self.added_snaps.iter().cloned());
        out
    }

    /// The active snaps plus the effective working plane derived from
    /// `base`, which every ray can fall back to.
    pub fn snaps_for(&self, base: PlaneSnap) -> Vec<Snap> {
        let mut out = vec![Snap::Plane(self.effective_plane(base))];
        out.extend(self.snaps());
        out
    }

    // ---- restrictions --------------------------------------------------

    /// The explicit restriction plane wins; otherwise the base plane,
    /// re-based through the restriction point when one is set.
    pub fn effective_plane(&self, base: PlaneSnap) -> PlaneSnap {
        if let Some(plane) = self.restriction_plane {
            plane
        } else if let Some(point) = self.restriction_point {
            base.move_to(point)
        } else {
            base
        }
    }

    /// Active restrictions for a pick against `base`, including the plane
    /// restriction when one of the plane modes is engaged.
    pub fn restrictions_for(&self, base: PlaneSnap) -> Vec<Restriction> {
        let mut out = self.restrictions.clone();
        if self.restriction_plane.is_some()
            || self.restriction_point.is_some()
            || self.restrict_to_construction_plane
        {
            out.push(Restriction::Plane(self.effective_plane(base)));
        }
        out
    }

    /// Restrict picks to the working plane re-based through `point`.
    pub fn restrict_to_plane_through_point(&mut self, point: Vec3) {
        self.restriction_point = Some(point);
    }

    /// Restrict picks to an explicit plane.
    pub fn restrict_to_plane(&mut self, plane: PlaneSnap) {
        self.restriction_plane = Some(plane);
    }

    /// Restrict picks to the viewport's construction plane as-is.
    pub fn restrict_to_construction_plane(&mut self, on: bool) {
        self.restrict_to_construction_plane = on;
    }

    /// Restrict picks to the line through `origin` along `direction`, and
    /// add a helper plane containing the line so the pointer has a surface
    /// to drag across.
    pub fn restrict_to_line(&mut self, origin: Vec3, direction: Vec3) {
        let line = LineSnap::new(origin, direction);
        self.restrictions.push(Restriction::Line(line));
        self.added_snaps.push(Snap::Line(line));

        let mut normal = Vec3::X.cross(line.direction);
        if normal.length_squared() < DEGENERATE_LEN_SQ {
            normal = Vec3::Y.cross(line.direction);
        }
        self.added_snaps
            .push(Snap::Plane(PlaneSnap::new(normal, origin)));
    }

    /// Restrict picks to any of the given edges. The returned handle
    /// reports which edge matched the latest projection.
    pub fn restrict_to_edges(&mut self, edges: Vec<EdgeSnap>) -> Rc<OrRestriction> {
        let members: Vec<Rc<EdgeSnap>> = edges.into_iter().map(Rc::new).collect();
        for member in &members {
            self.added_snaps.push(Snap::Edge(member.clone()));
        }
        let or = OrRestriction::new(members);
        self.restrictions.push(Restriction::Any(or.clone()));
        or
    }

    // ---- pick history --------------------------------------------------

    pub fn add_picked_point(&mut self, point: Vec3) {
        self.picked.push(PointSnap::new(point));
    }

    /// Forget the most recent pick; the previous pick's axes reactivate.
    pub fn undo(&mut self) {
        self.picked.pop();
    }

    pub fn pick_count(&self) -> usize {
        self.picked.len()
    }

    // ---- queries -------------------------------------------------------

    /// Every active snap within hint tolerance of the ray, for hint
    /// display. Not filtered by restrictions.
    pub fn nearby(&self, ray: &Ray) -> Vec<SnapHit> {
        self.snaps()
            .iter()
            .filter_map(|snap| snap.hit(ray, self.config.hint_radius))
            .collect()
    }

    /// Candidate points for the ray, best first, each projected through
    /// every active restriction.
    ///
    /// Ordering is priority class (narrower geometry first), then ray
    /// distance; the stable sort keeps declaration order on exact ties.
    pub fn snap(&self, ray: &Ray, base: PlaneSnap) -> Vec<(Snap, Vec3)> {
        let restrictions = self.restrictions_for(base);

        let mut hits: Vec<(Snap, SnapHit)> = self
            .snaps_for(base)
            .into_iter()
            .filter_map(|snap| snap.hit(ray, self.config.snap_radius).map(|hit| (snap, hit)))
            .collect();

        hits.sort_by(|a, b| {
            a.0.priority().cmp(&b.0.priority()).then(
                a.1.distance
                    .partial_cmp(&b.1.distance)
                    .unwrap_or(Ordering::Equal),
            )
        });

        hits.into_iter()
            .map(|(snap, hit)| {
                let mut point = hit.point;
                for restriction in &restrictions {
                    point = restriction.project(point);
                }
                (snap, point)
            })
            .collect()
    }
}
