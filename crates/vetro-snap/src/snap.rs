//! Snap candidates: the points of interest offered near the pointer ray.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::curve::{EdgeCurve, EdgeId};
use crate::ray::Ray;

/// Drawable geometry describing where a snap candidate sits.
#[derive(Debug, Clone, PartialEq)]
pub enum Hint {
    Point { position: Vec3 },
    Axis { origin: Vec3, direction: Vec3 },
    Plane { origin: Vec3, normal: Vec3 },
}

/// Result of a snap proximity test.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapHit {
    /// Candidate point, before restriction projection.
    pub point: Vec3,
    /// Separation between the pointer ray and the snap geometry.
    pub distance: f32,
    pub hint: Hint,
}

/// An exact previously-picked (or ad-hoc) point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSnap {
    pub position: Vec3,
}

impl PointSnap {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Axis snaps radiating from this point, one per straight direction.
    pub fn axes(&self, straight: &[AxisSnap]) -> Vec<Snap> {
        straight
            .iter()
            .map(|axis| Snap::Axis(axis.through(self.position)))
            .collect()
    }

    pub fn hit(&self, ray: &Ray, max_distance: f32) -> Option<SnapHit> {
        let distance = ray.distance_to_point(self.position);
        (distance <= max_distance).then(|| SnapHit {
            point: self.position,
            distance,
            hint: Hint::Point {
                position: self.position,
            },
        })
    }

    pub fn project(&self, _p: Vec3) -> Vec3 {
        self.position
    }
}

/// An infinite line through an origin in a principal or derived direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSnap {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl AxisSnap {
    pub fn new(direction: Vec3) -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: direction.normalize(),
        }
    }

    pub fn x() -> Self {
        Self::new(Vec3::X)
    }

    pub fn y() -> Self {
        Self::new(Vec3::Y)
    }

    pub fn z() -> Self {
        Self::new(Vec3::Z)
    }

    /// The same direction, re-based through `origin`.
    pub fn through(&self, origin: Vec3) -> Self {
        Self {
            origin,
            direction: self.direction,
        }
    }

    /// The direction rotated by `orientation`, keeping the origin.
    pub fn rotate(&self, orientation: Quat) -> Self {
        Self {
            origin: self.origin,
            direction: (orientation * self.direction).normalize(),
        }
    }

    /// True when the directions coincide up to sign.
    pub fn same_direction(&self, other: &AxisSnap) -> bool {
        self.direction.cross(other.direction).length_squared() < 1e-8
    }

    pub fn project(&self, p: Vec3) -> Vec3 {
        self.origin + self.direction * (p - self.origin).dot(self.direction)
    }

    pub fn hit(&self, ray: &Ray, max_distance: f32) -> Option<SnapHit> {
        let (_, point) = ray.closest_on_line(self.origin, self.direction);
        let distance = ray.distance_to_point(point);
        (distance <= max_distance).then(|| SnapHit {
            point,
            distance,
            hint: Hint::Axis {
                origin: self.origin,
                direction: self.direction,
            },
        })
    }
}

/// A free-direction line introduced by a line restriction; geometrically an
/// axis, kept distinct so candidate ordering can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSnap {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl LineSnap {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn project(&self, p: Vec3) -> Vec3 {
        self.origin + self.direction * (p - self.origin).dot(self.direction)
    }

    pub fn hit(&self, ray: &Ray, max_distance: f32) -> Option<SnapHit> {
        let (_, point) = ray.closest_on_line(self.origin, self.direction);
        let distance = ray.distance_to_point(point);
        (distance <= max_distance).then(|| SnapHit {
            point,
            distance,
            hint: Hint::Axis {
                origin: self.origin,
                direction: self.direction,
            },
        })
    }
}

/// A working plane: the fallback snap every pointer ray can land on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSnap {
    pub normal: Vec3,
    pub origin: Vec3,
}

impl Default for PlaneSnap {
    fn default() -> Self {
        Self {
            normal: Vec3::Z,
            origin: Vec3::ZERO,
        }
    }
}

impl PlaneSnap {
    pub fn new(normal: Vec3, origin: Vec3) -> Self {
        Self {
            normal: normal.normalize(),
            origin,
        }
    }

    /// The same orientation, re-based through `point`.
    pub fn move_to(&self, point: Vec3) -> Self {
        Self {
            normal: self.normal,
            origin: point,
        }
    }

    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.normal * (p - self.origin).dot(self.normal)
    }

    /// Plane hits are exact ray intersections, so their distance is zero;
    /// ordering keeps them below every narrower snap.
    pub fn hit(&self, ray: &Ray) -> Option<SnapHit> {
        ray.intersect_plane(self.normal, self.origin).map(|point| SnapHit {
            point,
            distance: 0.0,
            hint: Hint::Plane {
                origin: self.origin,
                normal: self.normal,
            },
        })
    }
}

/// A point bound to an edge curve. Remembers the parameter of its most
/// recent match so callers can recover where along the edge the user is.
#[derive(Debug)]
pub struct EdgeSnap {
    pub edge: EdgeId,
    curve: EdgeCurve,
    last_t: Cell<f32>,
}

impl EdgeSnap {
    pub fn new(edge: EdgeId, curve: EdgeCurve) -> Self {
        Self {
            edge,
            curve,
            last_t: Cell::new(0.0),
        }
    }

    pub fn curve(&self) -> &EdgeCurve {
        &self.curve
    }

    /// Normalized parameter of the most recent hit or projection.
    pub fn last_t(&self) -> f32 {
        self.last_t.get()
    }

    pub fn hit(&self, ray: &Ray, max_distance: f32) -> Option<SnapHit> {
        let (t, point, distance) = self.curve.closest_to_ray(ray);
        if distance > max_distance {
            return None;
        }
        self.last_t.set(t);
        Some(SnapHit {
            point,
            distance,
            hint: Hint::Point { position: point },
        })
    }

    pub fn project(&self, p: Vec3) -> Vec3 {
        let (t, point) = self.curve.closest_to_point(p);
        self.last_t.set(t);
        point
    }
}

/// The closed set of snap variants the picker works over.
#[derive(Debug, Clone)]
pub enum Snap {
    Point(PointSnap),
    Edge(Rc<EdgeSnap>),
    Axis(AxisSnap),
    Line(LineSnap),
    Plane(PlaneSnap),
}

impl Snap {
    /// Proximity test against the pointer ray.
    pub fn hit(&self, ray: &Ray, max_distance: f32) -> Option<SnapHit> {
        match self {
            Snap::Point(s) => s.hit(ray, max_distance),
            Snap::Edge(s) => s.hit(ray, max_distance),
            Snap::Axis(s) => s.hit(ray, max_distance),
            Snap::Line(s) => s.hit(ray, max_distance),
            Snap::Plane(s) => s.hit(ray),
        }
    }

    /// Exact projection onto the snap geometry.
    pub fn project(&self, p: Vec3) -> Vec3 {
        match self {
            Snap::Point(s) => s.project(p),
            Snap::Edge(s) => s.project(p),
            Snap::Axis(s) => s.project(p),
            Snap::Line(s) => s.project(p),
            Snap::Plane(s) => s.project(p),
        }
    }

    /// Ordering class for candidate ranking: narrower geometry wins over
    /// wider geometry at comparable distance.
    pub(crate) fn priority(&self) -> u8 {
        match self {
            Snap::Point(_) => 0,
            Snap::Edge(_) => 1,
            Snap::Axis(_) | Snap::Line(_) => 2,
            Snap::Plane(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_point_snap_hit_within_radius() {
        let snap = PointSnap::new(Vec3::new(1.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(1.05, 0.0, 5.0), Vec3::NEG_Z);
        let hit = snap.hit(&ray, 0.1).expect("within radius");
        assert_eq!(hit.point, Vec3::new(1.0, 0.0, 0.0));
        assert!(snap.hit(&ray, 0.01).is_none());
    }

    #[test]
    fn test_axis_snap_projects_onto_axis() {
        let axis = AxisSnap::x().through(Vec3::new(0.0, 2.0, 0.0));
        let p = axis.project(Vec3::new(3.0, 7.0, 4.0));
        assert_eq!(p, Vec3::new(3.0, 2.0, 0.0));
    }

    #[test]
    fn test_axis_same_direction_ignores_sign() {
        assert!(AxisSnap::x().same_direction(&AxisSnap::new(Vec3::NEG_X)));
        assert!(!AxisSnap::x().same_direction(&AxisSnap::y()));
    }

    #[test]
    fn test_axis_rotate() {
        let rot = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let axis = AxisSnap::x().rotate(rot);
        assert!(axis.same_direction(&AxisSnap::y()));
    }

    #[test]
    fn test_plane_snap_hit_is_exact() {
        let plane = PlaneSnap::default();
        let ray = Ray::new(Vec3::new(3.0, 3.0, 5.0), Vec3::NEG_Z);
        let hit = plane.hit(&ray).expect("ray crosses plane");
        assert_eq!(hit.point, Vec3::new(3.0, 3.0, 0.0));
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_edge_snap_remembers_parameter() {
        let edge = EdgeSnap::new(
            EdgeId::new(Uuid::new_v4(), 0),
            EdgeCurve::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]),
        );
        let q = edge.project(Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(q, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(edge.last_t(), 0.25);
    }

    #[test]
    fn test_snap_priorities() {
        assert!(Snap::Point(PointSnap::new(Vec3::ZERO)).priority() < Snap::Axis(AxisSnap::x()).priority());
        assert!(Snap::Axis(AxisSnap::x()).priority() < Snap::Plane(PlaneSnap::default()).priority());
    }
}
