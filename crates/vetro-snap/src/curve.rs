//! Edge handles and their sampled curve geometry.

use glam::Vec3;
use uuid::Uuid;

use crate::ray::Ray;

/// Handle to an edge of a solid in the geometry database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub solid_id: Uuid,
    pub index: u32,
}

impl EdgeId {
    pub fn new(solid_id: Uuid, index: u32) -> Self {
        Self { solid_id, index }
    }
}

/// An edge curve sampled as a polyline, parameterized by normalized arc
/// length in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCurve {
    points: Vec<Vec3>,
    /// Cumulative arc length up to each point.
    lengths: Vec<f32>,
    total: f32,
}

impl EdgeCurve {
    /// Builds a curve from sample points. Fewer than two points yields a
    /// degenerate curve pinned to its first point (or the origin).
    pub fn new(points: Vec<Vec3>) -> Self {
        let mut lengths = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += (*p - points[i - 1]).length();
            }
            lengths.push(total);
        }
        Self {
            points,
            lengths,
            total,
        }
    }

    pub fn length(&self) -> f32 {
        self.total
    }

    /// Point at normalized parameter `t`, clamped to `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let Some(&first) = self.points.first() else {
            return Vec3::ZERO;
        };
        if self.total <= 0.0 {
            return first;
        }
        let target = t.clamp(0.0, 1.0) * self.total;
        for i in 1..self.points.len() {
            if self.lengths[i] >= target {
                let seg = self.lengths[i] - self.lengths[i - 1];
                if seg <= 0.0 {
                    return self.points[i];
                }
                let local = (target - self.lengths[i - 1]) / seg;
                return self.points[i - 1].lerp(self.points[i], local);
            }
        }
        self.points[self.points.len() - 1]
    }

    /// Closest point on the curve to `p`, as `(t, point)`.
    pub fn closest_to_point(&self, p: Vec3) -> (f32, Vec3) {
        let Some(&first) = self.points.first() else {
            return (0.0, Vec3::ZERO);
        };
        let mut best = (0.0, first, (first - p).length_squared());
        for i in 1..self.points.len() {
            let a = self.points[i - 1];
            let b = self.points[i];
            let ab = b - a;
            let len_sq = ab.length_squared();
            let local = if len_sq <= 0.0 {
                0.0
            } else {
                ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            };
            let q = a + ab * local;
            let d = (q - p).length_squared();
            if d < best.2 {
                let arc = self.lengths[i - 1] + ab.length() * local;
                best = (self.param_at_arc(arc), q, d);
            }
        }
        (best.0, best.1)
    }

    /// Closest point on the curve to a ray, as `(t, point, distance)`.
    pub fn closest_to_ray(&self, ray: &Ray) -> (f32, Vec3, f32) {
        let Some(&first) = self.points.first() else {
            return (0.0, Vec3::ZERO, f32::INFINITY);
        };
        let mut best = (0.0, first, ray.distance_to_point(first));
        for i in 1..self.points.len() {
            let a = self.points[i - 1];
            let b = self.points[i];
            let ab = b - a;
            let len = ab.length();
            let q = if len <= 0.0 {
                a
            } else {
                let (t_line, _) = ray.closest_on_line(a, ab);
                a + ab / len * t_line.clamp(0.0, len)
            };
            let d = ray.distance_to_point(q);
            if d < best.2 {
                let arc = self.lengths[i - 1] + (q - a).length();
                best = (self.param_at_arc(arc), q, d);
            }
        }
        best
    }

    fn param_at_arc(&self, arc: f32) -> f32 {
        if self.total <= 0.0 {
            0.0
        } else {
            (arc / self.total).clamp(0.0, 1.0)
        }
    }
}
