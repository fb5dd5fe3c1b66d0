//! World-space rays and the distance queries snaps are built on.

use glam::Vec3;

/// A ray in world space, as produced by unprojecting the pointer through a
/// viewport camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray; the direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance from the forward half-line to `p`.
    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        let t = (p - self.origin).dot(self.direction).max(0.0);
        (self.at(t) - p).length()
    }

    /// Closest approach between this ray and the infinite line through
    /// `origin` with `direction`. Returns the line parameter (in units of
    /// the normalized direction) and the point on the line.
    pub fn closest_on_line(&self, origin: Vec3, direction: Vec3) -> (f32, Vec3) {
        let u = self.direction;
        let v = direction.normalize();
        let w = self.origin - origin;
        let b = u.dot(v);
        let d = u.dot(w);
        let e = v.dot(w);
        let denom = 1.0 - b * b;

        // Nearly parallel: any ray point works, use the ray origin.
        let s = if denom.abs() < 1e-7 {
            0.0
        } else {
            ((b * e - d) / denom).max(0.0)
        };
        let t = (self.at(s) - origin).dot(v);
        (t, origin + v * t)
    }

    /// Forward intersection with the plane through `origin` with `normal`.
    pub fn intersect_plane(&self, normal: Vec3, origin: Vec3) -> Option<Vec3> {
        let denom = self.direction.dot(normal);
        if denom.abs() < 1e-7 {
            return None;
        }
        let t = (origin - self.origin).dot(normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}
