//! 2D vector helpers and static geometry (door segments, convex rooms).
//!
//! Positions and displacements are `glam::DVec2`.  Double precision keeps
//! long runs bit-reproducible without accumulating visible drift, and every
//! helper here is a plain function of its inputs (no hidden state, no
//! platform-dependent approximations).

pub use glam::DVec2;

use crate::{CoreError, CoreResult};

// ── Vector helpers ────────────────────────────────────────────────────────────

/// Euclidean length of `v`.
#[inline]
pub fn magnitude(v: DVec2) -> f64 {
    v.length()
}

/// `v` rescaled to `length`.
///
/// A negative `length` flips the direction.  The zero vector has no
/// direction and stays zero whatever the requested length.
#[inline]
pub fn resize(v: DVec2, length: f64) -> DVec2 {
    let m = v.length();
    if m == 0.0 { DVec2::ZERO } else { v / m * length }
}

/// `v` rotated by +90°, i.e. `(-y, x)`.
#[inline]
pub fn normal(v: DVec2) -> DVec2 {
    v.perp()
}

/// Unsigned angle between `a` and `b`, in `[0, π]`.
///
/// Computed as `atan2(|a × b|, a · b)`, which is exact for axis-aligned
/// orthogonal vectors (returns precisely `π/2`).  Returns `0.0` when either
/// vector is zero: a vector without direction never forms an angle.
pub fn angle_between(a: DVec2, b: DVec2) -> f64 {
    if a == DVec2::ZERO || b == DVec2::ZERO {
        return 0.0;
    }
    a.perp_dot(b).abs().atan2(a.dot(b))
}

/// Build a position from a raw coordinate list.
///
/// # Errors
///
/// [`CoreError::DimensionMismatch`] unless exactly two coordinates are given.
pub fn make_position(coordinates: &[f64]) -> CoreResult<DVec2> {
    match coordinates {
        [x, y] => Ok(DVec2::new(*x, *y)),
        _ => Err(CoreError::DimensionMismatch { expected: 2, got: coordinates.len() }),
    }
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// A straight segment, used for the crossing line of a door.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    #[inline]
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn midpoint(&self) -> DVec2 {
        (self.a + self.b) * 0.5
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }
}

// ── ConvexPolygon ─────────────────────────────────────────────────────────────

/// A convex polygon with counter-clockwise vertices.
///
/// Rooms of a navigation graph are convex so "which room am I in" is a
/// half-plane test per edge and any two points in a room see each other.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<DVec2>,
}

impl ConvexPolygon {
    /// Validate and normalise `vertices` (either winding is accepted).
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPolygon`] for fewer than three vertices, non-finite
    /// coordinates, zero area, or a reflex corner.
    pub fn new(mut vertices: Vec<DVec2>) -> CoreResult<Self> {
        let n = vertices.len();
        if n < 3 {
            return Err(CoreError::InvalidPolygon(format!("need at least 3 vertices, got {n}")));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::InvalidPolygon("non-finite vertex".into()));
        }

        let area = signed_area(&vertices);
        if area == 0.0 {
            return Err(CoreError::InvalidPolygon("zero area".into()));
        }
        if area < 0.0 {
            vertices.reverse();
        }

        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            if (b - a).perp_dot(c - b) < 0.0 {
                return Err(CoreError::InvalidPolygon(format!("reflex corner at vertex {}", (i + 1) % n)));
            }
        }

        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle spanning `min`..`max`.
    pub fn rectangle(min: DVec2, max: DVec2) -> CoreResult<Self> {
        Self::new(vec![
            min,
            DVec2::new(max.x, min.y),
            max,
            DVec2::new(min.x, max.y),
        ])
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// `true` if `p` lies inside or on the boundary.
    pub fn contains(&self, p: DVec2) -> bool {
        self.edges().all(|(a, b)| (b - a).perp_dot(p - a) >= 0.0)
    }

    /// Area-weighted centroid.
    pub fn centroid(&self) -> DVec2 {
        let area = signed_area(&self.vertices);
        let sum = self.edges().fold(DVec2::ZERO, |acc, (a, b)| {
            acc + (a + b) * a.perp_dot(b)
        });
        sum / (6.0 * area)
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (DVec2, DVec2) {
        self.vertices.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
    }

    fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Shoelace signed area; positive for counter-clockwise winding.
fn signed_area(vertices: &[DVec2]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}
