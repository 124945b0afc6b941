//! Agent footprints and their intersection tests.
//!
//! A [`Shape`] is the untransformed footprint an agent is created with.  The
//! environment places it with [`Shape::placed`]: the origin becomes the
//! agent's position and the local +x axis is turned to the agent's heading.
//!
//! Touching is not overlapping: two circles whose centres are exactly
//! `r1 + r2` apart do not intersect, so agents can stand shoulder to
//! shoulder.  Adimensional shapes never intersect anything.

use glam::DVec2;

use crate::{CoreError, CoreResult};

/// Footprint family supported by the environment.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum Shape {
    /// A point without extent.  Agents without a shape use this.
    #[default]
    Adimensional,
    Circle {
        radius: f64,
    },
    /// Centred on the origin; `width` runs along the heading.
    Rectangle {
        width:  f64,
        height: f64,
    },
}

impl Shape {
    /// # Errors
    ///
    /// [`CoreError::InvalidShape`] unless `radius` is finite and positive.
    pub fn circle(radius: f64) -> CoreResult<Self> {
        Shape::Circle { radius }.require_compatible()
    }

    /// # Errors
    ///
    /// [`CoreError::InvalidShape`] unless both sides are finite and positive.
    pub fn rectangle(width: f64, height: f64) -> CoreResult<Self> {
        Shape::Rectangle { width, height }.require_compatible()
    }

    /// Check a shape built directly from its variant fields.
    pub fn require_compatible(self) -> CoreResult<Self> {
        let ok = |d: f64| d.is_finite() && d > 0.0;
        match self {
            Shape::Adimensional => Ok(self),
            Shape::Circle { radius } if ok(radius) => Ok(self),
            Shape::Rectangle { width, height } if ok(width) && ok(height) => Ok(self),
            other => Err(CoreError::InvalidShape(format!("{other:?}"))),
        }
    }

    /// Largest distance between two points of the shape.
    pub fn diameter(&self) -> f64 {
        match *self {
            Shape::Adimensional => 0.0,
            Shape::Circle { radius } => 2.0 * radius,
            Shape::Rectangle { width, height } => width.hypot(height),
        }
    }

    /// Transform the shape to `origin`, rotated so +x follows `heading`.
    #[inline]
    pub fn placed(self, origin: DVec2, heading: DVec2) -> PlacedShape {
        PlacedShape { shape: self, origin, heading }
    }
}

// ── PlacedShape ───────────────────────────────────────────────────────────────

/// A [`Shape`] transformed into world coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedShape {
    pub shape:   Shape,
    pub origin:  DVec2,
    /// Zero means "not rotated".
    pub heading: DVec2,
}

impl PlacedShape {
    /// A point at `origin`; what shapeless agents report.
    pub fn adimensional(origin: DVec2) -> Self {
        Shape::Adimensional.placed(origin, DVec2::ZERO)
    }

    #[inline]
    pub fn centroid(&self) -> DVec2 {
        self.origin
    }

    #[inline]
    pub fn diameter(&self) -> f64 {
        self.shape.diameter()
    }

    /// The same shape and heading moved to `origin`.
    #[inline]
    pub fn with_origin(self, origin: DVec2) -> Self {
        Self { origin, ..self }
    }

    /// The same shape and origin turned to `heading`.
    #[inline]
    pub fn with_heading(self, heading: DVec2) -> Self {
        Self { heading, ..self }
    }

    /// Strict overlap test (shared boundary points don't count).
    pub fn intersects(&self, other: &PlacedShape) -> bool {
        match (self.shape, other.shape) {
            (Shape::Adimensional, _) | (_, Shape::Adimensional) => false,
            (Shape::Circle { radius: r1 }, Shape::Circle { radius: r2 }) => {
                let reach = r1 + r2;
                self.origin.distance_squared(other.origin) < reach * reach
            }
            (Shape::Circle { radius }, Shape::Rectangle { .. }) => {
                other.rectangle_hits_circle(self.origin, radius)
            }
            (Shape::Rectangle { .. }, Shape::Circle { radius }) => {
                self.rectangle_hits_circle(other.origin, radius)
            }
            (Shape::Rectangle { .. }, Shape::Rectangle { .. }) => {
                let (a, b) = (self.corners(), other.corners());
                let (ax, ay) = self.axes();
                let (bx, by) = other.axes();
                [ax, ay, bx, by].into_iter().all(|axis| overlap_on_axis(&a, &b, axis))
            }
        }
    }

    /// Local unit axes: x along the heading, y to its left.
    fn axes(&self) -> (DVec2, DVec2) {
        let x = self.heading.try_normalize().unwrap_or(DVec2::X);
        (x, x.perp())
    }

    fn half_extents(&self) -> DVec2 {
        match self.shape {
            Shape::Rectangle { width, height } => DVec2::new(width, height) * 0.5,
            Shape::Circle { radius } => DVec2::splat(radius),
            Shape::Adimensional => DVec2::ZERO,
        }
    }

    fn corners(&self) -> [DVec2; 4] {
        let (x, y) = self.axes();
        let h = self.half_extents();
        let (dx, dy) = (x * h.x, y * h.y);
        [
            self.origin - dx - dy,
            self.origin + dx - dy,
            self.origin + dx + dy,
            self.origin - dx + dy,
        ]
    }

    /// Closest point of the rectangle to the circle centre, found in the
    /// rectangle's local frame.
    fn rectangle_hits_circle(&self, center: DVec2, radius: f64) -> bool {
        let (x, y) = self.axes();
        let h = self.half_extents();
        let local = center - self.origin;
        let (lx, ly) = (local.dot(x), local.dot(y));
        let closest = DVec2::new(lx.clamp(-h.x, h.x), ly.clamp(-h.y, h.y));
        DVec2::new(lx, ly).distance_squared(closest) < radius * radius
    }
}

/// Separating-axis check: `true` when the projections strictly overlap.
fn overlap_on_axis(a: &[DVec2; 4], b: &[DVec2; 4], axis: DVec2) -> bool {
    let project = |pts: &[DVec2; 4]| {
        pts.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            let d = p.dot(axis);
            (lo.min(d), hi.max(d))
        })
    };
    let (a_lo, a_hi) = project(a);
    let (b_lo, b_hi) = project(b);
    a_hi > b_lo && b_hi > a_lo
}
