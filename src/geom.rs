//! Pure, allocation-free geometric primitives used by the motion engine.
//!
//! Every function here is deterministic and side-effect free: no clock reads, no engine state.
//! This is the layer the motion engine's crossing tests and distance checks are built from.

use nalgebra::{Point2, Vector2};

/// A 2D displacement.
pub type Vec2 = Vector2<f64>;

/// A 2D screen-space position.
pub type Point = Point2<f64>;

/// Axis-aligned rectangle with non-negative extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Width. Always `>= 0`.
	pub w: f64,
	/// Height. Always `>= 0`.
	pub h: f64,
}

impl Rect {
	/// Builds a rect from its top-left corner and extents, clamping negative extents to zero.
	#[must_use]
	pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
		Self { x, y, w: w.max(0.0), h: h.max(0.0) }
	}

	/// Minimum x coordinate.
	#[must_use]
	pub const fn min_x(&self) -> f64 {
		self.x
	}
	/// Maximum x coordinate.
	#[must_use]
	pub fn max_x(&self) -> f64 {
		self.x + self.w
	}
	/// Minimum y coordinate.
	#[must_use]
	pub const fn min_y(&self) -> f64 {
		self.y
	}
	/// Maximum y coordinate.
	#[must_use]
	pub fn max_y(&self) -> f64 {
		self.y + self.h
	}
	/// Horizontal center.
	#[must_use]
	pub fn mid_x(&self) -> f64 {
		self.x + self.w / 2.0
	}
	/// Vertical center.
	#[must_use]
	pub fn mid_y(&self) -> f64 {
		self.y + self.h / 2.0
	}
	/// Center point.
	#[must_use]
	pub fn center(&self) -> Point {
		Point::new(self.mid_x(), self.mid_y())
	}
	/// Rectangle area.
	#[must_use]
	pub fn area(&self) -> f64 {
		self.w * self.h
	}
	/// Whether `p` lies within this rectangle (inclusive).
	#[must_use]
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
	}
	/// Returns this rect inset by `(-pad_x, -pad_y)`, i.e. grown on every side.
	///
	/// Negative `pad_x`/`pad_y` shrink the rect instead; width and height are floored at zero.
	#[must_use]
	pub fn padded(&self, pad_x: f64, pad_y: f64) -> Self {
		Self::new(self.x - pad_x, self.y - pad_y, self.w + 2.0 * pad_x, self.h + 2.0 * pad_y)
	}
	/// Area of the intersection of `self` and `other`, or `0.0` if they do not overlap.
	#[must_use]
	pub fn overlap_area(&self, other: &Self) -> f64 {
		let x_overlap = (self.max_x().min(other.max_x()) - self.min_x().max(other.min_x())).max(0.0);
		let y_overlap = (self.max_y().min(other.max_y()) - self.min_y().max(other.min_y())).max(0.0);
		x_overlap * y_overlap
	}
}

/// Euclidean magnitude of a vector.
#[must_use]
pub fn magnitude(v: Vec2) -> f64 {
	v.norm()
}

/// Shortest distance from `p` to the (possibly degenerate) rectangle `r`, `0.0` if `p` is inside.
#[must_use]
pub fn point_rect_distance(p: Point, r: &Rect) -> f64 {
	let dx = (r.min_x() - p.x).max(0.0).max(p.x - r.max_x());
	let dy = (r.min_y() - p.y).max(0.0).max(p.y - r.max_y());
	dx.hypot(dy)
}

/// Shortest distance from `p` to the segment `[a, b]`.
///
/// Degenerate segments (`a == b`) return the distance from `p` to `a`.
#[must_use]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let ab = b - a;
	let len_sq = ab.norm_squared();
	if len_sq <= f64::EPSILON {
		return (p - a).norm();
	}
	let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
	let projected = a + ab * t;
	(p - projected).norm()
}

/// Closest point on segment `[a, b]` to `c`, for use by callers that also need the contact point.
#[must_use]
pub fn closest_point_on_segment(a: Point, b: Point, c: Point) -> Point {
	let ab = b - a;
	let len_sq = ab.norm_squared();
	if len_sq <= f64::EPSILON {
		return a;
	}
	let t = ((c - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
	a + ab * t
}

/// Whether segment `[a, b]` intersects the circle centered at `c` with radius `r`.
#[must_use]
pub fn segment_circle(a: Point, b: Point, c: Point, r: f64) -> bool {
	point_segment_distance(c, a, b) <= r
}

/// Sign of the 2D cross product `(b - a) x (c - a)`, used for segment/segment orientation tests.
fn cross_sign(a: Point, b: Point, c: Point) -> f64 {
	let ab = b - a;
	let ac = c - a;
	ab.x * ac.y - ab.y * ac.x
}

/// Whether segments `[p1, p2]` and `[p3, p4]` properly or collinearly intersect.
fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
	let d1 = cross_sign(p3, p4, p1);
	let d2 = cross_sign(p3, p4, p2);
	let d3 = cross_sign(p1, p2, p3);
	let d4 = cross_sign(p1, p2, p4);

	if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
		&& ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
	{
		return true;
	}

	// Collinear-overlap fallback: any endpoint lying on the other segment's bounding extent.
	fn on_segment(p: Point, q: Point, r: Point) -> bool {
		q.x.min(p.x) <= r.x
			&& r.x <= q.x.max(p.x)
			&& q.y.min(p.y) <= r.y
			&& r.y <= q.y.max(p.y)
	}
	(d1.abs() <= f64::EPSILON && on_segment(p3, p4, p1))
		|| (d2.abs() <= f64::EPSILON && on_segment(p3, p4, p2))
		|| (d3.abs() <= f64::EPSILON && on_segment(p1, p2, p3))
		|| (d4.abs() <= f64::EPSILON && on_segment(p1, p2, p4))
}

/// Whether segment `[a, b]` intersects rectangle `r`: either endpoint lies inside `r`, or the
/// segment crosses one of `r`'s four edges.
#[must_use]
pub fn segment_rect(a: Point, b: Point, r: &Rect) -> bool {
	if r.contains(a) || r.contains(b) {
		return true;
	}
	let tl = Point::new(r.min_x(), r.min_y());
	let tr = Point::new(r.max_x(), r.min_y());
	let bl = Point::new(r.min_x(), r.max_y());
	let br = Point::new(r.max_x(), r.max_y());
	segments_intersect(a, b, tl, tr)
		|| segments_intersect(a, b, tr, br)
		|| segments_intersect(a, b, br, bl)
		|| segments_intersect(a, b, bl, tl)
}

/// Whether two frames are equivalent within a fixed tolerance: centers within 5px and extents
/// within 10px of each other.
#[must_use]
pub fn frames_equivalent(l: &Rect, r: &Rect) -> bool {
	(l.mid_x() - r.mid_x()).abs() < 5.0
		&& (l.mid_y() - r.mid_y()).abs() < 5.0
		&& (l.w - r.w).abs() < 10.0
		&& (l.h - r.h).abs() < 10.0
}

/// Scales `v` down to magnitude `m` if it exceeds it; otherwise returns `v` unchanged.
#[must_use]
pub fn clamped_velocity(v: Vec2, m: f64) -> Vec2 {
	let len = v.norm();
	if len > m && len > f64::EPSILON { v * (m / len) } else { v }
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn point_inside_rect_has_zero_distance() {
		let r = Rect::new(0.0, 0.0, 10.0, 10.0);
		assert_eq!(point_rect_distance(Point::new(5.0, 5.0), &r), 0.0);
	}

	#[test]
	fn point_outside_rect_is_hypot_of_clamped_axes() {
		let r = Rect::new(0.0, 0.0, 10.0, 10.0);
		let d = point_rect_distance(Point::new(13.0, 14.0), &r);
		assert!((d - 5.0).abs() < 1e-9);
	}

	#[test]
	fn degenerate_segment_is_point_distance() {
		let a = Point::new(1.0, 1.0);
		let d = point_segment_distance(Point::new(4.0, 5.0), a, a);
		assert!((d - 5.0).abs() < 1e-9);
	}

	#[test]
	fn frames_equivalent_is_reflexive() {
		let r = Rect::new(12.0, 44.0, 80.0, 30.0);
		assert!(frames_equivalent(&r, &r));
	}

	#[test]
	fn frames_equivalent_is_symmetric() {
		let l = Rect::new(10.0, 10.0, 40.0, 20.0);
		let r = Rect::new(12.0, 12.0, 42.0, 22.0);
		assert_eq!(frames_equivalent(&l, &r), frames_equivalent(&r, &l));
	}

	#[test]
	fn clamped_velocity_preserves_direction() {
		let v = Vec2::new(300.0, 400.0);
		let clamped = clamped_velocity(v, 100.0);
		assert!((clamped.norm() - 100.0).abs() < 1e-9);
		let angle_before = v.y.atan2(v.x);
		let angle_after = clamped.y.atan2(clamped.x);
		assert!((angle_before - angle_after).abs() < 1e-9);
	}

	#[test]
	fn clamped_velocity_below_max_is_identity() {
		let v = Vec2::new(10.0, 0.0);
		assert_eq!(clamped_velocity(v, 100.0), v);
	}

	proptest! {
		#[test]
		fn segment_circle_matches_point_segment_distance(
			ax in -500.0f64..500.0, ay in -500.0f64..500.0,
			bx in -500.0f64..500.0, by in -500.0f64..500.0,
			cx in -500.0f64..500.0, cy in -500.0f64..500.0,
			r in 0.0f64..200.0,
		) {
			let a = Point::new(ax, ay);
			let b = Point::new(bx, by);
			let c = Point::new(cx, cy);
			let dist = point_segment_distance(c, a, b);
			prop_assert_eq!(segment_circle(a, b, c, r), dist <= r);
		}

		#[test]
		fn frames_equivalent_reflexive_prop(x in -1000.0f64..1000.0, y in -1000.0f64..1000.0, w in 0.0f64..500.0, h in 0.0f64..500.0) {
			let r = Rect::new(x, y, w, h);
			prop_assert!(frames_equivalent(&r, &r));
		}
	}
}
