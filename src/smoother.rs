//! Trackpad velocity smoother (spec §4.2).
//!
//! Consumes a stream of per-frame finger-position sets and distills it down to the handful of
//! scalars the motion engine actually needs: a touching/not-touching edge, a centroid, an
//! exponentially-smoothed velocity, and a short suppression window for multi-finger gestures that
//! should not trigger glide.

use crate::geom::{Point, Vec2};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Per-touch contact state, as reported by the multi-touch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchState {
	/// No contact.
	NotTouching,
	/// Finger detected above the surface but not yet in contact.
	Hovering,
	/// Finger transitioning into contact.
	Making,
	/// Finger in steady contact.
	Touching,
	/// Finger transitioning out of contact.
	Breaking,
	/// Finger lingering briefly after losing contact.
	Lingering,
}

impl TouchState {
	/// Whether this state counts toward "touching" for glide-suppression and edge detection.
	#[must_use]
	pub const fn counts_as_touching(self) -> bool {
		!matches!(self, Self::NotTouching | Self::Hovering)
	}
}

/// One per-touch sample: a normalized `(x, y) ∈ [0,1]²` position and its contact state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
	/// Normalized finger position.
	pub position: Point,
	/// Contact state of this finger.
	pub state: TouchState,
}

/// A single trackpad frame: the (possibly empty) set of touches reported this sample.
#[derive(Debug, Clone, Default)]
pub struct TouchFrame {
	/// Active touches this frame, in arbitrary order.
	pub touches: Vec<Touch>,
}

impl TouchFrame {
	/// Number of touches counting as "touching".
	#[must_use]
	pub fn touching_count(&self) -> usize {
		self.touches.iter().filter(|t| t.state.counts_as_touching()).count()
	}

	/// Whether any touch counts as "touching".
	#[must_use]
	pub fn is_touching(&self) -> bool {
		self.touching_count() > 0
	}

	/// Arithmetic mean of all touch positions in this frame, or `None` if empty.
	#[must_use]
	pub fn centroid(&self) -> Option<Point> {
		if self.touches.is_empty() {
			return None;
		}
		#[allow(clippy::cast_precision_loss)]
		let n = self.touches.len() as f64;
		let sum = self.touches.iter().fold(Vec2::new(0.0, 0.0), |acc, t| acc + t.position.coords);
		Some(Point::from(sum / n))
	}
}

const SMOOTHING_ALPHA: f64 = 0.35;
const SUPPRESSION_WINDOW: Duration = Duration::from_millis(150);
const MIN_DT: f64 = 1.0 / 500.0;

/// Value-type snapshot the tick thread reads once per tick.
///
/// This is what crosses the boundary from the asynchronous trackpad consumer task to the tick
/// thread: a plain `Copy` struct, written atomically under a [`parking_lot::Mutex`] by the
/// producer and read by the single consumer — no observer callbacks, no shared mutable graph of
/// objects (spec §5, §9).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmootherSnapshot {
	/// Whether any finger currently counts as touching.
	pub touching: bool,
	/// Exponentially-smoothed, normalized-space velocity (units per second in `[0,1]` space).
	pub smoothed_velocity: Vec2,
	/// Whether glide should be suppressed due to a recent multi-finger frame.
	pub suppress_glide: bool,
}

impl Default for SmootherSnapshot {
	fn default() -> Self {
		Self { touching: false, smoothed_velocity: Vec2::new(0.0, 0.0), suppress_glide: false }
	}
}

/// Exponentially-smoothed trackpad velocity estimator with multi-finger glide suppression.
///
/// Fed by [`Self::ingest`] from the trackpad driver's consumer task; its [`SmootherSnapshot`] is
/// read by the tick thread through [`Self::snapshot`].
pub struct TrackpadSmoother {
	previous_centroid: Option<Point>,
	smoothed_velocity: Vec2,
	suppression_deadline: Option<Instant>,
	was_touching: bool,
	snapshot: Mutex<SmootherSnapshot>,
}

impl Default for TrackpadSmoother {
	fn default() -> Self {
		Self::new()
	}
}

impl TrackpadSmoother {
	/// Creates a smoother with no history: the first ingested frame clears velocity rather than
	/// computing a spurious delta against a nonexistent previous centroid.
	#[must_use]
	pub fn new() -> Self {
		Self {
			previous_centroid: None,
			smoothed_velocity: Vec2::new(0.0, 0.0),
			suppression_deadline: None,
			was_touching: false,
			snapshot: Mutex::new(SmootherSnapshot::default()),
		}
	}

	/// Ingests one trackpad frame at wall-clock time `now`, updating centroid, velocity, and
	/// suppression state. Returns `Some(touching)` when the touching/not-touching edge flips,
	/// `None` otherwise — this is the "touch-state-change callback" of spec §4.2/§5, modeled here
	/// as a return value rather than a registered callback so there is exactly one reader.
	pub fn ingest(&mut self, frame: &TouchFrame, now: Instant, dt: Duration) -> Option<bool> {
		let touching = frame.is_touching();

		if frame.touching_count() > 1 {
			self.suppression_deadline = Some(now + SUPPRESSION_WINDOW);
		}

		let raw_velocity = match (frame.centroid(), self.previous_centroid) {
			(Some(centroid), Some(previous)) => {
				let dt_secs = dt.as_secs_f64().max(MIN_DT);
				(centroid - previous) / dt_secs
			}
			_ => Vec2::new(0.0, 0.0),
		};
		self.previous_centroid = frame.centroid();

		self.smoothed_velocity =
			self.smoothed_velocity * (1.0 - SMOOTHING_ALPHA) + raw_velocity * SMOOTHING_ALPHA;

		let suppress_glide = self.suppression_deadline.is_some_and(|deadline| now < deadline);

		*self.snapshot.lock() =
			SmootherSnapshot { touching, smoothed_velocity: self.smoothed_velocity, suppress_glide };

		let edge = (touching != self.was_touching).then_some(touching);
		self.was_touching = touching;
		edge
	}

	/// Reads the latest value-type snapshot. Safe to call concurrently with [`Self::ingest`].
	#[must_use]
	pub fn snapshot(&self) -> SmootherSnapshot {
		*self.snapshot.lock()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn touch(x: f64, y: f64, state: TouchState) -> Touch {
		Touch { position: Point::new(x, y), state }
	}

	#[test]
	fn first_frame_has_zero_velocity() {
		let mut s = TrackpadSmoother::new();
		let frame = TouchFrame { touches: vec![touch(0.5, 0.5, TouchState::Touching)] };
		s.ingest(&frame, Instant::now(), Duration::from_millis(2));
		assert_eq!(s.snapshot().smoothed_velocity, Vec2::new(0.0, 0.0));
	}

	#[test]
	fn empty_frame_clears_velocity_contribution() {
		let mut s = TrackpadSmoother::new();
		let moving = TouchFrame { touches: vec![touch(0.5, 0.5, TouchState::Touching)] };
		s.ingest(&moving, Instant::now(), Duration::from_millis(2));
		let moved = TouchFrame { touches: vec![touch(0.6, 0.5, TouchState::Touching)] };
		s.ingest(&moved, Instant::now(), Duration::from_millis(2));
		let empty = TouchFrame::default();
		s.ingest(&empty, Instant::now(), Duration::from_millis(2));
		// raw_velocity was zero this frame (no centroid), so smoothed velocity only decays.
		assert!(s.snapshot().smoothed_velocity.norm() < 50.0);
	}

	#[test]
	fn touching_edge_is_reported_once() {
		let mut s = TrackpadSmoother::new();
		let frame = TouchFrame { touches: vec![touch(0.5, 0.5, TouchState::Touching)] };
		let now = Instant::now();
		assert_eq!(s.ingest(&frame, now, Duration::from_millis(2)), Some(true));
		assert_eq!(s.ingest(&frame, now, Duration::from_millis(2)), None);
		let empty = TouchFrame::default();
		assert_eq!(s.ingest(&empty, now, Duration::from_millis(2)), Some(false));
	}

	#[test]
	fn multi_finger_sets_suppression_window() {
		let mut s = TrackpadSmoother::new();
		let now = Instant::now();
		let frame = TouchFrame {
			touches: vec![touch(0.3, 0.3, TouchState::Touching), touch(0.7, 0.7, TouchState::Touching)],
		};
		s.ingest(&frame, now, Duration::from_millis(2));
		assert!(s.snapshot().suppress_glide);
	}

	#[test]
	fn suppression_expires_after_window() {
		let mut s = TrackpadSmoother::new();
		let now = Instant::now();
		let frame = TouchFrame {
			touches: vec![touch(0.3, 0.3, TouchState::Touching), touch(0.7, 0.7, TouchState::Touching)],
		};
		s.ingest(&frame, now, Duration::from_millis(2));
		let later = now + Duration::from_millis(200);
		s.ingest(&TouchFrame::default(), later, Duration::from_millis(2));
		assert!(!s.snapshot().suppress_glide);
	}
}
