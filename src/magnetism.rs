//! Magnetism resolver: per-target parameter derivation, crossing tests, and alignment scoring
//! (spec §4.6), plus the [`MagnetState`] bookkeeping spec §3 names.
//!
//! [`crate::engine::MotionEngine`] owns a [`MagnetState`] and drives `apply_magnetism` from
//! inside `handle_touch`/`handle_no_touch` after each raw position update; everything in this
//! module is otherwise pure geometry and bookkeeping, kept separate from the integration code so
//! the two concerns — "where is the pointer" and "what is it attracted to" — stay legible on
//! their own.

use crate::geom::{Point, Rect, Vec2, frames_equivalent, segment_circle, segment_rect};

/// Per-target magnetism parameters derived from a candidate frame (spec §4.6 "Parameter
/// derivation").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetParams {
	/// Attraction radius, in px.
	pub radius: f64,
	/// Snap-to-center distance, in px.
	pub snap: f64,
	/// Pull strength in `[0.4, magnetic_strength * 1.12]`.
	pub strength: f64,
}

/// Normalization factor and aspect ratio shared by parameter derivation and padding.
struct FrameShape {
	minor: f64,
	aspect: f64,
	norm: f64,
}

/// Aspect ratio (`major / minor`, `>= 1`) and clamped minor axis length of `frame`.
#[must_use]
pub fn aspect_and_minor(frame: &Rect) -> (f64, f64) {
	let s = shape_of(frame);
	(s.aspect, s.minor)
}

fn shape_of(frame: &Rect) -> FrameShape {
	let minor = frame.w.min(frame.h).max(1.0);
	let major = frame.w.max(frame.h);
	let aspect = major / minor;
	let norm = (minor / 110.0).clamp(0.22, 1.0);
	FrameShape { minor, aspect, norm }
}

/// Derives [`MagnetParams`] for `frame` from the base configuration values (spec §4.6).
#[must_use]
pub fn derive_params(frame: &Rect, magnetism_radius: f64, magnetic_strength: f64, snap_threshold: f64) -> MagnetParams {
	let FrameShape { minor, aspect, norm } = shape_of(frame);

	let mut radius =
		(magnetism_radius * norm * 1.05).clamp(minor * 0.85, minor * 1.8 + 18.0);
	let mut snap = (snap_threshold * norm * 0.9).max(minor * 0.55).max(12.0);
	let mut strength = (magnetic_strength * (0.66 + norm * 0.5)).clamp(0.4, magnetic_strength * 1.12);

	if aspect > 2.4 {
		let k = ((aspect - 2.4) * 0.12).min(0.6);
		radius *= 1.0 - k;
		snap *= 1.0 - 0.85 * k;
		strength *= (1.0 - 0.9 * k).max(0.55);
	}

	MagnetParams { radius, snap, strength }
}

/// Derives the rectangular padding used by "near-rect" tests (spec §4.6 "Rectangular padding").
#[must_use]
pub fn derive_padding(frame: &Rect) -> (f64, f64) {
	((frame.w * 0.22).clamp(6.0, 18.0), (frame.h * 0.60).clamp(6.0, 18.0))
}

/// `frame` grown by its own derived padding.
#[must_use]
pub fn padded_rect(frame: &Rect) -> Rect {
	let (pad_x, pad_y) = derive_padding(frame);
	frame.padded(pad_x, pad_y)
}

fn safe_normalize(v: Vec2) -> Option<Vec2> {
	let n = v.norm();
	(n > f64::EPSILON).then(|| v / n)
}

/// Weighted alignment of `(velocity, last_input_delta)` with the unit vector from `from` to
/// `target_center` (spec §4.6 "Alignment"). `None` when both weights are zero.
#[must_use]
pub fn alignment(velocity: Vec2, last_input_delta: Vec2, from: Point, target_center: Point) -> Option<f64> {
	let target_dir = safe_normalize(target_center - from)?;
	let v_weight = (velocity.norm() / 300.0).min(1.0);
	let d_weight = (last_input_delta.norm() / 10.0).min(1.0);
	if v_weight <= f64::EPSILON && d_weight <= f64::EPSILON {
		return None;
	}
	let v_align = safe_normalize(velocity).map_or(0.0, |u| u.dot(&target_dir));
	let d_align = safe_normalize(last_input_delta).map_or(0.0, |u| u.dot(&target_dir));
	Some((v_align * v_weight + d_align * d_weight) / (v_weight + d_weight))
}

/// Whether the segment `[start, end]` is moving toward `center` at all.
#[must_use]
pub fn moving_toward(start: Point, end: Point, center: Point) -> bool {
	(end - start).dot(&(center - start)) > 0.0
}

/// Whether the midpoint of `[start, end]` lies inside `rect`, gated on the step exceeding
/// `2 * threshold_radius` in length (spec §4.6 step 3/7 "large-step midpoint-inside").
#[must_use]
pub fn large_step_midpoint_capture(start: Point, end: Point, rect: &Rect, threshold_radius: f64) -> bool {
	let step_len = (end - start).norm();
	if step_len <= 2.0 * threshold_radius {
		return false;
	}
	let midpoint = Point::from((start.coords + end.coords) / 2.0);
	rect.contains(midpoint)
}

/// The repeated "does this step cross into capture range of `center`/`rect`" test used for both
/// candidate adoption (§4.6 step 3) and current-target raw-crossing (§4.6 step 7).
///
/// `circle_radii` are tried as alternative snap-circle radii around `center`; `rect` is the
/// padded rect crossing test; `large_step_radius`, if given, additionally captures on a
/// long single step whose midpoint lands inside `rect`. Requires the segment to be moving
/// toward `center` at all, per spec §4.6 step 3's explicit gate (applied uniformly here since
/// step 7 names the same four conditions without restating the gate).
#[must_use]
pub fn crossing_capture(
	start: Point,
	end: Point,
	center: Point,
	rect: &Rect,
	circle_radii: &[f64],
	large_step_radius: Option<f64>,
) -> bool {
	if !moving_toward(start, end, center) {
		return false;
	}
	if circle_radii.iter().any(|&r| segment_circle(start, end, center, r)) {
		return true;
	}
	if segment_rect(start, end, rect) {
		return true;
	}
	large_step_radius.is_some_and(|r| large_step_midpoint_capture(start, end, rect, r))
}

/// Whether `delta` is a directional intent consistent with escaping a narrow elongated `frame`
/// along its short axis (spec §4.6 step 1 / §4.7): a tall narrow frame requires predominantly
/// horizontal movement, a wide narrow frame requires predominantly vertical movement. Frames that
/// are not narrow-and-elongated (`aspect <= 1.8` or `minor >= 110`) never require this — callers
/// check that condition separately since it also gates whether the cap applies at all.
#[must_use]
pub fn axis_consistent_intent(frame: &Rect, delta: Vec2) -> bool {
	if frame.h > frame.w {
		// Vertical bar: require dominant, non-trivial horizontal movement.
		delta.x.abs() > delta.y.abs() * 0.9 && delta.x.abs() > 2.5
	} else {
		// Horizontal bar: require dominant, non-trivial vertical movement.
		delta.y.abs() > delta.x.abs() * 0.9 && delta.y.abs() > 2.5
	}
}

/// Unlock distance for the raw-escape test against an existing lock: the ordinary radial
/// distance, tightened to a directional cap when `frame` is narrow and elongated and `delta`
/// shows consistent short-axis intent moving away from center.
#[must_use]
pub fn escape_unlock_distance(frame: &Rect, params: &MagnetParams, delta: Vec2, pointer_from_center: Vec2) -> f64 {
	let (aspect, minor) = aspect_and_minor(frame);
	let base = (minor * 0.65).max(params.snap * 0.9);
	let moving_away = delta.dot(&pointer_from_center) > 0.0;
	if aspect > 1.8 && minor < 110.0 && moving_away && axis_consistent_intent(frame, delta) {
		(minor * 0.48).max(params.snap * 0.75).max(18.0)
	} else {
		base
	}
}

/// Magnetism bookkeeping (spec §3 `MagnetState`).
#[derive(Debug, Clone, Default)]
pub struct MagnetState {
	current_target: Option<Rect>,
	locked_target: Option<Rect>,
	pending_switch_target: Option<Rect>,
	pending_switch_confidence: u32,
	last_seen_candidate: Option<Rect>,
	last_seen_candidate_ttl: u8,
	lock_strain_counter: u32,
	lock_strain_target: Option<Rect>,
	magnetism_enabled: bool,
}

/// Maximum ticks a [`MagnetState::last_seen_candidate`] is retained without a fresh sighting.
pub const CANDIDATE_TTL: u8 = 6;
/// Consecutive strained ticks that force an unlock (spec §4.7).
pub const STRAIN_LIMIT: u32 = 3;

impl MagnetState {
	/// Creates magnet state with magnetism enabled and no target memory, matching `prime`.
	#[must_use]
	pub fn new(magnetism_enabled: bool) -> Self {
		Self { magnetism_enabled, ..Default::default() }
	}

	/// Current target being resolved against this tick.
	#[must_use]
	pub const fn current_target(&self) -> Option<Rect> {
		self.current_target
	}
	/// Target the virtual position is locked/pinned toward.
	#[must_use]
	pub const fn locked_target(&self) -> Option<Rect> {
		self.locked_target
	}
	/// Invariant: `is_locked() == locked_target().is_some()`.
	#[must_use]
	pub const fn is_locked(&self) -> bool {
		self.locked_target.is_some()
	}
	/// Short-memory candidate from the eligibility filter.
	#[must_use]
	pub const fn last_seen_candidate(&self) -> Option<Rect> {
		self.last_seen_candidate
	}
	/// Remaining ticks before [`Self::last_seen_candidate`] decays, in `[0, 6]`.
	#[must_use]
	pub const fn last_seen_candidate_ttl(&self) -> u8 {
		self.last_seen_candidate_ttl
	}
	/// Consecutive-tick strain counter (spec §4.7).
	#[must_use]
	pub const fn lock_strain_counter(&self) -> u32 {
		self.lock_strain_counter
	}
	/// Whether magnetism is currently enabled.
	#[must_use]
	pub const fn magnetism_enabled(&self) -> bool {
		self.magnetism_enabled
	}

	/// Clears all magnet state, as required whenever magnetism is disabled (spec invariant).
	pub fn clear(&mut self) {
		self.current_target = None;
		self.locked_target = None;
		self.pending_switch_target = None;
		self.pending_switch_confidence = 0;
		self.last_seen_candidate = None;
		self.last_seen_candidate_ttl = 0;
		self.lock_strain_counter = 0;
		self.lock_strain_target = None;
	}

	/// Enables or disables magnetism, clearing all state on disable (spec `setMagnetismEnabled`).
	pub fn set_enabled(&mut self, enabled: bool) {
		self.magnetism_enabled = enabled;
		if !enabled {
			self.clear();
		}
	}

	/// Unlocks without touching candidate memory.
	pub fn unlock(&mut self) {
		self.locked_target = None;
		self.lock_strain_counter = 0;
		self.lock_strain_target = None;
	}

	/// Locks onto `target`.
	pub fn lock(&mut self, target: Rect) {
		self.locked_target = Some(target);
	}

	/// Sets the currently resolving target.
	pub fn set_current_target(&mut self, target: Option<Rect>) {
		self.current_target = target;
	}

	/// Remembers `frame` as the freshest eligibility candidate, resetting its TTL.
	pub fn remember_candidate(&mut self, frame: Rect) {
		self.last_seen_candidate = Some(frame);
		self.last_seen_candidate_ttl = CANDIDATE_TTL;
	}

	/// Decrements the candidate TTL by one tick, clearing the candidate once it reaches zero.
	/// Called whenever a tick's eligibility result is absent (spec §4.6 `updateMagneticTarget`,
	/// `frame = null` branch; spec §7 "absorbed" transient-failure behavior).
	pub fn decay_candidate(&mut self) {
		if self.last_seen_candidate_ttl > 0 {
			self.last_seen_candidate_ttl -= 1;
			if self.last_seen_candidate_ttl == 0 {
				self.last_seen_candidate = None;
			}
		}
	}

	/// Clears the pending-switch debouncer.
	pub fn clear_pending_switch(&mut self) {
		self.pending_switch_target = None;
		self.pending_switch_confidence = 0;
	}

	/// Advances the pending-switch debouncer toward `candidate`, returning the confidence count
	/// reached after this tick (spec §4.6 "3 consecutive matching ticks").
	pub fn advance_pending_switch(&mut self, candidate: Rect) -> u32 {
		match self.pending_switch_target {
			Some(existing) if frames_equivalent(&existing, &candidate) => {
				self.pending_switch_confidence += 1;
			}
			_ => {
				self.pending_switch_target = Some(candidate);
				self.pending_switch_confidence = 1;
			}
		}
		self.pending_switch_confidence
	}

	/// Whether there is a pending target switch in progress.
	#[must_use]
	pub const fn has_pending_switch(&self) -> bool {
		self.pending_switch_target.is_some()
	}

	/// Current lock-strain target, for change detection in [`Self::advance_strain`].
	#[must_use]
	pub const fn lock_strain_target(&self) -> Option<Rect> {
		self.lock_strain_target
	}

	/// Resets the strain counter against a (possibly new) strain target.
	pub fn reset_strain(&mut self, target: Rect) {
		self.lock_strain_target = Some(target);
		self.lock_strain_counter = 0;
	}

	/// Decays the strain counter by one, floored at zero.
	pub fn decay_strain(&mut self) {
		self.lock_strain_counter = self.lock_strain_counter.saturating_sub(1);
	}

	/// Increments the strain counter and reports whether the limit has now been reached.
	pub fn increment_strain(&mut self) -> bool {
		self.lock_strain_counter += 1;
		self.lock_strain_counter >= STRAIN_LIMIT
	}
}
