//! The motion engine: raw/virtual position integration, magnetism resolution, and glide.
//!
//! [`MotionEngine`] is the single owner of cursor state. It is driven exclusively from the tick
//! thread (see [`crate::tick::TickCoordinator`]) — no operation here is re-entrant, and nothing
//! blocks. The public contract (`prime`, `update_desktop_bounds`, `begin_touch`, `handle_touch`,
//! `handle_no_touch`, `update_magnetic_target`, `set_magnetism_enabled`) mirrors the ordering a
//! single tick drives them in: raw integration, then magnetism, then (by the caller) the OS warp.

use crate::config::EngineConfig;
use crate::geom::{Point, Rect, Vec2, frames_equivalent, point_rect_distance, point_segment_distance};
use crate::glide;
use crate::magnetism::{
	MagnetParams, MagnetState, alignment, aspect_and_minor, crossing_capture, derive_params, escape_unlock_distance,
	padded_rect,
};
use crate::strain;

/// Which input stream most recently supplied [`MotionEngine`]'s velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocitySource {
	/// The physical pointer/mouse stream.
	Pointer,
	/// The trackpad velocity smoother.
	Trackpad,
}

/// A read-only snapshot of engine state for observers (tests, the out-of-scope preferences
/// panel) that should not reach into private fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineDiagnostics {
	/// Current virtual cursor position.
	pub position: Point,
	/// Current raw (pre-magnet) cursor position.
	pub pre_magnet_position: Point,
	/// Raw (pre-magnet) cursor position as of the prior tick, for computing raw per-tick travel
	/// distance (spec §4.10's high-velocity-probe gate) without reaching into private fields.
	pub previous_pre_magnet_position: Point,
	/// Whether a glide is in progress.
	pub is_gliding: bool,
	/// Which stream last supplied velocity.
	pub velocity_source: VelocitySource,
	/// Whether the engine is currently locked onto a target.
	pub is_locked: bool,
	/// Consecutive-tick lock-strain counter.
	pub lock_strain_counter: u32,
	/// Remaining ticks before the last-seen candidate decays.
	pub last_seen_candidate_ttl: u8,
	/// The frame currently under consideration for magnetism, if any.
	pub current_target: Option<Rect>,
}

/// Real-time pointer motion and magnetism state machine.
///
/// Holds raw and virtual cursor positions, glide velocity, and [`MagnetState`]. Every tick-path
/// method here is infallible: external failures are caught by the tick coordinator, never by the
/// engine itself.
#[derive(Debug, Clone)]
pub struct MotionEngine {
	config: EngineConfig,
	position: Point,
	previous_position: Point,
	pre_magnet_position: Point,
	previous_pre_magnet_position: Point,
	velocity: Vec2,
	last_input_delta: Vec2,
	is_gliding: bool,
	velocity_source: VelocitySource,
	desktop_bounds: Option<Rect>,
	last_physical_mouse_position: Point,
	magnet: MagnetState,
	/// Set by `handle_touch`/`handle_no_touch` whenever they perform a raw integration this
	/// tick; consumed by `update_magnetic_target`, which runs `apply_magnetism` a second time
	/// once the freshly queried frame has been folded into `currentTarget`.
	raw_fresh_this_frame: bool,
}

impl MotionEngine {
	/// Builds an engine primed at `initial_position`.
	#[must_use]
	pub fn new(config: EngineConfig, initial_position: Point) -> Self {
		let mut engine = Self {
			config,
			position: initial_position,
			previous_position: initial_position,
			pre_magnet_position: initial_position,
			previous_pre_magnet_position: initial_position,
			velocity: Vec2::zeros(),
			last_input_delta: Vec2::zeros(),
			is_gliding: false,
			velocity_source: VelocitySource::Pointer,
			desktop_bounds: None,
			last_physical_mouse_position: initial_position,
			magnet: MagnetState::new(config.magnetism_enabled),
			raw_fresh_this_frame: false,
		};
		engine.prime(initial_position);
		engine
	}

	/// Resets state to start at `p`: virtual and raw both set to `p`, velocity zeroed, not
	/// gliding, all locks and magnet memory cleared.
	pub fn prime(&mut self, p: Point) {
		let clamped = self.clamp_point(p);
		self.position = clamped;
		self.previous_position = clamped;
		self.pre_magnet_position = clamped;
		self.previous_pre_magnet_position = clamped;
		self.last_physical_mouse_position = clamped;
		self.velocity = Vec2::zeros();
		self.last_input_delta = Vec2::zeros();
		self.is_gliding = false;
		self.velocity_source = VelocitySource::Pointer;
		self.magnet = MagnetState::new(self.config.magnetism_enabled);
		self.raw_fresh_this_frame = false;
	}

	/// Stores the desktop bounds (union of display frames) and re-clamps both positions.
	pub fn update_desktop_bounds(&mut self, bounds: Rect) {
		self.desktop_bounds = Some(bounds);
		self.position = self.clamp_point(self.position);
		self.pre_magnet_position = self.clamp_point(self.pre_magnet_position);
	}

	/// Enables or disables magnetism. Disabling clears all magnet state.
	pub fn set_magnetism_enabled(&mut self, enabled: bool) {
		self.magnet.set_enabled(enabled);
	}

	/// Marks the start of a touch: resets velocity and `lastInputDelta`, cancels any glide,
	/// unlocks, and preserves `position`. Also resyncs the physical-mouse reference point to `p`
	/// so the first `handle_touch` delta reflects genuine travel rather than whatever the
	/// physical pointer did while untouched.
	pub fn begin_touch(&mut self, p: Point) {
		self.velocity = Vec2::zeros();
		self.last_input_delta = Vec2::zeros();
		self.is_gliding = false;
		self.magnet.unlock();
		self.last_physical_mouse_position = p;
	}

	/// A read-only snapshot of the fields integration tests and diagnostics care about.
	#[must_use]
	pub fn diagnostics(&self) -> EngineDiagnostics {
		EngineDiagnostics {
			position: self.position,
			pre_magnet_position: self.pre_magnet_position,
			previous_pre_magnet_position: self.previous_pre_magnet_position,
			is_gliding: self.is_gliding,
			velocity_source: self.velocity_source,
			is_locked: self.magnet.is_locked(),
			lock_strain_counter: self.magnet.lock_strain_counter(),
			last_seen_candidate_ttl: self.magnet.last_seen_candidate_ttl(),
			current_target: self.magnet.current_target(),
		}
	}

	/// Current virtual cursor position.
	#[must_use]
	pub const fn position(&self) -> Point {
		self.position
	}

	/// Current instantaneous velocity.
	#[must_use]
	pub const fn velocity(&self) -> Vec2 {
		self.velocity
	}

	/// Whether a glide is currently in progress.
	#[must_use]
	pub const fn is_gliding(&self) -> bool {
		self.is_gliding
	}

	fn clamp_point(&self, p: Point) -> Point {
		match self.desktop_bounds {
			None => p,
			Some(b) => Point::new(p.x.clamp(b.min_x(), b.max_x()), p.y.clamp(b.min_y(), b.max_y())),
		}
	}

	fn derive(&self, frame: &Rect) -> MagnetParams {
		derive_params(frame, self.config.magnetism_radius, self.config.magnetic_strength, self.config.snap_threshold)
	}

	/// Targets considered by raw-step interception and the pre-brake: locked, current, and
	/// last-seen-candidate, deduplicated by frame equivalence.
	fn interception_targets(&self) -> Vec<Rect> {
		let mut targets = Vec::with_capacity(3);
		for candidate in [self.magnet.locked_target(), self.magnet.current_target(), self.magnet.last_seen_candidate()]
			.into_iter()
			.flatten()
		{
			if !targets.iter().any(|t| frames_equivalent(t, &candidate)) {
				targets.push(candidate);
			}
		}
		targets
	}

	/// Integrates a new physical pointer sample, with raw-step interception, pre-brake, and
	/// magnetism. Returns `Some(position)` when an intra-frame OS warp should be emitted this
	/// tick (the raw pointer is close to a tracked target and moving slowly).
	pub fn handle_touch(&mut self, p: Point, dt: f64, trackpad_norm_vel: Option<Vec2>) -> Option<Point> {
		let dt = dt.max(1.0 / 500.0);

		let delta = p - self.last_physical_mouse_position;
		self.last_physical_mouse_position = p;

		let raw_start = self.pre_magnet_position;
		let raw_end = raw_start + delta;

		let targets = self.interception_targets();

		for target in &targets {
			let params = self.derive(target);
			let center = target.center();
			let snap_radius = params.snap * 1.5;
			let padded = padded_rect(target);
			if crossing_capture(raw_start, raw_end, center, &padded, &[snap_radius], None) {
				self.snap_lock(*target);
				self.is_gliding = false;
				self.raw_fresh_this_frame = true;
				return None;
			}
		}

		let mut scaled_delta = delta;
		if self.config.pre_brake {
			if let Some(target) =
				targets.iter().max_by(|a, b| self.derive(a).radius.total_cmp(&self.derive(b).radius))
			{
				let params = self.derive(target);
				let approach = point_segment_distance(target.center(), raw_start, raw_end);
				if approach < 1.6 * params.radius {
					let factor = ((approach / (1.6 * params.radius)).powi(2)).clamp(0.15, 1.0);
					scaled_delta = delta * factor;
				}
			}
		}

		self.previous_position = self.position;
		self.position = self.position + scaled_delta;

		let pointer_velocity = scaled_delta / dt.max(1e-4);
		let mut chosen = pointer_velocity;
		self.velocity_source = VelocitySource::Pointer;
		if let Some(norm_vel) = trackpad_norm_vel {
			let trackpad_pixel_velocity = norm_vel * self.config.trackpad_velocity_gain;
			if trackpad_pixel_velocity.norm() > pointer_velocity.norm() {
				chosen = crate::geom::clamped_velocity(trackpad_pixel_velocity, self.config.max_momentum_speed);
				self.velocity_source = VelocitySource::Trackpad;
			}
		}

		self.velocity = chosen;
		self.last_input_delta = scaled_delta;
		self.previous_pre_magnet_position = self.pre_magnet_position;
		self.pre_magnet_position = self.clamp_point(self.position);

		self.raw_fresh_this_frame = true;
		self.apply_magnetism();

		self.position = self.clamp_point(self.position);

		let warp = self.magnet.current_target().or_else(|| self.magnet.locked_target()).and_then(|target| {
			let params = self.derive(&target);
			let raw_distance = (self.pre_magnet_position - target.center()).norm();
			(raw_distance <= params.radius * 1.15 && self.velocity.norm() < 1500.0).then_some(self.position)
		});

		self.is_gliding = false;
		warp
	}

	/// Advances a glide step, or begins/cancels one at the touch-ended edge. Returns
	/// `Some(position)` whenever a warp should be emitted this tick.
	pub fn handle_no_touch(&mut self, p: Point, dt: f64, suppress_glide: bool, touch_just_ended: bool) -> Option<Point> {
		let dt = dt.max(1.0 / 500.0);
		self.last_physical_mouse_position = p;

		if touch_just_ended {
			if suppress_glide {
				self.is_gliding = false;
				self.velocity = Vec2::zeros();
			} else {
				self.begin_glide_if_needed();
			}
		}

		if !self.is_gliding {
			return None;
		}

		self.velocity = glide::decay(self.velocity, dt, &self.config);
		self.previous_position = self.position;
		self.position = self.position + self.velocity * dt;
		self.last_input_delta = self.velocity * dt;
		self.previous_pre_magnet_position = self.pre_magnet_position;
		self.pre_magnet_position = self.position;

		self.raw_fresh_this_frame = true;
		self.apply_magnetism();

		self.position = self.clamp_point(self.position);
		self.pre_magnet_position = self.clamp_point(self.pre_magnet_position);

		if glide::should_stop(self.velocity, &self.config) {
			self.is_gliding = false;
			self.velocity = Vec2::zeros();
		}

		Some(self.position)
	}

	fn begin_glide_if_needed(&mut self) {
		if glide::should_begin(self.velocity, &self.config) {
			self.is_gliding = true;
		} else {
			self.is_gliding = false;
			self.velocity = Vec2::zeros();
		}
	}

	/// Folds a freshly queried eligibility frame (or its absence) into the magnet state, and, if
	/// this tick already performed a raw integration, re-runs magnetism against the update.
	pub fn update_magnetic_target(&mut self, frame: Option<Rect>) {
		if !self.magnet.magnetism_enabled() {
			self.magnet.clear();
			return;
		}
		let Some(frame) = frame else {
			self.magnet.set_current_target(None);
			self.magnet.clear_pending_switch();
			self.magnet.decay_candidate();
			return;
		};

		self.magnet.remember_candidate(frame);

		if let Some(locked) = self.magnet.locked_target() {
			if frames_equivalent(&locked, &frame) {
				self.magnet.lock(frame);
				self.magnet.set_current_target(Some(frame));
				self.magnet.clear_pending_switch();
			} else {
				let overlap_ratio = locked.overlap_area(&frame) / locked.area().min(frame.area()).max(1.0);
				let near_locked = point_rect_distance(self.pre_magnet_position, &locked) <= 6.0;
				if overlap_ratio >= 0.65 && near_locked {
					self.magnet.set_current_target(Some(locked));
				} else if frame.padded(8.0, 8.0).contains(self.pre_magnet_position) {
					self.magnet.unlock();
					self.magnet.clear_pending_switch();
					self.magnet.set_current_target(Some(frame));
				} else {
					self.resolve_lock_switch(locked, frame);
				}
			}
		} else {
			self.magnet.clear_pending_switch();
			self.magnet.set_current_target(Some(frame));
		}

		if self.raw_fresh_this_frame {
			self.apply_magnetism();
			self.raw_fresh_this_frame = false;
		}
	}

	fn resolve_lock_switch(&mut self, locked: Rect, frame: Rect) {
		let locked_params = self.derive(&locked);
		let (_, minor) = aspect_and_minor(&locked);
		let exit_threshold = (locked_params.snap * 1.1).max(minor * 0.75);
		let preliminary = (minor * 0.95).max(locked_params.snap * 1.5);
		let base = self.config.target_switch_min_distance;
		let switch_threshold = base.min(preliminary.max(minor).max(base * 0.35));

		let raw_to_locked = (self.pre_magnet_position - locked.center()).norm();

		if raw_to_locked > switch_threshold {
			self.magnet.unlock();
			self.magnet.clear_pending_switch();
			self.magnet.set_current_target(Some(frame));
			return;
		}

		if raw_to_locked > exit_threshold {
			let raw_to_new = (self.pre_magnet_position - frame.center()).norm();
			let alignment_to_new = alignment(self.velocity, self.last_input_delta, self.pre_magnet_position, frame.center());
			let aligned_enough = alignment_to_new.is_some_and(|a| a > 0.35);
			let intent_sufficient = self.velocity.norm() > 60.0 || self.last_input_delta.norm() > 2.0;
			if raw_to_new < raw_to_locked && aligned_enough && intent_sufficient {
				if self.magnet.advance_pending_switch(frame) >= 3 {
					self.magnet.unlock();
					self.magnet.clear_pending_switch();
					self.magnet.set_current_target(Some(frame));
				} else {
					self.magnet.set_current_target(Some(locked));
				}
				return;
			}
		}

		self.magnet.clear_pending_switch();
		self.magnet.set_current_target(Some(locked));
	}

	fn snap_lock(&mut self, target: Rect) {
		self.position = self.clamp_point(target.center());
		self.velocity = Vec2::zeros();
		self.magnet.lock(target);
		self.magnet.set_current_target(Some(target));
	}

	fn proximity_brake(&self, target: Rect, params: &MagnetParams, point: Point, segment: (Point, Point)) -> f64 {
		let center = target.center();
		let point_center = (point - center).norm();
		let point_rect = point_rect_distance(point, &target);
		let center_segment = point_segment_distance(center, segment.0, segment.1);
		let min_dist = point_center.min(point_rect).min(center_segment);
		if min_dist >= params.radius * 1.6 {
			return 0.0;
		}
		let proximity = (1.0 - min_dist / (params.radius * 1.6)).clamp(0.0, 1.0);
		let speed_factor = ((self.velocity.norm() - 38.0) / 210.0).clamp(0.0, 1.0);
		proximity.max(0.24) * speed_factor
	}

	/// The ordered magnetism resolution algorithm. Later steps observe updates from earlier ones.
	#[allow(clippy::too_many_lines)]
	fn apply_magnetism(&mut self) {
		// 1. Raw escape from an existing lock.
		if let Some(locked) = self.magnet.locked_target() {
			let params = self.derive(&locked);
			let center = locked.center();
			let pointer_from_center = self.pre_magnet_position - center;
			let escape_distance = pointer_from_center.norm();
			let unlock_distance = escape_unlock_distance(&locked, &params, self.last_input_delta, pointer_from_center);
			if escape_distance > unlock_distance {
				self.magnet.unlock();
				if let Some(candidate) = self.magnet.last_seen_candidate() {
					self.magnet.set_current_target(Some(candidate));
				}
			}
		}

		// 2. Lock-strain accounting.
		if let Some(locked) = self.magnet.locked_target() {
			let params = self.derive(&locked);
			let forced = strain::evaluate(&mut self.magnet, locked, &params, self.last_input_delta, self.pre_magnet_position);
			if forced {
				self.magnet.unlock();
				if let Some(candidate) = self.magnet.last_seen_candidate() {
					self.magnet.set_current_target(Some(candidate));
				}
			}
		}

		// 3. Candidate adoption and immediate crossing capture.
		if let Some(candidate) = self.magnet.last_seen_candidate() {
			let desktop_area = self.desktop_bounds.map_or(f64::MAX, |b| b.area());
			if candidate.area() <= 0.35 * desktop_area {
				let params = self.derive(&candidate);
				let center = candidate.center();
				let raw_end = self.pre_magnet_position;
				let center_dist = (raw_end - center).norm();
				let rect_dist = point_rect_distance(raw_end, &candidate);
				if center_dist <= params.radius * 1.9 + 12.0 || rect_dist <= params.snap * 1.8 {
					let candidate_best = center_dist.min(rect_dist);
					let replace = match self.magnet.current_target() {
						None => true,
						Some(current) if frames_equivalent(&current, &candidate) => false,
						Some(current) => {
							let current_best = (raw_end - current.center()).norm().min(point_rect_distance(raw_end, &current));
							current_best - candidate_best >= 12.0
						}
					};
					if replace {
						self.magnet.set_current_target(Some(candidate));
					}

					let start = self.previous_pre_magnet_position;
					let end = self.pre_magnet_position;
					let padded = padded_rect(&candidate);
					if crossing_capture(start, end, center, &padded, &[params.snap * 1.5], Some(params.radius)) {
						self.snap_lock(candidate);
						return;
					}
				}
			}
		}

		// 4. Candidate pre-brake, when there is no current target yet.
		if self.magnet.current_target().is_none() {
			if let Some(candidate) = self.magnet.last_seen_candidate() {
				if self.velocity.norm() > 70.0 {
					let params = self.derive(&candidate);
					let brake = self.proximity_brake(
						candidate,
						&params,
						self.pre_magnet_position,
						(self.previous_pre_magnet_position, self.pre_magnet_position),
					);
					if brake > 0.0 {
						let factor = (1.0 - 0.96 * brake).max(0.03);
						self.velocity *= factor;
						self.last_input_delta *= factor;
					}
				}
			}
		}

		// 5. Nothing further to resolve against without a current target.
		let Some(current_target) = self.magnet.current_target() else {
			return;
		};

		// 6. Current target resolution.
		let params = self.derive(&current_target);
		let center = current_target.center();
		let padded = padded_rect(&current_target);
		let mut distance = (self.position - center).norm();
		let mut rect_distance = point_rect_distance(self.position, &current_target);
		let raw_distance = (self.pre_magnet_position - center).norm();
		let raw_rect_distance = point_rect_distance(self.pre_magnet_position, &current_target);
		let entered =
			padded.contains(self.position) || distance <= params.radius || raw_distance <= params.radius || rect_distance <= params.radius;

		// 7. Raw-crossing capture against the current target.
		{
			let start = self.previous_pre_magnet_position;
			let end = self.pre_magnet_position;
			let radii = [params.snap, params.radius, params.snap * 1.25];
			if crossing_capture(start, end, center, &padded, &radii, Some(params.radius)) {
				self.snap_lock(current_target);
				return;
			}
		}

		// 8. Refresh the lock if one is held.
		if self.magnet.is_locked() {
			self.magnet.lock(current_target);
		}

		// 9. First entry while unlocked.
		if !self.magnet.is_locked() && entered {
			self.snap_lock(current_target);
			return;
		}

		// 10. Snap band around the center.
		if raw_distance <= params.snap * 1.25 || raw_rect_distance <= (params.snap * 1.25).max(10.0) {
			self.snap_lock(current_target);
			return;
		}

		// 11. Soft approach assist.
		let assist_outer = (params.radius * 1.6).max(params.snap + 22.0);
		if !entered && !self.magnet.is_locked() && !self.is_gliding && !self.magnet.has_pending_switch() && distance > params.radius && distance <= assist_outer {
			let align_for_assist = alignment(self.velocity, self.last_input_delta, self.position, center).unwrap_or(0.3);
			if align_for_assist > -0.5 {
				let range = (assist_outer - params.radius).max(f64::EPSILON);
				let t = ((assist_outer - distance) / range).clamp(0.0, 1.0);
				let shaped = t.powf(1.25);
				let ease_speed = (1.0 - self.velocity.norm() / 165.0).clamp(0.0, 1.0);
				let ease_delta = (1.0 - self.last_input_delta.norm() / 3.2).clamp(0.0, 1.0);
				let intensity = shaped * ease_speed * ease_delta * SOFT_ASSIST_GAIN;
				if intensity > 0.0 {
					self.position = self.position + (center - self.position) * intensity;
					distance = (self.position - center).norm();
					rect_distance = point_rect_distance(self.position, &current_target);
				}
			}
		}

		// 12. High-speed brake, escalating to a partial snap assist.
		if self.velocity.norm() > 70.0 {
			let brake = self.proximity_brake(current_target, &params, self.position, (self.previous_position, self.position));
			if brake > 0.0 {
				let factor = (1.0 - 0.96 * brake).max(0.03);
				self.velocity *= factor;
				self.last_input_delta *= factor;
				if brake > 0.32 {
					let weight = (0.38 + brake * 0.5).min(1.0);
					self.position = self.position + (center - self.position) * weight;
					distance = (self.position - center).norm();
					rect_distance = point_rect_distance(self.position, &current_target);
				}
			}
		}

		// 13. Outside-gate early exit.
		let raw_inside = padded.contains(self.pre_magnet_position) || raw_distance <= params.radius;
		let virtual_inside = padded.contains(self.position) || rect_distance <= params.radius;
		if !raw_inside && !virtual_inside {
			self.magnet.unlock();
			return;
		}

		// 14. Ensure the lock is held.
		self.magnet.lock(current_target);

		// 15. Glide-near snap.
		if self.is_gliding && distance.min(rect_distance) < params.radius && self.velocity.norm() > 35.0 {
			self.snap_lock(current_target);
			return;
		}

		// 16. Near-center snap.
		if distance < params.snap {
			self.snap_lock(current_target);
			return;
		}

		// 17. Outer-zone attractive pull with alignment gating.
		let Some(a) = alignment(self.velocity, self.last_input_delta, self.position, center) else {
			return;
		};
		let slow_intent = self.velocity.norm() < 30.0 && self.last_input_delta.norm() < 1.35;
		let escape_scale = if a <= -0.55 {
			self.magnet.unlock();
			return;
		} else if a <= 0.0 && slow_intent && a > -0.4 {
			(0.08 * (1.0 + a / 0.4)).max(0.0)
		} else if a <= 0.0 {
			0.0
		} else if a < 0.2 {
			(a / 0.2).powi(2) * if slow_intent { 0.22 } else { 0.12 }
		} else {
			let base = if slow_intent { 0.25 } else { 0.15 };
			(base + ((a - 0.2) / 0.8) * (1.0 - base)).min(1.0)
		};

		if escape_scale > 0.0 {
			let base_proximity = (1.0 - distance / params.radius).max(0.0);
			let shaped = base_proximity.powf(1.18);
			let pull = params.strength * (0.18 + shaped * 0.92);
			let speed_mult = (1.0 + (self.velocity.norm() / self.config.max_momentum_speed) * 0.72 + base_proximity * 0.6).min(1.9);
			let adjusted = pull * speed_mult * escape_scale;
			self.position = self.position + (center - self.position) * adjusted;
			self.velocity *= (1.0 - pull * 1.05 * escape_scale).max(0.08);
		}
	}
}

/// Gain on the soft-approach-assist pull (step 11): kept well under 1.0 so the effect reads as a
/// gentle bias rather than a second snap, the distinction the assist step exists to draw.
const SOFT_ASSIST_GAIN: f64 = 0.22;
