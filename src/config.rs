//! Engine configuration: the enumerated, defaulted tunables for glide, magnetism, and locking.
//!
//! Cloned into the engine once at construction (see [`crate::MotionEngine::new`]); live
//! reconfiguration is not required — a singleton settings object mutated from elsewhere would
//! reintroduce shared-mutable-state across the tick boundary.

/// Tunable constants governing glide, magnetism, and lock behavior.
///
/// `pre_brake` is exposed as a knob for callers that do not want pointer-scale deformation near a
/// target: it disables the raw-delta pre-brake scaling in [`crate::MotionEngine::handle_touch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
	/// Exponential friction coefficient applied to glide velocity, per second. Default `6.5`.
	pub glide_decay_per_second: f64,
	/// Minimum speed, in px/s, required to begin a glide. Default `220.0`.
	pub minimum_glide_velocity: f64,
	/// Glide stops once speed drops below `minimum_glide_velocity * glide_stop_speed_multiplier`.
	/// Default `0.45`.
	pub glide_stop_speed_multiplier: f64,
	/// Gain applied to trackpad-sourced normalized velocity when converting to pixels/s.
	/// Default `0.95`.
	pub trackpad_velocity_gain: f64,
	/// Hard ceiling on any velocity the engine will adopt, in px/s. Default `9000.0`.
	pub max_momentum_speed: f64,
	/// Base magnetism attraction radius, in px, before per-target normalization. Default `80.0`.
	pub magnetism_radius: f64,
	/// Base magnetism pull strength in `[0, 1]`-ish units before per-target normalization.
	/// Default `0.65`.
	pub magnetic_strength: f64,
	/// Base snap-to-center distance, in px, before per-target normalization. Default `30.0`.
	pub snap_threshold: f64,
	/// Base lock distance used in the pending-switch threshold derivation. Default `50.0`.
	pub target_lock_distance: f64,
	/// Base hard unlock distance used in the pending-switch threshold derivation.
	/// Default `120.0`.
	pub target_switch_min_distance: f64,
	/// Master switch for all magnetism behavior. Default `true`.
	pub magnetism_enabled: bool,
	/// Whether the raw-delta pre-brake scaling (handle_touch step 4) is applied. Default `true`.
	///
	/// Disabling this means pointer travel is never visibly shortened while approaching a
	/// target; magnetism can still snap and pull, it just no longer pre-dampens the raw input.
	pub pre_brake: bool,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			glide_decay_per_second: 6.5,
			minimum_glide_velocity: 220.0,
			glide_stop_speed_multiplier: 0.45,
			trackpad_velocity_gain: 0.95,
			max_momentum_speed: 9000.0,
			magnetism_radius: 80.0,
			magnetic_strength: 0.65,
			snap_threshold: 30.0,
			target_lock_distance: 50.0,
			target_switch_min_distance: 120.0,
			magnetism_enabled: true,
			pre_brake: true,
		}
	}
}

impl EngineConfig {
	/// Minimum speed, in px/s, below which a glide in progress is stopped.
	#[must_use]
	pub fn glide_stop_speed(&self) -> f64 {
		self.minimum_glide_velocity * self.glide_stop_speed_multiplier
	}
}
