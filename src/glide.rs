//! Glide decay controller.
//!
//! Pure functions over a velocity value — no state of its own. [`crate::engine::MotionEngine`]
//! owns the actual `velocity`/`is_gliding` fields and calls these at the right points in
//! `handle_no_touch`; keeping the decay law here, independent of engine plumbing, makes "monotone
//! decay while gliding" a fact you can check against a bare `Vec2` instead of standing up a whole
//! engine.

use crate::config::EngineConfig;
use crate::geom::Vec2;

/// Whether a glide should begin, given the velocity at the moment touch ended.
#[must_use]
pub fn should_begin(velocity: Vec2, config: &EngineConfig) -> bool {
	velocity.norm() >= config.minimum_glide_velocity
}

/// Applies one tick of exponential friction to `velocity`. Never reverses direction: the decay
/// factor is floored at zero.
#[must_use]
pub fn decay(velocity: Vec2, dt: f64, config: &EngineConfig) -> Vec2 {
	let factor = (1.0 - config.glide_decay_per_second * dt).max(0.0);
	velocity * factor
}

/// Whether a glide in progress should stop this tick, given its current (post-decay) velocity.
#[must_use]
pub fn should_stop(velocity: Vec2, config: &EngineConfig) -> bool {
	velocity.norm() < config.glide_stop_speed()
}
