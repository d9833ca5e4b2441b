//! Lock-strain detector (spec §4.7).
//!
//! Escapes sticky locks on elongated narrow elements — a thin scrollbar thumb, a sidebar
//! divider — that the main raw-escape logic in [`crate::magnetism`] step 1 would otherwise hold
//! onto indefinitely because the user's raw pointer never travels far enough from center along
//! the frame's long axis to trip the ordinary unlock distance.

use crate::geom::{Point, Rect, Vec2, frames_equivalent};
use crate::magnetism::{MagnetParams, MagnetState, aspect_and_minor, axis_consistent_intent};

/// Evaluates one tick of strain accounting against `locked_target`/`locked_params`, mutating
/// `state`'s strain counter, and returns `true` exactly when the strain limit was reached this
/// tick (the caller must force an unlock and, if a candidate exists, adopt it).
pub fn evaluate(
	state: &mut MagnetState,
	locked_target: Rect,
	locked_params: &MagnetParams,
	raw_delta: Vec2,
	raw_position: Point,
) -> bool {
	if state.lock_strain_target().is_none_or(|t| !frames_equivalent(&t, &locked_target)) {
		state.reset_strain(locked_target);
	}

	let step_len = raw_delta.norm();
	if step_len < 2.2 {
		state.decay_strain();
		return false;
	}

	let center = locked_target.center();
	let pointer_from_center = raw_position - center;
	if raw_delta.dot(&pointer_from_center) <= 0.0 {
		state.decay_strain();
		return false;
	}

	let (aspect, minor) = aspect_and_minor(&locked_target);
	if aspect <= 1.8 || minor >= 110.0 {
		state.decay_strain();
		return false;
	}

	if !axis_consistent_intent(&locked_target, raw_delta) {
		state.decay_strain();
		return false;
	}

	let distance = pointer_from_center.norm();
	let floor = (minor * 0.38).max(locked_params.snap * 0.6).max(16.0);
	if distance < floor {
		state.decay_strain();
		return false;
	}

	state.increment_strain()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::magnetism::derive_params;

	#[test]
	fn forces_unlock_after_three_strained_ticks() {
		let mut state = MagnetState::new(true);
		let target = Rect::new(100.0, 200.0, 20.0, 80.0);
		let params = derive_params(&target, 80.0, 0.65, 30.0);
		state.lock(target);

		// Raw position walks away along the short (x) axis of this tall narrow bar.
		let mut raw_x = target.mid_x();
		let mut forced = false;
		for _ in 0..3 {
			raw_x += 3.0;
			let raw = Point::new(raw_x, target.mid_y());
			forced = evaluate(&mut state, target, &params, Vec2::new(3.0, 0.0), raw);
		}
		assert!(forced, "expected strain limit to be reached after 3 consecutive strained ticks");
	}

	#[test]
	fn does_not_strain_when_minor_axis_is_wide() {
		let mut state = MagnetState::new(true);
		// aspect 4 but minor = 120 >= 110, so the cap should never apply.
		let target = Rect::new(0.0, 0.0, 480.0, 120.0);
		let params = derive_params(&target, 80.0, 0.65, 30.0);
		state.lock(target);
		let raw = Point::new(target.mid_x(), target.mid_y() + 50.0);
		let forced = evaluate(&mut state, target, &params, Vec2::new(0.0, 10.0), raw);
		assert!(!forced);
		assert_eq!(state.lock_strain_counter(), 0);
	}

	#[test]
	fn small_steps_do_not_accumulate_strain() {
		let mut state = MagnetState::new(true);
		let target = Rect::new(100.0, 200.0, 20.0, 80.0);
		let params = derive_params(&target, 80.0, 0.65, 30.0);
		state.lock(target);
		let raw = Point::new(target.mid_x() + 20.0, target.mid_y());
		evaluate(&mut state, target, &params, Vec2::new(1.0, 0.0), raw);
		assert_eq!(state.lock_strain_counter(), 0);
	}
}
