//! High-velocity probe: re-queries the accessibility tree mid-flick so fast flicks across large
//! distances still pick up a magnetism candidate, compensating for the single-sample-per-tick
//! eligibility query being too coarse to catch brief overlaps at high speed.

use std::time::Instant;

use crate::eligibility::EligibilityFilter;
use crate::geom::{frames_equivalent, Point, Rect};
use crate::interfaces::{AccessibilityInspector, OverlayDetector};

/// Minimum samples taken along a fast raw step.
const MIN_SAMPLES: usize = 3;
/// Maximum samples taken along a fast raw step.
const MAX_SAMPLES: usize = 8;
/// Target spacing, in px, between samples.
const SAMPLE_SPACING: f64 = 35.0;

/// Re-samples the accessibility tree along a raw travel segment when the step is long enough
/// that a single end-of-tick query could miss a target the pointer passed over.
pub struct HighVelocityProbe<'a> {
	inspector: &'a dyn AccessibilityInspector,
	overlay: &'a dyn OverlayDetector,
}

impl<'a> HighVelocityProbe<'a> {
	/// Builds a probe against the given accessibility and overlay collaborators.
	#[must_use]
	pub const fn new(inspector: &'a dyn AccessibilityInspector, overlay: &'a dyn OverlayDetector) -> Self {
		Self { inspector, overlay }
	}

	/// Number of intermediate samples to take for a raw step of `distance` pixels: roughly one
	/// every 35px, clamped to `[3, 8]`.
	#[must_use]
	pub fn sample_count(distance: f64) -> usize {
		if distance <= 0.0 {
			return MIN_SAMPLES;
		}
		let raw = (distance / SAMPLE_SPACING).ceil() as usize;
		raw.clamp(MIN_SAMPLES, MAX_SAMPLES)
	}

	/// Samples evenly along `[start, end]`, skipping any point sitting under a foreign overlay
	/// window or a frame roughly equal to `current_target` or a file-picker panel, and returns
	/// the first sample that `eligibility` itself accepts as a candidate (spec §4.10: "run
	/// eligibility; return the first candidate found"), preferring earlier samples (closer to
	/// `start`) when several qualify.
	#[must_use]
	pub fn probe(
		&self,
		start: Point,
		end: Point,
		distance: f64,
		current_target: Option<Rect>,
		eligibility: &mut EligibilityFilter,
		now: Instant,
	) -> Option<Rect> {
		let n = Self::sample_count(distance);
		for i in 1..n {
			let t = i as f64 / n as f64;
			let p = Point::new(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t);
			if self.overlay.is_known_overlay_topmost(p) {
				continue;
			}
			let Some(info) = self.inspector.element_info_at(p) else {
				continue;
			};
			if info.is_file_picker_panel {
				continue;
			}
			if current_target.is_some_and(|target| frames_equivalent(&info.frame, &target)) {
				continue;
			}
			if let Some(frame) = eligibility.evaluate(p, Some(&info), now) {
				return Some(frame);
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_count_respects_lower_bound() {
		assert_eq!(HighVelocityProbe::sample_count(0.0), 3);
		assert_eq!(HighVelocityProbe::sample_count(10.0), 3);
		assert_eq!(HighVelocityProbe::sample_count(35.0), 3);
	}

	#[test]
	fn sample_count_scales_with_distance() {
		assert_eq!(HighVelocityProbe::sample_count(70.0), 3);
		assert_eq!(HighVelocityProbe::sample_count(71.0), 3);
		assert_eq!(HighVelocityProbe::sample_count(105.0), 3);
		assert_eq!(HighVelocityProbe::sample_count(106.0), 4);
	}

	#[test]
	fn sample_count_respects_upper_bound() {
		assert_eq!(HighVelocityProbe::sample_count(10_000.0), 8);
	}

	struct StubInspector {
		hit_at: Option<Point>,
	}
	impl AccessibilityInspector for StubInspector {
		fn element_info_at(&self, point: Point) -> Option<crate::eligibility::ElementInfo> {
			let target = self.hit_at?;
			((point.x - target.x).abs() < 1.0 && (point.y - target.y).abs() < 1.0).then(|| crate::eligibility::ElementInfo {
				frame: crate::geom::Rect::new(target.x - 5.0, target.y - 5.0, 10.0, 10.0),
				role: Some(crate::eligibility::Role::Button),
				actions: [crate::eligibility::Action::Press].into_iter().collect(),
				url: None,
				app: crate::eligibility::KnownApp::Other,
				is_file_picker_panel: false,
			})
		}
	}
	struct NoOverlay;
	impl OverlayDetector for NoOverlay {
		fn is_known_overlay_topmost(&self, _point: Point) -> bool {
			false
		}
	}
	struct AlwaysOverlay;
	impl OverlayDetector for AlwaysOverlay {
		fn is_known_overlay_topmost(&self, _point: Point) -> bool {
			true
		}
	}

	// n = sample_count(100.0) = 3, so the interior samples land at x = 33.33 and x = 66.67.
	#[test]
	fn probe_finds_element_along_the_path() {
		let inspector = StubInspector { hit_at: Some(Point::new(33.0, 0.0)) };
		let overlay = NoOverlay;
		let probe = HighVelocityProbe::new(&inspector, &overlay);
		let mut eligibility = EligibilityFilter::new();
		let found = probe.probe(
			Point::new(0.0, 0.0),
			Point::new(100.0, 0.0),
			100.0,
			None,
			&mut eligibility,
			Instant::now(),
		);
		assert!(found.is_some());
	}

	#[test]
	fn probe_skips_points_under_a_foreign_overlay() {
		let inspector = StubInspector { hit_at: Some(Point::new(33.0, 0.0)) };
		let overlay = AlwaysOverlay;
		let probe = HighVelocityProbe::new(&inspector, &overlay);
		let mut eligibility = EligibilityFilter::new();
		let found = probe.probe(
			Point::new(0.0, 0.0),
			Point::new(100.0, 0.0),
			100.0,
			None,
			&mut eligibility,
			Instant::now(),
		);
		assert!(found.is_none());
	}

	#[test]
	fn probe_skips_a_frame_equivalent_to_the_current_target() {
		let inspector = StubInspector { hit_at: Some(Point::new(33.0, 0.0)) };
		let overlay = NoOverlay;
		let probe = HighVelocityProbe::new(&inspector, &overlay);
		let mut eligibility = EligibilityFilter::new();
		let current_target = crate::geom::Rect::new(28.0, -5.0, 10.0, 10.0);
		let found = probe.probe(
			Point::new(0.0, 0.0),
			Point::new(100.0, 0.0),
			100.0,
			Some(current_target),
			&mut eligibility,
			Instant::now(),
		);
		assert!(found.is_none());
	}

	#[test]
	fn probe_skips_a_non_qualifying_hit_and_continues_scanning() {
		// An oversized, role-less hit at the first sample must not stop the scan: eligibility
		// rejects it, and a later qualifying sample should still be found.
		// n = sample_count(100.0) = 3, so the two interior samples land at x = 33.33 and x = 66.67.
		struct TwoStopInspector;
		impl AccessibilityInspector for TwoStopInspector {
			fn element_info_at(&self, point: Point) -> Option<crate::eligibility::ElementInfo> {
				if (point.x - 33.33).abs() < 1.0 {
					Some(crate::eligibility::ElementInfo {
						frame: crate::geom::Rect::new(0.0, 0.0, 2000.0, 2000.0),
						role: None,
						actions: Default::default(),
						url: None,
						app: crate::eligibility::KnownApp::Other,
						is_file_picker_panel: false,
					})
				} else if (point.x - 66.67).abs() < 1.0 {
					Some(crate::eligibility::ElementInfo {
						frame: crate::geom::Rect::new(61.67, -5.0, 10.0, 10.0),
						role: Some(crate::eligibility::Role::Button),
						actions: [crate::eligibility::Action::Press].into_iter().collect(),
						url: None,
						app: crate::eligibility::KnownApp::Other,
						is_file_picker_panel: false,
					})
				} else {
					None
				}
			}
		}
		let inspector = TwoStopInspector;
		let overlay = NoOverlay;
		let probe = HighVelocityProbe::new(&inspector, &overlay);
		let mut eligibility = EligibilityFilter::new();
		let found = probe.probe(
			Point::new(0.0, 0.0),
			Point::new(100.0, 0.0),
			100.0,
			None,
			&mut eligibility,
			Instant::now(),
		);
		assert!(found.is_some());
	}

	struct FilePickerInspector;
	impl AccessibilityInspector for FilePickerInspector {
		fn element_info_at(&self, _point: Point) -> Option<crate::eligibility::ElementInfo> {
			Some(crate::eligibility::ElementInfo {
				frame: crate::geom::Rect::new(0.0, 0.0, 200.0, 200.0),
				role: None,
				actions: Default::default(),
				url: None,
				app: crate::eligibility::KnownApp::Other,
				is_file_picker_panel: true,
			})
		}
	}

	#[test]
	fn probe_skips_a_file_picker_panel() {
		let inspector = FilePickerInspector;
		let overlay = NoOverlay;
		let probe = HighVelocityProbe::new(&inspector, &overlay);
		let mut eligibility = EligibilityFilter::new();
		let found = probe.probe(
			Point::new(0.0, 0.0),
			Point::new(100.0, 0.0),
			100.0,
			None,
			&mut eligibility,
			Instant::now(),
		);
		assert!(found.is_none());
	}
}
