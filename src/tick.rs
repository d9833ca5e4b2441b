//! Tick coordinator: the 500 Hz real-time loop that drives [`crate::engine::MotionEngine`] from
//! its external collaborators.
//!
//! Everything here is single-threaded by design — one thread owns the engine, the eligibility
//! filter, and every collaborator handle, and nothing it calls is allowed to block. The trackpad
//! driver's own consumer task feeds [`crate::smoother::TrackpadSmoother`] from a separate thread;
//! the only thing that crosses back is its `Copy` snapshot and, on a touch-state edge, a message
//! over a [`crossbeam_channel`] from that task into this one.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError};
use tracing::{debug, error, warn};

use crate::config::EngineConfig;
use crate::eligibility::EligibilityFilter;
use crate::engine::MotionEngine;
use crate::error::EngineError;
use crate::geom::{Point, Rect};
use crate::interfaces::{AccessibilityInspector, CursorVisibility, CursorWarp, DisplayEnumerator, OverlayDetector, OverlayOwner, PointerSource};
use crate::probe::HighVelocityProbe;
use crate::smoother::TrackpadSmoother;

/// Tick period at 500 Hz.
pub const TICK_PERIOD: Duration = Duration::from_millis(2);

/// A touch-state-change edge delivered from the trackpad consumer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEdge {
	/// A touch began.
	Began,
	/// The last touch ended.
	Ended,
}

/// Scoped RAII guard that owns the OS cursor's visibility handle while it is hidden, and
/// unconditionally shows it again on drop — including on an early return or an unwind mid-tick
/// (spec §5 "scoped acquisition of the 'OS cursor hidden' resource with guaranteed release").
pub struct CursorVisibilityGuard<C: CursorVisibility> {
	cursor: Option<C>,
}

impl<C: CursorVisibility> CursorVisibilityGuard<C> {
	/// Hides the cursor and returns a guard that will show it again on drop or [`Self::into_inner`].
	pub fn new(mut cursor: C) -> Self {
		cursor.hide_cursor();
		Self { cursor: Some(cursor) }
	}

	/// Shows the cursor again and hands the collaborator back, without waiting for `Drop`.
	///
	/// # Panics
	///
	/// Never, in practice: `cursor` is only `None` after this method or `Drop` has already run,
	/// and nothing else can observe a guard in that state.
	pub fn into_inner(mut self) -> C {
		let mut cursor = self.cursor.take().expect("guard's cursor taken twice");
		cursor.show_cursor();
		cursor
	}
}

impl<C: CursorVisibility> Drop for CursorVisibilityGuard<C> {
	fn drop(&mut self) {
		if let Some(mut cursor) = self.cursor.take() {
			cursor.show_cursor();
		}
	}
}

/// Which of the two presentation modes (spec §4.9 step 7) currently owns the OS cursor's
/// visibility: [`Self::Overlay`] keeps it hidden behind a [`CursorVisibilityGuard`] while this
/// process draws its own cursor artwork; [`Self::Hardware`] shows the real OS cursor and yields
/// control back to it.
enum CursorState<C: CursorVisibility> {
	Overlay(CursorVisibilityGuard<C>),
	Hardware(C),
}

impl<C: CursorVisibility> CursorState<C> {
	/// Consumes `self` and returns the hardware-cursor variant, showing the cursor if it was
	/// previously hidden. A no-op (by value) when already in hardware mode.
	fn into_hardware(self) -> Self {
		match self {
			Self::Overlay(guard) => Self::Hardware(guard.into_inner()),
			hardware @ Self::Hardware(_) => hardware,
		}
	}

	/// Consumes `self` and returns the overlay variant, hiding the cursor if it was previously
	/// shown. A no-op (by value) when already in overlay mode.
	fn into_overlay(self) -> Self {
		match self {
			Self::Hardware(cursor) => Self::Overlay(CursorVisibilityGuard::new(cursor)),
			overlay @ Self::Overlay(_) => overlay,
		}
	}
}

/// The real-time tick coordinator. Generic over its external collaborators so tests can supply
/// fakes without any of this crate's logic depending on a concrete windowing/accessibility stack.
pub struct TickCoordinator<P, W, D, A, O, G, V>
where
	P: PointerSource,
	W: CursorWarp,
	D: DisplayEnumerator,
	A: AccessibilityInspector,
	O: OverlayDetector,
	G: OverlayOwner,
	V: CursorVisibility,
{
	engine: MotionEngine,
	pointer: P,
	warp: W,
	displays: D,
	inspector: A,
	overlay_detector: O,
	overlay_owner: G,
	eligibility: EligibilityFilter,
	touch_edges: Receiver<TouchEdge>,
	smoother: std::sync::Arc<TrackpadSmoother>,
	touching: bool,
	last_tick_at: Option<Instant>,
	/// `None` only transiently, inside [`CursorState::into_hardware`]/[`CursorState::into_overlay`]
	/// swaps; always `Some` before and after `run_once`.
	cursor_state: Option<CursorState<V>>,
	/// The configured `magnetism_enabled` the user asked for; restored when returning to overlay
	/// mode from a hardware-cursor detour, rather than unconditionally re-enabling it.
	magnetism_enabled_preference: bool,
}

impl<P, W, D, A, O, G, V> TickCoordinator<P, W, D, A, O, G, V>
where
	P: PointerSource,
	W: CursorWarp,
	D: DisplayEnumerator,
	A: AccessibilityInspector,
	O: OverlayDetector,
	G: OverlayOwner,
	V: CursorVisibility,
{
	/// Builds a coordinator. `initial_position` primes the engine; display bounds are queried
	/// once up front via `displays`. Starts in overlay mode: `cursor` is hidden immediately.
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		config: EngineConfig,
		initial_position: Point,
		pointer: P,
		warp: W,
		displays: D,
		inspector: A,
		overlay_detector: O,
		overlay_owner: G,
		cursor: V,
		touch_edges: Receiver<TouchEdge>,
		smoother: std::sync::Arc<TrackpadSmoother>,
	) -> Self {
		let mut coordinator = Self {
			engine: MotionEngine::new(config, initial_position),
			pointer,
			warp,
			displays,
			inspector,
			overlay_detector,
			overlay_owner,
			eligibility: EligibilityFilter::new(),
			touch_edges,
			smoother,
			touching: false,
			last_tick_at: None,
			cursor_state: Some(CursorState::Overlay(CursorVisibilityGuard::new(cursor))),
			magnetism_enabled_preference: config.magnetism_enabled,
		};
		coordinator.refresh_displays();
		coordinator
	}

	/// Whether the coordinator is currently in hardware-cursor passthrough mode (spec §4.9 step
	/// 7), as opposed to overlay mode.
	#[must_use]
	pub const fn is_hardware_cursor_mode(&self) -> bool {
		matches!(self.cursor_state, Some(CursorState::Hardware(_)))
	}

	fn refresh_displays(&mut self) {
		match self.displays.enumerate_displays() {
			Ok(frames) if !frames.is_empty() => {
				let bounds = union_bounds(&frames);
				self.engine.update_desktop_bounds(bounds);
			}
			Ok(_) => {
				warn!("display enumeration returned no displays; retaining previous bounds");
			}
			Err(err) => {
				warn!(error = %err, "display enumeration failed; retaining previous bounds");
			}
		}
	}

	/// Runs the engine's `prime` with the pointer's current location. Call once before the
	/// real-time loop starts.
	pub fn prime(&mut self) {
		let p = self.pointer.current_pointer_location();
		self.engine.prime(p);
	}

	/// Acquires the overlay resource, falling back to hardware-cursor mode (OS cursor shown) on
	/// failure — spec §7's fatal-at-startup case. Returns the error so the caller can decide
	/// whether to log/report it further.
	pub fn acquire_overlay(&mut self) -> Result<(), EngineError> {
		match self.overlay_owner.acquire() {
			Ok(()) => {
				self.cursor_state = self.cursor_state.take().map(CursorState::into_overlay);
				Ok(())
			}
			Err(err) => {
				self.cursor_state = self.cursor_state.take().map(CursorState::into_hardware);
				Err(err)
			}
		}
	}

	/// Shuts the coordinator down: releases the overlay resource and unconditionally restores OS
	/// cursor visibility (spec §5 "Cancellation"). Consumes `self`, so there is no way to keep
	/// ticking afterward without rebuilding a new coordinator.
	pub fn stop(mut self) {
		self.overlay_owner.release();
		// Dropping `self.cursor_state` here runs `CursorVisibilityGuard::drop` if still hidden,
		// showing the OS cursor even if this is reached by unwinding after a mid-tick panic.
	}

	/// Runs exactly one tick's worth of work. Testable in isolation; `run` calls this in a loop
	/// paced to [`TICK_PERIOD`].
	#[cfg_attr(feature = "diagnostics", tracing::instrument(level = "trace", skip(self, now)))]
	pub fn run_once(&mut self, now: Instant) {
		let dt = self.last_tick_at.map_or(1.0 / 500.0, |prev| now.duration_since(prev).as_secs_f64());
		self.last_tick_at = Some(now);

		self.drain_touch_edges();

		let warp_requested = if self.touching {
			self.tick_touching(dt);
			true
		} else {
			self.tick_not_touching(dt)
		};

		self.run_magnetism_query(now);

		if warp_requested {
			self.emit_warp(self.engine.position());
		}

		self.update_overlay_mode();
	}

	fn drain_touch_edges(&mut self) {
		loop {
			match self.touch_edges.try_recv() {
				Ok(TouchEdge::Began) => {
					self.touching = true;
					let p = self.pointer.current_pointer_location();
					self.engine.begin_touch(p);
				}
				Ok(TouchEdge::Ended) => {
					self.touching = false;
				}
				Err(TryRecvError::Empty) => break,
				Err(TryRecvError::Disconnected) => {
					debug!("touch-edge channel disconnected; treating as not-touching");
					self.touching = false;
					break;
				}
			}
		}
	}

	fn tick_touching(&mut self, dt: f64) {
		let snapshot = self.smoother.snapshot();
		let trackpad_norm_vel = snapshot.touching.then_some(snapshot.smoothed_velocity);
		let p = self.pointer.current_pointer_location();
		self.engine.handle_touch(p, dt, trackpad_norm_vel);
	}

	fn tick_not_touching(&mut self, dt: f64) -> bool {
		let p = self.pointer.current_pointer_location();
		let snapshot = self.smoother.snapshot();
		self.engine.handle_no_touch(p, dt, snapshot.suppress_glide, false).is_some()
	}

	/// Spec §4.9 steps 5–6: query accessibility at the engine's raw position, run eligibility, and
	/// hand the result to [`MotionEngine::update_magnetic_target`] — unconditionally, every tick,
	/// regardless of touch or glide state. If the main query comes back empty and the raw pointer
	/// has moved far enough this tick (spec §4.10's 12px touching / 18px gliding threshold), a
	/// [`HighVelocityProbe`] re-samples the travelled segment for a candidate the single end-of-tick
	/// query could have stepped over.
	fn run_magnetism_query(&mut self, now: Instant) {
		let diagnostics = self.engine.diagnostics();
		let raw = diagnostics.pre_magnet_position;

		let element = self.inspector.element_info_at(raw);
		let mut frame = self.eligibility.evaluate(raw, element.as_ref(), now);

		if frame.is_none() {
			let previous_raw = diagnostics.previous_pre_magnet_position;
			let distance = (raw - previous_raw).norm();
			let threshold = if diagnostics.is_gliding { 18.0 } else { 12.0 };
			if distance >= threshold {
				let probe = HighVelocityProbe::new(&self.inspector, &self.overlay_detector);
				frame = probe.probe(previous_raw, raw, distance, diagnostics.current_target, &mut self.eligibility, now);
			}
		}

		self.engine.update_magnetic_target(frame);
	}

	fn emit_warp(&mut self, position: Point) {
		if let Err(err) = self.warp.warp_cursor(position) {
			warn!(error = %err, "cursor warp failed; retrying next tick");
		}
	}

	/// Mode switch at spec §4.9 step 7: tears down the overlay and shows the OS cursor when a
	/// foreign utility window takes over the topmost pixel at the raw point, and reacquires the
	/// overlay and hides it again once that condition clears.
	fn update_overlay_mode(&mut self) {
		let p = self.pointer.current_pointer_location();
		let foreign_overlay = self.overlay_detector.is_known_overlay_topmost(p);
		if foreign_overlay && !self.is_hardware_cursor_mode() {
			let virtual_position = self.engine.position();
			self.overlay_owner.release();
			self.cursor_state = self.cursor_state.take().map(CursorState::into_hardware);
			self.emit_warp(virtual_position);
			self.engine.prime(virtual_position);
			self.engine.set_magnetism_enabled(false);
		} else if !foreign_overlay && self.is_hardware_cursor_mode() && self.overlay_owner.acquire().is_ok() {
			self.cursor_state = self.cursor_state.take().map(CursorState::into_overlay);
			self.engine.set_magnetism_enabled(self.magnetism_enabled_preference);
			self.emit_warp(self.engine.position());
		}
	}

	/// Runs the tick loop forever at [`TICK_PERIOD`], paced by `std::thread::sleep`. Never
	/// returns under normal operation; intended to be the body of the dedicated tick thread.
	pub fn run(&mut self) -> ! {
		loop {
			let tick_start = Instant::now();
			self.run_once(tick_start);
			let elapsed = tick_start.elapsed();
			if elapsed < TICK_PERIOD {
				std::thread::sleep(TICK_PERIOD - elapsed);
			} else {
				error!(?elapsed, "tick overran its 2ms budget");
			}
		}
	}
}

impl<P, W, D, A, O, G, V> Drop for TickCoordinator<P, W, D, A, O, G, V>
where
	P: PointerSource,
	W: CursorWarp,
	D: DisplayEnumerator,
	A: AccessibilityInspector,
	O: OverlayDetector,
	G: OverlayOwner,
	V: CursorVisibility,
{
	/// Guarantees the overlay resource is released even if the coordinator is dropped by an
	/// unwind mid-tick rather than through an explicit [`Self::stop`] (spec §5 "Partial shutdown
	/// ... must still restore the OS cursor and hardware warp state"). `cursor_state`'s own `Drop`
	/// (via [`CursorVisibilityGuard`]) restores cursor visibility independently of this impl.
	fn drop(&mut self) {
		self.overlay_owner.release();
	}
}

fn union_bounds(frames: &[Rect]) -> Rect {
	let min_x = frames.iter().map(Rect::min_x).fold(f64::INFINITY, f64::min);
	let min_y = frames.iter().map(Rect::min_y).fold(f64::INFINITY, f64::min);
	let max_x = frames.iter().map(Rect::max_x).fold(f64::NEG_INFINITY, f64::max);
	let max_y = frames.iter().map(Rect::max_y).fold(f64::NEG_INFINITY, f64::max);
	Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::eligibility::ElementInfo;
	use parking_lot::Mutex;
	use std::sync::Arc;

	struct FakePointer {
		position: Mutex<Point>,
	}
	impl PointerSource for FakePointer {
		fn current_pointer_location(&self) -> Point {
			*self.position.lock()
		}
	}

	struct FakeWarp {
		last: Mutex<Option<Point>>,
	}
	impl CursorWarp for FakeWarp {
		fn warp_cursor(&mut self, position: Point) -> Result<(), EngineError> {
			*self.last.lock() = Some(position);
			Ok(())
		}
	}

	struct FakeDisplays;
	impl DisplayEnumerator for FakeDisplays {
		fn enumerate_displays(&self) -> Result<Vec<Rect>, EngineError> {
			Ok(vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)])
		}
	}

	struct NoInspector;
	impl AccessibilityInspector for NoInspector {
		fn element_info_at(&self, _point: Point) -> Option<ElementInfo> {
			None
		}
	}

	struct NoOverlay;
	impl OverlayDetector for NoOverlay {
		fn is_known_overlay_topmost(&self, _point: Point) -> bool {
			false
		}
	}

	struct FakeOverlayOwner {
		acquired: bool,
	}
	impl OverlayOwner for FakeOverlayOwner {
		fn acquire(&mut self) -> Result<(), EngineError> {
			self.acquired = true;
			Ok(())
		}
		fn release(&mut self) {
			self.acquired = false;
		}
	}

	#[derive(Default)]
	struct FakeCursor {
		hidden: bool,
	}
	impl CursorVisibility for FakeCursor {
		fn hide_cursor(&mut self) {
			self.hidden = true;
		}
		fn show_cursor(&mut self) {
			self.hidden = false;
		}
	}

	fn build() -> TickCoordinator<FakePointer, FakeWarp, FakeDisplays, NoInspector, NoOverlay, FakeOverlayOwner, FakeCursor>
	{
		let (_tx, rx) = crossbeam_channel::unbounded();
		TickCoordinator::new(
			EngineConfig::default(),
			Point::new(100.0, 100.0),
			FakePointer { position: Mutex::new(Point::new(100.0, 100.0)) },
			FakeWarp { last: Mutex::new(None) },
			FakeDisplays,
			NoInspector,
			NoOverlay,
			FakeOverlayOwner { acquired: false },
			FakeCursor::default(),
			rx,
			Arc::new(TrackpadSmoother::new()),
		)
	}

	#[test]
	fn a_tick_with_no_touch_and_no_velocity_does_not_warp() {
		let mut coordinator = build();
		coordinator.run_once(Instant::now());
		assert!(coordinator.warp.last.lock().is_none());
	}

	#[test]
	fn a_touch_began_edge_primes_begin_touch() {
		let mut coordinator = build();
		let (tx, rx) = crossbeam_channel::unbounded();
		coordinator.touch_edges = rx;
		tx.send(TouchEdge::Began).unwrap();
		coordinator.run_once(Instant::now());
		assert!(coordinator.touching);
	}

	#[test]
	fn display_enumeration_populates_desktop_bounds() {
		let coordinator = build();
		assert_eq!(coordinator.engine.diagnostics().position, Point::new(100.0, 100.0));
	}

	#[test]
	fn coordinator_starts_in_overlay_mode_with_cursor_hidden() {
		let coordinator = build();
		assert!(!coordinator.is_hardware_cursor_mode());
	}

	#[test]
	fn a_foreign_overlay_topmost_switches_to_hardware_cursor_mode_and_shows_the_cursor() {
		struct AlwaysOverlay;
		impl OverlayDetector for AlwaysOverlay {
			fn is_known_overlay_topmost(&self, _point: Point) -> bool {
				true
			}
		}
		let mut coordinator: TickCoordinator<FakePointer, FakeWarp, FakeDisplays, NoInspector, AlwaysOverlay, FakeOverlayOwner, FakeCursor> = {
			let (_tx, rx) = crossbeam_channel::unbounded();
			TickCoordinator::new(
				EngineConfig::default(),
				Point::new(100.0, 100.0),
				FakePointer { position: Mutex::new(Point::new(100.0, 100.0)) },
				FakeWarp { last: Mutex::new(None) },
				FakeDisplays,
				NoInspector,
				AlwaysOverlay,
				FakeOverlayOwner { acquired: false },
				FakeCursor::default(),
				rx,
				Arc::new(TrackpadSmoother::new()),
			)
		};
		coordinator.run_once(Instant::now());
		assert!(coordinator.is_hardware_cursor_mode());
		assert!(!coordinator.engine.diagnostics().is_locked);
	}

	#[test]
	fn stop_releases_the_overlay_resource() {
		let coordinator = build();
		coordinator.stop();
	}

	#[test]
	fn a_gliding_non_touching_tick_still_runs_the_magnetism_query_and_can_snap() {
		// Regression: the magnetism pipeline (accessibility query + eligibility +
		// update_magnetic_target) must run every tick, including mid-glide while not touching —
		// spec's "glide-to-snap" behavior, previously unreachable through the real coordinator.
		struct ButtonInspector;
		impl AccessibilityInspector for ButtonInspector {
			fn element_info_at(&self, _point: Point) -> Option<ElementInfo> {
				Some(ElementInfo {
					frame: Rect::new(530.0, 380.0, 40.0, 40.0),
					role: Some(crate::eligibility::Role::Button),
					actions: [crate::eligibility::Action::Press].into_iter().collect(),
					url: None,
					app: crate::eligibility::KnownApp::Other,
					is_file_picker_panel: false,
				})
			}
		}
		let (_tx, rx) = crossbeam_channel::unbounded();
		let mut coordinator: TickCoordinator<FakePointer, FakeWarp, FakeDisplays, ButtonInspector, NoOverlay, FakeOverlayOwner, FakeCursor> =
			TickCoordinator::new(
				EngineConfig::default(),
				Point::new(400.0, 400.0),
				FakePointer { position: Mutex::new(Point::new(400.0, 400.0)) },
				FakeWarp { last: Mutex::new(None) },
				FakeDisplays,
				ButtonInspector,
				NoOverlay,
				FakeOverlayOwner { acquired: false },
				FakeCursor::default(),
				rx,
				Arc::new(TrackpadSmoother::new()),
			);
		coordinator.engine.update_desktop_bounds(Rect::new(0.0, 0.0, 2000.0, 1200.0));

		// A small flick at dt=0.002s yields exactly the spec's literal velocity of 1200 px/s, then
		// the touch ends, beginning a glide — all driven directly on the engine, bypassing the
		// coordinator, the same way `tests/scenarios.rs` sets up its glide scenario.
		coordinator.engine.handle_touch(Point::new(402.4, 400.0), 0.002, None);
		coordinator.engine.handle_no_touch(Point::new(402.4, 400.0), 0.002, false, true);
		assert!(coordinator.engine.is_gliding());

		coordinator.touching = false;
		let dt = Duration::from_secs_f64(1.0 / 500.0);
		let mut now = Instant::now();
		for _ in 0..5000 {
			if coordinator.engine.diagnostics().is_locked {
				break;
			}
			now += dt;
			coordinator.run_once(now);
		}

		assert!(coordinator.engine.diagnostics().is_locked);
	}
}
