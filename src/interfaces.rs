//! External collaborators.
//!
//! Everything in this module is a trait whose contract is stated in its own doc comment; the core
//! never implements any of them. Production implementations live outside this crate (OS cursor
//! primitives, the accessibility inspector, the multi-touch driver) — this keeps the real-time
//! control loop testable against fakes and keeps rendering, input synthesis, and accessibility
//! implementation entirely out of this crate.

use crate::eligibility::ElementInfo;
use crate::error::EngineError;
use crate::geom::{Point, Rect};

/// Reads the physical pointer location in global screen space.
pub trait PointerSource {
	/// Current physical pointer location.
	fn current_pointer_location(&self) -> Point;
}

/// Mirrors the virtual cursor position onto the OS cursor.
pub trait CursorWarp {
	/// Warps the OS cursor to `position`. Must be idempotent within a tick and translate global
	/// coordinates to display-local ones across multi-display boundaries.
	///
	/// # Errors
	///
	/// Returns an error if the underlying platform call fails; this is logged and the tick still
	/// proceeds, with the next tick re-attempting the warp.
	fn warp_cursor(&mut self, position: Point) -> Result<(), EngineError>;
}

/// Scoped OS cursor visibility control.
pub trait CursorVisibility {
	/// Hides the OS cursor. Only called while in overlay mode.
	fn hide_cursor(&mut self);
	/// Shows the OS cursor. Called in hardware-cursor mode and always on shutdown.
	fn show_cursor(&mut self);
}

/// Enumerates connected displays.
pub trait DisplayEnumerator {
	/// Current display frames in global screen space.
	///
	/// # Errors
	///
	/// Returns an error if topology could not be read; the previous `desktopBounds` is retained
	/// until the next successful call.
	fn enumerate_displays(&self) -> Result<Vec<Rect>, EngineError>;
}

/// Synchronous accessibility element query at a screen point.
pub trait AccessibilityInspector {
	/// Queries the element at `point`, or `None` if the query fails or nothing is present. The
	/// engine tolerates `None` and flicker; this is not treated as an `EngineError`.
	fn element_info_at(&self, point: Point) -> Option<ElementInfo>;
}

/// Detects whether a foreign (non-overlay-owned) utility window is topmost at a point.
pub trait OverlayDetector {
	/// Whether the frontmost visible window at `point` belongs to one of a configured list of
	/// known screenshot/utility app identifiers, in which case the engine switches to
	/// hardware-cursor passthrough.
	fn is_known_overlay_topmost(&self, point: Point) -> bool;
}

/// Acquires and releases the overlay cursor-artwork resource.
///
/// Out of scope for rendering, but its *lifecycle* — acquired on start, released on stop, failure
/// falling back to hardware-cursor mode — is part of the core's concurrency/resource contract and
/// is represented here as a trait so the tick coordinator can drive it without owning a concrete
/// windowing type.
pub trait OverlayOwner {
	/// Acquires the overlay resource.
	///
	/// # Errors
	///
	/// Returns an error if the resource could not be acquired; this is fatal for overlay mode and
	/// the daemon falls back to hardware-cursor mode indefinitely.
	fn acquire(&mut self) -> Result<(), EngineError>;
	/// Releases the overlay resource. Called unconditionally on shutdown, including after a panic
	/// mid-tick.
	fn release(&mut self);
}
