//! Error kinds recognized by the core.
//!
//! A transient accessibility query failure, a stuck lock, or a foreign-overlay topmost condition
//! are absorbed entirely by engine state (TTLs, strain counters, mode switches) and never surface
//! as a `Result::Err`. What is left here is the handful of failures that are logged or fatal —
//! failures of the *external* collaborators the engine calls out to, not failures of the engine's
//! own logic. No tick-path method on [`crate::MotionEngine`] returns `Result`: no error ever
//! crosses a tick boundary unhandled.

use thiserror::Error;

/// Failure categories surfaced to the tick coordinator from its external collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
	/// The OS cursor warp primitive failed. Logged; the tick still proceeds and the next tick
	/// re-attempts the warp.
	#[error("OS cursor warp failed: {reason}")]
	OsWarpFailed {
		/// Collaborator-supplied description of the failure.
		reason: String,
	},
	/// Display topology could not be re-enumerated after a screen-parameter change notification.
	/// The previous `desktopBounds` is retained until the next successful enumeration.
	#[error("display enumeration failed: {reason}")]
	DisplayEnumerationFailed {
		/// Collaborator-supplied description of the failure.
		reason: String,
	},
	/// The overlay resource could not be acquired on startup. Fatal: the daemon logs this and
	/// falls back to hardware-cursor mode indefinitely.
	#[error("overlay resource acquisition failed: {reason}")]
	OverlayAcquisitionFailed {
		/// Collaborator-supplied description of the failure.
		reason: String,
	},
}
