//! Real-time pointer-motion and magnetism engine.
//!
//! This crate owns the virtual cursor: a 500 Hz state machine that integrates physical pointer
//! and trackpad input, attracts the virtual cursor toward nearby interactive elements ("magnetism"
//! — a button, link, or form control under or near the raw pointer), and applies inertial glide
//! once a trackpad gesture ends. It does not render anything and does not synthesize input; it
//! computes where the OS cursor should be warped to, tick by tick, and leaves the actual warp,
//! accessibility queries, and display enumeration to collaborators supplied through the traits in
//! [`interfaces`].
//!
//! # Layout
//!
//! - [`geom`] — allocation-free geometric primitives (segment/circle/rect tests, distances).
//! - [`config`] — [`config::EngineConfig`], the tunable knobs.
//! - [`error`] — [`error::EngineError`], the external-collaborator failure kinds.
//! - [`smoother`] — trackpad velocity smoothing and multi-finger glide suppression.
//! - [`eligibility`] — turns an accessibility snapshot into a magnetism candidate or `None`.
//! - [`magnetism`] — per-target parameter derivation, crossing tests, and [`magnetism::MagnetState`].
//! - [`strain`] — lock-strain detection for narrow, elongated targets.
//! - [`glide`] — exponential-friction glide decay.
//! - [`interfaces`] — traits for the OS/accessibility collaborators the engine depends on.
//! - [`engine`] — [`engine::MotionEngine`], the core state machine.
//! - [`probe`] — the high-velocity accessibility re-sampling probe.
//! - [`tick`] — [`tick::TickCoordinator`], the real-time loop tying everything together.
//!
//! # Example
//!
//! ```
//! use pointer_magnetism::config::EngineConfig;
//! use pointer_magnetism::engine::MotionEngine;
//! use pointer_magnetism::geom::{Point, Rect};
//!
//! let mut engine = MotionEngine::new(EngineConfig::default(), Point::new(100.0, 100.0));
//! engine.update_desktop_bounds(Rect::new(0.0, 0.0, 1920.0, 1080.0));
//! engine.begin_touch(Point::new(100.0, 100.0));
//! engine.handle_touch(Point::new(150.0, 100.0), 0.002, None);
//! ```

pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod geom;
pub mod glide;
pub mod interfaces;
pub mod magnetism;
pub mod probe;
pub mod smoother;
pub mod strain;
pub mod tick;

pub use config::EngineConfig;
pub use engine::MotionEngine;
pub use error::EngineError;
pub use tick::{CursorVisibilityGuard, TickCoordinator, TouchEdge};
