//! Target eligibility filter.
//!
//! Turns an accessibility-element snapshot at the raw pointer into `Some(Rect)` or `None` for
//! [`crate::MotionEngine::update_magnetic_target`]. The engine never classifies roles itself —
//! that policy lives entirely here, isolated from the motion/magnetism state machine so it can
//! change without touching the real-time control loop.

use crate::geom::{Point, Rect};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Accessibility role of an inspected element, as reported by the external inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
	/// A hyperlink.
	Link,
	/// A push button.
	Button,
	/// A multi-line editable text area.
	TextArea,
	/// A single-line editable text field.
	TextField,
	/// A checkbox.
	CheckBox,
	/// A radio button.
	RadioButton,
	/// A pop-up or combo button.
	PopUpButton,
	/// A grouping container.
	Group,
	/// Non-editable text.
	StaticText,
	/// A row within a list/outline/table.
	Row,
	/// A disclosure row within an outline/tree view.
	Outline,
	/// A static image.
	Image,
	/// Some other role not named above.
	Other,
}

/// An action an accessibility element exposes, as reported by the external inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
	/// Primary activation, e.g. a button press.
	Press,
	/// Confirms a pending choice.
	Confirm,
	/// Picks an item, e.g. from a menu or list.
	Pick,
	/// Opens a menu.
	ShowMenu,
	/// Scrolls the element into view — always ignored (step 2).
	ScrollToVisible,
	/// Some other action not named above.
	Other,
}

/// Well-known bundle identifiers the step-3 suppression rules and step-1 file-picker rule key on.
///
/// Real bundle identifiers (`com.apple.finder`, the system Open/Save panel service, the mail
/// client, etc.) are opaque strings from the accessibility inspector's point of view; this enum
/// is the eligibility filter's own closed classification of the handful it treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownApp {
	/// The system file-open/save panel service.
	OpenSavePanelService,
	/// The file-browser (Finder-like) application.
	FileBrowser,
	/// The mail client application.
	Mail,
	/// Any other application.
	Other,
}

/// One accessibility query result at the raw pointer position.
#[derive(Debug, Clone)]
pub struct ElementInfo {
	/// Element frame in screen space.
	pub frame: Rect,
	/// Accessibility role, if the inspector could determine one.
	pub role: Option<Role>,
	/// Actions the element exposes.
	pub actions: HashSet<Action>,
	/// Link target, if this element is a hyperlink-like element.
	pub url: Option<String>,
	/// Owning application, for the app-specific exclusion rules.
	pub app: KnownApp,
	/// Whether this element is itself a file-open/save picker panel.
	pub is_file_picker_panel: bool,
}

const MAGNETIC_ROLES: &[Role] = &[
	Role::Link,
	Role::Button,
	Role::TextArea,
	Role::TextField,
	Role::CheckBox,
	Role::RadioButton,
	Role::PopUpButton,
];

fn max_area_for_role(role: Option<Role>) -> f64 {
	match role {
		Some(Role::Link) => 30_000.0,
		Some(Role::TextArea) => 12_000.0,
		Some(Role::Group) => 10_500.0,
		Some(Role::StaticText) => 13_500.0,
		_ => 15_000.0,
	}
}

const LINGER_WINDOW: Duration = Duration::from_millis(60);

/// Memory of the last qualifying candidate, for the linger window.
struct Linger {
	frame: Rect,
	seen_at: Instant,
}

/// Stateless per-tick scoring plus a short linger memory absorbing accessibility-query flicker.
#[derive(Default)]
pub struct EligibilityFilter {
	linger: Option<Linger>,
}

impl EligibilityFilter {
	/// Creates a filter with empty linger memory.
	#[must_use]
	pub fn new() -> Self {
		Self { linger: None }
	}

	/// Scores one tick's accessibility snapshot (or its absence) against the raw pointer, and
	/// returns a candidate rectangle or `None`.
	pub fn evaluate(&mut self, raw: Point, element: Option<&ElementInfo>, now: Instant) -> Option<Rect> {
		let Some(info) = element else {
			return self.linger_fallback(raw, now);
		};

		// Step 1: file picker panels are never candidates and reset the linger memory.
		if info.is_file_picker_panel || info.app == KnownApp::OpenSavePanelService {
			self.linger = None;
			return None;
		}

		// Step 2: any ignored action disqualifies the element outright.
		if info.actions.contains(&Action::ScrollToVisible) {
			return self.linger_fallback(raw, now);
		}

		// Step 3: non-interactive list-item suppression, by owning app.
		if self.is_suppressed_list_item(info) {
			return self.linger_fallback(raw, now);
		}

		let has_press_action = info.actions.iter().any(|a| {
			matches!(a, Action::Press | Action::Confirm | Action::Pick | Action::ShowMenu)
		});
		let has_link = info.url.is_some();

		let area = info.frame.area();
		let max_area = max_area_for_role(info.role);

		let qualifies_by_role = info.role.is_some_and(|r| MAGNETIC_ROLES.contains(&r));
		let qualifies_by_actions_or_url = has_press_action || has_link;
		let qualifies_implicitly =
			info.role.is_none() && qualifies_by_actions_or_url && area > 100.0 && area <= 15_000.0;

		let base_candidacy = ((qualifies_by_role || qualifies_by_actions_or_url) && area <= max_area)
			|| qualifies_implicitly;

		if !base_candidacy || self.is_extreme_shape(info) {
			return self.linger_fallback(raw, now);
		}

		if !qualifies_implicitly && !self.within_proximity_gate(raw, info) {
			return self.linger_fallback(raw, now);
		}

		self.linger = Some(Linger { frame: info.frame, seen_at: now });
		Some(info.frame)
	}

	fn is_suppressed_list_item(&self, info: &ElementInfo) -> bool {
		match info.app {
			KnownApp::FileBrowser => matches!(
				info.role,
				Some(Role::Row) | Some(Role::Outline) | Some(Role::Image) | Some(Role::Group) | Some(Role::StaticText)
			) && !info.actions.contains(&Action::Press),
			KnownApp::Mail => {
				let aspect = aspect_ratio(&info.frame);
				info.frame.w < 100.0
					&& info.frame.h < 100.0
					&& aspect > 0.5
					&& aspect < 2.0
					&& matches!(info.role, Some(Role::Row) | Some(Role::Group) | Some(Role::StaticText))
			}
			KnownApp::OpenSavePanelService | KnownApp::Other => false,
		}
	}

	fn is_extreme_shape(&self, info: &ElementInfo) -> bool {
		let r = &info.frame;
		let aspect = aspect_ratio(r);
		let is_row_like = matches!(info.role, Some(Role::Row));
		let is_sidebar_like = matches!(
			info.role,
			Some(Role::StaticText) | Some(Role::Group) | Some(Role::Button)
		);

		(aspect > 8.0 && r.h < 25.0)
			|| (is_row_like && aspect > 1.5 && r.w > 120.0)
			|| (is_sidebar_like && aspect > 1.8 && r.w > 140.0 && r.h < 50.0)
			|| (aspect > 2.2 && r.w > 160.0 && r.h < 45.0 && r.area() < 12_000.0)
	}

	fn within_proximity_gate(&self, raw: Point, info: &ElementInfo) -> bool {
		let r = &info.frame;
		let inset_x = (r.w * 0.2).clamp(8.0, 32.0);
		let inset_y = (r.h * 0.6).clamp(8.0, 36.0);
		if r.padded(inset_x, inset_y).contains(raw) {
			return true;
		}
		let max_center_distance = (r.h * 1.35).max(180.0);
		(raw - r.center()).norm() <= max_center_distance
	}

	fn linger_fallback(&mut self, raw: Point, now: Instant) -> Option<Rect> {
		match &self.linger {
			Some(linger)
				if now.duration_since(linger.seen_at) < LINGER_WINDOW
					&& linger.frame.padded(12.0, 12.0).contains(raw) =>
			{
				Some(linger.frame)
			}
			_ => {
				self.linger = None;
				None
			}
		}
	}
}

fn aspect_ratio(r: &Rect) -> f64 {
	let minor = r.w.min(r.h).max(1.0);
	let major = r.w.max(r.h);
	major / minor
}

#[cfg(test)]
mod tests {
	use super::*;

	fn basic_button(frame: Rect) -> ElementInfo {
		ElementInfo {
			frame,
			role: Some(Role::Button),
			actions: [Action::Press].into_iter().collect(),
			url: None,
			app: KnownApp::Other,
			is_file_picker_panel: false,
		}
	}

	#[test]
	fn file_picker_panel_is_rejected() {
		let mut f = EligibilityFilter::new();
		let mut info = basic_button(Rect::new(0.0, 0.0, 50.0, 30.0));
		info.is_file_picker_panel = true;
		let now = Instant::now();
		assert!(f.evaluate(Point::new(25.0, 15.0), Some(&info), now).is_none());
	}

	#[test]
	fn qualifying_button_within_gate_is_emitted() {
		let mut f = EligibilityFilter::new();
		let info = basic_button(Rect::new(100.0, 100.0, 60.0, 30.0));
		let now = Instant::now();
		let result = f.evaluate(Point::new(130.0, 115.0), Some(&info), now);
		assert_eq!(result, Some(info.frame));
	}

	#[test]
	fn oversized_link_is_rejected() {
		let mut f = EligibilityFilter::new();
		let mut info = basic_button(Rect::new(0.0, 0.0, 400.0, 400.0));
		info.role = Some(Role::Link);
		info.actions.clear();
		info.url = Some("https://example.com".into());
		let now = Instant::now();
		assert!(f.evaluate(Point::new(200.0, 200.0), Some(&info), now).is_none());
	}

	#[test]
	fn extreme_aspect_ratio_is_rejected() {
		let mut f = EligibilityFilter::new();
		let info = basic_button(Rect::new(0.0, 0.0, 300.0, 20.0));
		let now = Instant::now();
		assert!(f.evaluate(Point::new(150.0, 10.0), Some(&info), now).is_none());
	}

	#[test]
	fn linger_reemits_recent_candidate_on_gap() {
		let mut f = EligibilityFilter::new();
		let info = basic_button(Rect::new(100.0, 100.0, 60.0, 30.0));
		let now = Instant::now();
		assert!(f.evaluate(Point::new(130.0, 115.0), Some(&info), now).is_some());
		let later = now + Duration::from_millis(30);
		let result = f.evaluate(Point::new(130.0, 115.0), None, later);
		assert_eq!(result, Some(info.frame));
	}

	#[test]
	fn linger_expires_after_window() {
		let mut f = EligibilityFilter::new();
		let info = basic_button(Rect::new(100.0, 100.0, 60.0, 30.0));
		let now = Instant::now();
		assert!(f.evaluate(Point::new(130.0, 115.0), Some(&info), now).is_some());
		let later = now + Duration::from_millis(90);
		let result = f.evaluate(Point::new(130.0, 115.0), None, later);
		assert!(result.is_none());
	}

	#[test]
	fn file_browser_outline_and_image_rows_are_suppressed() {
		let mut f = EligibilityFilter::new();
		for role in [Role::Outline, Role::Image] {
			let mut info = basic_button(Rect::new(0.0, 0.0, 80.0, 30.0));
			info.app = KnownApp::FileBrowser;
			info.role = Some(role);
			info.actions.clear();
			let now = Instant::now();
			assert!(f.evaluate(Point::new(40.0, 15.0), Some(&info), now).is_none());
		}
	}

	#[test]
	fn file_browser_button_keeps_magnetism_despite_row_like_role() {
		let mut f = EligibilityFilter::new();
		let mut info = basic_button(Rect::new(0.0, 0.0, 80.0, 30.0));
		info.app = KnownApp::FileBrowser;
		info.role = Some(Role::Outline);
		// A `Press` action means this row behaves like a button and keeps magnetism.
		let now = Instant::now();
		assert!(f.evaluate(Point::new(40.0, 15.0), Some(&info), now).is_some());
	}

	#[test]
	fn mail_sidebar_row_is_suppressed() {
		let mut f = EligibilityFilter::new();
		let mut info = basic_button(Rect::new(0.0, 0.0, 80.0, 60.0));
		info.app = KnownApp::Mail;
		info.role = Some(Role::Row);
		info.actions.clear();
		let now = Instant::now();
		assert!(f.evaluate(Point::new(40.0, 30.0), Some(&info), now).is_none());
	}
}
