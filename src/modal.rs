//! Modal dialogs
//!
//! A modal owns its buttons and its own [`FocusRing`]. While any modal is
//! open the navigator routes keyboard and gamepad input to the topmost one and
//! leaves the base collection's focus alone, so closing the last modal
//! restores whatever was focused before.

use crate::focus::FocusRing;
use crate::layout::Rect;
use crate::widget::NavStep;

/// Size used when a modal is opened without explicit bounds
pub const DEFAULT_MODAL_SIZE: (f32, f32) = (480.0, 240.0);

const BUTTON_HEIGHT: f32 = 44.0;
const BUTTON_GAP: f32 = 12.0;
const PADDING: f32 = 16.0;

/// Labels that act as the escape target when nothing more specific matches
const ESCAPE_LABELS: [&str; 3] = ["exit", "close", "cancel"];

/// Button callback type
pub type ModalCallback = Box<dyn FnMut()>;

/// Semantic meaning of a modal button, independent of its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonRole {
    Confirm,
    Cancel,
    #[default]
    Neutral,
}

pub struct ModalButton {
    label: String,
    role: ButtonRole,
    bounds: Rect,
    callback: Option<ModalCallback>,
}

impl ModalButton {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn role(&self) -> ButtonRole {
        self.role
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl std::fmt::Debug for ModalButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalButton")
            .field("label", &self.label)
            .field("role", &self.role)
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// A dialog with a title, a message, and a row of buttons
#[derive(Debug)]
pub struct Modal {
    title: String,
    message: String,
    bounds: Option<Rect>,
    buttons: Vec<ModalButton>,
    escape_label: Option<String>,
    ring: FocusRing,
}

impl Modal {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            bounds: None,
            buttons: Vec::new(),
            escape_label: None,
            ring: FocusRing::new(),
        }
    }

    /// Fixed bounds; otherwise the modal is centered in the viewport
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Add a neutral button
    pub fn button<F>(self, label: impl Into<String>, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.button_with_role(label, ButtonRole::Neutral, callback)
    }

    pub fn button_with_role<F>(mut self, label: impl Into<String>, role: ButtonRole, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.buttons.push(ModalButton {
            label: label.into(),
            role,
            bounds: Rect::default(),
            callback: Some(Box::new(callback)),
        });
        self
    }

    /// Label of the button Escape should press
    pub fn escape_button(mut self, label: impl Into<String>) -> Self {
        self.escape_label = Some(label.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resolved bounds; meaningful once the modal is open
    pub fn bounds(&self) -> Rect {
        self.bounds.unwrap_or_default()
    }

    pub fn buttons(&self) -> &[ModalButton] {
        &self.buttons
    }

    pub fn focused_button(&self) -> Option<usize> {
        self.ring.focused()
    }

    /// Button Escape resolves to, if any
    ///
    /// Checked in order: the explicit escape label, the first `Cancel` role,
    /// then the first button labelled exit, close, or cancel. Labels compare
    /// case-insensitively.
    pub fn escape_target(&self) -> Option<usize> {
        let by_label = |wanted: &str| {
            self.buttons
                .iter()
                .position(|b| b.label.eq_ignore_ascii_case(wanted))
        };

        self.escape_label
            .as_deref()
            .and_then(by_label)
            .or_else(|| {
                self.buttons
                    .iter()
                    .position(|b| b.role == ButtonRole::Cancel)
            })
            .or_else(|| {
                self.buttons.iter().position(|b| {
                    ESCAPE_LABELS
                        .iter()
                        .any(|l| b.label.eq_ignore_ascii_case(l))
                })
            })
    }

    /// Button under a canvas point
    pub fn button_at(&self, x: f32, y: f32) -> Option<usize> {
        self.buttons.iter().position(|b| b.bounds.contains(x, y))
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(x, y)
    }

    /// Resolve bounds against the viewport and lay the buttons out in a row
    /// along the bottom edge
    pub(crate) fn layout(&mut self, viewport: Rect) {
        let bounds = self
            .bounds
            .unwrap_or_else(|| viewport.centered(DEFAULT_MODAL_SIZE.0, DEFAULT_MODAL_SIZE.1));
        self.bounds = Some(bounds);

        let strip = Rect::new(
            bounds.x + PADDING,
            bounds.bottom() - PADDING - BUTTON_HEIGHT,
            (bounds.width - PADDING * 2.0).max(0.0),
            BUTTON_HEIGHT,
        );
        let cells = strip.columns(self.buttons.len(), BUTTON_GAP);
        for (button, cell) in self.buttons.iter_mut().zip(cells) {
            button.bounds = cell;
        }
    }

    /// Focus the first button
    pub(crate) fn open(&mut self, viewport: Rect) {
        self.layout(viewport);
        self.ring = FocusRing::starting_at_first(self.buttons.len());
    }

    pub(crate) fn tab(&mut self, step: NavStep) -> Option<usize> {
        match step {
            NavStep::Next => self.ring.next(self.buttons.len()),
            NavStep::Prev => self.ring.prev(self.buttons.len()),
        }
    }

    /// Move the modal's focus to a button, as pointer hover does
    pub(crate) fn focus_button(&mut self, index: usize) -> bool {
        self.ring.focus(index, self.buttons.len())
    }

    /// Consume the modal, keeping only the chosen button's callback
    pub(crate) fn into_callback(mut self, index: usize) -> Option<ModalCallback> {
        if index < self.buttons.len() {
            self.buttons.swap_remove(index).callback
        } else {
            None
        }
    }
}

/// Stack of open modals; only the top one receives input
#[derive(Debug, Default)]
pub struct ModalStack {
    modals: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, modal: Modal) {
        log::debug!("modal opened: {}", modal.title);
        self.modals.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        let modal = self.modals.pop();
        if let Some(m) = &modal {
            log::debug!("modal closed: {}", m.title);
        }
        modal
    }

    pub fn top(&self) -> Option<&Modal> {
        self.modals.last()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Modal> {
        self.modals.last_mut()
    }

    pub fn len(&self) -> usize {
        self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    pub fn clear(&mut self) {
        self.modals.clear();
    }

    /// Bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &Modal> {
        self.modals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn noop() {}

    #[test]
    fn test_escape_label_wins() {
        let modal = Modal::new("Quit?", "")
            .button("Yes", noop)
            .button_with_role("Back", ButtonRole::Cancel, noop)
            .button("no", noop)
            .escape_button("NO");
        assert_eq!(modal.escape_target(), Some(2));
    }

    #[test]
    fn test_escape_role_before_labels() {
        let modal = Modal::new("", "")
            .button("Close", noop)
            .button_with_role("Back", ButtonRole::Cancel, noop);
        assert_eq!(modal.escape_target(), Some(1));
    }

    #[test]
    fn test_escape_label_fallbacks() {
        let modal = Modal::new("", "").button("OK", noop).button("EXIT", noop);
        assert_eq!(modal.escape_target(), Some(1));

        let modal = Modal::new("", "").button("OK", noop).button("Retry", noop);
        assert_eq!(modal.escape_target(), None);

        // Unknown explicit label falls through to the defaults
        let modal = Modal::new("", "")
            .button("Cancel", noop)
            .escape_button("Nope");
        assert_eq!(modal.escape_target(), Some(0));
    }

    #[test]
    fn test_layout_centers_and_rows_buttons() {
        let mut modal = Modal::new("", "").button("A", noop).button("B", noop);
        modal.open(Rect::fullscreen(1280.0, 720.0));

        let bounds = modal.bounds();
        assert_eq!(bounds, Rect::new(400.0, 240.0, 480.0, 240.0));

        let a = modal.buttons()[0].bounds();
        let b = modal.buttons()[1].bounds();
        assert_eq!(a.y, b.y);
        assert!(a.right() < b.x);
        assert!(bounds.contains(b.right() - 1.0, b.bottom() - 1.0));
        assert_eq!(modal.button_at(a.x + 1.0, a.y + 1.0), Some(0));
        assert_eq!(modal.focused_button(), Some(0));
    }

    #[test]
    fn test_tab_wraps_over_buttons() {
        let mut modal = Modal::new("", "")
            .button("A", noop)
            .button("B", noop)
            .button("C", noop);
        modal.open(Rect::fullscreen(100.0, 100.0));
        assert_eq!(modal.tab(NavStep::Prev), Some(2));
        assert_eq!(modal.tab(NavStep::Next), Some(0));
    }

    #[test]
    fn test_focus_button_in_range() {
        let mut modal = Modal::new("", "").button("A", noop).button("B", noop);
        modal.open(Rect::fullscreen(100.0, 100.0));
        assert!(modal.focus_button(1));
        assert_eq!(modal.focused_button(), Some(1));
        assert!(!modal.focus_button(2));
        assert_eq!(modal.focused_button(), Some(1));
    }

    #[test]
    fn test_into_callback() {
        let hits = Rc::new(Cell::new(0));
        let modal = Modal::new("", "").button("A", noop).button("B", {
            let hits = Rc::clone(&hits);
            move || hits.set(hits.get() + 1)
        });

        if let Some(mut callback) = modal.into_callback(1) {
            callback();
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_stack_order() {
        let mut stack = ModalStack::new();
        stack.push(Modal::new("first", ""));
        stack.push(Modal::new("second", ""));
        assert_eq!(stack.top().map(Modal::title), Some("second"));
        stack.pop();
        assert_eq!(stack.top().map(Modal::title), Some("first"));
        stack.clear();
        assert!(stack.pop().is_none());
    }
}
