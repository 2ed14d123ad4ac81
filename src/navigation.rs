//! Focus and navigation controller
//!
//! The [`Navigator`] owns the widget collection and the base [`FocusRing`]
//! and turns canonical input events into focus changes and widget calls:
//!
//! - Tab / Shift+Tab and the gamepad bumpers move focus through the focusable
//!   subsequence
//! - arrow keys go to the focused widget along its declared axis; the D-pad
//!   and left stick step it regardless of axis
//! - Enter, Space, and the south face button activate
//! - pointer clicks focus and click the widget under the pointer
//!
//! While a modal is open all of this is redirected to the topmost modal's
//! buttons and the base ring is left as it was.
//!
//! No user callback runs here. Escape and modal buttons are returned as
//! [`Deferred`] work, and widget callbacks collect in a [`Reactions`] queue
//! drained with [`Navigator::take_reactions`]. The owner runs both after
//! releasing its borrow of the navigator, so callbacks may reshape the scene.

use crate::collection::WidgetCollection;
use crate::event::{
    pad, Direction, GamepadAxisEvent, GamepadButtonEvent, Key, KeyEvent, PointerButton,
    PointerButtons, PointerEvent, TouchEvent, TouchPoint,
};
use crate::focus::FocusRing;
use crate::layout::Rect;
use crate::modal::{Modal, ModalCallback};
use crate::widget::{NavStep, Reactions, Widget, WidgetId};

/// Work to run once the navigator is no longer borrowed
pub enum Deferred {
    /// Escape reached the host escape slot
    Escape,
    /// A modal button was pressed; the modal is already closed
    Callback(ModalCallback),
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deferred::Escape => f.write_str("Escape"),
            Deferred::Callback(_) => f.write_str("Callback"),
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    collection: WidgetCollection,
    ring: FocusRing,
    viewport: Rect,
    /// Widget under the primary press or tracked touch, receives drags
    pressed: Option<WidgetId>,
    /// Contact that owns `pressed` while a finger is down
    touch: Option<u64>,
    hovered: Option<WidgetId>,
    /// Last left-stick direction, for edge detection
    stick: Option<Direction>,
    reactions: Reactions,
}

impl Navigator {
    pub fn new(viewport: Rect) -> Self {
        Self {
            collection: WidgetCollection::new(),
            ring: FocusRing::new(),
            viewport,
            pressed: None,
            touch: None,
            hovered: None,
            stick: None,
            reactions: Reactions::new(),
        }
    }

    pub fn collection(&self) -> &WidgetCollection {
        &self.collection
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Widget that owns base focus
    pub fn focused(&self) -> Option<WidgetId> {
        self.ring
            .focused()
            .and_then(|i| self.collection.focusable_at(i))
    }

    /// Index of the focused widget in the focusable subsequence
    pub fn focused_index(&self) -> Option<usize> {
        self.focused().and(self.ring.focused())
    }

    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn modal_open(&self) -> bool {
        !self.collection.modals().is_empty()
    }

    pub fn top_modal(&self) -> Option<&Modal> {
        self.collection.modals().top()
    }

    /// Widget callbacks queued since the last call, to run once the
    /// navigator is no longer borrowed
    pub fn take_reactions(&mut self) -> Reactions {
        std::mem::take(&mut self.reactions)
    }

    // Collection management

    pub fn add(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let id = self.collection.add(widget);
        if let Some(position) = self.collection.focusable_position(id) {
            self.ring.on_inserted(position);
        }
        id
    }

    /// Remove a widget; unknown ids are a no-op
    pub fn remove(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let position = self.collection.focusable_position(id);
        let widget = self.collection.remove(id)?;
        if let Some(position) = position {
            self.ring.on_removed(position);
        }
        if self.pressed == Some(id) {
            self.pressed = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        Some(widget)
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> bool {
        self.update_flags(id, |c| c.set_enabled(id, enabled))
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> bool {
        self.update_flags(id, |c| c.set_visible(id, visible))
    }

    /// Change a flag and keep the ring pointing at the same logical widget
    fn update_flags(
        &mut self,
        id: WidgetId,
        change: impl FnOnce(&mut WidgetCollection) -> bool,
    ) -> bool {
        let before = self.focused();
        let old_position = self.collection.focusable_position(id);
        if !change(&mut self.collection) {
            return false;
        }
        match (old_position, self.collection.focusable_position(id)) {
            (Some(p), None) => self.ring.on_removed(p),
            (None, Some(p)) => self.ring.on_inserted(p),
            _ => {}
        }
        self.notify_focus(before);
        true
    }

    pub fn clear(&mut self) {
        self.collection.clear();
        self.reset();
    }

    pub fn clear_except_toasts(&mut self) {
        self.collection.clear_except_toasts();
        self.reset();
    }

    fn reset(&mut self) {
        self.ring.blur();
        self.pressed = None;
        self.touch = None;
        self.hovered = None;
        self.stick = None;
    }

    pub(crate) fn collection_mut(&mut self) -> &mut WidgetCollection {
        &mut self.collection
    }

    // Focus

    /// Focus a widget directly; false if it is not in the focusable subsequence
    pub fn focus(&mut self, id: WidgetId) -> bool {
        let Some(position) = self.collection.focusable_position(id) else {
            return false;
        };
        let before = self.focused();
        self.ring.focus(position, self.collection.focusable_len());
        self.notify_focus(before);
        true
    }

    pub fn blur(&mut self) {
        let before = self.focused();
        self.ring.blur();
        self.notify_focus(before);
    }

    /// Move base focus one step through the focusable subsequence
    pub fn tab(&mut self, step: NavStep) -> Option<WidgetId> {
        let before = self.focused();
        let len = self.collection.focusable_len();
        match step {
            NavStep::Next => self.ring.next(len),
            NavStep::Prev => self.ring.prev(len),
        };
        self.notify_focus(before);
        self.focused()
    }

    fn notify_focus(&mut self, before: Option<WidgetId>) {
        let after = self.focused();
        if before == after {
            return;
        }
        log::trace!("focus {:?} -> {:?}", before, after);
        if let Some(widget) = before.and_then(|id| self.collection.get_mut(id)) {
            widget.on_blur();
        }
        if let Some(widget) = after.and_then(|id| self.collection.get_mut(id)) {
            widget.on_focus();
        }
    }

    /// Focused widget with the queue its callbacks go to
    fn focused_widget(&mut self) -> Option<(&mut (dyn Widget + 'static), &mut Reactions)> {
        let id = self.focused()?;
        let widget = self.collection.get_mut(id)?;
        Some((widget, &mut self.reactions))
    }

    // Modals

    pub fn open_modal(&mut self, mut modal: Modal) {
        modal.open(self.viewport);
        self.pressed = None;
        self.collection.modals_mut().push(modal);
    }

    /// Close the topmost modal without running any callback
    pub fn close_modal(&mut self) -> bool {
        self.collection.modals_mut().pop().is_some()
    }

    fn press_modal_button(&mut self, index: usize) -> Option<Deferred> {
        let modal = self.collection.modals_mut().pop()?;
        modal.into_callback(index).map(Deferred::Callback)
    }

    fn escape_modal(&mut self) -> Option<Deferred> {
        match self.top_modal()?.escape_target() {
            Some(index) => self.press_modal_button(index),
            None => {
                log::trace!("escape swallowed: modal has no escape button");
                None
            }
        }
    }

    fn activate_modal(&mut self) -> Option<Deferred> {
        let index = self.top_modal()?.focused_button()?;
        self.press_modal_button(index)
    }

    fn step_modal(&mut self, step: NavStep) {
        if let Some(modal) = self.collection.modals_mut().top_mut() {
            modal.tab(step);
        }
    }

    fn modal_key(&mut self, event: &KeyEvent) -> Option<Deferred> {
        match event.key {
            Key::Tab if event.shift() => self.step_modal(NavStep::Prev),
            Key::Tab | Key::Right | Key::Down => self.step_modal(NavStep::Next),
            Key::Left | Key::Up => self.step_modal(NavStep::Prev),
            Key::Escape if !event.repeat => return self.escape_modal(),
            key if key.is_activation() && !event.repeat => return self.activate_modal(),
            _ => {}
        }
        None
    }

    // Input

    pub fn key_down(&mut self, event: &KeyEvent) -> Option<Deferred> {
        if self.modal_open() {
            return self.modal_key(event);
        }

        match event.key {
            Key::Tab => {
                self.tab(if event.shift() { NavStep::Prev } else { NavStep::Next });
                return None;
            }
            Key::Escape => return (!event.repeat).then_some(Deferred::Escape),
            _ => {}
        }

        let (widget, out) = self.focused_widget()?;
        if widget.handle_key(event, out) {
            return None;
        }

        if let Some(direction) = event.key.direction() {
            if let Some(step) = widget.orientation().and_then(|o| o.step_for_key(direction)) {
                widget.navigate(step, out);
            }
        } else if event.key.is_activation() && !event.repeat {
            widget.activate(out);
        }
        None
    }

    /// D-pad or stick direction
    fn pad_direction(&mut self, direction: Direction) {
        let step = NavStep::from_pad(direction);
        if self.modal_open() {
            self.step_modal(step);
        } else if let Some((widget, out)) = self.focused_widget() {
            widget.navigate(step, out);
        }
    }

    pub fn gamepad_button(&mut self, event: &GamepadButtonEvent) -> Option<Deferred> {
        if !event.pressed {
            return None;
        }
        if let Some(direction) = pad::dpad_direction(event.button) {
            self.pad_direction(direction);
            return None;
        }

        let modal = self.modal_open();
        match event.button {
            pad::SOUTH if modal => return self.activate_modal(),
            pad::SOUTH => {
                if let Some((widget, out)) = self.focused_widget() {
                    widget.activate(out);
                }
            }
            pad::EAST if modal => return self.escape_modal(),
            pad::EAST => return Some(Deferred::Escape),
            pad::LEFT_BUMPER if modal => self.step_modal(NavStep::Prev),
            pad::RIGHT_BUMPER if modal => self.step_modal(NavStep::Next),
            pad::LEFT_BUMPER => {
                self.tab(NavStep::Prev);
            }
            pad::RIGHT_BUMPER => {
                self.tab(NavStep::Next);
            }
            _ => {}
        }
        None
    }

    /// Left stick acts like the D-pad, once per push past the dead zone
    pub fn gamepad_axis(&mut self, event: &GamepadAxisEvent) {
        let direction = event.left_stick.direction(event.dead_zone);
        if direction == self.stick {
            return;
        }
        self.stick = direction;
        if let Some(direction) = direction {
            self.pad_direction(direction);
        }
    }

    pub fn mouse_down(&mut self, event: &PointerEvent) {
        if event.button == Some(PointerButton::Primary) && !self.modal_open() {
            self.pressed = self.collection.hit_test(event.x, event.y);
        }
    }

    pub fn mouse_up(&mut self, event: &PointerEvent) {
        if event.button == Some(PointerButton::Primary) {
            self.pressed = None;
        }
    }

    pub fn mouse_move(&mut self, event: &PointerEvent) {
        if self.modal_open() {
            self.set_hovered(None);
            if let Some(modal) = self.collection.modals_mut().top_mut() {
                if let Some(index) = modal.button_at(event.x, event.y) {
                    modal.focus_button(index);
                }
            }
            return;
        }
        let over = self.collection.hit_test(event.x, event.y);
        self.set_hovered(over);

        if event.buttons.contains(PointerButtons::PRIMARY) {
            self.drag(event.x, event.y);
        }
    }

    pub fn mouse_click(&mut self, event: &PointerEvent) -> Option<Deferred> {
        match event.button {
            None | Some(PointerButton::Primary) => self.click_at(event.x, event.y),
            Some(_) => None,
        }
    }

    /// The first finger down is tracked until it lifts; others are ignored
    pub fn touch_start(&mut self, event: &TouchEvent) {
        if self.touch.is_some() {
            return;
        }
        let Some(point) = event.changed.first() else {
            return;
        };
        self.touch = Some(point.id);
        self.pressed = if self.modal_open() {
            None
        } else {
            self.collection.hit_test(point.x, point.y)
        };
    }

    fn tracked_point(&self, event: &TouchEvent) -> Option<TouchPoint> {
        let id = self.touch?;
        event.changed.iter().find(|p| p.id == id).copied()
    }

    pub fn touch_move(&mut self, event: &TouchEvent) {
        if let Some(point) = self.tracked_point(event) {
            self.drag(point.x, point.y);
        }
    }

    /// Lifting the tracked finger taps where it left the surface
    ///
    /// Outside a modal the tap only lands if the finger is still over the
    /// widget it went down on. Cancelled contacts never tap.
    pub fn touch_end(&mut self, event: &TouchEvent) -> Option<Deferred> {
        let point = self.tracked_point(event)?;
        self.touch = None;
        let pressed = self.pressed.take();
        if event.cancelled {
            return None;
        }
        if !self.modal_open() && self.collection.hit_test(point.x, point.y) != pressed {
            return None;
        }
        self.click_at(point.x, point.y)
    }

    fn drag(&mut self, x: f32, y: f32) {
        let Some(id) = self.pressed else {
            return;
        };
        if self.collection.entry(id).is_some_and(|e| e.is_enabled()) {
            if let Some(widget) = self.collection.get_mut(id) {
                widget.drag(x, y, &mut self.reactions);
            }
        }
    }

    fn set_hovered(&mut self, over: Option<WidgetId>) {
        if over == self.hovered {
            return;
        }
        if let Some(widget) = self.hovered.and_then(|id| self.collection.get_mut(id)) {
            widget.set_hovered(false);
        }
        if let Some(widget) = over.and_then(|id| self.collection.get_mut(id)) {
            widget.set_hovered(true);
        }
        self.hovered = over;
    }

    /// Click at a canvas point, routed to the top modal when one is open
    pub fn click_at(&mut self, x: f32, y: f32) -> Option<Deferred> {
        if let Some(modal) = self.top_modal() {
            if let Some(index) = modal.button_at(x, y) {
                return self.press_modal_button(index);
            }
            if !modal.contains(x, y) {
                self.close_modal();
            }
            return None;
        }

        let id = self.collection.hit_test(x, y)?;
        if !self.collection.entry(id).is_some_and(|e| e.is_enabled()) {
            return None;
        }
        self.focus(id);
        if let Some(widget) = self.collection.get_mut(id) {
            widget.click(x, y, &mut self.reactions);
        }
        None
    }

    /// Age toasts and tick widgets
    pub fn update(&mut self, delta_ms: f32) {
        self.collection.toasts_mut().tick(delta_ms);
        for widget in self.collection.widgets_mut() {
            widget.update(delta_ms);
        }
    }
}
