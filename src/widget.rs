//! Widget trait - behavior every UI element exposes to the navigator
//!
//! Widgets are retained objects; painting happens elsewhere and reads their
//! state. The navigator only needs to know whether a widget can take focus,
//! which axis its internal selection moves along, and how it reacts to
//! activation, clicks, drags, and keys.
//!
//! Widget callbacks are never invoked from inside those methods. A widget
//! queues them on the [`Reactions`] it is handed, and the owner runs the queue
//! once it has released the scene, so a callback is free to reshape the UI.

use crate::event::{Direction, KeyEvent};
use crate::layout::Rect;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared user callback taking one argument
pub struct Callback<A>(Rc<RefCell<dyn FnMut(A)>>);

impl<A: 'static> Callback<A> {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(A) + 'static,
    {
        Callback(Rc::new(RefCell::new(callback)))
    }

    /// Invoke now; a callback that is already running is skipped
    pub fn call(&self, arg: A) {
        match self.0.try_borrow_mut() {
            Ok(mut callback) => (&mut *callback)(arg),
            Err(_) => log::debug!("skipped re-entrant widget callback"),
        }
    }
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Callback(Rc::clone(&self.0))
    }
}

impl<A> std::fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Callback")
    }
}

/// Callback invocations waiting for the scene to be released
#[derive(Default)]
pub struct Reactions {
    queue: Vec<Box<dyn FnOnce()>>,
}

impl Reactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `callback(arg)`
    pub fn emit<A: 'static>(&mut self, callback: &Callback<A>, arg: A) {
        let callback = callback.clone();
        self.queue.push(Box::new(move || callback.call(arg)));
    }

    /// Queue an optional callback, doing nothing when it is unset
    pub fn emit_opt<A: 'static>(&mut self, callback: &Option<Callback<A>>, arg: A) {
        if let Some(callback) = callback {
            self.emit(callback, arg);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run everything in the order it was queued
    pub fn run(self) {
        for reaction in self.queue {
            reaction();
        }
    }
}

impl std::fmt::Debug for Reactions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactions")
            .field("queued", &self.queue.len())
            .finish()
    }
}

/// Identity of a widget inside a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u64);

impl WidgetId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Concrete widget family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Button,
    Menu,
    Slider,
    Toggle,
    TextInput,
    Radio,
    Carousel,
    Panel,
}

/// Axis along which a composite widget moves its internal selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    /// Step for an arrow key, if the key lies on this axis
    pub fn step_for_key(&self, direction: Direction) -> Option<NavStep> {
        match (self, direction) {
            (Orientation::Vertical, Direction::Up) => Some(NavStep::Prev),
            (Orientation::Vertical, Direction::Down) => Some(NavStep::Next),
            (Orientation::Horizontal, Direction::Left) => Some(NavStep::Prev),
            (Orientation::Horizontal, Direction::Right) => Some(NavStep::Next),
            _ => None,
        }
    }
}

/// One step of internal selection movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep {
    Prev,
    Next,
}

impl NavStep {
    /// Step for a D-pad or stick direction, which ignores the widget's axis
    pub fn from_pad(direction: Direction) -> Self {
        match direction {
            Direction::Up | Direction::Left => NavStep::Prev,
            Direction::Down | Direction::Right => NavStep::Next,
        }
    }
}

/// Core trait for all UI elements
pub trait Widget {
    fn kind(&self) -> WidgetKind;

    /// Hit-test bounds in canvas coordinates
    fn bounds(&self) -> Rect;

    fn set_bounds(&mut self, bounds: Rect);

    /// Whether the widget can ever receive focus
    fn focusable(&self) -> bool {
        true
    }

    /// Axis of internal selection; `None` for non-composite widgets
    fn orientation(&self) -> Option<Orientation> {
        None
    }

    /// Move internal selection, returns true if consumed
    fn navigate(&mut self, _step: NavStep, _out: &mut Reactions) -> bool {
        false
    }

    /// Enter / Space / gamepad primary, returns true if consumed
    fn activate(&mut self, _out: &mut Reactions) -> bool {
        false
    }

    /// Pointer click at canvas coordinates inside the bounds
    fn click(&mut self, _x: f32, _y: f32, out: &mut Reactions) -> bool {
        self.activate(out)
    }

    /// Pointer moved with the primary button held after pressing on this widget
    fn drag(&mut self, _x: f32, _y: f32, _out: &mut Reactions) -> bool {
        false
    }

    /// Raw key while focused, offered before navigation handling
    fn handle_key(&mut self, _event: &KeyEvent, _out: &mut Reactions) -> bool {
        false
    }

    /// Called when the widget gains focus
    fn on_focus(&mut self) {}

    /// Called when the widget loses focus
    fn on_blur(&mut self) {}

    fn set_hovered(&mut self, _hovered: bool) {}

    /// Per-frame update with elapsed milliseconds
    fn update(&mut self, _delta_ms: f32) {}

    fn as_any(&self) -> &dyn Any;

    /// Get widget name for debugging
    fn name(&self) -> &str {
        "Widget"
    }
}

impl<'a> dyn Widget + 'a {
    /// Downcast to a concrete widget type
    pub fn downcast_ref<T: Widget + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Step a selection index with wrap-around
pub(crate) fn cycle(current: usize, len: usize, step: NavStep) -> usize {
    match step {
        NavStep::Next => (current + 1) % len,
        NavStep::Prev => (current + len - 1) % len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_steps_follow_orientation() {
        let v = Orientation::Vertical;
        let h = Orientation::Horizontal;
        assert_eq!(v.step_for_key(Direction::Down), Some(NavStep::Next));
        assert_eq!(v.step_for_key(Direction::Left), None);
        assert_eq!(h.step_for_key(Direction::Left), Some(NavStep::Prev));
        assert_eq!(h.step_for_key(Direction::Up), None);
    }

    #[test]
    fn test_pad_steps_ignore_orientation() {
        assert_eq!(NavStep::from_pad(Direction::Up), NavStep::Prev);
        assert_eq!(NavStep::from_pad(Direction::Left), NavStep::Prev);
        assert_eq!(NavStep::from_pad(Direction::Right), NavStep::Next);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(2, 3, NavStep::Next), 0);
        assert_eq!(cycle(0, 3, NavStep::Prev), 2);
        assert_eq!(cycle(0, 1, NavStep::Prev), 0);
    }

    struct Plain {
        bounds: Rect,
        activations: u32,
    }

    impl Widget for Plain {
        fn kind(&self) -> WidgetKind {
            WidgetKind::Button
        }

        fn bounds(&self) -> Rect {
            self.bounds
        }

        fn set_bounds(&mut self, bounds: Rect) {
            self.bounds = bounds;
        }

        fn activate(&mut self, _out: &mut Reactions) -> bool {
            self.activations += 1;
            true
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_default_click_activates() {
        let mut w = Plain {
            bounds: Rect::default(),
            activations: 0,
        };
        assert!(w.click(0.0, 0.0, &mut Reactions::new()));
        assert_eq!(w.activations, 1);

        let boxed: Box<dyn Widget> = Box::new(w);
        assert_eq!(boxed.downcast_ref::<Plain>().map(|p| p.activations), Some(1));
        assert_eq!(boxed.name(), "Widget");
    }

    #[test]
    fn test_reactions_wait_for_run() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let callback = Callback::new({
            let seen = Rc::clone(&seen);
            move |v: u32| seen.borrow_mut().push(v)
        });

        let mut out = Reactions::new();
        out.emit(&callback, 1);
        out.emit_opt(&Some(callback.clone()), 2);
        out.emit_opt(&None::<Callback<u32>>, 3);
        assert_eq!(out.len(), 2);
        assert!(seen.borrow().is_empty());

        out.run();
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_reentrant_callback_skipped() {
        let calls = Rc::new(RefCell::new(0));
        let slot: Rc<RefCell<Option<Callback<()>>>> = Rc::new(RefCell::new(None));
        let callback = Callback::new({
            let calls = Rc::clone(&calls);
            let slot = Rc::clone(&slot);
            move |_| {
                *calls.borrow_mut() += 1;
                if let Some(inner) = slot.borrow().as_ref() {
                    inner.call(());
                }
            }
        });
        *slot.borrow_mut() = Some(callback.clone());

        callback.call(());
        assert_eq!(*calls.borrow(), 1);
    }
}
