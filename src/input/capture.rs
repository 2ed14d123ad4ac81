//! Capture layer - normalizes raw device input and feeds the publisher
//!
//! Backends (terminal, winit, or the host's own event loop) call into an
//! [`InputHub`] with raw client coordinates and key identities. The hub
//! updates the device state first, then dispatches the canonical event.

use crate::event::{
    Key, KeyEvent, Modifiers, PointerButton, PointerEvent, TouchEvent, TouchPoint,
};
use crate::input::gamepad::{GamepadEvent, GamepadPoller, GamepadSource};
use crate::input::publisher::{Publisher, SharedSubscriber, Subscriber, Subscription};
use crate::input::state::{DeviceStore, StateView};
use crate::input::InputSource;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Mapping between client coordinates and the drawing buffer
///
/// The canvas is drawn at `buffer_width` x `buffer_height` but may be
/// displayed stretched to `css_width` x `css_height` at `offset_x`/`offset_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMetrics {
    pub buffer_width: f32,
    pub buffer_height: f32,
    pub css_width: f32,
    pub css_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl CanvasMetrics {
    /// Canvas displayed at its own size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            buffer_width: width,
            buffer_height: height,
            css_width: width,
            css_height: height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn with_css_size(mut self, width: f32, height: f32) -> Self {
        self.css_width = width;
        self.css_height = height;
        self
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Horizontal and vertical buffer pixels per client pixel
    pub fn scale(&self) -> (f32, f32) {
        (
            ratio(self.buffer_width, self.css_width),
            ratio(self.buffer_height, self.css_height),
        )
    }

    /// Convert client coordinates into drawing-buffer coordinates
    pub fn to_local(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        let (sx, sy) = self.scale();
        (
            (client_x - self.offset_x) * sx,
            (client_y - self.offset_y) * sy,
        )
    }
}

fn ratio(buffer: f32, css: f32) -> f32 {
    if css > 0.0 && buffer > 0.0 {
        buffer / css
    } else {
        1.0
    }
}

/// Raw contact point in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTouch {
    pub id: u64,
    pub client_x: f32,
    pub client_y: f32,
}

impl RawTouch {
    pub fn new(id: u64, client_x: f32, client_y: f32) -> Self {
        Self {
            id,
            client_x,
            client_y,
        }
    }
}

/// Built-in input source: device state, publisher, and gamepad poller
#[derive(Debug, Default)]
pub struct InputHub {
    store: DeviceStore,
    publisher: Publisher,
    canvas: Cell<CanvasMetrics>,
    poller: RefCell<GamepadPoller>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hub for a canvas drawn at `width` x `height`
    pub fn for_canvas(width: f32, height: f32) -> Self {
        let hub = Self::new();
        hub.set_canvas(CanvasMetrics::new(width, height));
        hub
    }

    pub fn with_gamepads(self, source: impl GamepadSource + 'static) -> Self {
        self.poller.borrow_mut().set_source(source);
        self
    }

    /// Shared handle, the form [`crate::UiBuilder::input`] takes
    pub fn into_shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn canvas(&self) -> CanvasMetrics {
        self.canvas.get()
    }

    pub fn set_canvas(&self, metrics: CanvasMetrics) {
        self.canvas.set(metrics);
    }

    /// The canvas element was resized by its container
    pub fn resize_css(&self, width: f32, height: f32) {
        let metrics = self.canvas.get().with_css_size(width, height);
        self.canvas.set(metrics);
    }

    pub fn key_down(&self, key: Key, modifiers: Modifiers) {
        let repeat = self
            .store
            .write(|s| s.keys.insert(key, true).unwrap_or(false));
        let event = KeyEvent {
            key,
            modifiers,
            repeat,
        };
        self.publisher.key_down(&event);
    }

    /// Auto-repeat reported by a source that already delivered the press,
    /// whatever the key's recorded state
    pub fn key_repeat(&self, key: Key, modifiers: Modifiers) {
        let event = KeyEvent {
            key,
            modifiers,
            repeat: true,
        };
        self.publisher.key_down(&event);
    }

    pub fn key_up(&self, key: Key, modifiers: Modifiers) {
        self.store.write(|s| {
            s.keys.insert(key, false);
        });
        let event = KeyEvent {
            key,
            modifiers,
            repeat: false,
        };
        self.publisher.key_up(&event);
    }

    pub fn mouse_move(&self, client_x: f32, client_y: f32) {
        let event = self.pointer_event(client_x, client_y, None, |_| {});
        self.publisher.mouse_move(&event);
    }

    pub fn mouse_enter(&self, client_x: f32, client_y: f32) {
        let event = self.pointer_event(client_x, client_y, None, |_| {});
        self.publisher.mouse_enter(&event);
    }

    pub fn mouse_down(&self, client_x: f32, client_y: f32, button: PointerButton) {
        let event = self.pointer_event(client_x, client_y, Some(button), |buttons| {
            buttons.insert(button.mask())
        });
        self.publisher.mouse_down(&event);
    }

    pub fn mouse_up(&self, client_x: f32, client_y: f32, button: PointerButton) {
        let event = self.pointer_event(client_x, client_y, Some(button), |buttons| {
            buttons.remove(button.mask())
        });
        self.publisher.mouse_up(&event);
    }

    pub fn mouse_click(&self, client_x: f32, client_y: f32, button: PointerButton) {
        let event = self.pointer_event(client_x, client_y, Some(button), |_| {});
        self.publisher.mouse_click(&event);
    }

    fn pointer_event(
        &self,
        client_x: f32,
        client_y: f32,
        button: Option<PointerButton>,
        update: impl FnOnce(&mut crate::event::PointerButtons),
    ) -> PointerEvent {
        let (x, y) = self.canvas.get().to_local(client_x, client_y);
        self.store.write(|s| {
            s.pointer.x = x;
            s.pointer.y = y;
            update(&mut s.pointer.buttons);
            PointerEvent {
                x,
                y,
                button,
                buttons: s.pointer.buttons,
            }
        })
    }

    pub fn touch_start(&self, changed: &[RawTouch]) {
        let event = self.touch_event(changed, |touches, point| {
            match touches.iter_mut().find(|t| t.id == point.id) {
                Some(existing) => *existing = point,
                None => touches.push(point),
            }
        });
        self.publisher.touch_start(&event);
    }

    pub fn touch_move(&self, changed: &[RawTouch]) {
        let event = self.touch_event(changed, |touches, point| {
            if let Some(existing) = touches.iter_mut().find(|t| t.id == point.id) {
                *existing = point;
            }
        });
        self.publisher.touch_move(&event);
    }

    pub fn touch_end(&self, changed: &[RawTouch]) {
        let event = self.end_touches(changed);
        self.publisher.touch_end(&event);
    }

    /// Contacts aborted by the platform, delivered as a touch end with
    /// `cancelled` set
    pub fn touch_cancel(&self, changed: &[RawTouch]) {
        let mut event = self.end_touches(changed);
        event.cancelled = true;
        self.publisher.touch_end(&event);
    }

    fn end_touches(&self, changed: &[RawTouch]) -> TouchEvent {
        self.touch_event(changed, |touches, point| {
            touches.retain(|t| t.id != point.id);
        })
    }

    fn touch_event(
        &self,
        changed: &[RawTouch],
        mut apply: impl FnMut(&mut Vec<TouchPoint>, TouchPoint),
    ) -> TouchEvent {
        let canvas = self.canvas.get();
        let changed: Vec<TouchPoint> = changed
            .iter()
            .map(|raw| {
                let (x, y) = canvas.to_local(raw.client_x, raw.client_y);
                TouchPoint { id: raw.id, x, y }
            })
            .collect();

        // Built aside and swapped in whole
        let mut touches = self.store.read().touches.clone();
        for point in &changed {
            apply(&mut touches, *point);
        }
        self.store.write(|s| s.touches = touches.clone());

        TouchEvent {
            changed,
            touches,
            cancelled: false,
        }
    }

    /// Sample gamepads and dispatch whatever changed
    pub fn poll_gamepads(&self) {
        let outcome = self.poller.borrow_mut().poll();
        self.store.write(|s| s.gamepad = outcome.primary);

        for event in &outcome.events {
            match event {
                GamepadEvent::Connected(e) => self.publisher.gamepad_connected(e),
                GamepadEvent::Button(e) => self.publisher.gamepad_button(e),
                GamepadEvent::Axis(e) => self.publisher.gamepad_axis(e),
            }
        }
    }

    /// Register an owned subscriber
    pub fn subscribe_owned<S: Subscriber + 'static>(&self, subscriber: S) -> Subscription {
        self.publisher.subscribe(subscriber)
    }
}

impl InputSource for InputHub {
    fn state(&self) -> StateView {
        self.store.view()
    }

    fn subscribe(&self, subscriber: SharedSubscriber) -> Subscription {
        self.publisher.subscribe_shared(subscriber)
    }

    fn update(&self) {
        self.poll_gamepads();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{pad, PointerButtons};
    use crate::input::gamepad::VirtualGamepads;
    use crate::input::publisher::Handlers;

    #[test]
    fn test_canvas_scale_correction() {
        let hub = InputHub::new();
        hub.set_canvas(CanvasMetrics::new(1280.0, 720.0).with_css_size(640.0, 360.0));

        let seen = Rc::new(Cell::new((0.0, 0.0)));
        {
            let seen = Rc::clone(&seen);
            hub.subscribe_owned(Handlers::new().on_mouse_move(move |e| {
                seen.set((e.x, e.y));
                Ok(())
            }));
        }

        hub.mouse_move(320.0, 180.0);
        assert_eq!(seen.get(), (640.0, 360.0));
        let pointer = hub.state().pointer();
        assert_eq!((pointer.x, pointer.y), (640.0, 360.0));
    }

    #[test]
    fn test_axes_scale_independently() {
        let metrics = CanvasMetrics::new(800.0, 600.0)
            .with_css_size(400.0, 600.0)
            .with_offset(10.0, 20.0);
        assert_eq!(metrics.to_local(110.0, 120.0), (200.0, 100.0));
    }

    #[test]
    fn test_zero_css_size_is_identity() {
        let metrics = CanvasMetrics::new(800.0, 600.0).with_css_size(0.0, 0.0);
        assert_eq!(metrics.to_local(5.0, 7.0), (5.0, 7.0));
    }

    #[test]
    fn test_key_repeat_flag() {
        let hub = InputHub::new();
        let repeats = Rc::new(RefCell::new(Vec::new()));
        {
            let repeats = Rc::clone(&repeats);
            hub.subscribe_owned(Handlers::new().on_key_down(move |e| {
                repeats.borrow_mut().push(e.repeat);
                Ok(())
            }));
        }

        hub.key_down(Key::Enter, Modifiers::empty());
        hub.key_down(Key::Enter, Modifiers::empty());
        hub.key_up(Key::Enter, Modifiers::empty());
        hub.key_down(Key::Enter, Modifiers::empty());

        assert_eq!(*repeats.borrow(), vec![false, true, false]);
        assert!(hub.state().is_key_down(Key::Enter));
    }

    #[test]
    fn test_pointer_button_mask() {
        let hub = InputHub::for_canvas(100.0, 100.0);
        hub.mouse_down(1.0, 1.0, PointerButton::Primary);
        hub.mouse_down(1.0, 1.0, PointerButton::Secondary);
        assert_eq!(
            hub.state().pointer().buttons,
            PointerButtons::PRIMARY | PointerButtons::SECONDARY
        );
        hub.mouse_up(1.0, 1.0, PointerButton::Primary);
        assert_eq!(hub.state().pointer().buttons, PointerButtons::SECONDARY);
    }

    #[test]
    fn test_touch_tracking() {
        let hub = InputHub::for_canvas(200.0, 200.0);
        hub.set_canvas(CanvasMetrics::new(200.0, 200.0).with_css_size(100.0, 100.0));

        let ends = Rc::new(RefCell::new(Vec::new()));
        {
            let ends = Rc::clone(&ends);
            hub.subscribe_owned(Handlers::new().on_touch_end(move |e| {
                ends.borrow_mut().push(e.clone());
                Ok(())
            }));
        }

        hub.touch_start(&[RawTouch::new(7, 10.0, 10.0), RawTouch::new(9, 20.0, 20.0)]);
        hub.touch_move(&[RawTouch::new(7, 15.0, 10.0)]);

        let touches = hub.state().touches();
        assert_eq!(touches.len(), 2);
        assert_eq!(touches[0], TouchPoint { id: 7, x: 30.0, y: 20.0 });
        assert_eq!(touches[1].id, 9);

        hub.touch_end(&[RawTouch::new(7, 15.0, 10.0)]);
        let touches = hub.state().touches();
        assert_eq!(touches.len(), 1);
        assert_eq!(touches[0].id, 9);

        hub.touch_cancel(&[RawTouch::new(9, 20.0, 20.0)]);
        assert!(hub.state().touches().is_empty());

        let ends = ends.borrow();
        assert_eq!(ends[0].changed[0].id, 7);
        assert_eq!(ends[0].touches.len(), 1);
        assert!(!ends[0].cancelled);
        assert_eq!(ends[1].changed[0], TouchPoint { id: 9, x: 40.0, y: 40.0 });
        assert!(ends[1].cancelled);
    }

    #[test]
    fn test_gamepad_poll_updates_state() {
        let pads = VirtualGamepads::new();
        let hub = InputHub::new().with_gamepads(pads.clone());

        hub.update();
        assert!(hub.state().gamepad().is_none());

        let connected = Rc::new(Cell::new(0));
        {
            let connected = Rc::clone(&connected);
            hub.subscribe_owned(Handlers::new().on_gamepad_connected(move |_| {
                connected.set(connected.get() + 1);
                Ok(())
            }));
        }

        pads.connect(0, "Test Pad");
        pads.set_button(0, pad::SOUTH, true);
        hub.update();
        hub.update();

        assert_eq!(connected.get(), 1);
        let snapshot = hub.state().gamepad().expect("pad sampled");
        assert!(snapshot.is_pressed(pad::SOUTH));
    }

    #[test]
    fn test_state_identity_is_stable() {
        let hub = InputHub::new();
        let before = hub.state();
        hub.key_down(Key::Tab, Modifiers::empty());
        hub.touch_start(&[RawTouch::new(1, 0.0, 0.0)]);
        assert!(before.same_store(&hub.state()));
        assert!(before.is_key_down(Key::Tab));
    }
}
