//! Subscription registry and event dispatch
//!
//! Any number of independent subscribers observe the same input stream. A
//! subscriber declares which event kinds it handles through [`Interests`];
//! the declaration is consulted on every dispatch, so a subscriber may change
//! its handler set over its lifetime.
//!
//! # Example
//!
//! ```ignore
//! let publisher = Publisher::new();
//! let sub = publisher.subscribe(Handlers::new().on_key_down(|event| {
//!     println!("pressed {:?}", event.key);
//!     Ok(())
//! }));
//!
//! // later
//! sub.stop();
//! ```

use crate::event::{
    EventKind, GamepadAxisEvent, GamepadButtonEvent, GamepadConnectedEvent, KeyEvent,
    PointerEvent, TouchEvent,
};
use bitflags::bitflags;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Result returned by subscriber handlers
pub type HandlerResult = anyhow::Result<()>;

bitflags! {
    /// Set of event kinds a subscriber handles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Interests: u16 {
        const KEY_DOWN = 1 << 0;
        const KEY_UP = 1 << 1;
        const MOUSE_MOVE = 1 << 2;
        const MOUSE_DOWN = 1 << 3;
        const MOUSE_UP = 1 << 4;
        const MOUSE_CLICK = 1 << 5;
        const MOUSE_ENTER = 1 << 6;
        const TOUCH_START = 1 << 7;
        const TOUCH_MOVE = 1 << 8;
        const TOUCH_END = 1 << 9;
        const GAMEPAD_CONNECTED = 1 << 10;
        const GAMEPAD_BUTTON = 1 << 11;
        const GAMEPAD_AXIS = 1 << 12;

        const KEYBOARD = Self::KEY_DOWN.bits() | Self::KEY_UP.bits();
        const MOUSE = Self::MOUSE_MOVE.bits()
            | Self::MOUSE_DOWN.bits()
            | Self::MOUSE_UP.bits()
            | Self::MOUSE_CLICK.bits()
            | Self::MOUSE_ENTER.bits();
        const TOUCH = Self::TOUCH_START.bits() | Self::TOUCH_MOVE.bits() | Self::TOUCH_END.bits();
        const GAMEPAD = Self::GAMEPAD_CONNECTED.bits()
            | Self::GAMEPAD_BUTTON.bits()
            | Self::GAMEPAD_AXIS.bits();
    }
}

impl From<EventKind> for Interests {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::KeyDown => Interests::KEY_DOWN,
            EventKind::KeyUp => Interests::KEY_UP,
            EventKind::MouseMove => Interests::MOUSE_MOVE,
            EventKind::MouseDown => Interests::MOUSE_DOWN,
            EventKind::MouseUp => Interests::MOUSE_UP,
            EventKind::MouseClick => Interests::MOUSE_CLICK,
            EventKind::MouseEnter => Interests::MOUSE_ENTER,
            EventKind::TouchStart => Interests::TOUCH_START,
            EventKind::TouchMove => Interests::TOUCH_MOVE,
            EventKind::TouchEnd => Interests::TOUCH_END,
            EventKind::GamepadConnected => Interests::GAMEPAD_CONNECTED,
            EventKind::GamepadButton => Interests::GAMEPAD_BUTTON,
            EventKind::GamepadAxis => Interests::GAMEPAD_AXIS,
        }
    }
}

/// Observer of the canonical input stream
///
/// Only handlers for kinds listed in [`Subscriber::interests`] are called.
pub trait Subscriber {
    /// Event kinds this subscriber currently handles
    fn interests(&self) -> Interests;

    fn on_key_down(&mut self, _event: &KeyEvent) -> HandlerResult {
        Ok(())
    }
    fn on_key_up(&mut self, _event: &KeyEvent) -> HandlerResult {
        Ok(())
    }
    fn on_mouse_move(&mut self, _event: &PointerEvent) -> HandlerResult {
        Ok(())
    }
    fn on_mouse_down(&mut self, _event: &PointerEvent) -> HandlerResult {
        Ok(())
    }
    fn on_mouse_up(&mut self, _event: &PointerEvent) -> HandlerResult {
        Ok(())
    }
    fn on_mouse_click(&mut self, _event: &PointerEvent) -> HandlerResult {
        Ok(())
    }
    fn on_mouse_enter(&mut self, _event: &PointerEvent) -> HandlerResult {
        Ok(())
    }
    fn on_touch_start(&mut self, _event: &TouchEvent) -> HandlerResult {
        Ok(())
    }
    fn on_touch_move(&mut self, _event: &TouchEvent) -> HandlerResult {
        Ok(())
    }
    fn on_touch_end(&mut self, _event: &TouchEvent) -> HandlerResult {
        Ok(())
    }
    fn on_gamepad_connected(&mut self, _event: &GamepadConnectedEvent) -> HandlerResult {
        Ok(())
    }
    fn on_gamepad_button(&mut self, _event: &GamepadButtonEvent) -> HandlerResult {
        Ok(())
    }
    fn on_gamepad_axis(&mut self, _event: &GamepadAxisEvent) -> HandlerResult {
        Ok(())
    }
}

/// Shared handle to a registered subscriber
pub type SharedSubscriber = Rc<RefCell<dyn Subscriber>>;

/// A handler failure caught during dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFault {
    pub subscription: u64,
    pub kind: EventKind,
    pub message: String,
    pub panicked: bool,
}

type FaultHook = Box<dyn FnMut(&HandlerFault)>;

struct Entry {
    id: u64,
    active: Rc<Cell<bool>>,
    subscriber: SharedSubscriber,
}

#[derive(Default)]
struct Registry {
    entries: RefCell<Vec<Rc<Entry>>>,
    next_id: Cell<u64>,
    fault_hook: RefCell<Option<FaultHook>>,
}

/// Disposable handle returned by [`Publisher::subscribe`]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop receiving events; further calls have no effect
    pub fn stop(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Registry of subscribers with capability-checked, fault-isolated dispatch
#[derive(Clone, Default)]
pub struct Publisher {
    registry: Rc<Registry>,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an owned subscriber
    pub fn subscribe<S: Subscriber + 'static>(&self, subscriber: S) -> Subscription {
        self.subscribe_shared(Rc::new(RefCell::new(subscriber)))
    }

    /// Register a subscriber the caller keeps a handle to
    pub fn subscribe_shared(&self, subscriber: SharedSubscriber) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);

        let active = Rc::new(Cell::new(true));
        self.registry.entries.borrow_mut().push(Rc::new(Entry {
            id,
            active: Rc::clone(&active),
            subscriber,
        }));

        Subscription { id, active }
    }

    /// Number of subscriptions that have not been stopped
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .entries
            .borrow()
            .iter()
            .filter(|e| e.active.get())
            .count()
    }

    /// Install a hook that receives every handler fault
    pub fn set_fault_hook<F>(&self, hook: F)
    where
        F: FnMut(&HandlerFault) + 'static,
    {
        *self.registry.fault_hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn key_down(&self, event: &KeyEvent) {
        self.dispatch(EventKind::KeyDown, |s| s.on_key_down(event));
    }

    pub fn key_up(&self, event: &KeyEvent) {
        self.dispatch(EventKind::KeyUp, |s| s.on_key_up(event));
    }

    pub fn mouse_move(&self, event: &PointerEvent) {
        self.dispatch(EventKind::MouseMove, |s| s.on_mouse_move(event));
    }

    pub fn mouse_down(&self, event: &PointerEvent) {
        self.dispatch(EventKind::MouseDown, |s| s.on_mouse_down(event));
    }

    pub fn mouse_up(&self, event: &PointerEvent) {
        self.dispatch(EventKind::MouseUp, |s| s.on_mouse_up(event));
    }

    pub fn mouse_click(&self, event: &PointerEvent) {
        self.dispatch(EventKind::MouseClick, |s| s.on_mouse_click(event));
    }

    pub fn mouse_enter(&self, event: &PointerEvent) {
        self.dispatch(EventKind::MouseEnter, |s| s.on_mouse_enter(event));
    }

    pub fn touch_start(&self, event: &TouchEvent) {
        self.dispatch(EventKind::TouchStart, |s| s.on_touch_start(event));
    }

    pub fn touch_move(&self, event: &TouchEvent) {
        self.dispatch(EventKind::TouchMove, |s| s.on_touch_move(event));
    }

    pub fn touch_end(&self, event: &TouchEvent) {
        self.dispatch(EventKind::TouchEnd, |s| s.on_touch_end(event));
    }

    pub fn gamepad_connected(&self, event: &GamepadConnectedEvent) {
        self.dispatch(EventKind::GamepadConnected, |s| {
            s.on_gamepad_connected(event)
        });
    }

    pub fn gamepad_button(&self, event: &GamepadButtonEvent) {
        self.dispatch(EventKind::GamepadButton, |s| s.on_gamepad_button(event));
    }

    pub fn gamepad_axis(&self, event: &GamepadAxisEvent) {
        self.dispatch(EventKind::GamepadAxis, |s| s.on_gamepad_axis(event));
    }

    /// Deliver one event to every interested, active subscriber
    ///
    /// Iterates a snapshot of the registry taken before the first handler runs,
    /// so handlers may subscribe or stop subscriptions freely.
    pub fn dispatch<F>(&self, kind: EventKind, mut deliver: F)
    where
        F: FnMut(&mut dyn Subscriber) -> HandlerResult,
    {
        let wanted = Interests::from(kind);
        let snapshot: Vec<Rc<Entry>> = self
            .registry
            .entries
            .borrow()
            .iter()
            .filter(|e| e.active.get())
            .cloned()
            .collect();

        for entry in &snapshot {
            if !entry.active.get() {
                continue;
            }

            let Ok(mut subscriber) = entry.subscriber.try_borrow_mut() else {
                log::debug!(
                    "subscriber {} is already handling an event, skipping {}",
                    entry.id,
                    kind
                );
                continue;
            };

            if !subscriber.interests().contains(wanted) {
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| deliver(&mut *subscriber)));
            drop(subscriber);

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => self.report(HandlerFault {
                    subscription: entry.id,
                    kind,
                    message: format!("{err:#}"),
                    panicked: false,
                }),
                Err(payload) => self.report(HandlerFault {
                    subscription: entry.id,
                    kind,
                    message: panic_message(payload.as_ref()),
                    panicked: true,
                }),
            }
        }

        self.reclaim();
    }

    fn report(&self, fault: HandlerFault) {
        log::warn!(
            "subscriber {} failed in {}: {}",
            fault.subscription,
            fault.kind,
            fault.message
        );

        // Taken out while running so the hook may replace itself
        let hook = self.registry.fault_hook.borrow_mut().take();
        if let Some(mut hook) = hook {
            hook(&fault);
            let mut slot = self.registry.fault_hook.borrow_mut();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }

    fn reclaim(&self) {
        if let Ok(mut entries) = self.registry.entries.try_borrow_mut() {
            entries.retain(|e| e.active.get());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

macro_rules! handlers {
    ($($field:ident, $method:ident, $flag:ident, $event:ty;)*) => {
        /// Capability record of optional handler closures
        ///
        /// Interests are exactly the closures that are present, re-read on every
        /// dispatch.
        #[derive(Default)]
        pub struct Handlers {
            $($field: Option<Box<dyn FnMut(&$event) -> HandlerResult>>,)*
        }

        impl Handlers {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $field<F>(mut self, handler: F) -> Self
                where
                    F: FnMut(&$event) -> HandlerResult + 'static,
                {
                    self.$field = Some(Box::new(handler));
                    self
                }
            )*
        }

        impl Subscriber for Handlers {
            fn interests(&self) -> Interests {
                let mut interests = Interests::empty();
                $(
                    if self.$field.is_some() {
                        interests |= Interests::$flag;
                    }
                )*
                interests
            }

            $(
                fn $method(&mut self, event: &$event) -> HandlerResult {
                    match self.$field.as_mut() {
                        Some(handler) => handler(event),
                        None => Ok(()),
                    }
                }
            )*
        }
    };
}

handlers! {
    on_key_down, on_key_down, KEY_DOWN, KeyEvent;
    on_key_up, on_key_up, KEY_UP, KeyEvent;
    on_mouse_move, on_mouse_move, MOUSE_MOVE, PointerEvent;
    on_mouse_down, on_mouse_down, MOUSE_DOWN, PointerEvent;
    on_mouse_up, on_mouse_up, MOUSE_UP, PointerEvent;
    on_mouse_click, on_mouse_click, MOUSE_CLICK, PointerEvent;
    on_mouse_enter, on_mouse_enter, MOUSE_ENTER, PointerEvent;
    on_touch_start, on_touch_start, TOUCH_START, TouchEvent;
    on_touch_move, on_touch_move, TOUCH_MOVE, TouchEvent;
    on_touch_end, on_touch_end, TOUCH_END, TouchEvent;
    on_gamepad_connected, on_gamepad_connected, GAMEPAD_CONNECTED, GamepadConnectedEvent;
    on_gamepad_button, on_gamepad_button, GAMEPAD_BUTTON, GamepadButtonEvent;
    on_gamepad_axis, on_gamepad_axis, GAMEPAD_AXIS, GamepadAxisEvent;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;
    use anyhow::bail;

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    fn counter() -> Rc<Cell<u32>> {
        Rc::new(Cell::new(0))
    }

    fn counting(count: &Rc<Cell<u32>>) -> Handlers {
        let count = Rc::clone(count);
        Handlers::new().on_key_down(move |_| {
            count.set(count.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_dispatch_in_subscription_order() {
        let publisher = Publisher::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            publisher.subscribe(Handlers::new().on_key_down(move |_| {
                log.borrow_mut().push(name);
                Ok(())
            }));
        }

        publisher.key_down(&key(Key::Enter));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failing_subscriber_is_isolated() {
        let publisher = Publisher::new();
        let first = counter();
        let third = counter();
        let faults = Rc::new(RefCell::new(Vec::new()));

        {
            let faults = Rc::clone(&faults);
            publisher.set_fault_hook(move |fault| faults.borrow_mut().push(fault.clone()));
        }

        publisher.subscribe(counting(&first));
        let failing = publisher.subscribe(Handlers::new().on_key_down(|_| bail!("boom")));
        publisher.subscribe(counting(&third));

        publisher.key_down(&key(Key::Char('x')));

        assert_eq!(first.get(), 1);
        assert_eq!(third.get(), 1);
        let faults = faults.borrow();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].subscription, failing.id());
        assert_eq!(faults[0].kind, EventKind::KeyDown);
        assert!(!faults[0].panicked);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let publisher = Publisher::new();
        let first = counter();
        let third = counter();
        let panics = counter();

        {
            let panics = Rc::clone(&panics);
            publisher.set_fault_hook(move |fault| {
                if fault.panicked {
                    panics.set(panics.get() + 1);
                }
            });
        }

        publisher.subscribe(counting(&first));
        publisher.subscribe(Handlers::new().on_key_down(|_| panic!("handler exploded")));
        publisher.subscribe(counting(&third));

        publisher.key_down(&key(Key::Tab));
        publisher.key_down(&key(Key::Tab));

        assert_eq!(first.get(), 2);
        assert_eq!(third.get(), 2);
        assert_eq!(panics.get(), 2);
        assert_eq!(publisher.subscriber_count(), 3);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let publisher = Publisher::new();
        let count = counter();
        let sub = publisher.subscribe(counting(&count));

        publisher.key_down(&key(Key::Enter));
        sub.stop();
        sub.stop();
        publisher.key_down(&key(Key::Enter));

        assert_eq!(count.get(), 1);
        assert!(!sub.is_active());
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_missing_handler_is_skipped() {
        let publisher = Publisher::new();
        let ups = counter();
        {
            let ups = Rc::clone(&ups);
            publisher.subscribe(Handlers::new().on_key_up(move |_| {
                ups.set(ups.get() + 1);
                Ok(())
            }));
        }

        publisher.key_down(&key(Key::Enter));
        assert_eq!(ups.get(), 0);
        publisher.key_up(&key(Key::Enter));
        assert_eq!(ups.get(), 1);
    }

    #[test]
    fn test_stop_during_dispatch() {
        let publisher = Publisher::new();
        let later = counter();
        let first = counter();

        let later_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        // First subscriber stops itself and the third one
        let own_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        {
            let own = Rc::clone(&own_sub);
            let victim = Rc::clone(&later_sub);
            let first = Rc::clone(&first);
            let sub = publisher.subscribe(Handlers::new().on_key_down(move |_| {
                first.set(first.get() + 1);
                if let Some(sub) = own.borrow().as_ref() {
                    sub.stop();
                }
                if let Some(sub) = victim.borrow().as_ref() {
                    sub.stop();
                }
                Ok(())
            }));
            *own_sub.borrow_mut() = Some(sub);
        }

        let middle = counter();
        publisher.subscribe(counting(&middle));
        *later_sub.borrow_mut() = Some(publisher.subscribe(counting(&later)));

        publisher.key_down(&key(Key::Enter));
        publisher.key_down(&key(Key::Enter));

        assert_eq!(first.get(), 1);
        assert_eq!(middle.get(), 2);
        assert_eq!(later.get(), 0);
        assert_eq!(publisher.subscriber_count(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_starts_next_event() {
        let publisher = Publisher::new();
        let added = counter();

        {
            let publisher_inner = publisher.clone();
            let added = Rc::clone(&added);
            let done = Cell::new(false);
            publisher.subscribe(Handlers::new().on_key_down(move |_| {
                if !done.replace(true) {
                    publisher_inner.subscribe(counting(&added));
                }
                Ok(())
            }));
        }

        publisher.key_down(&key(Key::Enter));
        assert_eq!(added.get(), 0);
        publisher.key_down(&key(Key::Enter));
        assert_eq!(added.get(), 1);
    }

    struct Toggling {
        enabled: bool,
        seen: u32,
    }

    impl Subscriber for Toggling {
        fn interests(&self) -> Interests {
            if self.enabled {
                Interests::KEY_DOWN
            } else {
                Interests::empty()
            }
        }

        fn on_key_down(&mut self, _event: &KeyEvent) -> HandlerResult {
            self.seen += 1;
            self.enabled = false;
            Ok(())
        }
    }

    #[test]
    fn test_interests_checked_per_dispatch() {
        let publisher = Publisher::new();
        let sub = Rc::new(RefCell::new(Toggling {
            enabled: true,
            seen: 0,
        }));
        publisher.subscribe_shared(sub.clone());

        publisher.key_down(&key(Key::Enter));
        publisher.key_down(&key(Key::Enter));
        assert_eq!(sub.borrow().seen, 1);

        sub.borrow_mut().enabled = true;
        publisher.key_down(&key(Key::Enter));
        assert_eq!(sub.borrow().seen, 2);
    }

    #[test]
    fn test_handlers_interests() {
        let handlers = Handlers::new()
            .on_mouse_click(|_| Ok(()))
            .on_gamepad_axis(|_| Ok(()));
        assert_eq!(
            handlers.interests(),
            Interests::MOUSE_CLICK | Interests::GAMEPAD_AXIS
        );
        assert!(Handlers::new().interests().is_empty());
    }
}
