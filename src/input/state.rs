//! Device state store
//!
//! One [`DeviceStore`] owns the canonical state of every input device. It hands
//! out [`StateView`]s that share the same storage but only allow reads, so
//! subscribers always see live state without being able to corrupt it.

use crate::event::{Key, PointerButtons, TouchPoint};
use crate::input::gamepad::GamepadSnapshot;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Pointer position and held buttons in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub buttons: PointerButtons,
}

/// Canonical state of all input devices
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    /// Pressed state per key; no entry means never pressed
    pub keys: HashMap<Key, bool>,
    pub pointer: Pointer,
    /// Active contacts in arrival order
    pub touches: Vec<TouchPoint>,
    /// Last sampled snapshot of the primary gamepad
    pub gamepad: Option<GamepadSnapshot>,
}

impl DeviceState {
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.get(&key).copied().unwrap_or(false)
    }
}

/// Writer side of the device state, held by the capture layer and poller
#[derive(Debug, Default)]
pub struct DeviceStore {
    state: Rc<RefCell<DeviceState>>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view sharing this store
    pub fn view(&self) -> StateView {
        StateView {
            state: Rc::clone(&self.state),
        }
    }

    /// Mutate the state; the borrow ends before any event is dispatched
    pub fn write<R>(&self, f: impl FnOnce(&mut DeviceState) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    pub fn read(&self) -> Ref<'_, DeviceState> {
        self.state.borrow()
    }
}

/// Read-only handle to live device state
#[derive(Debug, Clone)]
pub struct StateView {
    state: Rc<RefCell<DeviceState>>,
}

impl StateView {
    /// Borrow the whole state
    pub fn get(&self) -> Ref<'_, DeviceState> {
        self.state.borrow()
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.state.borrow().is_key_down(key)
    }

    pub fn pointer(&self) -> Pointer {
        self.state.borrow().pointer
    }

    pub fn touches(&self) -> Vec<TouchPoint> {
        self.state.borrow().touches.clone()
    }

    pub fn gamepad(&self) -> Option<GamepadSnapshot> {
        self.state.borrow().gamepad.clone()
    }

    /// Whether two views observe the same store
    pub fn same_store(&self, other: &StateView) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_observe_writes() {
        let store = DeviceStore::new();
        let view = store.view();
        let other = store.view();

        assert!(!view.is_key_down(Key::Enter));
        store.write(|s| {
            s.keys.insert(Key::Enter, true);
        });
        assert!(view.is_key_down(Key::Enter));
        assert!(other.is_key_down(Key::Enter));
        assert!(view.same_store(&other));
    }

    #[test]
    fn test_released_key_keeps_entry() {
        let store = DeviceStore::new();
        store.write(|s| {
            s.keys.insert(Key::Char('w'), true);
            s.keys.insert(Key::Char('w'), false);
        });
        let view = store.view();
        assert!(!view.is_key_down(Key::Char('w')));
        assert_eq!(view.get().keys.get(&Key::Char('w')), Some(&false));
        assert_eq!(view.get().keys.get(&Key::Char('q')), None);
    }
}
