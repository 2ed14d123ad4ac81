//! Window input through winit
//!
//! Feed every `WindowEvent` of the render window to
//! [`WinitInput::handle_window_event`]. Cursor and touch positions arrive in
//! physical pixels, so the hub's CSS size tracks the window's physical size.

use crate::event::{Key, Modifiers, PointerButton};
use crate::input::{InputHub, RawTouch};
use ::winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use ::winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

/// Per-window translation state
#[derive(Debug, Default)]
pub struct WinitInput {
    modifiers: Modifiers,
    cursor: (f32, f32),
    primary_down: bool,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cursor position in window pixels
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    /// Translate one window event; false if it has no canonical form
    pub fn handle_window_event(&mut self, hub: &InputHub, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let Some(key) = convert_key(&event.logical_key) else {
                    return false;
                };
                self.key_input(hub, key, event.state);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(hub, position.x as f32, position.y as f32);
            }
            WindowEvent::CursorEntered { .. } => {
                let (x, y) = self.cursor;
                hub.mouse_enter(x, y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = convert_button(*button) else {
                    return false;
                };
                self.mouse_input(hub, *state, button);
            }
            WindowEvent::Touch(touch) => {
                let point = RawTouch::new(touch.id, touch.location.x as f32, touch.location.y as f32);
                touch_input(hub, touch.phase, point);
            }
            WindowEvent::Resized(size) => {
                hub.resize_css(size.width as f32, size.height as f32);
            }
            _ => return false,
        }
        true
    }

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, state.shift_key());
        modifiers.set(Modifiers::CONTROL, state.control_key());
        modifiers.set(Modifiers::ALT, state.alt_key());
        modifiers.set(Modifiers::META, state.super_key());
        self.modifiers = modifiers;
    }

    pub fn key_input(&mut self, hub: &InputHub, key: Key, state: ElementState) {
        match state {
            ElementState::Pressed => hub.key_down(key, self.modifiers),
            ElementState::Released => hub.key_up(key, self.modifiers),
        }
    }

    pub fn cursor_moved(&mut self, hub: &InputHub, x: f32, y: f32) {
        self.cursor = (x, y);
        hub.mouse_move(x, y);
    }

    /// Button press or release at the last cursor position
    ///
    /// A primary release that follows a primary press also produces a click.
    pub fn mouse_input(&mut self, hub: &InputHub, state: ElementState, button: PointerButton) {
        let (x, y) = self.cursor;
        match state {
            ElementState::Pressed => {
                if button == PointerButton::Primary {
                    self.primary_down = true;
                }
                hub.mouse_down(x, y, button);
            }
            ElementState::Released => {
                hub.mouse_up(x, y, button);
                if button == PointerButton::Primary && std::mem::take(&mut self.primary_down) {
                    hub.mouse_click(x, y, button);
                }
            }
        }
    }
}

pub fn touch_input(hub: &InputHub, phase: TouchPhase, point: RawTouch) {
    let changed = [point];
    match phase {
        TouchPhase::Started => hub.touch_start(&changed),
        TouchPhase::Moved => hub.touch_move(&changed),
        TouchPhase::Ended => hub.touch_end(&changed),
        TouchPhase::Cancelled => hub.touch_cancel(&changed),
    }
}

fn convert_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Auxiliary),
        MouseButton::Back => Some(PointerButton::Back),
        MouseButton::Forward => Some(PointerButton::Forward),
        MouseButton::Other(_) => None,
    }
}

/// Map a winit logical key; multi-character text has no single key
pub fn convert_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(named) => convert_named(*named),
        WinitKey::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::from_char(c)),
                _ => None,
            }
        }
        _ => None,
    }
}

pub fn convert_named(named: NamedKey) -> Option<Key> {
    let key = match named {
        NamedKey::Enter => Key::Enter,
        NamedKey::Escape => Key::Escape,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Insert => Key::Insert,
        NamedKey::Tab => Key::Tab,
        NamedKey::Space => Key::Space,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::ArrowUp => Key::Up,
        NamedKey::ArrowDown => Key::Down,
        NamedKey::ArrowLeft => Key::Left,
        NamedKey::ArrowRight => Key::Right,
        NamedKey::Shift => Key::Shift,
        NamedKey::Control => Key::Control,
        NamedKey::Alt => Key::Alt,
        NamedKey::Super | NamedKey::Meta => Key::Meta,
        NamedKey::F1 => Key::F(1),
        NamedKey::F2 => Key::F(2),
        NamedKey::F3 => Key::F(3),
        NamedKey::F4 => Key::F(4),
        NamedKey::F5 => Key::F(5),
        NamedKey::F6 => Key::F(6),
        NamedKey::F7 => Key::F(7),
        NamedKey::F8 => Key::F(8),
        NamedKey::F9 => Key::F(9),
        NamedKey::F10 => Key::F(10),
        NamedKey::F11 => Key::F(11),
        NamedKey::F12 => Key::F(12),
        _ => return None,
    };
    Some(key)
}
