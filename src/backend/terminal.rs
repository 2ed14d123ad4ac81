//! Terminal input through crossterm
//!
//! The terminal is treated as a canvas whose CSS size is the cell grid:
//! set the hub's buffer size to whatever the renderer draws at and
//! [`TerminalInput::canvas`] scales mouse cells into it.
//!
//! Most terminals never report key releases, so every press is delivered as
//! a down/up pair. Terminals that do report auto-repeat (the kitty keyboard
//! protocol) have those delivered as repeats of the tapped key.

use crate::event::{Key, Modifiers, PointerButton};
use crate::input::{CanvasMetrics, InputHub};
use anyhow::Result;
use crossterm::event::{
    Event as TermEvent, KeyCode, KeyEvent as TermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as TermMouseButton, MouseEventKind,
};
use std::time::Duration;

/// Raw-mode terminal feeding an [`InputHub`]
pub struct TerminalInput {
    _enabled: bool,
}

impl TerminalInput {
    /// Enter raw mode and enable mouse capture
    pub fn new() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;

        // Mouse capture is optional; keyboard input still works without it
        let _ = crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture);

        Ok(TerminalInput { _enabled: true })
    }

    /// Canvas metrics for a buffer of the given size shown on this terminal
    pub fn canvas(buffer_width: f32, buffer_height: f32) -> Result<CanvasMetrics> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(CanvasMetrics::new(buffer_width, buffer_height).with_css_size(cols as f32, rows as f32))
    }

    /// Wait up to `timeout` for input, then drain everything queued
    ///
    /// Returns the number of terminal events applied.
    pub fn pump(&self, hub: &InputHub, timeout: Duration) -> Result<usize> {
        let mut applied = 0;
        let mut wait = timeout;
        while crossterm::event::poll(wait)? {
            apply(hub, crossterm::event::read()?);
            applied += 1;
            wait = Duration::ZERO;
        }
        Ok(applied)
    }
}

impl Drop for TerminalInput {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Feed one crossterm event into the hub; false if it has no canonical form
pub fn apply(hub: &InputHub, event: TermEvent) -> bool {
    match event {
        TermEvent::Key(key_event) => apply_key(hub, key_event),
        TermEvent::Mouse(me) => {
            let (x, y) = (me.column as f32, me.row as f32);
            match me.kind {
                MouseEventKind::Down(button) => hub.mouse_down(x, y, convert_button(button)),
                MouseEventKind::Up(button) => {
                    let button = convert_button(button);
                    hub.mouse_up(x, y, button);
                    hub.mouse_click(x, y, button);
                }
                MouseEventKind::Drag(_) | MouseEventKind::Moved => hub.mouse_move(x, y),
                _ => return false,
            }
            true
        }
        TermEvent::Resize(cols, rows) => {
            hub.resize_css(cols as f32, rows as f32);
            true
        }
        _ => false,
    }
}

fn apply_key(hub: &InputHub, event: TermKeyEvent) -> bool {
    let Some((key, modifiers)) = convert_key(event.code, event.modifiers) else {
        return false;
    };
    match event.kind {
        KeyEventKind::Press => {
            hub.key_down(key, modifiers);
            hub.key_up(key, modifiers);
        }
        KeyEventKind::Repeat => hub.key_repeat(key, modifiers),
        KeyEventKind::Release => return false,
    }
    true
}

fn convert_button(button: TermMouseButton) -> PointerButton {
    match button {
        TermMouseButton::Left => PointerButton::Primary,
        TermMouseButton::Right => PointerButton::Secondary,
        TermMouseButton::Middle => PointerButton::Auxiliary,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    out.set(Modifiers::CONTROL, mods.contains(KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    out.set(
        Modifiers::META,
        mods.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    );
    out
}

/// Convert crossterm key code to our Key type
fn convert_key(code: KeyCode, mods: KeyModifiers) -> Option<(Key, Modifiers)> {
    let modifiers = convert_modifiers(mods);

    let key = match code {
        KeyCode::Char(c) => Key::from_char(c),
        KeyCode::F(n) => Key::F(n),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::BackTab => return Some((Key::Tab, modifiers | Modifiers::SHIFT)),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    Some((key, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, KeyEvent};
    use crate::input::{Handlers, InputSource};
    use crossterm::event::{KeyEventState, MouseEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode, mods: KeyModifiers) -> TermEvent {
        TermEvent::Key(TermKeyEvent::new(code, mods))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> TermEvent {
        TermEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_convert_key() {
        assert_eq!(
            convert_key(KeyCode::Char(' '), KeyModifiers::NONE),
            Some((Key::Space, Modifiers::empty()))
        );
        assert_eq!(
            convert_key(KeyCode::BackTab, KeyModifiers::NONE),
            Some((Key::Tab, Modifiers::SHIFT))
        );
        assert_eq!(
            convert_key(KeyCode::Char('w'), KeyModifiers::CONTROL),
            Some((Key::Char('w'), Modifiers::CONTROL))
        );
        assert_eq!(convert_key(KeyCode::Null, KeyModifiers::NONE), None);
    }

    #[test]
    fn test_press_is_a_tap() {
        let hub = InputHub::new();
        let downs = Rc::new(RefCell::new(Vec::<KeyEvent>::new()));
        {
            let downs = Rc::clone(&downs);
            hub.subscribe_owned(Handlers::new().on_key_down(move |e| {
                downs.borrow_mut().push(*e);
                Ok(())
            }));
        }

        assert!(apply(&hub, key(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(apply(&hub, key(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(!apply(
            &hub,
            TermEvent::Key(TermKeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Release,
                state: KeyEventState::NONE,
            })
        ));

        let downs = downs.borrow();
        assert_eq!(downs.len(), 2);
        assert!(downs.iter().all(|e| !e.repeat));
        assert!(!hub.state().is_key_down(Key::Enter));
    }

    #[test]
    fn test_repeat_is_marked() {
        let hub = InputHub::new();
        let downs = Rc::new(RefCell::new(Vec::<KeyEvent>::new()));
        {
            let downs = Rc::clone(&downs);
            hub.subscribe_owned(Handlers::new().on_key_down(move |e| {
                downs.borrow_mut().push(*e);
                Ok(())
            }));
        }

        apply(&hub, key(KeyCode::Enter, KeyModifiers::NONE));
        assert!(apply(
            &hub,
            TermEvent::Key(TermKeyEvent::new_with_kind(
                KeyCode::Enter,
                KeyModifiers::NONE,
                KeyEventKind::Repeat,
            ))
        ));

        let repeats: Vec<bool> = downs.borrow().iter().map(|e| e.repeat).collect();
        assert_eq!(repeats, vec![false, true]);
        assert!(!hub.state().is_key_down(Key::Enter));
    }

    #[test]
    fn test_mouse_cells_scaled() {
        let hub = InputHub::new();
        hub.set_canvas(CanvasMetrics::new(800.0, 480.0).with_css_size(80.0, 24.0));

        let kinds = Rc::new(RefCell::new(Vec::new()));
        {
            let record = |kind: EventKind| {
                let kinds = Rc::clone(&kinds);
                move |e: &crate::event::PointerEvent| -> crate::input::HandlerResult {
                    kinds.borrow_mut().push((kind, e.x, e.y));
                    Ok(())
                }
            };
            hub.subscribe_owned(
                Handlers::new()
                    .on_mouse_down(record(EventKind::MouseDown))
                    .on_mouse_up(record(EventKind::MouseUp))
                    .on_mouse_click(record(EventKind::MouseClick)),
            );
        }

        apply(&hub, mouse(MouseEventKind::Down(TermMouseButton::Left), 10, 6));
        apply(&hub, mouse(MouseEventKind::Up(TermMouseButton::Left), 10, 6));
        assert!(!apply(&hub, mouse(MouseEventKind::ScrollUp, 10, 6)));

        assert_eq!(
            *kinds.borrow(),
            vec![
                (EventKind::MouseDown, 100.0, 120.0),
                (EventKind::MouseUp, 100.0, 120.0),
                (EventKind::MouseClick, 100.0, 120.0),
            ]
        );
    }

    #[test]
    fn test_resize_updates_css_size() {
        let hub = InputHub::for_canvas(800.0, 480.0);
        apply(&hub, TermEvent::Resize(100, 40));
        let canvas = hub.canvas();
        assert_eq!((canvas.css_width, canvas.css_height), (100.0, 40.0));
        assert_eq!(canvas.buffer_width, 800.0);
    }
}
