//! Text input with cursor and editing support
//!
//! Provides a single-line text field with:
//! - Cursor positioning and movement
//! - Basic editing (insert, delete, backspace)
//! - Navigation (home, end, left, right, word jumps with Ctrl)
//! - Submission handling (enter key)
//!
//! While focused it consumes printable keys, Space, and Enter, so those never
//! reach activation handling.

use crate::event::{Key, KeyEvent, Modifiers};
use crate::layout::Rect;
use crate::widget::{Callback, Reactions, Widget, WidgetKind};
use std::any::Any;

/// Text input widget
pub struct TextInput {
    /// Input buffer
    buffer: String,
    /// Cursor position (byte offset)
    cursor: usize,
    placeholder: String,
    max_len: Option<usize>,
    bounds: Rect,
    focused: bool,
    /// Callback when Enter is pressed
    on_submit: Option<Callback<String>>,
}

impl TextInput {
    pub fn new(bounds: Rect) -> Self {
        TextInput {
            buffer: String::new(),
            cursor: 0,
            placeholder: String::new(),
            max_len: None,
            bounds,
            focused: false,
            on_submit: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Limit the value to `max` characters
    pub fn with_max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// Set submission callback
    pub fn on_submit<F>(mut self, mut callback: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.on_submit = Some(Callback::new(move |value: String| callback(&value)));
        self
    }

    /// Get current input value
    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Set the input value
    pub fn set_value(&mut self, value: &str) {
        self.buffer = value.to_string();
        self.cursor = self.buffer.len();
    }

    /// Clear the input
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Get cursor position
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn insert_char(&mut self, c: char) {
        if let Some(max) = self.max_len {
            if self.buffer.chars().count() >= max {
                return;
            }
        }
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete character before cursor (backspace)
    fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev_boundary = self.buffer[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);

            self.buffer.remove(prev_boundary);
            self.cursor = prev_boundary;
        }
    }

    /// Delete character at cursor (delete key)
    fn delete_char_at(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    fn move_left(&mut self) {
        self.cursor = self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }

    fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor = self.buffer[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.buffer.len());
        }
    }

    /// Move cursor to previous word boundary
    fn move_word_left(&mut self) {
        let chars: Vec<(usize, char)> = self.buffer[..self.cursor].char_indices().collect();
        if chars.is_empty() {
            return;
        }

        let mut i = chars.len() - 1;

        // Skip whitespace
        while i > 0 && chars[i].1.is_whitespace() {
            i -= 1;
        }

        // Skip word characters
        while i > 0 && !chars[i - 1].1.is_whitespace() {
            i -= 1;
        }

        self.cursor = chars.get(i).map(|(idx, _)| *idx).unwrap_or(0);
    }

    /// Move cursor to next word boundary
    fn move_word_right(&mut self) {
        let chars: Vec<(usize, char)> = self.buffer[self.cursor..].char_indices().collect();
        if chars.is_empty() {
            return;
        }

        let mut i = 0;
        while i < chars.len() && !chars[i].1.is_whitespace() {
            i += 1;
        }
        while i < chars.len() && chars[i].1.is_whitespace() {
            i += 1;
        }

        self.cursor = if i < chars.len() {
            self.cursor + chars[i].0
        } else {
            self.buffer.len()
        };
    }

    fn submit(&self, out: &mut Reactions) {
        out.emit_opt(&self.on_submit, self.buffer.clone());
    }
}

impl Widget for TextInput {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TextInput
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn activate(&mut self, out: &mut Reactions) -> bool {
        self.submit(out);
        true
    }

    /// Clicking only focuses the field
    fn click(&mut self, _x: f32, _y: f32, _out: &mut Reactions) -> bool {
        true
    }

    fn handle_key(&mut self, event: &KeyEvent, out: &mut Reactions) -> bool {
        let word = event.modifiers.contains(Modifiers::CONTROL);
        match event.key {
            Key::Char(c) if !word => self.insert_char(c),
            Key::Space => self.insert_char(' '),
            Key::Enter => {
                if !event.repeat {
                    self.submit(out);
                }
            }
            Key::Backspace => self.delete_char_before(),
            Key::Delete => self.delete_char_at(),
            Key::Left if word => self.move_word_left(),
            Key::Right if word => self.move_word_right(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.buffer.len(),
            _ => return false,
        }
        true
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "TextInput"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(input: &mut TextInput, key: Key) -> bool {
        input.handle_key(&KeyEvent::new(key), &mut Reactions::new())
    }

    #[test]
    fn test_typing() {
        let mut input = TextInput::new(Rect::default());
        for c in "hi there".chars() {
            assert!(press(&mut input, Key::from_char(c)));
        }
        assert_eq!(input.value(), "hi there");
        assert_eq!(input.cursor_position(), 8);
    }

    #[test]
    fn test_navigation() {
        let mut input = TextInput::new(Rect::default());
        input.set_value("hello world");

        press(&mut input, Key::Home);
        assert_eq!(input.cursor_position(), 0);

        press(&mut input, Key::End);
        assert_eq!(input.cursor_position(), 11);

        press(&mut input, Key::Left);
        assert_eq!(input.cursor_position(), 10);

        press(&mut input, Key::Right);
        assert_eq!(input.cursor_position(), 11);
    }

    #[test]
    fn test_deletion() {
        let mut input = TextInput::new(Rect::default());
        input.set_value("héllo");

        press(&mut input, Key::Backspace);
        assert_eq!(input.value(), "héll");

        press(&mut input, Key::Home);
        press(&mut input, Key::Right);
        press(&mut input, Key::Delete);
        assert_eq!(input.value(), "hll");
    }

    #[test]
    fn test_word_navigation() {
        let mut input = TextInput::new(Rect::default());
        input.set_value("hello world test");
        let ctrl = |key| KeyEvent::new(key).with_modifiers(Modifiers::CONTROL);

        let mut out = Reactions::new();
        input.handle_key(&KeyEvent::new(Key::Home), &mut out);
        input.handle_key(&ctrl(Key::Right), &mut out);
        assert_eq!(input.cursor_position(), 6);

        input.handle_key(&ctrl(Key::Right), &mut out);
        assert_eq!(input.cursor_position(), 12);

        input.handle_key(&ctrl(Key::Left), &mut out);
        assert_eq!(input.cursor_position(), 6);
    }

    #[test]
    fn test_max_len_and_submit() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let mut input = TextInput::new(Rect::default())
            .with_max_len(3)
            .on_submit({
                let submitted = Rc::clone(&submitted);
                move |value| submitted.borrow_mut().push(value.to_string())
            });

        for c in "abcd".chars() {
            press(&mut input, Key::Char(c));
        }
        let mut out = Reactions::new();
        input.handle_key(&KeyEvent::new(Key::Enter), &mut out);
        input.handle_key(&KeyEvent::new(Key::Enter).with_repeat(true), &mut out);
        input.set_value("changed");
        out.run();

        assert_eq!(*submitted.borrow(), vec!["abc".to_string()]);
    }

    #[test]
    fn test_unhandled_keys_pass_through() {
        let mut input = TextInput::new(Rect::default());
        assert!(!press(&mut input, Key::Tab));
        assert!(!press(&mut input, Key::Escape));
        assert!(!press(&mut input, Key::Up));
    }
}
