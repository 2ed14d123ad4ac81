//! Widget collection - ordered widgets plus overlay layers
//!
//! Insertion order is tab order. The collection also carries the decoration
//! items the renderer draws (free text and images), the modal stack, and the
//! toast stack, so that a single clear drops the whole scene.

use crate::layout::Rect;
use crate::modal::ModalStack;
use crate::theme::Color;
use crate::toast::{ToastLevel, ToastStack};
use crate::widget::{Widget, WidgetId};

/// A widget plus its collection-level flags
pub struct Entry {
    id: WidgetId,
    widget: Box<dyn Widget>,
    enabled: bool,
    visible: bool,
}

impl Entry {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Member of the focusable subsequence
    pub fn is_focusable(&self) -> bool {
        self.enabled && self.visible && self.widget.focusable()
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("widget", &self.widget.name())
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .finish()
    }
}

/// Free text drawn by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: Option<f32>,
    pub color: Option<Color>,
}

impl TextItem {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size: None,
            color: None,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Image drawn by the renderer; `source` is resolved by the host
#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub source: String,
    pub bounds: Rect,
}

impl ImageItem {
    pub fn new(source: impl Into<String>, bounds: Rect) -> Self {
        Self {
            source: source.into(),
            bounds,
        }
    }
}

#[derive(Debug, Default)]
pub struct WidgetCollection {
    entries: Vec<Entry>,
    texts: Vec<TextItem>,
    images: Vec<ImageItem>,
    modals: ModalStack,
    toasts: ToastStack,
    next_id: u64,
}

impl WidgetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a widget at the end of the tab order
    pub fn add(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        self.next_id += 1;
        let id = WidgetId(self.next_id);
        self.entries.push(Entry {
            id,
            widget,
            enabled: true,
            visible: true,
        });
        id
    }

    pub fn remove(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index).widget)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.entry(id).is_some()
    }

    pub fn entry(&self, id: WidgetId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.entry(id).map(Entry::widget)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| e.widget.as_mut())
    }

    /// Set the enabled flag; false if the widget is unknown
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> bool {
        self.update_entry(id, |e| e.enabled = enabled)
    }

    /// Set the visible flag; false if the widget is unknown
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> bool {
        self.update_entry(id, |e| e.visible = visible)
    }

    fn update_entry(&mut self, id: WidgetId, f: impl FnOnce(&mut Entry)) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    /// Entries in tab order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub(crate) fn widgets_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Widget>> {
        self.entries.iter_mut().map(|e| &mut e.widget)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the focusable subsequence
    pub fn focusable_len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_focusable()).count()
    }

    /// Widget at an index of the focusable subsequence
    pub fn focusable_at(&self, index: usize) -> Option<WidgetId> {
        self.entries
            .iter()
            .filter(|e| e.is_focusable())
            .nth(index)
            .map(|e| e.id)
    }

    /// Index of a widget within the focusable subsequence
    pub fn focusable_position(&self, id: WidgetId) -> Option<usize> {
        self.entries
            .iter()
            .filter(|e| e.is_focusable())
            .position(|e| e.id == id)
    }

    /// Topmost visible widget under a point (later entries draw on top)
    pub fn hit_test(&self, x: f32, y: f32) -> Option<WidgetId> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.visible && e.widget.bounds().contains(x, y))
            .map(|e| e.id)
    }

    pub fn add_text(&mut self, item: TextItem) {
        self.texts.push(item);
    }

    pub fn add_image(&mut self, item: ImageItem) {
        self.images.push(item);
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }

    pub fn images(&self) -> &[ImageItem] {
        &self.images
    }

    pub fn modals(&self) -> &ModalStack {
        &self.modals
    }

    pub(crate) fn modals_mut(&mut self) -> &mut ModalStack {
        &mut self.modals
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub(crate) fn toasts_mut(&mut self) -> &mut ToastStack {
        &mut self.toasts
    }

    /// Queue a toast on top of the stack; returns its id
    pub fn push_toast(&mut self, message: impl Into<String>, level: ToastLevel, duration_ms: f32) -> u64 {
        self.toasts.push(message, level, duration_ms)
    }

    /// Drop widgets, decorations, modals, and toasts
    pub fn clear(&mut self) {
        self.clear_except_toasts();
        self.toasts.clear();
    }

    /// Drop everything except the toast stack
    pub fn clear_except_toasts(&mut self) {
        self.entries.clear();
        self.texts.clear();
        self.images.clear();
        self.modals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Button, Panel};

    fn button(x: f32) -> Box<dyn Widget> {
        Box::new(Button::new("b", Rect::new(x, 0.0, 10.0, 10.0)))
    }

    #[test]
    fn test_focusable_subsequence_skips_panels_and_hidden() {
        let mut c = WidgetCollection::new();
        let a = c.add(button(0.0));
        let _panel = c.add(Box::new(Panel::new(Rect::default())));
        let b = c.add(button(20.0));
        let d = c.add(button(40.0));

        assert_eq!(c.focusable_len(), 3);
        assert_eq!(c.focusable_position(b), Some(1));

        c.set_visible(b, false);
        assert_eq!(c.focusable_len(), 2);
        assert_eq!(c.focusable_position(b), None);
        assert_eq!(c.focusable_at(1), Some(d));

        c.set_enabled(a, false);
        assert_eq!(c.focusable_at(0), Some(d));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut c = WidgetCollection::new();
        let _under = c.add(Box::new(Panel::new(Rect::new(0.0, 0.0, 100.0, 100.0))));
        let over = c.add(button(5.0));
        assert_eq!(c.hit_test(6.0, 6.0), Some(over));
        c.set_visible(over, false);
        assert_ne!(c.hit_test(6.0, 6.0), Some(over));
        assert_eq!(c.hit_test(500.0, 6.0), None);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut c = WidgetCollection::new();
        let a = c.add(button(0.0));
        assert!(c.remove(a).is_some());
        assert!(c.remove(a).is_none());
        assert!(!c.set_enabled(a, true));
    }

    #[test]
    fn test_clear_variants() {
        let mut c = WidgetCollection::new();
        c.add(button(0.0));
        c.add_text(TextItem::new("score", 0.0, 0.0));
        c.add_image(ImageItem::new("logo.png", Rect::default()));
        c.toasts_mut().push("hi", ToastLevel::Info, 1000.0);

        c.clear_except_toasts();
        assert!(c.is_empty());
        assert!(c.texts().is_empty());
        assert!(c.images().is_empty());
        assert_eq!(c.toasts().len(), 1);

        c.clear();
        assert!(c.toasts().is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut c = WidgetCollection::new();
        let a = c.add(button(0.0));
        c.clear();
        let b = c.add(button(0.0));
        assert_ne!(a, b);
    }
}
