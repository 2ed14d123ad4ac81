//! Push button

use crate::layout::Rect;
use crate::widget::{Callback, Reactions, Widget, WidgetKind};
use std::any::Any;

/// Push button that fires a callback on activation or click
pub struct Button {
    label: String,
    bounds: Rect,
    focused: bool,
    hovered: bool,
    on_click: Option<Callback<()>>,
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("bounds", &self.bounds)
            .field("focused", &self.focused)
            .finish()
    }
}

impl Button {
    pub fn new(label: impl Into<String>, bounds: Rect) -> Self {
        Self {
            label: label.into(),
            bounds,
            focused: false,
            hovered: false,
            on_click: None,
        }
    }

    pub fn on_click<F>(mut self, mut callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_click = Some(Callback::new(move |()| callback()));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

impl Widget for Button {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn activate(&mut self, out: &mut Reactions) -> bool {
        out.emit_opt(&self.on_click, ());
        true
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "Button"
    }
}
