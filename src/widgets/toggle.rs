//! On/off toggle

use crate::layout::Rect;
use crate::widget::{Callback, Reactions, Widget, WidgetKind};
use std::any::Any;

pub struct Toggle {
    label: String,
    bounds: Rect,
    on: bool,
    focused: bool,
    on_change: Option<Callback<bool>>,
}

impl Toggle {
    pub fn new(label: impl Into<String>, bounds: Rect) -> Self {
        Self {
            label: label.into(),
            bounds,
            on: false,
            focused: false,
            on_change: None,
        }
    }

    pub fn with_value(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(bool) + 'static,
    {
        self.on_change = Some(Callback::new(callback));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Set the value without firing the callback
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }
}

impl Widget for Toggle {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Toggle
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn activate(&mut self, out: &mut Reactions) -> bool {
        self.on = !self.on;
        out.emit_opt(&self.on_change, self.on);
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
        "Toggle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_activation_flips() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut toggle = Toggle::new("Music", Rect::default()).on_change({
            let seen = Rc::clone(&seen);
            move |on| seen.borrow_mut().push(on)
        });

        let mut out = Reactions::new();
        toggle.activate(&mut out);
        assert!(toggle.is_on());
        toggle.click(0.0, 0.0, &mut out);
        assert!(!toggle.is_on());
        out.run();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
