//! Horizontal carousel of items, one visible at a time

use crate::layout::Rect;
use crate::widget::{cycle, Callback, NavStep, Orientation, Reactions, Widget, WidgetKind};
use std::any::Any;

pub struct Carousel {
    items: Vec<String>,
    index: usize,
    bounds: Rect,
    focused: bool,
    on_change: Option<Callback<usize>>,
    on_activate: Option<Callback<usize>>,
}

impl Carousel {
    pub fn new<I, S>(items: I, bounds: Rect) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            index: 0,
            bounds,
            focused: false,
            on_change: None,
            on_activate: None,
        }
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.on_change = Some(Callback::new(callback));
        self
    }

    pub fn on_activate<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.on_activate = Some(Callback::new(callback));
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.index).map(String::as_str)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn step(&mut self, step: NavStep, out: &mut Reactions) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.index = cycle(self.index, self.items.len(), step);
        out.emit_opt(&self.on_change, self.index);
        true
    }
}

impl Widget for Carousel {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Carousel
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn orientation(&self) -> Option<Orientation> {
        Some(Orientation::Horizontal)
    }

    fn navigate(&mut self, step: NavStep, out: &mut Reactions) -> bool {
        self.step(step, out)
    }

    fn activate(&mut self, out: &mut Reactions) -> bool {
        if self.items.is_empty() {
            return false;
        }
        out.emit_opt(&self.on_activate, self.index);
        true
    }

    /// Left third steps back, right third steps forward, middle activates
    fn click(&mut self, x: f32, _y: f32, out: &mut Reactions) -> bool {
        let third = self.bounds.width / 3.0;
        if x < self.bounds.x + third {
            self.step(NavStep::Prev, out)
        } else if x >= self.bounds.right() - third {
            self.step(NavStep::Next, out)
        } else {
            self.activate(out)
        }
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
        "Carousel"
    }
}
