//! Decorative panel, never focusable

use crate::layout::Rect;
use crate::widget::{Reactions, Widget, WidgetKind};
use std::any::Any;

#[derive(Debug, Clone)]
pub struct Panel {
    bounds: Rect,
    title: Option<String>,
}

impl Panel {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Widget for Panel {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Panel
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn focusable(&self) -> bool {
        false
    }

    fn click(&mut self, _x: f32, _y: f32, _out: &mut Reactions) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "Panel"
    }
}
