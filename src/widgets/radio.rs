//! Radio group - moving the selection picks the option

use crate::layout::Rect;
use crate::widget::{cycle, Callback, NavStep, Orientation, Reactions, Widget, WidgetKind};
use std::any::Any;

pub struct Radio {
    options: Vec<String>,
    selected: usize,
    orientation: Orientation,
    bounds: Rect,
    focused: bool,
    on_change: Option<Callback<usize>>,
}

impl Radio {
    pub fn new<I, S>(options: I, bounds: Rect) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            selected: 0,
            orientation: Orientation::Vertical,
            bounds,
            focused: false,
            on_change: None,
        }
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn with_selected(mut self, index: usize) -> Self {
        if index < self.options.len() {
            self.selected = index;
        }
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.on_change = Some(Callback::new(callback));
        self
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn option_bounds(&self) -> Vec<Rect> {
        match self.orientation {
            Orientation::Vertical => self.bounds.rows(self.options.len()),
            Orientation::Horizontal => self.bounds.columns(self.options.len(), 0.0),
        }
    }

    fn pick(&mut self, index: usize, out: &mut Reactions) {
        if index == self.selected {
            return;
        }
        self.selected = index;
        out.emit_opt(&self.on_change, index);
    }
}

impl Widget for Radio {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Radio
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn orientation(&self) -> Option<Orientation> {
        Some(self.orientation)
    }

    fn navigate(&mut self, step: NavStep, out: &mut Reactions) -> bool {
        if self.options.is_empty() {
            return false;
        }
        let next = cycle(self.selected, self.options.len(), step);
        self.pick(next, out);
        true
    }

    fn click(&mut self, x: f32, y: f32, out: &mut Reactions) -> bool {
        match self.option_bounds().iter().position(|r| r.contains(x, y)) {
            Some(index) => {
                self.pick(index, out);
                true
            }
            None => false,
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
        "Radio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_navigation_picks_and_wraps() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut radio = Radio::new(["Easy", "Normal", "Hard"], Rect::default()).on_change({
            let changes = Rc::clone(&changes);
            move |i| changes.borrow_mut().push(i)
        });

        let mut out = Reactions::new();
        radio.navigate(NavStep::Prev, &mut out);
        radio.navigate(NavStep::Next, &mut out);
        assert_eq!(radio.selected(), 0);
        out.run();
        assert_eq!(*changes.borrow(), vec![2, 0]);
    }

    #[test]
    fn test_horizontal_click() {
        let mut radio = Radio::new(["A", "B"], Rect::new(0.0, 0.0, 100.0, 20.0)).horizontal();
        assert_eq!(radio.orientation(), Some(Orientation::Horizontal));
        assert!(radio.click(75.0, 5.0, &mut Reactions::new()));
        assert_eq!(radio.selected(), 1);
    }

    #[test]
    fn test_activation_not_consumed() {
        let mut radio = Radio::new(["A"], Rect::default());
        assert!(!radio.activate(&mut Reactions::new()));
    }
}
