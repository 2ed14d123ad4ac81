//! Vertical menu with a cyclic selection
//!
//! Up/Down (or the D-pad) move the highlighted item and wrap at both ends.
//! Activation or a click on an item reports the choice.

use crate::layout::Rect;
use crate::widget::{cycle, Callback, NavStep, Orientation, Reactions, Widget, WidgetKind};
use std::any::Any;

pub struct Menu {
    items: Vec<String>,
    selected: usize,
    bounds: Rect,
    focused: bool,
    /// Receives index and item label
    on_select: Option<Callback<(usize, String)>>,
}

impl Menu {
    pub fn new<I, S>(items: I, bounds: Rect) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            selected: 0,
            bounds,
            focused: false,
            on_select: None,
        }
    }

    pub fn on_select<F>(mut self, mut callback: F) -> Self
    where
        F: FnMut(usize, &str) + 'static,
    {
        self.on_select = Some(Callback::new(move |(index, item): (usize, String)| {
            callback(index, &item)
        }));
        self
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = index;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Bounds of each item, top to bottom
    pub fn item_bounds(&self) -> Vec<Rect> {
        self.bounds.rows(self.items.len())
    }

    fn choose(&self, out: &mut Reactions) {
        if let (Some(callback), Some(item)) = (&self.on_select, self.items.get(self.selected)) {
            out.emit(callback, (self.selected, item.clone()));
        }
    }
}

impl Widget for Menu {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Menu
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn orientation(&self) -> Option<Orientation> {
        Some(Orientation::Vertical)
    }

    fn navigate(&mut self, step: NavStep, _out: &mut Reactions) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.selected = cycle(self.selected, self.items.len(), step);
        true
    }

    fn activate(&mut self, out: &mut Reactions) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.choose(out);
        true
    }

    fn click(&mut self, x: f32, y: f32, out: &mut Reactions) -> bool {
        let Some(index) = self.item_bounds().iter().position(|r| r.contains(x, y)) else {
            return false;
        };
        self.selected = index;
        self.choose(out);
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
        "Menu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn menu() -> Menu {
        Menu::new(["New Game", "Options", "Quit"], Rect::new(0.0, 0.0, 200.0, 90.0))
    }

    #[test]
    fn test_navigation_wraps() {
        let mut m = menu();
        let mut out = Reactions::new();
        assert!(m.navigate(NavStep::Prev, &mut out));
        assert_eq!(m.selected_item(), Some("Quit"));
        assert!(m.navigate(NavStep::Next, &mut out));
        assert!(out.is_empty());
        assert_eq!(m.selected(), 0);
    }

    #[test]
    fn test_empty_menu_does_not_consume() {
        let mut m = Menu::new(Vec::<String>::new(), Rect::default());
        let mut out = Reactions::new();
        assert!(!m.navigate(NavStep::Next, &mut out));
        assert!(!m.activate(&mut out));
    }

    #[test]
    fn test_click_selects_item() {
        let chosen = Rc::new(RefCell::new(Vec::new()));
        let mut m = menu().on_select({
            let chosen = Rc::clone(&chosen);
            move |i, item| chosen.borrow_mut().push((i, item.to_string()))
        });

        let mut out = Reactions::new();
        assert!(m.click(50.0, 45.0, &mut out));
        assert!(!m.click(50.0, 200.0, &mut out));
        m.navigate(NavStep::Next, &mut out);
        m.activate(&mut out);
        out.run();

        assert_eq!(
            *chosen.borrow(),
            vec![(1, "Options".to_string()), (2, "Quit".to_string())]
        );
    }
}
