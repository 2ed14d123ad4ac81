//! Slider over a numeric range
//!
//! Directional input moves by one step and clamps at the ends; clicking or
//! dragging sets the value from the pointer position along the track.

use crate::layout::Rect;
use crate::widget::{Callback, NavStep, Orientation, Reactions, Widget, WidgetKind};
use std::any::Any;

pub struct Slider {
    min: f32,
    max: f32,
    step: f32,
    value: f32,
    orientation: Orientation,
    bounds: Rect,
    focused: bool,
    on_change: Option<Callback<f32>>,
}

impl Slider {
    pub fn new(min: f32, max: f32, bounds: Rect) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            step: (max - min) / 10.0,
            value: min,
            orientation: Orientation::Horizontal,
            bounds,
            focused: false,
            on_change: None,
        }
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step.abs();
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value.clamp(self.min, self.max);
        self
    }

    pub fn vertical(mut self) -> Self {
        self.orientation = Orientation::Vertical;
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32) + 'static,
    {
        self.on_change = Some(Callback::new(callback));
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Position of the value within the range, 0.0 to 1.0
    pub fn fraction(&self) -> f32 {
        if self.max > self.min {
            (self.value - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Set the value without firing the callback
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    fn change_value(&mut self, value: f32, out: &mut Reactions) {
        let value = value.clamp(self.min, self.max);
        if value != self.value {
            self.value = value;
            out.emit_opt(&self.on_change, value);
        }
    }

    fn set_from_point(&mut self, x: f32, y: f32, out: &mut Reactions) {
        let fraction = match self.orientation {
            Orientation::Horizontal if self.bounds.width > 0.0 => {
                (x - self.bounds.x) / self.bounds.width
            }
            // Top of a vertical track is the maximum
            Orientation::Vertical if self.bounds.height > 0.0 => {
                1.0 - (y - self.bounds.y) / self.bounds.height
            }
            _ => return,
        };
        let fraction = fraction.clamp(0.0, 1.0);
        self.change_value(self.min + fraction * (self.max - self.min), out);
    }
}

impl Widget for Slider {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider
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
        let delta = match (step, self.orientation) {
            (NavStep::Next, Orientation::Horizontal) | (NavStep::Prev, Orientation::Vertical) => {
                self.step
            }
            _ => -self.step,
        };
        self.change_value(self.value + delta, out);
        true
    }

    fn click(&mut self, x: f32, y: f32, out: &mut Reactions) -> bool {
        self.set_from_point(x, y, out);
        true
    }

    fn drag(&mut self, x: f32, y: f32, out: &mut Reactions) -> bool {
        self.set_from_point(x, y, out);
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
        "Slider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_steps_clamp() {
        let mut s = Slider::new(0.0, 10.0, Rect::default())
            .with_step(4.0)
            .with_value(8.0);
        let mut out = Reactions::new();
        assert!(s.navigate(NavStep::Next, &mut out));
        assert_eq!(s.value(), 10.0);
        assert!(s.navigate(NavStep::Next, &mut out));
        assert_eq!(s.value(), 10.0);

        s.navigate(NavStep::Prev, &mut out);
        s.navigate(NavStep::Prev, &mut out);
        s.navigate(NavStep::Prev, &mut out);
        assert_eq!(s.value(), 0.0);
    }

    #[test]
    fn test_vertical_up_increases() {
        let mut s = Slider::new(0.0, 1.0, Rect::default()).with_step(0.5).vertical();
        s.navigate(NavStep::Prev, &mut Reactions::new());
        assert_eq!(s.value(), 0.5);
    }

    #[test]
    fn test_click_and_drag_set_value() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut s = Slider::new(0.0, 100.0, Rect::new(100.0, 0.0, 200.0, 20.0)).on_change({
            let changes = Rc::clone(&changes);
            move |v| changes.borrow_mut().push(v)
        });

        let mut out = Reactions::new();
        s.click(200.0, 10.0, &mut out);
        assert_eq!(s.value(), 50.0);
        s.drag(400.0, 10.0, &mut out);
        assert_eq!(s.value(), 100.0);
        s.drag(500.0, 10.0, &mut out);
        s.set_value(20.0);
        out.run();
        assert_eq!(*changes.borrow(), vec![50.0, 100.0]);
        assert_eq!(s.fraction(), 0.2);
    }
}
