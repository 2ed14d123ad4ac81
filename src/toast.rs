//! Toast notifications
//!
//! Toasts age only through the delta passed to [`crate::Ui::update`]; there
//! are no wall-clock timers.

/// Default lifetime of a toast
pub const DEFAULT_TOAST_MS: f32 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: u64,
    message: String,
    level: ToastLevel,
    duration_ms: f32,
    remaining_ms: f32,
}

impl Toast {
    pub(crate) fn new(id: u64, message: impl Into<String>, level: ToastLevel, duration_ms: f32) -> Self {
        let duration_ms = duration_ms.max(0.0);
        Self {
            id,
            message: message.into(),
            level,
            duration_ms,
            remaining_ms: duration_ms,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> ToastLevel {
        self.level
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    /// Fraction of lifetime left, 1.0 when fresh
    pub fn progress(&self) -> f32 {
        if self.duration_ms > 0.0 {
            self.remaining_ms / self.duration_ms
        } else {
            0.0
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    pub(crate) fn tick(&mut self, delta_ms: f32) {
        self.remaining_ms = (self.remaining_ms - delta_ms.max(0.0)).max(0.0);
    }
}

/// Ordered toast stack, oldest first
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, level: ToastLevel, duration_ms: f32) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push(Toast::new(id, message, level, duration_ms));
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Age every toast and drop the expired ones
    pub fn tick(&mut self, delta_ms: f32) {
        for toast in &mut self.toasts {
            toast.tick(delta_ms);
        }
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_expires() {
        let mut stack = ToastStack::new();
        stack.push("saved", ToastLevel::Success, 1000.0);
        stack.push("later", ToastLevel::Info, 3000.0);

        stack.tick(500.0);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.iter().next().map(|t| t.progress()), Some(0.5));

        stack.tick(500.0);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.iter().next().map(|t| t.message()), Some("later"));
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut stack = ToastStack::new();
        stack.push("x", ToastLevel::Info, 100.0);
        stack.tick(-50.0);
        assert_eq!(stack.iter().next().map(|t| t.remaining_ms()), Some(100.0));
    }

    #[test]
    fn test_dismiss() {
        let mut stack = ToastStack::new();
        let id = stack.push("x", ToastLevel::Warning, 100.0);
        assert!(stack.dismiss(id));
        assert!(!stack.dismiss(id));
        assert!(stack.is_empty());
    }
}
