//! Focus ring over an ordered sequence of focusable entries
//!
//! Tracks which position (if any) owns focus and moves it with Tab/Shift-Tab
//! semantics. The ring stores only an index; the caller owns the sequence and
//! reports insertions and removals so the index keeps pointing at the same
//! logical entry.
//!
//! # Example
//!
//! ```ignore
//! let mut ring = FocusRing::new();
//! ring.next(3); // Some(0)
//! ring.next(3); // Some(1)
//! ring.prev(3); // Some(0)
//! ring.prev(3); // Some(2), wraps
//! ```

/// Focus ring navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    /// Move to next focusable entry (Tab)
    Next,
    /// Move to previous focusable entry (Shift+Tab)
    Previous,
}

/// Index-based focus state machine: `none` or `focused(i)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRing {
    /// Index into the focusable subsequence
    focused: Option<usize>,

    /// Whether focus wraps around at boundaries
    wrap_around: bool,
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusRing {
    pub fn new() -> Self {
        Self {
            focused: None,
            wrap_around: true,
        }
    }

    /// Ring that starts focused on the first of `len` entries
    pub fn starting_at_first(len: usize) -> Self {
        let mut ring = Self::new();
        if len > 0 {
            ring.focused = Some(0);
        }
        ring
    }

    /// Set whether focus wraps around at boundaries
    pub fn set_wrap_around(&mut self, wrap: bool) {
        self.wrap_around = wrap;
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Focus an entry directly; out-of-range indices are ignored
    pub fn focus(&mut self, index: usize, len: usize) -> bool {
        if index < len {
            self.focused = Some(index);
            true
        } else {
            false
        }
    }

    /// Clear focus (nothing focused)
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Tab
    pub fn next(&mut self, len: usize) -> Option<usize> {
        self.move_focus(FocusDirection::Next, len)
    }

    /// Shift+Tab
    pub fn prev(&mut self, len: usize) -> Option<usize> {
        self.move_focus(FocusDirection::Previous, len)
    }

    /// Move focus in a direction over `len` entries
    pub fn move_focus(&mut self, direction: FocusDirection, len: usize) -> Option<usize> {
        if len == 0 {
            return self.focused;
        }

        // A stale index (sequence shrank without notice) counts as nothing focused
        let current = self.focused.filter(|&i| i < len);
        let forward = direction == FocusDirection::Next;

        let target = match current {
            None if forward => Some(0),
            None => Some(len - 1),
            Some(idx) if forward && idx + 1 < len => Some(idx + 1),
            Some(idx) if !forward && idx > 0 => Some(idx - 1),
            Some(_) if self.wrap_around && forward => Some(0),
            Some(_) if self.wrap_around => Some(len - 1),
            Some(idx) => Some(idx),
        };

        self.focused = target;
        target
    }

    /// An entry entered the sequence at `position`
    pub fn on_inserted(&mut self, position: usize) {
        if let Some(i) = self.focused {
            if position <= i {
                self.focused = Some(i + 1);
            }
        }
    }

    /// The entry at `position` left the sequence
    pub fn on_removed(&mut self, position: usize) {
        match self.focused {
            Some(i) if i == position => self.focused = None,
            Some(i) if position < i => self.focused = Some(i - 1),
            _ => {}
        }
    }
}
