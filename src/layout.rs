//! Layout primitives - rectangles in drawing-buffer coordinates

/// Rectangle bounds in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole canvas of the given size
    pub fn fullscreen(width: f32, height: f32) -> Self {
        Rect::new(0.0, 0.0, width, height)
    }

    /// Get right edge x-coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get bottom edge y-coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if point is inside rectangle (right/bottom edges exclusive)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Create a subrect with padding applied
    pub fn inner(&self, padding: f32) -> Self {
        Rect {
            x: self.x + padding,
            y: self.y + padding,
            width: (self.width - padding * 2.0).max(0.0),
            height: (self.height - padding * 2.0).max(0.0),
        }
    }

    /// Rectangle of the given size centered inside this one
    pub fn centered(&self, width: f32, height: f32) -> Self {
        Rect {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }

    /// Split into `count` equal columns separated by `gap`
    pub fn columns(&self, count: usize, gap: f32) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let gaps = gap * (count - 1) as f32;
        let width = ((self.width - gaps) / count as f32).max(0.0);
        (0..count)
            .map(|i| Rect {
                x: self.x + i as f32 * (width + gap),
                y: self.y,
                width,
                height: self.height,
            })
            .collect()
    }

    /// Split into `count` equal rows
    pub fn rows(&self, count: usize) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let height = self.height / count as f32;
        (0..count)
            .map(|i| Rect {
                x: self.x,
                y: self.y + i as f32 * height,
                width: self.width,
                height,
            })
            .collect()
    }
}
