//! Theme and background configuration
//!
//! Scene-level paint settings held by the UI host. They are session state,
//! not part of the widget collection, so clearing the scene keeps them.

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create an opaque color from RGB values
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn light_gray() -> Self {
        Self::rgb(192, 192, 192)
    }

    pub const fn dark_gray() -> Self {
        Self::rgb(128, 128, 128)
    }

    pub const fn dark_purple() -> Self {
        Self::rgb(58, 48, 68)
    }

    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Some(Self::rgba(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => None,
        }
    }

    /// Components as 0.0..=1.0 floats, in the order GPU clear colors expect
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Linear blend towards `other` by `t` (0.0 keeps self)
    pub fn mix(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::rgba(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
            lerp(self.a, other.a),
        )
    }
}

/// Paint values the renderer reads for widgets, modals, and toasts
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub text_fg: Color,
    pub label_fg: Color,
    pub error_fg: Color,
    pub success_fg: Color,
    pub warning_fg: Color,

    pub surface: Color,
    pub surface_elevated: Color,
    /// Dim layer drawn behind an open modal
    pub overlay: Color,

    pub accent: Color,
    pub border_color: Color,
    pub focus_border_color: Color,
    pub hover_color: Color,
    pub disabled_fg: Color,

    pub font_family: String,
    pub font_size: f32,
    pub corner_radius: f32,
    pub border_width: f32,
    pub padding: f32,
    pub gap: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            text_fg: Color::white(),
            label_fg: Color::light_gray(),
            error_fg: Color::rgb(255, 100, 100),
            success_fg: Color::rgb(100, 255, 100),
            warning_fg: Color::rgb(255, 200, 100),

            surface: Color::rgb(20, 20, 25),
            surface_elevated: Color::rgb(30, 30, 35),
            overlay: Color::rgba(0, 0, 0, 160),

            accent: Color::dark_purple(),
            border_color: Color::dark_gray(),
            focus_border_color: Color::rgb(100, 150, 255),
            hover_color: Color::rgb(45, 45, 55),
            disabled_fg: Color::dark_gray(),

            font_family: "sans-serif".to_string(),
            font_size: 18.0,
            corner_radius: 6.0,
            border_width: 2.0,
            padding: 12.0,
            gap: 8.0,
        }
    }
}

impl Theme {
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f32) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    /// Border color for a widget in the given focus state
    pub fn border_for(&self, focused: bool) -> Color {
        if focused {
            self.focus_border_color
        } else {
            self.border_color
        }
    }
}

/// What the renderer paints behind the scene
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Background {
    #[default]
    None,
    Solid(Color),
    /// Vertical gradient, top to bottom
    Gradient(Color, Color),
    /// Image asset path or key, resolved by the renderer
    Image(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("fff"), Some(Color::white()));
        assert_eq!(
            Color::from_hex("#00000080"),
            Some(Color::rgba(0, 0, 0, 128))
        );
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_mix() {
        let mid = Color::black().mix(Color::white(), 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
        assert_eq!(Color::black().mix(Color::white(), 2.0), Color::white());
    }

    #[test]
    fn test_border_for_focus() {
        let theme = Theme::default();
        assert_eq!(theme.border_for(true), theme.focus_border_color);
        assert_eq!(theme.border_for(false), theme.border_color);
    }
}
