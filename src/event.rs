//! Canonical input events - keyboard, pointer, touch, and gamepad

use bitflags::bitflags;

/// Keyboard key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    F(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Insert,
    Enter,
    Space,
    Tab,
    Escape,
    Shift,
    Control,
    Alt,
    Meta,
    Unidentified,
}

impl Key {
    /// Key for a printable character; a literal space maps to [`Key::Space`]
    pub fn from_char(c: char) -> Self {
        if c == ' ' {
            Key::Space
        } else {
            Key::Char(c)
        }
    }

    /// Direction this key points in, for arrow keys
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// Whether this key triggers widget activation
    pub fn is_activation(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

bitflags! {
    /// Keyboard modifier state at the time of a key event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Four-way direction shared by arrow keys, the D-pad, and thumbsticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Key press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// The key was already held when this down event arrived
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            repeat: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
    Back,
    Forward,
}

impl PointerButton {
    /// Bit this button occupies in [`PointerButtons`]
    pub fn mask(self) -> PointerButtons {
        match self {
            PointerButton::Primary => PointerButtons::PRIMARY,
            PointerButton::Secondary => PointerButtons::SECONDARY,
            PointerButton::Auxiliary => PointerButtons::AUXILIARY,
            PointerButton::Back => PointerButtons::BACK,
            PointerButton::Forward => PointerButtons::FORWARD,
        }
    }
}

bitflags! {
    /// Currently held pointer buttons
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u8 {
        const PRIMARY = 1 << 0;
        const SECONDARY = 1 << 1;
        const AUXILIARY = 1 << 2;
        const BACK = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

/// Pointer event in canvas-local drawing-buffer coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    /// Button that changed, for down/up/click
    pub button: Option<PointerButton>,
    /// Buttons held after this event was applied
    pub buttons: PointerButtons,
}

/// A single active contact point in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

/// Touch start/move/end
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    /// Contacts that started, moved, or ended with this event
    pub changed: Vec<TouchPoint>,
    /// Contacts still active after this event
    pub touches: Vec<TouchPoint>,
    /// The platform aborted the contacts; only ever set on touch end
    pub cancelled: bool,
}

/// Normalized thumbstick position, each axis in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stick {
    pub x: f32,
    pub y: f32,
}

impl Stick {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Stick) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether the stick is pushed past the dead zone
    pub fn is_active(&self, dead_zone: f32) -> bool {
        self.magnitude() > dead_zone
    }

    /// Dominant direction past the dead zone (positive y is down)
    pub fn direction(&self, dead_zone: f32) -> Option<Direction> {
        if !self.is_active(dead_zone) {
            return None;
        }
        if self.x.abs() >= self.y.abs() {
            Some(if self.x < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            })
        } else {
            Some(if self.y < 0.0 {
                Direction::Up
            } else {
                Direction::Down
            })
        }
    }
}

/// A gamepad was observed for the first time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamepadConnectedEvent {
    pub index: usize,
    pub id: String,
}

/// A gamepad button changed pressed state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadButtonEvent {
    pub index: usize,
    pub button: usize,
    pub pressed: bool,
    pub value: f32,
}

/// One or both thumbsticks moved past the change threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadAxisEvent {
    pub index: usize,
    pub left_stick: Stick,
    pub right_stick: Stick,
    pub dead_zone: f32,
}

/// Standard-mapping gamepad button indices
pub mod pad {
    pub const SOUTH: usize = 0;
    pub const EAST: usize = 1;
    pub const WEST: usize = 2;
    pub const NORTH: usize = 3;
    pub const LEFT_BUMPER: usize = 4;
    pub const RIGHT_BUMPER: usize = 5;
    pub const LEFT_TRIGGER: usize = 6;
    pub const RIGHT_TRIGGER: usize = 7;
    pub const SELECT: usize = 8;
    pub const START: usize = 9;
    pub const LEFT_STICK: usize = 10;
    pub const RIGHT_STICK: usize = 11;
    pub const DPAD_UP: usize = 12;
    pub const DPAD_DOWN: usize = 13;
    pub const DPAD_LEFT: usize = 14;
    pub const DPAD_RIGHT: usize = 15;
    pub const HOME: usize = 16;

    pub const BUTTON_COUNT: usize = 17;
    pub const AXIS_COUNT: usize = 4;

    /// Direction of a D-pad button
    pub fn dpad_direction(button: usize) -> Option<super::Direction> {
        use super::Direction;
        match button {
            DPAD_UP => Some(Direction::Up),
            DPAD_DOWN => Some(Direction::Down),
            DPAD_LEFT => Some(Direction::Left),
            DPAD_RIGHT => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Discrete event kinds a subscriber can handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    MouseMove,
    MouseDown,
    MouseUp,
    MouseClick,
    MouseEnter,
    TouchStart,
    TouchMove,
    TouchEnd,
    GamepadConnected,
    GamepadButton,
    GamepadAxis,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::MouseMove,
        EventKind::MouseDown,
        EventKind::MouseUp,
        EventKind::MouseClick,
        EventKind::MouseEnter,
        EventKind::TouchStart,
        EventKind::TouchMove,
        EventKind::TouchEnd,
        EventKind::GamepadConnected,
        EventKind::GamepadButton,
        EventKind::GamepadAxis,
    ];

    /// Conventional handler name, used in diagnostics
    pub fn handler_name(&self) -> &'static str {
        match self {
            EventKind::KeyDown => "onKeyDown",
            EventKind::KeyUp => "onKeyUp",
            EventKind::MouseMove => "onMouseMove",
            EventKind::MouseDown => "onMouseDown",
            EventKind::MouseUp => "onMouseUp",
            EventKind::MouseClick => "onMouseClick",
            EventKind::MouseEnter => "onMouseEnter",
            EventKind::TouchStart => "onTouchStart",
            EventKind::TouchMove => "onTouchMove",
            EventKind::TouchEnd => "onTouchEnd",
            EventKind::GamepadConnected => "onGamepadConnected",
            EventKind::GamepadButton => "onGamepadButton",
            EventKind::GamepadAxis => "onGamepadAxis",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.handler_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from_char(' '), Key::Space);
        assert_eq!(Key::from_char('a'), Key::Char('a'));
    }

    #[test]
    fn test_stick_direction() {
        let dz = 0.3;
        assert_eq!(Stick::new(0.1, 0.1).direction(dz), None);
        assert_eq!(Stick::new(-0.8, 0.2).direction(dz), Some(Direction::Left));
        assert_eq!(Stick::new(0.2, 0.9).direction(dz), Some(Direction::Down));
        assert_eq!(Stick::new(0.0, -0.5).direction(dz), Some(Direction::Up));
    }

    #[test]
    fn test_handler_names_unique() {
        let mut names: Vec<_> = EventKind::ALL.iter().map(|k| k.handler_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EventKind::ALL.len());
    }

    #[test]
    fn test_pointer_button_mask() {
        let held = PointerButton::Primary.mask() | PointerButton::Auxiliary.mask();
        assert!(held.contains(PointerButtons::PRIMARY));
        assert!(!held.contains(PointerButtons::SECONDARY));
        assert_eq!(held.bits(), 0b101);
    }
}
