//! Linux gamepads through evdev

use crate::event::pad;
use crate::input::gamepad::{ButtonState, GamepadSnapshot, GamepadSource};
use evdev::{AbsoluteAxisCode, Device, EventSummary, KeyCode};

struct AxisRange {
    min: i32,
    max: i32,
}

impl AxisRange {
    fn normalize(&self, value: i32) -> f32 {
        let span = (self.max - self.min) as f32;
        if span <= 0.0 {
            return 0.0;
        }
        (((value - self.min) as f32 / span) * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

struct Pad {
    dev: Device,
    snapshot: GamepadSnapshot,
    ranges: [AxisRange; pad::AXIS_COUNT],
}

/// Gamepad source over every evdev device that reports a south face button
pub struct EvdevGamepads {
    pads: Vec<Pad>,
}

const STICK_AXES: [AbsoluteAxisCode; pad::AXIS_COUNT] = [
    AbsoluteAxisCode::ABS_X,
    AbsoluteAxisCode::ABS_Y,
    AbsoluteAxisCode::ABS_RX,
    AbsoluteAxisCode::ABS_RY,
];

impl EvdevGamepads {
    /// Scan `/dev/input` for gamepads; devices that cannot be opened are skipped
    pub fn scan() -> Self {
        let mut pads = Vec::new();

        for (path, dev) in evdev::enumerate() {
            let is_pad = dev
                .supported_keys()
                .is_some_and(|keys| keys.contains(KeyCode::BTN_SOUTH));
            if !is_pad {
                continue;
            }
            if dev.set_nonblocking(true).is_err() {
                log::debug!("evdev: cannot set non-blocking mode for {}", path.display());
                continue;
            }

            let ranges = match dev.get_abs_state() {
                Ok(abs) => STICK_AXES.map(|axis| {
                    abs.get(axis.0 as usize)
                        .map(|info| AxisRange {
                            min: info.minimum,
                            max: info.maximum,
                        })
                        .unwrap_or(AxisRange {
                            min: i16::MIN as i32,
                            max: i16::MAX as i32,
                        })
                }),
                Err(_) => STICK_AXES.map(|_| AxisRange {
                    min: i16::MIN as i32,
                    max: i16::MAX as i32,
                }),
            };

            let index = pads.len();
            let name = dev.name().unwrap_or("evdev gamepad").to_string();
            log::debug!("evdev: gamepad {} at {}: {}", index, path.display(), name);
            pads.push(Pad {
                dev,
                snapshot: GamepadSnapshot::new(index, name),
                ranges,
            });
        }

        Self { pads }
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }
}

fn button_index(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::BTN_SOUTH => Some(pad::SOUTH),
        KeyCode::BTN_EAST => Some(pad::EAST),
        KeyCode::BTN_WEST => Some(pad::WEST),
        KeyCode::BTN_NORTH => Some(pad::NORTH),
        KeyCode::BTN_TL => Some(pad::LEFT_BUMPER),
        KeyCode::BTN_TR => Some(pad::RIGHT_BUMPER),
        KeyCode::BTN_TL2 => Some(pad::LEFT_TRIGGER),
        KeyCode::BTN_TR2 => Some(pad::RIGHT_TRIGGER),
        KeyCode::BTN_SELECT => Some(pad::SELECT),
        KeyCode::BTN_START => Some(pad::START),
        KeyCode::BTN_THUMBL => Some(pad::LEFT_STICK),
        KeyCode::BTN_THUMBR => Some(pad::RIGHT_STICK),
        KeyCode::BTN_MODE => Some(pad::HOME),
        _ => None,
    }
}

impl Pad {
    fn set_button(&mut self, button: usize, pressed: bool) {
        if let Some(state) = self.snapshot.buttons.get_mut(button) {
            *state = if pressed {
                ButtonState::pressed()
            } else {
                ButtonState::default()
            };
        }
    }

    fn pump(&mut self) {
        let mut changes = Vec::new();
        match self.dev.fetch_events() {
            Ok(events) => {
                for event in events {
                    changes.push(event.destructure());
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(err) => {
                log::debug!("evdev: {} disconnected: {}", self.snapshot.id, err);
                self.snapshot.connected = false;
                return;
            }
        }

        for summary in changes {
            match summary {
                EventSummary::Key(_, code, value) => {
                    if let Some(button) = button_index(code) {
                        self.set_button(button, value != 0);
                    }
                }
                EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_HAT0X, value) => {
                    self.set_button(pad::DPAD_LEFT, value < 0);
                    self.set_button(pad::DPAD_RIGHT, value > 0);
                }
                EventSummary::AbsoluteAxis(_, AbsoluteAxisCode::ABS_HAT0Y, value) => {
                    self.set_button(pad::DPAD_UP, value < 0);
                    self.set_button(pad::DPAD_DOWN, value > 0);
                }
                EventSummary::AbsoluteAxis(_, code, value) => {
                    if let Some(axis) = STICK_AXES.iter().position(|a| *a == code) {
                        self.snapshot.axes[axis] = self.ranges[axis].normalize(value);
                    }
                }
                _ => {}
            }
        }
    }
}

impl GamepadSource for EvdevGamepads {
    fn sample(&mut self) -> Vec<GamepadSnapshot> {
        for pad in &mut self.pads {
            if pad.snapshot.connected {
                pad.pump();
            }
        }
        self.pads.iter().map(|p| p.snapshot.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_normalization() {
        let range = AxisRange {
            min: -32768,
            max: 32767,
        };
        assert_eq!(range.normalize(-32768), -1.0);
        assert_eq!(range.normalize(32767), 1.0);
        assert!(range.normalize(0).abs() < 0.001);

        let flat = AxisRange { min: 5, max: 5 };
        assert_eq!(flat.normalize(5), 0.0);
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(button_index(KeyCode::BTN_SOUTH), Some(pad::SOUTH));
        assert_eq!(button_index(KeyCode::BTN_TR), Some(pad::RIGHT_BUMPER));
        assert_eq!(button_index(KeyCode::KEY_A), None);
    }
}
