//! Gamepad sampling and change detection
//!
//! Gamepads are pulled, not pushed: once per frame the poller asks its
//! [`GamepadSource`] for fresh snapshots, diffs them against what it saw
//! before, and turns the differences into canonical events.

use crate::event::{
    pad, GamepadAxisEvent, GamepadButtonEvent, GamepadConnectedEvent, Stick,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Stick displacement (from the last reported position) that produces an axis event
pub const AXIS_CHANGE_THRESHOLD: f32 = 0.1;

/// Dead zone carried in axis events for consumers to apply
pub const DEAD_ZONE: f32 = 0.3;

/// State of one gamepad button
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonState {
    pub pressed: bool,
    pub value: f32,
}

impl ButtonState {
    pub fn pressed() -> Self {
        Self {
            pressed: true,
            value: 1.0,
        }
    }
}

/// Full sample of one gamepad
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadSnapshot {
    pub index: usize,
    pub id: String,
    pub connected: bool,
    pub buttons: Vec<ButtonState>,
    /// Standard mapping: left x, left y, right x, right y
    pub axes: Vec<f32>,
}

impl GamepadSnapshot {
    /// Neutral snapshot with the standard button and axis counts
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            connected: true,
            buttons: vec![ButtonState::default(); pad::BUTTON_COUNT],
            axes: vec![0.0; pad::AXIS_COUNT],
        }
    }

    pub fn is_pressed(&self, button: usize) -> bool {
        self.buttons.get(button).is_some_and(|b| b.pressed)
    }

    pub fn left_stick(&self) -> Stick {
        Stick::new(self.axis(0), self.axis(1))
    }

    pub fn right_stick(&self) -> Stick {
        Stick::new(self.axis(2), self.axis(3))
    }

    fn axis(&self, i: usize) -> f32 {
        self.axes.get(i).copied().unwrap_or(0.0)
    }
}

/// Provider of gamepad samples, queried once per frame
pub trait GamepadSource {
    /// Current snapshot of every gamepad the source knows about
    fn sample(&mut self) -> Vec<GamepadSnapshot>;
}

/// In-memory gamepad source
///
/// Hosts that already run a gamepad library feed their samples through
/// this; cloned handles share the same pads.
#[derive(Debug, Clone, Default)]
pub struct VirtualGamepads {
    pads: Rc<RefCell<BTreeMap<usize, GamepadSnapshot>>>,
}

impl VirtualGamepads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug in a neutral pad at `index`
    pub fn connect(&self, index: usize, id: impl Into<String>) {
        self.pads
            .borrow_mut()
            .insert(index, GamepadSnapshot::new(index, id));
    }

    pub fn disconnect(&self, index: usize) {
        self.pads.borrow_mut().remove(&index);
    }

    pub fn set_button(&self, index: usize, button: usize, pressed: bool) {
        if let Some(snapshot) = self.pads.borrow_mut().get_mut(&index) {
            if let Some(state) = snapshot.buttons.get_mut(button) {
                *state = ButtonState {
                    pressed,
                    value: if pressed { 1.0 } else { 0.0 },
                };
            }
        }
    }

    pub fn set_left_stick(&self, index: usize, x: f32, y: f32) {
        self.set_axes(index, 0, x, y);
    }

    pub fn set_right_stick(&self, index: usize, x: f32, y: f32) {
        self.set_axes(index, 2, x, y);
    }

    fn set_axes(&self, index: usize, first: usize, x: f32, y: f32) {
        if let Some(snapshot) = self.pads.borrow_mut().get_mut(&index) {
            if snapshot.axes.len() < first + 2 {
                snapshot.axes.resize(first + 2, 0.0);
            }
            snapshot.axes[first] = x.clamp(-1.0, 1.0);
            snapshot.axes[first + 1] = y.clamp(-1.0, 1.0);
        }
    }
}

impl GamepadSource for VirtualGamepads {
    fn sample(&mut self) -> Vec<GamepadSnapshot> {
        self.pads.borrow().values().cloned().collect()
    }
}

/// Event produced by one poll
#[derive(Debug, Clone, PartialEq)]
pub enum GamepadEvent {
    Connected(GamepadConnectedEvent),
    Button(GamepadButtonEvent),
    Axis(GamepadAxisEvent),
}

/// What one poll produced
#[derive(Debug, Clone, Default)]
pub struct PollOutcome {
    /// First connected pad, for the device state
    pub primary: Option<GamepadSnapshot>,
    pub events: Vec<GamepadEvent>,
}

#[derive(Debug, Clone)]
struct Tracked {
    buttons: Vec<bool>,
    left: Stick,
    right: Stick,
}

/// Edge-triggered diffing of successive gamepad samples
#[derive(Default)]
pub struct GamepadPoller {
    source: Option<Box<dyn GamepadSource>>,
    seen: BTreeMap<usize, Tracked>,
}

impl std::fmt::Debug for GamepadPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GamepadPoller")
            .field("has_source", &self.source.is_some())
            .field("pads", &self.seen.len())
            .finish()
    }
}

impl GamepadPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: impl GamepadSource + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            seen: BTreeMap::new(),
        }
    }

    pub fn set_source(&mut self, source: impl GamepadSource + 'static) {
        self.source = Some(Box::new(source));
        self.seen.clear();
    }

    /// Sample the source and diff against the previous poll
    pub fn poll(&mut self) -> PollOutcome {
        let Some(source) = self.source.as_mut() else {
            return PollOutcome::default();
        };

        let snapshots: Vec<GamepadSnapshot> = source
            .sample()
            .into_iter()
            .filter(|s| s.connected)
            .collect();

        let present: Vec<usize> = snapshots.iter().map(|s| s.index).collect();
        self.seen.retain(|index, _| {
            let keep = present.contains(index);
            if !keep {
                log::debug!("gamepad {} disconnected", index);
            }
            keep
        });

        let mut events = Vec::new();
        for snapshot in &snapshots {
            let tracked = self.seen.entry(snapshot.index).or_insert_with(|| {
                log::debug!("gamepad {} connected: {}", snapshot.index, snapshot.id);
                events.push(GamepadEvent::Connected(GamepadConnectedEvent {
                    index: snapshot.index,
                    id: snapshot.id.clone(),
                }));
                Tracked {
                    buttons: Vec::new(),
                    left: Stick::default(),
                    right: Stick::default(),
                }
            });

            if tracked.buttons.len() < snapshot.buttons.len() {
                tracked.buttons.resize(snapshot.buttons.len(), false);
            }
            for (button, state) in snapshot.buttons.iter().enumerate() {
                if tracked.buttons[button] != state.pressed {
                    tracked.buttons[button] = state.pressed;
                    events.push(GamepadEvent::Button(GamepadButtonEvent {
                        index: snapshot.index,
                        button,
                        pressed: state.pressed,
                        value: state.value,
                    }));
                }
            }

            let left = snapshot.left_stick();
            let right = snapshot.right_stick();
            if left.distance(&tracked.left) > AXIS_CHANGE_THRESHOLD
                || right.distance(&tracked.right) > AXIS_CHANGE_THRESHOLD
            {
                tracked.left = left;
                tracked.right = right;
                events.push(GamepadEvent::Axis(GamepadAxisEvent {
                    index: snapshot.index,
                    left_stick: left,
                    right_stick: right,
                    dead_zone: DEAD_ZONE,
                }));
            }
        }

        PollOutcome {
            primary: snapshots.into_iter().next(),
            events,
        }
    }
}
