//! Input distribution - device state, capture, subscriptions, gamepad polling

pub mod capture;
#[cfg(all(feature = "evdev", target_os = "linux"))]
pub mod evdev;
pub mod gamepad;
pub mod publisher;
pub mod state;

pub use capture::{CanvasMetrics, InputHub, RawTouch};
pub use gamepad::{
    ButtonState, GamepadPoller, GamepadSnapshot, GamepadSource, VirtualGamepads,
    AXIS_CHANGE_THRESHOLD, DEAD_ZONE,
};
pub use publisher::{
    HandlerFault, HandlerResult, Handlers, Interests, Publisher, SharedSubscriber, Subscriber,
    Subscription,
};
pub use state::{DeviceState, DeviceStore, Pointer, StateView};

/// Anything that can feed the UI: live device state, a subscription
/// registry, and a per-frame poll hook
///
/// [`InputHub`] is the built-in implementation. Custom sources can be
/// assembled from a [`DeviceStore`] and a [`Publisher`].
pub trait InputSource {
    /// Read-only view of live device state
    fn state(&self) -> StateView;

    /// Register a subscriber; dispatch follows [`Publisher`] semantics
    fn subscribe(&self, subscriber: SharedSubscriber) -> Subscription;

    /// Per-frame poll, called from [`crate::Ui::update`]
    fn update(&self);
}
