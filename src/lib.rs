//! playui - input distribution and focus navigation for game UI
//!
//! A small retained widget layer built for controller-first menus:
//! - One canonical stream of keyboard, pointer, touch and gamepad events
//! - Subscribers that only receive the event kinds they declare
//! - Ring focus over enabled, visible widgets with Tab/D-pad/stick movement
//! - Stacked modals that trap focus, plus timed toasts
//!
//! Rendering is left to the host; [`Ui::scene`] exposes everything a renderer
//! needs to draw a frame.

pub mod backend;
pub mod collection;
pub mod error;
pub mod event;
pub mod focus;
pub mod input;
pub mod layout;
pub mod modal;
pub mod navigation;
pub mod theme;
pub mod toast;
pub mod ui;
pub mod widget;
pub mod widgets;

// Re-export commonly used types
pub use collection::{Entry, ImageItem, TextItem, WidgetCollection};
pub use error::UiError;
pub use event::{
    EventKind, GamepadAxisEvent, GamepadButtonEvent, Key, KeyEvent, Modifiers, PointerButton,
    PointerButtons, PointerEvent, Stick, TouchEvent, TouchPoint,
};
pub use focus::{FocusDirection, FocusRing};
pub use input::{
    CanvasMetrics, GamepadPoller, Handlers, InputHub, InputSource, Interests, StateView,
    Subscriber, Subscription,
};
pub use layout::Rect;
pub use modal::{ButtonRole, Modal, ModalButton};
pub use navigation::{Deferred, Navigator};
pub use theme::{Background, Color, Theme};
pub use toast::{Toast, ToastLevel};
pub use ui::{Ui, UiBuilder};
pub use widget::{Callback, NavStep, Orientation, Reactions, Widget, WidgetId, WidgetKind};
pub use widgets::{Button, Carousel, Menu, Panel, Radio, Slider, TextInput, Toggle};

#[cfg(feature = "tui")]
pub use backend::TerminalInput;
#[cfg(feature = "gui")]
pub use backend::WinitInput;
