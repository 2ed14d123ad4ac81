//! UI host facade
//!
//! [`Ui`] ties an [`InputSource`] to a [`Navigator`]: it subscribes to the
//! source on construction, forwards canonical events to the navigator, runs
//! deferred escape and modal callbacks once the scene is released, and drives
//! per-frame work from [`Ui::update`].
//!
//! ```ignore
//! let hub = InputHub::for_canvas(1280.0, 720.0).into_shared();
//! let ui = Ui::builder().input(hub.clone()).build()?;
//!
//! ui.add(Button::new("Play", Rect::new(540.0, 300.0, 200.0, 60.0)).on_click(start));
//! ui.set_escape_handler(|| println!("back"));
//!
//! loop {
//!     // feed hub from the window system, then
//!     ui.update(16.0);
//!     draw(&ui.scene());
//! }
//! ```
//!
//! Every user callback (widget callbacks, modal buttons, the escape handler)
//! runs after the scene borrow is released, so any of them may open modals,
//! add or remove widgets, or rebuild the scene.

use crate::collection::{ImageItem, TextItem};
use crate::error::{Result, UiError};
use crate::event::{GamepadAxisEvent, GamepadButtonEvent, KeyEvent, PointerEvent, TouchEvent};
use crate::input::{HandlerResult, InputSource, Interests, StateView, Subscriber, Subscription};
use crate::layout::Rect;
use crate::modal::Modal;
use crate::navigation::{Deferred, Navigator};
use crate::theme::{Background, Theme};
use crate::toast::{ToastLevel, DEFAULT_TOAST_MS};
use crate::widget::{Widget, WidgetId};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Viewport used when the builder is not given one
pub const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);

type EscapeHandler = Box<dyn FnMut()>;
type EscapeSlot = Rc<RefCell<Option<EscapeHandler>>>;

/// Builder for [`Ui`]
pub struct UiBuilder {
    input: Option<Rc<dyn InputSource>>,
    theme: Theme,
    background: Background,
    viewport: (f32, f32),
}

impl Default for UiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UiBuilder {
    pub fn new() -> Self {
        Self {
            input: None,
            theme: Theme::default(),
            background: Background::default(),
            viewport: DEFAULT_VIEWPORT,
        }
    }

    /// Input source the UI subscribes to (required)
    pub fn input<I: InputSource + 'static>(mut self, input: Rc<I>) -> Self {
        let input: Rc<dyn InputSource> = input;
        self.input = Some(input);
        self
    }

    pub fn input_dyn(mut self, input: Rc<dyn InputSource>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Drawing-buffer size, used to center modals without explicit bounds
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn build(self) -> Result<Ui> {
        let input = self.input.ok_or(UiError::MissingInputSource)?;
        let viewport = checked_viewport(self.viewport.0, self.viewport.1)?;

        let navigator = Rc::new(RefCell::new(Navigator::new(viewport)));
        let escape: EscapeSlot = Rc::new(RefCell::new(None));

        let bridge = Bridge {
            navigator: Rc::clone(&navigator),
            escape: Rc::clone(&escape),
        };
        let subscription = input.subscribe(Rc::new(RefCell::new(bridge)));

        Ok(Ui {
            navigator,
            escape,
            theme: self.theme,
            background: self.background,
            input,
            subscription,
        })
    }
}

fn checked_viewport(width: f32, height: f32) -> Result<Rect> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(Rect::fullscreen(width, height))
    } else {
        Err(UiError::InvalidViewport { width, height })
    }
}

/// Interactive scene driven by one input source
pub struct Ui {
    navigator: Rc<RefCell<Navigator>>,
    escape: EscapeSlot,
    theme: Theme,
    background: Background,
    input: Rc<dyn InputSource>,
    subscription: Subscription,
}

impl Drop for Ui {
    fn drop(&mut self) {
        self.subscription.stop();
    }
}

impl Ui {
    pub fn builder() -> UiBuilder {
        UiBuilder::new()
    }

    fn nav(&self) -> RefMut<'_, Navigator> {
        self.navigator.borrow_mut()
    }

    /// Read-only scene for rendering
    pub fn scene(&self) -> Ref<'_, Navigator> {
        self.navigator.borrow()
    }

    /// Live device state of the input source
    pub fn state(&self) -> StateView {
        self.input.state()
    }

    /// Poll the input source, then age toasts and tick widgets
    pub fn update(&self, delta_ms: f32) {
        self.input.update();
        self.nav().update(delta_ms);
    }

    // Widgets

    pub fn add<W: Widget + 'static>(&self, widget: W) -> WidgetId {
        self.add_boxed(Box::new(widget))
    }

    pub fn add_boxed(&self, widget: Box<dyn Widget>) -> WidgetId {
        self.nav().add(widget)
    }

    /// Remove a widget; false if it was not present
    pub fn remove(&self, id: WidgetId) -> bool {
        self.nav().remove(id).is_some()
    }

    pub fn set_enabled(&self, id: WidgetId, enabled: bool) -> bool {
        self.nav().set_enabled(id, enabled)
    }

    pub fn set_visible(&self, id: WidgetId, visible: bool) -> bool {
        self.nav().set_visible(id, visible)
    }

    /// Inspect a widget as its concrete type
    pub fn with_widget<T, R>(&self, id: WidgetId, f: impl FnOnce(&T) -> R) -> Option<R>
    where
        T: Widget + 'static,
    {
        let scene = self.scene();
        scene.collection().get(id)?.downcast_ref::<T>().map(f)
    }

    pub fn add_text(&self, item: TextItem) {
        self.nav().collection_mut().add_text(item);
    }

    pub fn add_image(&self, item: ImageItem) {
        self.nav().collection_mut().add_image(item);
    }

    /// Drop widgets, decorations, modals, and toasts; theme and background stay
    pub fn clear(&self) {
        self.nav().clear();
    }

    /// Like [`Ui::clear`] but toasts keep running
    pub fn clear_except_toasts(&self) {
        self.nav().clear_except_toasts();
    }

    // Toasts

    pub fn toast(&self, message: impl Into<String>, level: ToastLevel) -> u64 {
        self.toast_for(message, level, DEFAULT_TOAST_MS)
    }

    pub fn toast_for(&self, message: impl Into<String>, level: ToastLevel, duration_ms: f32) -> u64 {
        self.nav()
            .collection_mut()
            .push_toast(message, level, duration_ms)
    }

    pub fn dismiss_toast(&self, id: u64) -> bool {
        self.nav().collection_mut().toasts_mut().dismiss(id)
    }

    // Modals

    pub fn open_modal(&self, modal: Modal) {
        self.nav().open_modal(modal);
    }

    /// Close the topmost modal without running a callback; false if none open
    pub fn close_modal(&self) -> bool {
        self.nav().close_modal()
    }

    pub fn modal_open(&self) -> bool {
        self.scene().modal_open()
    }

    // Focus

    pub fn focus(&self, id: WidgetId) -> bool {
        self.nav().focus(id)
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.scene().focused()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.scene().focused_index()
    }

    /// Called with no arguments when Escape is pressed and no modal took it
    pub fn set_escape_handler<F>(&self, handler: F)
    where
        F: FnMut() + 'static,
    {
        *self.escape.borrow_mut() = Some(Box::new(handler));
    }

    pub fn clear_escape_handler(&self) {
        self.escape.borrow_mut().take();
    }

    // Scene configuration

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn viewport(&self) -> Rect {
        self.scene().viewport()
    }

    pub fn set_viewport(&self, width: f32, height: f32) -> Result<()> {
        let viewport = checked_viewport(width, height)?;
        self.nav().set_viewport(viewport);
        Ok(())
    }
}

/// Subscriber that feeds the navigator
struct Bridge {
    navigator: Rc<RefCell<Navigator>>,
    escape: EscapeSlot,
}

impl Bridge {
    fn with_navigator<F>(&self, f: F) -> HandlerResult
    where
        F: FnOnce(&mut Navigator) -> Option<Deferred>,
    {
        let (deferred, reactions) = {
            let mut navigator = self
                .navigator
                .try_borrow_mut()
                .map_err(|_| anyhow::anyhow!("scene is borrowed by the host"))?;
            let deferred = f(&mut navigator);
            (deferred, navigator.take_reactions())
        };

        reactions.run();
        match deferred {
            Some(Deferred::Escape) => self.run_escape(),
            Some(Deferred::Callback(mut callback)) => callback(),
            None => {}
        }
        Ok(())
    }

    fn run_escape(&self) {
        // Taken out while running so the handler may replace itself
        let handler = self.escape.borrow_mut().take();
        if let Some(mut handler) = handler {
            handler();
            let mut slot = self.escape.borrow_mut();
            if slot.is_none() {
                *slot = Some(handler);
            }
        }
    }
}

impl Subscriber for Bridge {
    fn interests(&self) -> Interests {
        Interests::KEY_DOWN
            | Interests::MOUSE_MOVE
            | Interests::MOUSE_DOWN
            | Interests::MOUSE_UP
            | Interests::MOUSE_CLICK
            | Interests::TOUCH
            | Interests::GAMEPAD_BUTTON
            | Interests::GAMEPAD_AXIS
    }

    fn on_key_down(&mut self, event: &KeyEvent) -> HandlerResult {
        self.with_navigator(|nav| nav.key_down(event))
    }

    fn on_mouse_move(&mut self, event: &PointerEvent) -> HandlerResult {
        self.with_navigator(|nav| {
            nav.mouse_move(event);
            None
        })
    }

    fn on_mouse_down(&mut self, event: &PointerEvent) -> HandlerResult {
        self.with_navigator(|nav| {
            nav.mouse_down(event);
            None
        })
    }

    fn on_mouse_up(&mut self, event: &PointerEvent) -> HandlerResult {
        self.with_navigator(|nav| {
            nav.mouse_up(event);
            None
        })
    }

    fn on_mouse_click(&mut self, event: &PointerEvent) -> HandlerResult {
        self.with_navigator(|nav| nav.mouse_click(event))
    }

    fn on_touch_start(&mut self, event: &TouchEvent) -> HandlerResult {
        self.with_navigator(|nav| {
            nav.touch_start(event);
            None
        })
    }

    fn on_touch_move(&mut self, event: &TouchEvent) -> HandlerResult {
        self.with_navigator(|nav| {
            nav.touch_move(event);
            None
        })
    }

    fn on_touch_end(&mut self, event: &TouchEvent) -> HandlerResult {
        self.with_navigator(|nav| nav.touch_end(event))
    }

    fn on_gamepad_button(&mut self, event: &GamepadButtonEvent) -> HandlerResult {
        self.with_navigator(|nav| nav.gamepad_button(event))
    }

    fn on_gamepad_axis(&mut self, event: &GamepadAxisEvent) -> HandlerResult {
        self.with_navigator(|nav| {
            nav.gamepad_axis(event);
            None
        })
    }
}
