//! Built-in widgets

pub mod button;
pub mod carousel;
pub mod menu;
pub mod panel;
pub mod radio;
pub mod slider;
pub mod text_input;
pub mod toggle;

pub use button::Button;
pub use carousel::Carousel;
pub use menu::Menu;
pub use panel::Panel;
pub use radio::Radio;
pub use slider::Slider;
pub use text_input::TextInput;
pub use toggle::Toggle;
