//! Native input backends
//!
//! Each backend translates one windowing or terminal event source into calls
//! on an [`crate::input::InputHub`]. Hosts with their own event loop can skip
//! these and call the hub directly.

#[cfg(feature = "tui")]
pub mod terminal;
#[cfg(feature = "gui")]
pub mod winit;

#[cfg(feature = "tui")]
pub use self::terminal::TerminalInput;
#[cfg(feature = "gui")]
pub use self::winit::WinitInput;
