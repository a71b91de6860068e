//! Input handling
//!
//! Pointer coordinate conversion, keyboard bindings and the message queue
//! through which every host event reaches the view.

pub mod keyboard;
pub mod picking;
pub mod queue;

pub use keyboard::{KeyAction, KeyCode, UnknownKey};
pub use picking::PointerState;
pub use queue::{InputQueue, ViewMessage};
