//! Chat transcript: turns, layout classification and rendering
//!
//! The transcript is a model; everything visible goes through a [`ChatView`].

pub mod classify;
pub mod log;
pub mod view;

pub use log::{ChatTurn, MessageLog, Role};
pub use view::{ChatView, TerminalView};
