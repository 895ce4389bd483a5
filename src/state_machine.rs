//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod intent;
pub mod prompts;
pub mod queue;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use queue::ExerciseQueue;
pub use state::{ConvContext, ReplyKind, Subject, TutorState};
pub use transition::transition;
