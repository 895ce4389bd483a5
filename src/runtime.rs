//! Runtime for executing conversations
//!
//! One conversation is one tokio task that owns its state, its chat log and
//! its backend. Student input reaches it over a channel.

mod executor;


pub use executor::ConversationRuntime;

use crate::backend::TutorBackend;
use crate::chat::ChatView;
use crate::state_machine::{ConvContext, Event};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// Capacity of the student input channel
const INPUT_CHANNEL_CAPACITY: usize = 32;

/// Input delivered to a running conversation
#[derive(Debug, Clone)]
pub enum RuntimeInput {
    Event(Event),
    /// Start over: no subject, empty transcript
    Reset,
}

impl RuntimeInput {
    /// Whether this came from the student, as opposed to the runtime itself
    pub fn is_student_action(&self) -> bool {
        match self {
            RuntimeInput::Event(event) => event.is_student_action(),
            RuntimeInput::Reset => true,
        }
    }
}

impl From<Event> for RuntimeInput {
    fn from(event: Event) -> Self {
        RuntimeInput::Event(event)
    }
}

/// Handle to interact with a running conversation
pub struct ConversationHandle {
    pub input_tx: mpsc::Sender<RuntimeInput>,
    task: JoinHandle<()>,
}

impl ConversationHandle {
    /// Deliver input. Fails once the conversation has stopped.
    pub async fn send(
        &self,
        input: impl Into<RuntimeInput>,
    ) -> Result<(), mpsc::error::SendError<RuntimeInput>> {
        self.input_tx.send(input.into()).await
    }

    /// Close the input channel and wait for the conversation to finish
    pub async fn shutdown(self) -> Result<(), JoinError> {
        drop(self.input_tx);
        self.task.await
    }
}

/// Start a conversation on its own task
pub fn spawn_conversation<B, V>(context: ConvContext, backend: B, view: V) -> ConversationHandle
where
    B: TutorBackend + 'static,
    V: ChatView + Send + 'static,
{
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let runtime = ConversationRuntime::new(context, backend, view, input_rx);
    let task = tokio::spawn(async move {
        runtime.run().await;
    });

    ConversationHandle { input_tx, task }
}
