//! Conversation runtime executor

use super::RuntimeInput;
use crate::backend::TutorBackend;
use crate::chat::{ChatView, MessageLog, Role};
use crate::state_machine::prompts;
use crate::state_machine::{
    transition, ConvContext, Effect, Event, ExerciseQueue, ReplyKind, TutorState,
};
use crate::stream;
use tokio::sync::mpsc;

/// Owns everything one conversation needs: state, transcript, backend
pub struct ConversationRuntime<B, V>
where
    B: TutorBackend,
    V: ChatView,
{
    context: ConvContext,
    state: TutorState,
    log: MessageLog<V>,
    backend: B,
    input_rx: mpsc::Receiver<RuntimeInput>,
}

impl<B, V> ConversationRuntime<B, V>
where
    B: TutorBackend,
    V: ChatView,
{
    pub fn new(
        context: ConvContext,
        backend: B,
        view: V,
        input_rx: mpsc::Receiver<RuntimeInput>,
    ) -> Self {
        Self {
            context,
            state: TutorState::default(),
            log: MessageLog::new(view),
            backend,
            input_rx,
        }
    }

    #[allow(dead_code)] // Inspected by tests
    pub fn state(&self) -> &TutorState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn log(&self) -> &MessageLog<V> {
        &self.log
    }

    #[cfg(test)]
    pub(crate) fn input_rx_for_test(&mut self) -> &mut mpsc::Receiver<RuntimeInput> {
        &mut self.input_rx
    }

    /// Back to a fresh conversation: no subject, no session, empty transcript
    pub fn reset(&mut self) {
        tracing::info!(conv_id = %self.context.conversation_id, "Resetting conversation");
        if self.state.is_awaiting_confirmation() {
            self.log.view_mut().set_confirmation_prompt(false);
        }
        self.state = TutorState::default();
        self.log.clear();
        self.greet();
    }

    fn greet(&mut self) {
        self.log.append(Role::Tutor, prompts::GREETING);
        self.log.view_mut().set_input_enabled(true);
    }

    /// Process input until the channel closes, then hand the runtime back
    pub async fn run(mut self) -> Self {
        tracing::info!(conv_id = %self.context.conversation_id, "Starting conversation runtime");

        if self.log.is_empty() {
            self.greet();
        }

        while let Some(input) = self.input_rx.recv().await {
            self.handle_input(input).await;
        }

        tracing::info!(
            conv_id = %self.context.conversation_id,
            state = self.state.name(),
            turns = self.log.len(),
            "Conversation runtime stopped"
        );
        self
    }

    pub async fn handle_input(&mut self, input: RuntimeInput) {
        match input {
            RuntimeInput::Event(event) => self.process_event(event).await,
            RuntimeInput::Reset => self.reset(),
        }
    }

    pub async fn process_event(&mut self, event: Event) {
        // Process events in a loop to handle events generated by effects
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let event_name = current_event.name();
            let result = match transition(&self.state, &self.context, current_event) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(
                        conv_id = %self.context.conversation_id,
                        state = self.state.name(),
                        event = event_name,
                        error = %e,
                        "Event rejected"
                    );
                    continue;
                }
            };

            let old_state = std::mem::replace(&mut self.state, result.new_state);
            if old_state.name() != self.state.name() {
                tracing::info!(
                    conv_id = %self.context.conversation_id,
                    from = old_state.name(),
                    to = self.state.name(),
                    event = event_name,
                    subject = ?self.state.subject(),
                    session_id = ?self.state.session_id(),
                    queued = self.state.queue().map_or(0, ExerciseQueue::len),
                    "State transition"
                );
            }
            tracing::debug!(
                conv_id = %self.context.conversation_id,
                state = %serde_json::to_string(&self.state).unwrap_or_default(),
                "State after transition"
            );

            let mut issued_request = false;
            for effect in result.effects {
                issued_request |= effect.is_request();
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }

            if issued_request {
                self.drop_queued_input();
            }
        }

        self.log
            .view_mut()
            .set_input_enabled(!self.state.is_busy());
    }

    /// Discard student input that piled up while a request was in flight
    fn drop_queued_input(&mut self) {
        let mut dropped = 0;
        while let Ok(input) = self.input_rx.try_recv() {
            if input.is_student_action() {
                dropped += 1;
            } else {
                tracing::warn!(?input, "Unexpected non-student input on the input channel");
            }
        }
        if dropped > 0 {
            tracing::info!(
                conv_id = %self.context.conversation_id,
                dropped,
                "Dropped input received during request"
            );
        }
    }

    /// Execute an effect and optionally return a generated event
    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::AppendTurn { role, text } => {
                self.log.append(role, text);
                None
            }

            Effect::UpdateLastTurn { role, text } => {
                if self.log.update_last(role, text.as_str()).is_none() {
                    // No turn to rewrite; show it as a fresh one
                    self.log.append(role, text);
                }
                None
            }

            Effect::SetConfirmationPrompt { visible } => {
                self.log.view_mut().set_confirmation_prompt(visible);
                None
            }

            Effect::StartExercise { question_text } => {
                self.log.view_mut().set_input_enabled(false);
                let event = match self
                    .backend
                    .start_from_text(&self.context.student_name, &question_text)
                    .await
                {
                    Ok(response) => Event::ExerciseStarted { response },
                    Err(e) => Event::ExerciseStartFailed {
                        kind: e.kind,
                        message: e.message,
                    },
                };
                Some(event)
            }

            Effect::UploadImage { path } => {
                self.log.view_mut().set_input_enabled(false);
                let event = match self
                    .backend
                    .start_from_image(&self.context.student_name, &path)
                    .await
                {
                    Ok(response) => Event::ImageProcessed { response },
                    Err(e) => Event::ImageUploadFailed {
                        kind: e.kind,
                        message: e.message,
                    },
                };
                Some(event)
            }

            Effect::StreamReply {
                kind,
                session_id,
                text,
            } => {
                self.log.view_mut().set_input_enabled(false);
                let source = match kind {
                    ReplyKind::Hint => self.backend.stream_hint(session_id, &text).await,
                    ReplyKind::Check => self.backend.stream_check(session_id, &text).await,
                };

                let event = match source {
                    Ok(source) => {
                        let outcome = stream::consume(source, &mut self.log, Role::Tutor).await;
                        tracing::debug!(
                            conv_id = %self.context.conversation_id,
                            ?kind,
                            updates = outcome.updates,
                            chars = outcome.text.chars().count(),
                            "Reply consumed"
                        );
                        Event::ReplyFinished {
                            kind,
                            text: outcome.text,
                            interrupted: outcome.error.is_some(),
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            conv_id = %self.context.conversation_id,
                            ?kind,
                            error = %e,
                            "Reply request failed"
                        );
                        Event::ReplyFinished {
                            kind,
                            text: String::new(),
                            interrupted: true,
                        }
                    }
                };
                Some(event)
            }
        }
    }
}
