//! Pure state transition function

use super::intent::offers_next_exercise;
use super::prompts;
use super::queue::ExerciseQueue;
use super::state::{ReplyKind, StartOrigin, Subject};
use super::{ConvContext, Effect, Event, TutorState};
use crate::backend::{BackendErrorKind, SessionId, StartFromImageResponse, StartFromTextResponse};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TutorState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TutorState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition. None of them is shown to the
/// student; the runtime logs and drops the event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is in flight, cannot accept student input")]
    Busy,
    #[error("A detected exercise is waiting for yes/no")]
    ConfirmationPending,
    #[error("No detected exercise is waiting for confirmation")]
    NoPendingConfirmation,
    #[error("Subject already chosen for this conversation")]
    SubjectAlreadyChosen,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; all I/O is
/// described by the returned effects.
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &TutorState,
    _context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    if state.is_busy() && event.is_student_action() {
        return Err(TransitionError::Busy);
    }

    match (state, event) {
        // ============================================================
        // Subject selection
        // ============================================================
        (TutorState::NoSubject, Event::SubjectSelected { subject }) => Ok(TransitionResult::new(
            TutorState::Ready {
                subject,
                queue: ExerciseQueue::new(),
            },
        )
        .with_effect(Effect::tutor_says(prompts::subject_chosen(subject)))),

        (_, Event::SubjectSelected { .. }) => Err(TransitionError::SubjectAlreadyChosen),

        (TutorState::NoSubject, Event::StudentMessage { text } | Event::FinalAnswer { text }) => {
            Ok(TransitionResult::new(TutorState::NoSubject)
                .with_effects(echo(&text))
                .with_effect(Effect::tutor_says(prompts::CHOOSE_SUBJECT_FIRST)))
        }

        (TutorState::NoSubject, Event::ImageSelected { .. }) => Ok(TransitionResult::new(
            TutorState::NoSubject,
        )
        .with_effect(Effect::tutor_says(prompts::CHOOSE_SUBJECT_FIRST))),

        // ============================================================
        // Ready: typed exercises and image uploads
        // ============================================================
        (TutorState::Ready { subject, queue }, Event::StudentMessage { text }) => {
            let question = text.trim();
            if question.is_empty() {
                return Ok(TransitionResult::new(state.clone())
                    .with_effect(Effect::tutor_says(prompts::EMPTY_MESSAGE)));
            }
            Ok(TransitionResult::new(TutorState::StartingExercise {
                subject: *subject,
                queue: queue.clone(),
                origin: StartOrigin::Typed,
            })
            .with_effect(Effect::student_says(question))
            .with_effect(Effect::tutor_says(prompts::THINKING))
            .with_effect(Effect::StartExercise {
                question_text: question.to_string(),
            }))
        }

        (TutorState::Ready { .. }, Event::FinalAnswer { text }) => Ok(TransitionResult::new(
            state.clone(),
        )
        .with_effects(echo(&text))
        .with_effect(Effect::tutor_says(prompts::NO_EXERCISE_FOR_ANSWER))),

        (
            TutorState::Ready { subject, queue }
            | TutorState::ExerciseInProgress { subject, queue, .. },
            Event::ImageSelected { path },
        ) => Ok(TransitionResult::new(TutorState::UploadingImage {
            subject: *subject,
            queue: queue.clone(),
        })
        .with_effect(Effect::tutor_says(prompts::PROCESSING_IMAGE))
        .with_effect(Effect::UploadImage { path })),

        // ============================================================
        // Confirmation of a detected exercise
        // ============================================================
        (TutorState::AwaitingConfirmation { subject, queue }, Event::AcceptExercise) => {
            let Some(exercise) = queue.current() else {
                return Err(TransitionError::InvalidTransition(
                    "confirmation pending without a current exercise".to_string(),
                ));
            };
            Ok(TransitionResult::new(TutorState::StartingExercise {
                subject: *subject,
                queue: queue.clone(),
                origin: StartOrigin::Confirmed,
            })
            .with_effect(Effect::hide_confirmation())
            .with_effect(Effect::tutor_says(prompts::THINKING))
            .with_effect(Effect::StartExercise {
                question_text: exercise.to_string(),
            }))
        }

        (TutorState::AwaitingConfirmation { subject, queue }, Event::RejectExercise) => {
            Ok(TransitionResult::new(TutorState::Ready {
                subject: *subject,
                queue: queue.clone(),
            })
            .with_effect(Effect::hide_confirmation())
            .with_effect(Effect::tutor_says(prompts::REJECTED_DETECTED)))
        }

        (
            TutorState::AwaitingConfirmation { .. },
            Event::StudentMessage { .. } | Event::FinalAnswer { .. } | Event::ImageSelected { .. },
        ) => Err(TransitionError::ConfirmationPending),

        (_, Event::AcceptExercise | Event::RejectExercise) => {
            Err(TransitionError::NoPendingConfirmation)
        }

        // ============================================================
        // Exercise start completion
        // ============================================================
        (
            TutorState::StartingExercise { subject, queue, .. },
            Event::ExerciseStarted { response },
        ) => Ok(exercise_started(*subject, queue, response)),

        (
            TutorState::StartingExercise {
                subject,
                queue,
                origin,
            },
            Event::ExerciseStartFailed { .. },
        ) => {
            let result = match origin {
                StartOrigin::Confirmed if queue.current().is_some() => {
                    TransitionResult::new(TutorState::AwaitingConfirmation {
                        subject: *subject,
                        queue: queue.clone(),
                    })
                    .with_effect(Effect::replace_tutor_text(prompts::CONNECTION_ERROR))
                    .with_effect(Effect::show_confirmation())
                }
                _ => TransitionResult::new(TutorState::Ready {
                    subject: *subject,
                    queue: queue.clone(),
                })
                .with_effect(Effect::replace_tutor_text(prompts::CONNECTION_ERROR)),
            };
            Ok(result)
        }

        // ============================================================
        // Image upload completion
        // ============================================================
        (TutorState::UploadingImage { subject, queue }, Event::ImageProcessed { response }) => {
            Ok(image_processed(*subject, queue, &response))
        }

        (TutorState::UploadingImage { subject, queue }, Event::ImageUploadFailed { kind, .. }) => {
            let text = if kind == BackendErrorKind::Io {
                prompts::IMAGE_READ_ERROR
            } else {
                prompts::CONNECTION_ERROR
            };
            Ok(TransitionResult::new(TutorState::Ready {
                subject: *subject,
                queue: queue.clone(),
            })
            .with_effect(Effect::replace_tutor_text(text)))
        }

        // ============================================================
        // Exercise in progress: hints and answer checks
        // ============================================================
        (
            TutorState::ExerciseInProgress {
                subject,
                session_id,
                queue,
            },
            Event::StudentMessage { text },
        ) => Ok(request_reply(
            state,
            *subject,
            *session_id,
            queue,
            ReplyKind::Hint,
            &text,
        )),

        (
            TutorState::ExerciseInProgress {
                subject,
                session_id,
                queue,
            },
            Event::FinalAnswer { text },
        ) => Ok(request_reply(
            state,
            *subject,
            *session_id,
            queue,
            ReplyKind::Check,
            &text,
        )),

        (
            TutorState::Replying {
                subject,
                session_id,
                queue,
                kind,
            },
            Event::ReplyFinished {
                kind: finished,
                text,
                interrupted,
            },
        ) => {
            if finished != *kind {
                return Err(TransitionError::InvalidTransition(format!(
                    "{finished:?} reply finished while awaiting {kind:?}"
                )));
            }
            Ok(reply_finished(
                *subject,
                *session_id,
                queue,
                finished,
                &text,
                interrupted,
            ))
        }

        // ============================================================
        // Everything else
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{} in state {}",
            event.name(),
            state.name()
        ))),
    }
}

fn echo(text: &str) -> Option<Effect> {
    let text = text.trim();
    (!text.is_empty()).then(|| Effect::student_says(text))
}

fn request_reply(
    state: &TutorState,
    subject: Subject,
    session_id: SessionId,
    queue: &ExerciseQueue,
    kind: ReplyKind,
    text: &str,
) -> TransitionResult {
    let text = text.trim();
    if text.is_empty() {
        let prompt = match kind {
            ReplyKind::Hint => prompts::EMPTY_MESSAGE,
            ReplyKind::Check => prompts::EMPTY_ANSWER,
        };
        return TransitionResult::new(state.clone()).with_effect(Effect::tutor_says(prompt));
    }

    TransitionResult::new(TutorState::Replying {
        subject,
        session_id,
        queue: queue.clone(),
        kind,
    })
    .with_effect(Effect::student_says(text))
    .with_effect(Effect::tutor_says(prompts::THINKING))
    .with_effect(Effect::StreamReply {
        kind,
        session_id,
        text: text.to_string(),
    })
}

fn exercise_started(
    subject: Subject,
    queue: &ExerciseQueue,
    response: StartFromTextResponse,
) -> TransitionResult {
    let ready = TutorState::Ready {
        subject,
        queue: queue.clone(),
    };

    if !response.allowed {
        let message = response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| prompts::OFF_TOPIC.to_string());
        return TransitionResult::new(ready).with_effect(Effect::replace_tutor_text(message));
    }

    let Some(session_id) = response.session_id else {
        return TransitionResult::new(ready)
            .with_effect(Effect::replace_tutor_text(prompts::START_FAILED));
    };

    let hint = response
        .hint_text
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| prompts::HINT_FALLBACK.to_string());

    TransitionResult::new(TutorState::ExerciseInProgress {
        subject,
        session_id,
        queue: queue.clone(),
    })
    .with_effect(Effect::replace_tutor_text(hint))
}

fn image_processed(
    subject: Subject,
    previous: &ExerciseQueue,
    response: &StartFromImageResponse,
) -> TransitionResult {
    if !response.allowed {
        let message = response
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| prompts::OFF_TOPIC.to_string());
        return TransitionResult::new(TutorState::Ready {
            subject,
            queue: previous.clone(),
        })
        .with_effect(Effect::replace_tutor_text(message));
    }

    let exercises = response.exercise_list();
    let tasks = response.task_list();
    let mut queue = ExerciseQueue::new();

    let english_sheet = !tasks.is_empty() && (response.is_english() || exercises.is_empty());
    if english_sheet {
        queue.load_tasks(tasks);
        let text = prompts::english_tasks(
            response.tasks_summary.as_deref(),
            queue.current().unwrap_or_default(),
        );
        return TransitionResult::new(TutorState::Ready { subject, queue })
            .with_effect(Effect::replace_tutor_text(text));
    }

    if exercises.is_empty() {
        return TransitionResult::new(TutorState::Ready { subject, queue })
            .with_effect(Effect::replace_tutor_text(prompts::NO_EXERCISES_FOUND));
    }

    let count = exercises.len();
    queue.load(exercises);
    let text = prompts::exercises_detected(count, queue.current().unwrap_or_default());
    TransitionResult::new(TutorState::AwaitingConfirmation { subject, queue })
        .with_effect(Effect::replace_tutor_text(text))
        .with_effect(Effect::show_confirmation())
}

fn reply_finished(
    subject: Subject,
    session_id: SessionId,
    queue: &ExerciseQueue,
    kind: ReplyKind,
    text: &str,
    interrupted: bool,
) -> TransitionResult {
    let in_progress = TutorState::ExerciseInProgress {
        subject,
        session_id,
        queue: queue.clone(),
    };

    if text.trim().is_empty() {
        return TransitionResult::new(in_progress)
            .with_effect(Effect::replace_tutor_text(prompts::CONNECTION_ERROR));
    }

    if interrupted {
        tracing::debug!(received = text.len(), "Treating partial reply as complete");
    }

    // Only a checked final answer can close the exercise
    if kind == ReplyKind::Hint || !offers_next_exercise(text) {
        return TransitionResult::new(in_progress);
    }

    // The exercise is finished; the session ends here in every branch
    let mut queue = queue.clone();
    if queue.has_next() {
        let free_form = queue.is_free_form();
        let exercise = match queue.advance() {
            Ok(exercise) => exercise.to_string(),
            Err(_) => return TransitionResult::new(TutorState::Ready { subject, queue }),
        };
        let (position, total) = queue.position().unwrap_or((0, queue.len()));

        if free_form {
            return TransitionResult::new(TutorState::Ready { subject, queue }).with_effect(
                Effect::tutor_says(prompts::next_task(position, total, &exercise)),
            );
        }
        return TransitionResult::new(TutorState::AwaitingConfirmation { subject, queue })
            .with_effect(Effect::tutor_says(prompts::next_in_set(
                position, total, &exercise,
            )))
            .with_effect(Effect::show_confirmation());
    }

    if queue.is_last() {
        queue.clear();
        return TransitionResult::new(TutorState::Ready { subject, queue })
            .with_effect(Effect::tutor_says(prompts::SET_COMPLETE))
            .with_effect(Effect::hide_confirmation());
    }

    TransitionResult::new(TutorState::Ready { subject, queue })
}
