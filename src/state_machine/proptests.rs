//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::intent::{offers_next_exercise, WINDOW_CHARS};
use super::state::StartOrigin;
use super::transition::TransitionError;
use super::*;
use crate::backend::{BackendErrorKind, SessionId, StartFromImageResponse, StartFromTextResponse};
use proptest::prelude::*;
use std::path::PathBuf;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ConvContext {
    ConvContext::new("test-conv", "Shira")
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_subject() -> impl Strategy<Value = Subject> {
    prop_oneof![
        Just(Subject::English),
        Just(Subject::Math),
        Just(Subject::Geometry),
    ]
}

fn arb_reply_kind() -> impl Strategy<Value = ReplyKind> {
    prop_oneof![Just(ReplyKind::Hint), Just(ReplyKind::Check)]
}

fn arb_error_kind() -> impl Strategy<Value = BackendErrorKind> {
    prop_oneof![
        Just(BackendErrorKind::Network),
        Just(BackendErrorKind::Timeout),
        Just(BackendErrorKind::ServerError),
        Just(BackendErrorKind::NotFound),
        Just(BackendErrorKind::Io),
    ]
}

fn arb_student_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9+=? ]{0,12}",
        Just("   ".to_string()),
        Just("אני לא יודעת".to_string()),
    ]
}

fn arb_reply_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("נכון מאוד! רוצה עוד תרגיל?".to_string()),
        Just("Well done! Want another exercise?".to_string()),
        Just("כמעט. נסי לספור שוב.".to_string()),
        Just(String::new()),
        "[a-z ]{0,20}",
    ]
}

fn arb_items(max: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[0-9]{1,2}[+-][0-9]{1,2}=\\?", 0..max)
}

fn arb_text_response() -> impl Strategy<Value = StartFromTextResponse> {
    (any::<bool>(), proptest::option::of(1i64..100), proptest::option::of("[a-z ]{0,10}")).prop_map(
        |(allowed, session_id, hint_text)| StartFromTextResponse {
            allowed,
            session_id: session_id.map(SessionId),
            hint_text,
            ..Default::default()
        },
    )
}

fn arb_image_response() -> impl Strategy<Value = StartFromImageResponse> {
    (
        any::<bool>(),
        proptest::option::of(prop_oneof![Just("math".to_string()), Just("english".to_string())]),
        arb_items(4),
        arb_items(3),
    )
        .prop_map(|(allowed, subject, exercises, tasks)| StartFromImageResponse {
            allowed,
            subject,
            exercises: Some(exercises),
            tasks: Some(tasks),
            ..Default::default()
        })
}

fn arb_student_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_subject().prop_map(|subject| Event::SubjectSelected { subject }),
        arb_student_text().prop_map(|text| Event::StudentMessage { text }),
        arb_student_text().prop_map(|text| Event::FinalAnswer { text }),
        Just(Event::ImageSelected {
            path: PathBuf::from("sheet.png")
        }),
        Just(Event::AcceptExercise),
        Just(Event::RejectExercise),
    ]
}

fn arb_backend_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text_response().prop_map(|response| Event::ExerciseStarted { response }),
        arb_error_kind().prop_map(|kind| Event::ExerciseStartFailed {
            kind,
            message: "failed".to_string()
        }),
        arb_image_response().prop_map(|response| Event::ImageProcessed { response }),
        arb_error_kind().prop_map(|kind| Event::ImageUploadFailed {
            kind,
            message: "failed".to_string()
        }),
        (arb_reply_kind(), arb_reply_text(), any::<bool>()).prop_map(
            |(kind, text, interrupted)| Event::ReplyFinished {
                kind,
                text,
                interrupted
            }
        ),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_student_event(), arb_backend_event()]
}

fn arb_busy_state() -> impl Strategy<Value = TutorState> {
    (arb_subject(), arb_items(4), 1i64..100, arb_reply_kind()).prop_flat_map(
        |(subject, items, session, kind)| {
            let queue = ExerciseQueue::from_items(items);
            prop_oneof![
                Just(TutorState::StartingExercise {
                    subject,
                    queue: queue.clone(),
                    origin: StartOrigin::Typed,
                }),
                Just(TutorState::UploadingImage {
                    subject,
                    queue: queue.clone(),
                }),
                Just(TutorState::Replying {
                    subject,
                    session_id: SessionId(session),
                    queue,
                    kind,
                }),
            ]
        },
    )
}

// ============================================================================
// Invariant Checks
// ============================================================================

fn is_valid_state(state: &TutorState) -> bool {
    match state {
        TutorState::AwaitingConfirmation { queue, .. } => {
            queue.current().is_some() && !queue.is_free_form()
        }
        _ => state
            .queue()
            .is_none_or(|q| q.cursor().is_none_or(|c| c < q.len())),
    }
}

fn effects_are_valid(effects: &[Effect], state: &TutorState) -> bool {
    let requests = effects.iter().filter(|e| e.is_request()).count();
    let shows_confirmation = effects.contains(&Effect::SetConfirmationPrompt { visible: true });

    // A busy state is entered by issuing exactly one request
    let requests_ok = if state.is_busy() {
        requests == 1
    } else {
        requests == 0
    };
    let confirmation_ok = !shows_confirmation || state.is_awaiting_confirmation();

    requests_ok && confirmation_ok
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: Valid state and effects after any transition
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = TutorState::NoSubject;
        let ctx = test_context();

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
                prop_assert!(is_valid_state(&state), "Invalid state: {:?}", state);
                prop_assert!(
                    effects_are_valid(&result.effects, &state),
                    "Invalid effects for state {:?}: {:?}",
                    state,
                    result.effects
                );
            }
        }
    }

    // Invariant 2: Confirmation pending never coexists with a session
    #[test]
    fn prop_confirmation_excludes_session(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = TutorState::NoSubject;
        let ctx = test_context();

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
                if state.is_awaiting_confirmation() {
                    prop_assert_eq!(state.session_id(), None);
                }
            }
        }
    }

    // Invariant 3: Once chosen, the subject never changes
    #[test]
    fn prop_subject_is_permanent(
        subject in arb_subject(),
        events in proptest::collection::vec(arb_event(), 0..30),
    ) {
        let ctx = test_context();
        let mut state = transition(&TutorState::NoSubject, &ctx, Event::SubjectSelected { subject })
            .unwrap()
            .new_state;

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
                prop_assert_eq!(state.subject(), Some(subject));
            }
        }
    }

    // Invariant 4: Student actions are rejected while a request is in flight
    #[test]
    fn prop_busy_rejects_student_actions(
        state in arb_busy_state(),
        event in arb_student_event(),
    ) {
        let result = transition(&state, &test_context(), event);
        prop_assert_eq!(result.unwrap_err(), TransitionError::Busy);
    }

    // Invariant 5: Queue cursor stays in bounds under any advance sequence
    #[test]
    fn prop_queue_cursor_in_bounds(items in arb_items(6), advances in 0usize..10) {
        let mut queue = ExerciseQueue::from_items(items.clone());
        for _ in 0..advances {
            let had_next = queue.has_next();
            prop_assert_eq!(queue.advance().is_ok(), had_next);
        }
        match queue.cursor() {
            Some(c) => {
                prop_assert!(c < items.len());
                prop_assert_eq!(queue.current(), items.get(c).map(String::as_str));
            }
            None => prop_assert!(items.is_empty()),
        }
        prop_assert_eq!(queue.is_last(), !items.is_empty() && !queue.has_next());
    }

    // Invariant 6: A hint reply never ends the exercise
    #[test]
    fn prop_hint_reply_keeps_session(
        subject in arb_subject(),
        items in arb_items(4),
        session in 1i64..100,
        text in arb_reply_text(),
        interrupted in any::<bool>(),
    ) {
        let queue = ExerciseQueue::from_items(items);
        let replying = TutorState::Replying {
            subject,
            session_id: SessionId(session),
            queue: queue.clone(),
            kind: ReplyKind::Hint,
        };
        let result = transition(
            &replying,
            &test_context(),
            Event::ReplyFinished { kind: ReplyKind::Hint, text, interrupted },
        )
        .unwrap();
        prop_assert_eq!(
            result.new_state,
            TutorState::ExerciseInProgress { subject, session_id: SessionId(session), queue }
        );
    }

    // Invariant 7: The offer phrase is found regardless of surrounding text
    #[test]
    fn prop_offer_detected_with_padding(
        before in "[a-z .!]{0,40}",
        // Leaves room for "רוצה" and "עוד תרגיל" inside the window
        gap in proptest::collection::vec("[a-z ,?]", 0..=WINDOW_CHARS - 13),
        after in "[a-z .!?]{0,40}",
    ) {
        let gap: String = gap.concat();
        let reply = format!("{before}רוצה{gap}עוד תרגיל{after}");
        prop_assert!(offers_next_exercise(&reply));
    }
}
