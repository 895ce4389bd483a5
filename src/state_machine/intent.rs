//! Detection of the tutor offering another exercise
//!
//! A finished exercise is signalled only through the reply text: the tutor
//! closes with something like "רוצה עוד תרגיל?". Matching is loose on
//! purpose and misses are tolerated; a miss leaves the student on the
//! finished exercise, where the next message simply gets another reply.

use regex::Regex;
use std::sync::LazyLock;

/// Width, in characters, of the window the whole phrase must fit in
pub const WINDOW_CHARS: usize = 30;

struct OfferPatterns {
    /// Where a candidate phrase can begin
    want: Regex,
    /// The ordered tokens, anchored at the start of a window
    phrase: Regex,
}

static NEXT_EXERCISE_OFFER: LazyLock<Option<OfferPatterns>> = LazyLock::new(|| {
    let compiled = Regex::new(r"(?i)רוצה|רוצים|want").and_then(|want| {
        Regex::new(r"(?is)^(?:רוצה|רוצים|want).*?(?:עוד|another).*?(?:תרגיל|exercise)")
            .map(|phrase| OfferPatterns { want, phrase })
    });
    match compiled {
        Ok(patterns) => Some(patterns),
        Err(e) => {
            tracing::error!(error = %e, "Failed to compile next-exercise pattern");
            None
        }
    }
});

/// Whether `reply` offers the student a next exercise.
///
/// Looks for a "want" token, then an "another" token, then an "exercise"
/// token, in that order, all inside one window of [`WINDOW_CHARS`]
/// characters that starts at the "want" token. Anything may sit between
/// the tokens, punctuation and line breaks included.
pub fn offers_next_exercise(reply: &str) -> bool {
    let Some(patterns) = NEXT_EXERCISE_OFFER.as_ref() else {
        return false;
    };

    patterns.want.find_iter(reply).any(|want| {
        let start = want.start();
        let end = reply
            .get(start..)
            .and_then(|rest| rest.char_indices().nth(WINDOW_CHARS))
            .map_or(reply.len(), |(offset, _)| start + offset);
        reply
            .get(start..end)
            .is_some_and(|window| patterns.phrase.is_match(window))
    })
}
