//! Response shaping: bound, emphasize, and clean raw reply text.
//!
//! Raw completions (local templates or remote model output) pass through a
//! fixed sequence of transformations so every rendered reply is one short
//! line an elderly reader can take in at a glance:
//!
//! 1. Keep only the first line.
//! 2. Hard-truncate to [`MAX_REPLY_CHARS`] characters.
//! 3. Wrap every occurrence of the urgency terms in `**…**` emphasis,
//!    case-insensitively, skipping occurrences that are already wrapped.
//! 4. Replace everything from the first `?` to the end with a single
//!    period, collapsing any follow-up question the model appended.
//!
//! The result is clamped to the cap once more (emphasis markers add
//! characters) and never empty: blank output becomes [`FALLBACK_REPLY`].
//! Shaping is idempotent, so already-shaped text passes through unchanged.

/// Hard character cap for shaped replies.
pub const MAX_REPLY_CHARS: usize = 150;

/// Terms wrapped in `**…**` emphasis wherever they occur.
pub const URGENT_TERMS: &[&str] = &["now", "emergency", "call", "alert", "immediately"];

/// Substituted when shaping would otherwise produce an empty reply.
pub const FALLBACK_REPLY: &str = "Let me help with that.";

/// Shape raw text into a single-line, bounded-length, question-free reply.
#[must_use]
pub fn shape(raw: &str) -> String {
    let line = raw.lines().next().unwrap_or("").trim();
    let mut out = truncate_chars(line, MAX_REPLY_CHARS);
    out = emphasize_terms(&out);
    out = strip_trailing_question(&out);
    out = truncate_chars(&out, MAX_REPLY_CHARS);

    if out.trim().is_empty() {
        FALLBACK_REPLY.to_owned()
    } else {
        out
    }
}

/// Remove `**` emphasis markers before speech synthesis.
#[must_use]
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
}

// ── Internals ───────────────────────────────────────────────────────────

/// Truncate on a character boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}

fn emphasize_terms(text: &str) -> String {
    let mut out = text.to_owned();
    for term in URGENT_TERMS {
        out = emphasize_term(&out, term);
    }
    out
}

/// Wrap every case-insensitive occurrence of `term` in `**…**`, leaving
/// occurrences that already carry markers untouched.
fn emphasize_term(text: &str, term: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while let Some(rel) = lower[i..].find(term) {
        let start = i + rel;
        let end = start + term.len();
        out.push_str(&text[i..start]);
        if text[..start].ends_with("**") && text[end..].starts_with("**") {
            out.push_str(&text[start..end]);
        } else {
            out.push_str("**");
            out.push_str(&text[start..end]);
            out.push_str("**");
        }
        i = end;
    }
    out.push_str(&text[i..]);
    out
}

/// Replace everything from the first `?` to the end with a single period.
fn strip_trailing_question(text: &str) -> String {
    match text.find('?') {
        Some(idx) => {
            let mut out = text[..idx].to_owned();
            out.push('.');
            out
        }
        None => text.to_owned(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn emphasis_and_question_cleanup() {
        let shaped = shape("You should rest now. Do you need help?");
        assert_eq!(shaped, "You should rest **now**. Do you need help.");
        assert!(shaped.chars().count() <= MAX_REPLY_CHARS);
    }

    #[test]
    fn multi_paragraph_keeps_first_line() {
        let shaped = shape("First line here.\nSecond paragraph with more detail.\nThird.");
        assert_eq!(shaped, "First line here.");
    }

    #[test]
    fn long_text_is_truncated_to_cap() {
        let long = "word ".repeat(60);
        let shaped = shape(&long);
        assert_eq!(shaped.chars().count(), MAX_REPLY_CHARS);
    }

    #[test]
    fn never_longer_than_cap_even_with_emphasis() {
        // Urgency terms near the truncation point add marker characters;
        // the final clamp keeps the guarantee.
        let long = "call ".repeat(60);
        let shaped = shape(&long);
        assert!(shaped.chars().count() <= MAX_REPLY_CHARS);
    }

    #[test]
    fn never_contains_question_mark() {
        for raw in [
            "Do you need help?",
            "First? Second? Third?",
            "Fine. But why? And how?",
            "???",
        ] {
            let shaped = shape(raw);
            assert!(!shaped.contains('?'), "shaped {raw:?} -> {shaped:?}");
        }
    }

    #[test]
    fn multi_question_input_loses_every_question() {
        // Everything from the first question mark onward collapses.
        assert_eq!(shape("Are you okay? Should I call someone?"), "Are you okay.");
    }

    #[test]
    fn empty_input_yields_fallback() {
        assert_eq!(shape(""), FALLBACK_REPLY);
        assert_eq!(shape("   "), FALLBACK_REPLY);
        assert_eq!(shape("\n\nsecond line only"), FALLBACK_REPLY);
    }

    #[test]
    fn every_urgent_term_occurrence_is_wrapped() {
        let shaped = shape("Call Mary now, call Dr. Patel immediately.");
        assert_eq!(
            shaped,
            "**Call** Mary **now**, **call** Dr. Patel **immediately**."
        );
    }

    #[test]
    fn emphasis_is_case_insensitive() {
        assert_eq!(shape("EMERGENCY detected."), "**EMERGENCY** detected.");
    }

    #[test]
    fn shaping_is_idempotent() {
        for raw in [
            "Please rest and drink water.",
            "You should rest now.",
            "Call Mary now, call Dr. Patel immediately.",
            "Short answer.",
        ] {
            let once = shape(raw);
            let twice = shape(&once);
            assert_eq!(once, twice, "shaping {raw:?} twice diverged");
        }
    }

    #[test]
    fn already_shaped_short_input_is_unchanged() {
        let shaped = "Your appointment is May 15 at 2:30 PM.";
        assert_eq!(shape(shaped), shaped);
    }

    #[test]
    fn strip_emphasis_removes_markers() {
        assert_eq!(strip_emphasis("rest **now** please"), "rest now please");
        assert_eq!(strip_emphasis("no markers"), "no markers");
    }
}
