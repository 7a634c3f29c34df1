//! Keyword-table intent routing for user utterances.
//!
//! Classifies free text into a small set of local intents before any remote
//! completion call is made. Matching is ordered, case-insensitive substring
//! testing against fixed phrase tables; the first matching rule wins, so an
//! utterance containing keywords from several categories always resolves to
//! the earliest rule.
//!
//! | Keywords | Intent |
//! |----------|--------|
//! | "remind", "reminder" | `Reminder` |
//! | "appointment", "schedule" | `Appointment` |
//! | "medicine", "pill", "medication" | `Medication` |
//! | "contact", "call" | `Contact` |
//! | anything else | `None` |

use crate::care_plan::{CarePlan, ContactResolution};
use regex::Regex;
use std::sync::OnceLock;

/// Coarse classification of what the user wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Set a reminder.
    Reminder,
    /// Schedule or ask about an appointment.
    Appointment,
    /// Medication reminder or question.
    Medication,
    /// Reach a contact.
    Contact,
    /// No local intent; defer to the remote completion path.
    None,
}

/// A classified utterance with any extracted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentMatch {
    /// A reminder request.
    Reminder {
        /// The reminder body: text after the trigger phrase, or the whole
        /// utterance when the trigger phrase carries no trailing text.
        body: String,
        /// Clock-time fragment found in the utterance, e.g. `"8:30 PM"`.
        time: Option<String>,
    },
    /// An appointment request.
    Appointment {
        /// Utterance text with the matched keywords removed.
        details: String,
    },
    /// A medication request.
    Medication {
        /// Utterance text with the matched keywords removed.
        details: String,
    },
    /// A contact request, resolved against the care plan's alias table.
    Contact(ContactResolution),
    /// No match.
    None,
}

impl IntentMatch {
    /// The intent tag for this match.
    #[must_use]
    pub fn intent(&self) -> Intent {
        match self {
            Self::Reminder { .. } => Intent::Reminder,
            Self::Appointment { .. } => Intent::Appointment,
            Self::Medication { .. } => Intent::Medication,
            Self::Contact(_) => Intent::Contact,
            Self::None => Intent::None,
        }
    }
}

// ── Phrase tables ───────────────────────────────────────────────────────

const REMINDER_KEYWORDS: &[&str] = &["remind", "reminder"];
const APPOINTMENT_KEYWORDS: &[&str] = &["appointment", "schedule"];
const MEDICATION_KEYWORDS: &[&str] = &["medicine", "pill", "medication"];
const CONTACT_KEYWORDS: &[&str] = &["contact", "call"];

/// Reminder trigger phrases, checked in order. Text after the first
/// occurrence becomes the reminder body.
const REMINDER_TRIGGERS: &[&str] = &["remind me to", "set a reminder for"];

/// Classify an utterance against the fixed phrase tables.
///
/// Pure function of the input text and the static tables; never fails.
/// An utterance matching no rule yields [`IntentMatch::None`], which defers
/// to the remote completion path.
#[must_use]
pub fn classify(text: &str, plan: &CarePlan) -> IntentMatch {
    // ASCII lowering keeps byte offsets aligned with the original text,
    // which the reminder-body extraction relies on.
    let lower = text.to_ascii_lowercase();

    if contains_any(&lower, REMINDER_KEYWORDS) {
        return IntentMatch::Reminder {
            body: extract_reminder_body(text, &lower),
            time: extract_clock_time(text),
        };
    }
    if contains_any(&lower, APPOINTMENT_KEYWORDS) {
        return IntentMatch::Appointment {
            details: strip_keywords(text, &lower, APPOINTMENT_KEYWORDS),
        };
    }
    if contains_any(&lower, MEDICATION_KEYWORDS) {
        return IntentMatch::Medication {
            details: strip_keywords(text, &lower, MEDICATION_KEYWORDS),
        };
    }
    if contains_any(&lower, CONTACT_KEYWORDS) {
        return IntentMatch::Contact(plan.resolve_contact(&lower));
    }
    IntentMatch::None
}

/// Extract a clock-time fragment (`H:MM` with optional am/pm) from the text.
#[must_use]
pub fn extract_clock_time(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)\d{1,2}:\d{2}\s?(?:am|pm)?").expect("clock-time pattern compiles")
    });
    re.find(text).map(|m| m.as_str().trim().to_owned())
}

// ── Internals ───────────────────────────────────────────────────────────

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower.contains(kw))
}

/// The remainder of the utterance after the first trigger phrase. Falls back
/// to the whole utterance when no trigger phrase is present, or when the
/// trigger phrase is the entire message.
fn extract_reminder_body(text: &str, lower: &str) -> String {
    for phrase in REMINDER_TRIGGERS {
        if let Some(idx) = lower.find(phrase) {
            let body = text[idx + phrase.len()..].trim();
            if !body.is_empty() {
                return body.to_owned();
            }
        }
    }
    text.trim().to_owned()
}

/// Remove every keyword occurrence (case-insensitively) and trim the result.
fn strip_keywords(text: &str, lower: &str, keywords: &[&str]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    'scan: while i < text.len() {
        for kw in keywords {
            if lower[i..].starts_with(kw) {
                i += kw.len();
                continue 'scan;
            }
        }
        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        out.push(ch);
        i += ch.len_utf8();
    }
    out.trim().to_owned()
}

// ── Tests ───────────────────────────────────────────────────────────────
