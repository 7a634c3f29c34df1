//! Conversation state: utterances, replies, and turns.
//!
//! A [`Conversation`] owns an append-only list of [`Turn`]s for the lifetime
//! of one screen/session. Turns are never reordered or removed; the only
//! permitted mutation after append is marking a reply as confirmed.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Raw text from the user, stamped at creation.
#[derive(Debug, Clone)]
pub struct Utterance {
    /// The user's text, as entered or transcribed.
    pub text: String,
    /// When the utterance was created.
    pub at: DateTime<Utc>,
    /// The conversation this utterance belongs to.
    pub conversation_id: Uuid,
}

/// A confirmable action extracted from a local intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantAction {
    /// A reminder with its body and, when present, the spoken clock time.
    Reminder {
        /// What to be reminded about.
        body: String,
        /// Clock-time fragment extracted from the utterance, e.g. `"8:30 PM"`.
        time: Option<String>,
    },
    /// An appointment request with its remaining details.
    Appointment {
        /// Utterance text with the matched keywords removed.
        details: String,
    },
    /// A medication reminder with its remaining details.
    Medication {
        /// Utterance text with the matched keywords removed.
        details: String,
    },
}

/// An assistant reply.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Shaped reply text, safe to render and to speak.
    pub text: String,
    /// Present when the reply offers a confirmable action.
    pub action: Option<AssistantAction>,
    /// Whether the user has confirmed the action.
    pub confirmed: bool,
}

impl Reply {
    /// A plain reply with no confirmable action.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
            confirmed: false,
        }
    }

    /// A reply carrying a confirmable action.
    #[must_use]
    pub fn with_action(text: impl Into<String>, action: AssistantAction) -> Self {
        Self {
            text: text.into(),
            action: Some(action),
            confirmed: false,
        }
    }

    /// Whether this reply still offers an unconfirmed action.
    #[must_use]
    pub fn is_confirmable(&self) -> bool {
        self.action.is_some() && !self.confirmed
    }
}

/// One utterance/reply pair.
#[derive(Debug, Clone)]
pub struct Turn {
    /// The user's side of the turn.
    pub utterance: Utterance,
    /// The assistant's side of the turn.
    pub reply: Reply,
}

/// An in-memory conversation. Lives only as long as the owning screen.
#[derive(Debug)]
pub struct Conversation {
    id: Uuid,
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start a new conversation with a fresh id and no turns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            turns: Vec::new(),
        }
    }

    /// The conversation id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Create an utterance stamped with the current time and this
    /// conversation's id.
    #[must_use]
    pub fn utterance(&self, text: impl Into<String>) -> Utterance {
        Utterance {
            text: text.into(),
            at: Utc::now(),
            conversation_id: self.id,
        }
    }

    /// Append a completed turn. Turns are never reordered after this.
    pub fn push_turn(&mut self, utterance: Utterance, reply: Reply) -> &Turn {
        self.turns.push(Turn { utterance, reply });
        let idx = self.turns.len() - 1;
        &self.turns[idx]
    }

    /// All turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the conversation has no turns yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn, if any.
    #[must_use]
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Mark the most recent confirmable reply as confirmed.
    ///
    /// Returns the confirmed action, or `None` when no turn offers one.
    pub fn confirm_last(&mut self) -> Option<AssistantAction> {
        let turn = self
            .turns
            .iter_mut()
            .rev()
            .find(|t| t.reply.is_confirmable())?;
        turn.reply.confirmed = true;
        turn.reply.action.clone()
    }

    /// The last `n` turns, oldest first.
    #[must_use]
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Render the last `n` turns as alternating speaker-labeled lines for
    /// the completion prompt.
    #[must_use]
    pub fn render_history(&self, n: usize) -> String {
        let mut lines = Vec::with_capacity(n * 2);
        for turn in self.recent_turns(n) {
            lines.push(format!("User: {}", turn.utterance.text));
            lines.push(format!("Assistant: {}", turn.reply.text));
        }
        lines.join("\n")
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn turn(conv: &Conversation, user: &str, assistant: &str) -> (Utterance, Reply) {
        (conv.utterance(user), Reply::plain(assistant))
    }

    #[test]
    fn turns_append_in_order() {
        let mut conv = Conversation::new();
        let (u1, r1) = turn(&conv, "hello", "Hi there.");
        conv.push_turn(u1, r1);
        let (u2, r2) = turn(&conv, "how are you", "Doing well.");
        conv.push_turn(u2, r2);

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.turns()[0].utterance.text, "hello");
        assert_eq!(conv.turns()[1].reply.text, "Doing well.");
    }

    #[test]
    fn utterances_carry_conversation_id() {
        let conv = Conversation::new();
        let u = conv.utterance("test");
        assert_eq!(u.conversation_id, conv.id());
    }

    #[test]
    fn confirm_marks_most_recent_confirmable() {
        let mut conv = Conversation::new();
        let u1 = conv.utterance("remind me to rest");
        conv.push_turn(
            u1,
            Reply::with_action(
                "I'll remind you.",
                AssistantAction::Reminder {
                    body: "rest".to_owned(),
                    time: None,
                },
            ),
        );
        let u2 = conv.utterance("thanks");
        conv.push_turn(u2, Reply::plain("You're welcome."));

        let action = conv.confirm_last().unwrap();
        assert!(matches!(action, AssistantAction::Reminder { .. }));
        assert!(conv.turns()[0].reply.confirmed);
        assert!(!conv.turns()[0].reply.is_confirmable());
    }

    #[test]
    fn confirm_with_nothing_confirmable_returns_none() {
        let mut conv = Conversation::new();
        let (u, r) = turn(&conv, "hello", "Hi.");
        conv.push_turn(u, r);
        assert!(conv.confirm_last().is_none());
    }

    #[test]
    fn confirm_is_the_only_mutation() {
        let mut conv = Conversation::new();
        let u = conv.utterance("remind me to walk");
        conv.push_turn(
            u,
            Reply::with_action(
                "I'll remind you: \"walk\".",
                AssistantAction::Reminder {
                    body: "walk".to_owned(),
                    time: None,
                },
            ),
        );
        let text_before = conv.turns()[0].reply.text.clone();
        conv.confirm_last();
        assert_eq!(conv.turns()[0].reply.text, text_before);
    }

    #[test]
    fn recent_turns_is_a_rolling_window() {
        let mut conv = Conversation::new();
        for i in 0..5 {
            let (u, r) = turn(&conv, &format!("u{i}"), &format!("a{i}"));
            conv.push_turn(u, r);
        }
        let recent = conv.recent_turns(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].utterance.text, "u2");
        assert_eq!(recent[2].utterance.text, "u4");
    }

    #[test]
    fn recent_turns_handles_short_history() {
        let mut conv = Conversation::new();
        let (u, r) = turn(&conv, "only", "turn");
        conv.push_turn(u, r);
        assert_eq!(conv.recent_turns(3).len(), 1);
    }

    #[test]
    fn history_renders_speaker_labels() {
        let mut conv = Conversation::new();
        let (u, r) = turn(&conv, "hello", "Hi there.");
        conv.push_turn(u, r);
        let rendered = conv.render_history(3);
        assert_eq!(rendered, "User: hello\nAssistant: Hi there.");
    }

    #[test]
    fn empty_history_renders_empty() {
        let conv = Conversation::new();
        assert!(conv.render_history(3).is_empty());
    }
}
