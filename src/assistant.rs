//! The conversation controller.
//!
//! Owns one conversation and wires the stages together:
//! utterance → emergency check → intent router → local reply OR remote
//! completion → response shaper → appended turn, with optional playback.
//!
//! Every utterance produces exactly one reply. Failure domains never cross
//! component boundaries: a remote-call failure becomes the fixed
//! [`COMPLETION_FALLBACK_REPLY`], a speech failure becomes a visible notice,
//! and neither reaches the caller as an error.

use crate::care_plan::{CarePlan, ContactResolution};
use crate::completion::{
    CompletionProvider, CompletionRequest, GenerationParams, HistoryLine, HistoryRole,
};
use crate::config::AssistantConfig;
use crate::conversation::{AssistantAction, Conversation, Reply, Turn};
use crate::emergency::{self, AlertLog};
use crate::intent::{self, IntentMatch};
use crate::persona;
use crate::shaping;
use crate::speech::{
    CAPTURE_FAILED_NOTICE, CAPTURE_UNSUPPORTED_NOTICE, PLAYBACK_FAILED_NOTICE, SpeechIo,
};
use tracing::warn;

/// Fixed reply when the remote completion path fails.
pub const COMPLETION_FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Please try again.";

/// The result of handling one utterance.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The appended turn.
    pub turn: Turn,
    /// A visible playback-degradation notice, when speaking failed.
    pub speech_notice: Option<&'static str>,
}

/// Confirmed actions accumulated over the conversation's lifetime.
#[derive(Debug, Default)]
pub struct Schedule {
    entries: Vec<AssistantAction>,
}

impl Schedule {
    fn add(&mut self, action: AssistantAction) {
        self.entries.push(action);
    }

    /// Confirmed entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[AssistantAction] {
        &self.entries
    }

    /// Number of confirmed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been confirmed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The conversation controller.
///
/// [`handle_utterance`](Assistant::handle_utterance) takes `&mut self`, so
/// at most one completion request is outstanding per conversation: a second
/// submission cannot start until the current turn resolves. There is no
/// queue and no cancellation; dropping the future simply discards interest
/// in the pending result.
pub struct Assistant {
    config: AssistantConfig,
    plan: CarePlan,
    conversation: Conversation,
    provider: Box<dyn CompletionProvider>,
    speech: Box<dyn SpeechIo>,
    alerts: AlertLog,
    schedule: Schedule,
}

impl Assistant {
    /// Build a controller over the injected provider and speech capability.
    #[must_use]
    pub fn new(
        config: AssistantConfig,
        plan: CarePlan,
        provider: Box<dyn CompletionProvider>,
        speech: Box<dyn SpeechIo>,
    ) -> Self {
        Self {
            config,
            plan,
            conversation: Conversation::new(),
            provider,
            speech,
            alerts: AlertLog::new(),
            schedule: Schedule::default(),
        }
    }

    /// The conversation so far.
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Recorded emergency alerts.
    #[must_use]
    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    /// Confirmed actions.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Toggle reply playback. Turning it off cancels any in-progress speech.
    pub fn set_speak_replies(&mut self, on: bool) {
        self.config.speech.speak_replies = on;
        if !on {
            self.speech.cancel_speech();
        }
    }

    /// Handle one utterance, appending exactly one turn.
    pub async fn handle_utterance(&mut self, text: &str) -> TurnOutcome {
        let utterance = self.conversation.utterance(text);
        let reply = self.reply_for(text).await;
        let speech_notice = self.speak_if_enabled(&reply.text);
        let turn = self.conversation.push_turn(utterance, reply).clone();
        TurnOutcome {
            turn,
            speech_notice,
        }
    }

    /// Confirm the most recent confirmable reply, adding its action to the
    /// schedule. Returns the confirmed action, or `None` when nothing was
    /// confirmable.
    pub fn confirm_last(&mut self) -> Option<AssistantAction> {
        let action = self.conversation.confirm_last()?;
        self.schedule.add(action.clone());
        Some(action)
    }

    /// Capture one utterance through the speech capability.
    ///
    /// On failure returns the fixed degradation notice to show as assistant
    /// text instead of raising an error.
    pub fn capture_utterance(&mut self) -> std::result::Result<String, &'static str> {
        if !self.speech.is_capture_available() {
            return Err(CAPTURE_UNSUPPORTED_NOTICE);
        }
        let language = self.config.speech.language.clone();
        match self.speech.start_capture(&language) {
            Ok(transcript) => Ok(transcript),
            Err(e) => {
                warn!("speech capture failed: {e}");
                Err(CAPTURE_FAILED_NOTICE)
            }
        }
    }

    async fn reply_for(&mut self, text: &str) -> Reply {
        if emergency::detect(text) {
            warn!("emergency phrase detected; recording alert");
            self.alerts.record(text);
            return Reply::plain(shaping::shape(emergency::EMERGENCY_REPLY));
        }

        match intent::classify(text, &self.plan) {
            IntentMatch::Reminder { body, time } => {
                let text = format!("I'll remind you: \"{body}\"");
                Reply::with_action(
                    shaping::shape(&text),
                    AssistantAction::Reminder { body, time },
                )
            }
            IntentMatch::Appointment { details } => {
                let text = format!("Let me schedule that appointment for you: {details}");
                Reply::with_action(
                    shaping::shape(&text),
                    AssistantAction::Appointment { details },
                )
            }
            IntentMatch::Medication { details } => {
                let text = format!("I'll remind you about your medication: {details}");
                Reply::with_action(
                    shaping::shape(&text),
                    AssistantAction::Medication { details },
                )
            }
            IntentMatch::Contact(resolution) => {
                let text = match resolution {
                    ContactResolution::Single(c) => {
                        format!("{} can be reached at {}.", c.name, c.number)
                    }
                    ContactResolution::All(contacts) => {
                        let listed: Vec<String> = contacts
                            .iter()
                            .map(|c| format!("{} {}", c.name, c.number))
                            .collect();
                        format!("Emergency contacts: {}", listed.join(", "))
                    }
                };
                Reply::plain(shaping::shape(&text))
            }
            IntentMatch::None => {
                let request = self.build_request(text);
                match self.provider.complete(&request).await {
                    Ok(raw) => Reply::plain(shaping::shape(&raw)),
                    Err(e) => {
                        warn!(provider = self.provider.name(), "completion failed: {e}");
                        Reply::plain(COMPLETION_FALLBACK_REPLY.to_owned())
                    }
                }
            }
        }
    }

    fn build_request(&self, utterance: &str) -> CompletionRequest {
        let mut history = Vec::new();
        for turn in self
            .conversation
            .recent_turns(self.config.llm.max_history_turns)
        {
            history.push(HistoryLine {
                role: HistoryRole::User,
                text: turn.utterance.text.clone(),
            });
            history.push(HistoryLine {
                role: HistoryRole::Assistant,
                text: turn.reply.text.clone(),
            });
        }
        CompletionRequest {
            system: persona::system_preamble(&self.plan),
            history,
            utterance: utterance.to_owned(),
            params: GenerationParams::from(&self.config.llm),
        }
    }

    fn speak_if_enabled(&mut self, text: &str) -> Option<&'static str> {
        if !self.config.speech.speak_replies {
            return None;
        }
        let language = self.config.speech.language.clone();
        let spoken = shaping::strip_emphasis(text);
        match self.speech.speak(&spoken, &language) {
            Ok(()) => None,
            Err(e) => {
                warn!("speech playback failed: {e}");
                Some(PLAYBACK_FAILED_NOTICE)
            }
        }
    }
}
