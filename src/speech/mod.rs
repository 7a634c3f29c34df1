//! Speech capture and playback capability.
//!
//! Platform speech APIs sit behind the small [`SpeechIo`] trait so the rest
//! of the crate runs (and tests) without any UI runtime. Capture is
//! single-shot: one activation yields one transcript. Playback is
//! fire-and-forget. Failures degrade to the fixed notices below; they are
//! surfaced as visible assistant text, never raised to the UI.

use crate::error::{AssistantError, Result};
use rand::Rng;

/// Supported capture/playback language tags.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en-US", "hi-IN", "ta-IN", "te-IN", "bn-IN"];

/// Shown when capture is unavailable in this environment.
pub const CAPTURE_UNSUPPORTED_NOTICE: &str =
    "Voice input is not available right now. Please type your message instead.";

/// Shown when a capture attempt fails.
pub const CAPTURE_FAILED_NOTICE: &str =
    "Sorry, I couldn't catch that. Please try again or type your message.";

/// Shown when playback fails.
pub const PLAYBACK_FAILED_NOTICE: &str =
    "I couldn't speak that reply, but you can read it above.";

/// Capability interface over platform speech APIs.
pub trait SpeechIo: Send {
    /// Whether capture can be attempted at all in this environment.
    fn is_capture_available(&self) -> bool {
        true
    }

    /// Capture one utterance and return its transcript.
    ///
    /// # Errors
    ///
    /// Returns an error when capture is unsupported, permission is denied,
    /// or no speech was detected.
    fn start_capture(&mut self, language: &str) -> Result<String>;

    /// Abort an in-progress capture.
    fn cancel_capture(&mut self);

    /// Play the text through speech synthesis.
    ///
    /// # Errors
    ///
    /// Returns an error when synthesis is unavailable or fails to start.
    fn speak(&mut self, text: &str, language: &str) -> Result<()>;

    /// Stop any in-progress playback.
    fn cancel_speech(&mut self);
}

/// No-op implementation for headless environments.
///
/// Playback silently succeeds; capture reports unsupported.
#[derive(Debug, Default)]
pub struct NullSpeech;

impl SpeechIo for NullSpeech {
    fn is_capture_available(&self) -> bool {
        false
    }

    fn start_capture(&mut self, _language: &str) -> Result<String> {
        Err(AssistantError::Speech(
            "speech capture is not supported in this environment".to_owned(),
        ))
    }

    fn cancel_capture(&mut self) {}

    fn speak(&mut self, _text: &str, _language: &str) -> Result<()> {
        Ok(())
    }

    fn cancel_speech(&mut self) {}
}

/// Default canned transcripts for [`SimulatedSpeech`].
const CANNED_TRANSCRIPTS: &[&str] = &[
    "What medications do I take today?",
    "I'm feeling dizzy, what should I do?",
    "When is my next doctor's appointment?",
    "Remind me to take my pills at 2 PM",
    "What's my blood pressure reading?",
];

/// Simulated capture that returns a canned transcript per activation.
///
/// Used by the CLI demo mode and by tests that need deterministic input
/// (construct with a single transcript).
#[derive(Debug)]
pub struct SimulatedSpeech {
    transcripts: Vec<String>,
}

impl SimulatedSpeech {
    /// Simulated capture over the default transcript set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transcripts: CANNED_TRANSCRIPTS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Simulated capture over a caller-supplied transcript set.
    #[must_use]
    pub fn with_transcripts(transcripts: Vec<String>) -> Self {
        Self { transcripts }
    }
}

impl Default for SimulatedSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechIo for SimulatedSpeech {
    fn start_capture(&mut self, _language: &str) -> Result<String> {
        if self.transcripts.is_empty() {
            return Err(AssistantError::Speech("no speech detected".to_owned()));
        }
        let idx = rand::thread_rng().gen_range(0..self.transcripts.len());
        Ok(self.transcripts[idx].clone())
    }

    fn cancel_capture(&mut self) {}

    fn speak(&mut self, text: &str, language: &str) -> Result<()> {
        tracing::info!("speaking ({language}): {text}");
        Ok(())
    }

    fn cancel_speech(&mut self) {}
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn null_speech_capture_is_unsupported() {
        let mut speech = NullSpeech;
        assert!(speech.start_capture("en-US").is_err());
    }

    #[test]
    fn null_speech_playback_is_silent() {
        let mut speech = NullSpeech;
        assert!(speech.speak("hello", "en-US").is_ok());
    }

    #[test]
    fn simulated_capture_returns_a_canned_transcript() {
        let mut speech = SimulatedSpeech::new();
        let transcript = speech.start_capture("en-US").unwrap();
        assert!(CANNED_TRANSCRIPTS.contains(&transcript.as_str()));
    }

    #[test]
    fn single_transcript_is_deterministic() {
        let mut speech = SimulatedSpeech::with_transcripts(vec!["call my daughter".to_owned()]);
        assert_eq!(speech.start_capture("en-US").unwrap(), "call my daughter");
    }

    #[test]
    fn empty_transcripts_report_no_speech() {
        let mut speech = SimulatedSpeech::with_transcripts(Vec::new());
        assert!(speech.start_capture("en-US").is_err());
    }

    #[test]
    fn language_table_lists_five_options() {
        assert_eq!(SUPPORTED_LANGUAGES.len(), 5);
        assert!(SUPPORTED_LANGUAGES.contains(&"en-US"));
    }
}
