//! Emergency phrase detection and the alert log.
//!
//! Utterances are scanned before intent routing; a hit short-circuits the
//! turn with a fixed reply and records an alert for the caregiver-facing
//! listing. The log is append-only and in-memory, like the conversation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Phrases that trigger emergency handling, matched case-insensitively.
pub const EMERGENCY_PHRASES: &[&str] = &["emergency", "sos"];

/// Fixed reply for a detected emergency.
pub const EMERGENCY_REPLY: &str = "I've detected an emergency. Help is on the way!";

/// Whether the utterance contains an emergency phrase.
#[must_use]
pub fn detect(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    EMERGENCY_PHRASES.iter().any(|p| lower.contains(p))
}

/// Delivery status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    /// Recorded but not yet dispatched.
    Pending,
    /// Dispatched to caregivers.
    Sent,
    /// A caregiver has acknowledged it.
    Acknowledged,
}

/// One recorded emergency.
#[derive(Debug, Clone)]
pub struct EmergencyAlert {
    /// Alert id.
    pub id: Uuid,
    /// The triggering utterance text.
    pub message: String,
    /// When the alert was recorded.
    pub at: DateTime<Utc>,
    /// Delivery status.
    pub status: AlertStatus,
}

/// Append-only in-memory alert log.
#[derive(Debug, Default)]
pub struct AlertLog {
    alerts: Vec<EmergencyAlert>,
}

impl AlertLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new alert as dispatched, returning it.
    pub fn record(&mut self, message: &str) -> &EmergencyAlert {
        self.alerts.push(EmergencyAlert {
            id: Uuid::new_v4(),
            message: message.to_owned(),
            at: Utc::now(),
            status: AlertStatus::Sent,
        });
        let idx = self.alerts.len() - 1;
        &self.alerts[idx]
    }

    /// Mark an alert acknowledged. Returns `false` for an unknown id.
    pub fn acknowledge(&mut self, id: Uuid) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.status = AlertStatus::Acknowledged;
                true
            }
            None => false,
        }
    }

    /// Alerts newest first, for listing.
    pub fn newest_first(&self) -> impl Iterator<Item = &EmergencyAlert> {
        self.alerts.iter().rev()
    }

    /// Number of recorded alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether no alert has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
