//! Persona text for the remote completion path.
//!
//! The system preamble is assembled from two layers: the fixed behaviour
//! rules ([`SYSTEM_PREAMBLE`]) and the care plan's rendered reference block,
//! so the model can answer medication/appointment/contact questions without
//! being asked to invent details.

use crate::care_plan::CarePlan;

/// Fixed behaviour rules for the assistant persona.
///
/// Always the first layer of the assembled preamble.
pub const SYSTEM_PREAMBLE: &str = "\
You are ElderEase Assistant, an AI companion designed to support elderly individuals.\n\
Your responses should be:\n\
- Extremely concise (1-2 sentences max)\n\
- Directly actionable\n\
- In simple language\n\
\n\
Response rules:\n\
1. For medication reminders: confirm the time and medication\n\
2. For appointments: confirm the date, time, and doctor\n\
3. For contacts: provide the name and number immediately\n\
4. For health questions: give the single most important action\n\
5. Never ask follow-up questions\n\
6. Use the reference information when available";

/// The assistant's seeded first turn, anchoring tone for the model.
pub const GREETING: &str = "Hello! I'm ElderEase. How can I help?";

/// Assemble the full system preamble: behaviour rules plus the care plan's
/// reference block.
#[must_use]
pub fn system_preamble(plan: &CarePlan) -> String {
    format!("{SYSTEM_PREAMBLE}\n\n{}", plan.render_reference())
}

/// Welcome line shown (and spoken) when a conversation screen opens.
#[must_use]
pub fn welcome(name: Option<&str>) -> String {
    format!(
        "Hello {}! I'm your ElderEase companion. How can I help you today?",
        name.unwrap_or("there")
    )
}
