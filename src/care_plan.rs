//! Care-plan reference data: medications, appointments, emergency contacts.
//!
//! A built-in plan ships with the crate so the assistant always has reference
//! data to answer from. A per-user plan can be placed at
//! `~/.elderease/care_plan.toml`; when present it replaces the built-in one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A medication entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    /// Drug name.
    pub name: String,
    /// Dose, e.g. `"10mg"`.
    pub dose: String,
    /// When to take it, in plain words.
    pub schedule: String,
}

/// An upcoming appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// What the appointment is, e.g. `"Dr. Smith (Cardiologist)"`.
    pub title: String,
    /// When it takes place, in plain words.
    pub at: String,
}

/// An emergency contact with the aliases the user may say for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Canonical display name.
    pub name: String,
    /// Relation to the user, e.g. `"Daughter"`.
    pub relation: String,
    /// Phone number.
    pub number: String,
    /// Lower-case aliases matched against utterances.
    pub aliases: Vec<String>,
}

/// Result of resolving a contact request against the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactResolution {
    /// One alias matched.
    Single(Contact),
    /// No alias matched; the full list is returned instead.
    All(Vec<Contact>),
}

/// The assistant's static reference data.
///
/// A user-supplied plan file replaces the built-in plan wholesale: sections
/// missing from the file are empty, not backfilled from the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarePlan {
    /// Current medications.
    #[serde(default)]
    pub medications: Vec<Medication>,
    /// Upcoming appointments.
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    /// Emergency contacts.
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl Default for CarePlan {
    fn default() -> Self {
        Self {
            medications: vec![
                Medication {
                    name: "Lisinopril".to_owned(),
                    dose: "10mg".to_owned(),
                    schedule: "morning".to_owned(),
                },
                Medication {
                    name: "Metformin".to_owned(),
                    dose: "500mg".to_owned(),
                    schedule: "with breakfast and dinner".to_owned(),
                },
                Medication {
                    name: "Atorvastatin".to_owned(),
                    dose: "20mg".to_owned(),
                    schedule: "at bedtime".to_owned(),
                },
            ],
            appointments: vec![
                Appointment {
                    title: "Dr. Smith (Cardiologist)".to_owned(),
                    at: "May 15, 2:30 PM".to_owned(),
                },
                Appointment {
                    title: "Annual Physical".to_owned(),
                    at: "June 3, 10:00 AM".to_owned(),
                },
            ],
            contacts: vec![
                Contact {
                    name: "Mary Johnson".to_owned(),
                    relation: "Daughter".to_owned(),
                    number: "(555) 123-4567".to_owned(),
                    aliases: vec!["daughter".to_owned(), "mary".to_owned()],
                },
                Contact {
                    name: "Bob Wilson".to_owned(),
                    relation: "Neighbor".to_owned(),
                    number: "(555) 987-6543".to_owned(),
                    aliases: vec!["neighbor".to_owned(), "bob".to_owned()],
                },
                Contact {
                    name: "Dr. Patel".to_owned(),
                    relation: "Primary Care".to_owned(),
                    number: "(555) 456-7890".to_owned(),
                    aliases: vec!["doctor".to_owned(), "patel".to_owned()],
                },
            ],
        }
    }
}

impl CarePlan {
    /// Load the plan from a TOML file, or the built-in plan when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            crate::error::AssistantError::CarePlan(format!(
                "invalid care plan ({}): {e}",
                path.display()
            ))
        })
    }

    /// Returns the default per-user plan path: `~/.elderease/care_plan.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".elderease").join("care_plan.toml")
        } else {
            PathBuf::from("/tmp/.elderease/care_plan.toml")
        }
    }

    /// Resolve a contact request against the alias table.
    ///
    /// The input must already be lower-cased. The first contact with an alias
    /// occurring in the text wins; with no alias hit, the full list is
    /// returned so the caller can present every number.
    #[must_use]
    pub fn resolve_contact(&self, lower_text: &str) -> ContactResolution {
        for contact in &self.contacts {
            if contact.aliases.iter().any(|a| lower_text.contains(a.as_str())) {
                return ContactResolution::Single(contact.clone());
            }
        }
        ContactResolution::All(self.contacts.clone())
    }

    /// Render the plan as the reference block appended to the system
    /// preamble.
    #[must_use]
    pub fn render_reference(&self) -> String {
        let mut out = String::from("User's reference information:\n- Medications:\n");
        for med in &self.medications {
            out.push_str(&format!("  * {} ({}) - {}\n", med.name, med.dose, med.schedule));
        }
        out.push_str("- Upcoming Appointments:\n");
        for appt in &self.appointments {
            out.push_str(&format!("  * {} - {}\n", appt.title, appt.at));
        }
        out.push_str("- Emergency Contacts:\n");
        for contact in &self.contacts {
            out.push_str(&format!(
                "  * {}: {} - {}\n",
                contact.relation, contact.name, contact.number
            ));
        }
        out
    }
}
