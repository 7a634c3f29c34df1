//! ElderEase: conversational companion assistant core for elder-care apps.
//!
//! This crate provides the conversational pipeline behind the companion
//! screens: free-text utterances are classified against a small local intent
//! table before any network call; unmatched utterances go to a remote
//! generative-language API; every reply is shaped into one short,
//! elder-readable line and can optionally be played through a pluggable
//! speech capability.
//!
//! # Architecture
//!
//! Control flow per utterance:
//! user text → intent router → (local deterministic reply) OR
//! (remote completion → response shaper) → appended turn + optional speech
//!
//! - **Intent router** (`intent`): ordered keyword-table classification
//! - **Response shaper** (`shaping`): bounded, emphasized, question-free text
//! - **Completion adapter** (`completion`): the only I/O component, behind an
//!   injected trait so everything else tests without network access
//! - **Speech capability** (`speech`): single-shot capture and
//!   fire-and-forget playback behind a small trait
//! - **Controller** (`assistant`): owns the conversation and wires the
//!   stages, folding every failure into a fixed visible fallback

pub mod account;
pub mod assistant;
pub mod care_plan;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod emergency;
pub mod error;
pub mod intent;
pub mod persona;
pub mod shaping;
pub mod speech;

pub use assistant::{Assistant, COMPLETION_FALLBACK_REPLY, TurnOutcome};
pub use config::AssistantConfig;
pub use conversation::{Conversation, Reply, Turn, Utterance};
pub use error::{AssistantError, Result};
pub use intent::{Intent, IntentMatch, classify};
pub use shaping::{FALLBACK_REPLY, MAX_REPLY_CHARS, shape};
