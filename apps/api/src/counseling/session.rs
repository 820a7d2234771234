use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the conversation currently stands. Collection steps track the
/// question phase; `choosing_field` and `editing` are the edit side-channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Personality,
    Aptitude,
    WorkStyle,
    ChoosingField,
    Editing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Bot,
    User,
}

/// One logged conversation turn. Edit-mode control inputs are never logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    #[serde(rename = "type")]
    pub speaker: Speaker,
    pub message: String,
}

/// Full state of one counseling conversation, persisted in the session store
/// between turns and discarded on TTL expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounselingSession {
    pub id: Uuid,
    pub step: Step,
    /// Index into `FIELD_ORDER` of the next field to ask.
    pub next_field: usize,
    /// Set while the edit side-channel is re-targeting an answered field.
    pub edit_target: Option<usize>,
    pub answers: HashMap<String, f64>,
    pub transcript: Vec<TranscriptTurn>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl CounselingSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: Step::Personality,
            next_field: 0,
            edit_target: None,
            answers: HashMap::new(),
            transcript: Vec::new(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn log_bot(&mut self, message: impl Into<String>) {
        self.transcript.push(TranscriptTurn {
            speaker: Speaker::Bot,
            message: message.into(),
        });
    }

    pub fn log_user(&mut self, message: impl Into<String>) {
        self.transcript.push(TranscriptTurn {
            speaker: Speaker::User,
            message: message.into(),
        });
    }
}

impl Default for CounselingSession {
    fn default() -> Self {
        Self::new()
    }
}
