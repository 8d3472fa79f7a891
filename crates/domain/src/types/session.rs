//! Situational sessions and their generated prompt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Happy,
    Anxious,
    Uncomfortable,
    Angry,
    Tired,
}

impl_domain_status_conversions!(Mood {
    Calm => "calm",
    Happy => "happy",
    Anxious => "anxious",
    Uncomfortable => "uncomfortable",
    Angry => "angry",
    Tired => "tired",
});

/// Short-lived session created per day or visit
///
/// `generated_prompt` is filled in asynchronously by the backend and stays
/// empty for a while after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationalSession {
    #[serde(rename = "session_id")]
    pub id: String,
    #[serde(rename = "child_id")]
    pub dependent_id: String,
    pub mood: Mood,
    #[serde(rename = "environment", with = "crate::utils::serde_helpers::comma_list", default)]
    pub environment_tags: Vec<String>,
    #[serde(rename = "situation", default)]
    pub situation_narrative: String,
    #[serde(
        rename = "prompt",
        default,
        deserialize_with = "crate::utils::serde_helpers::null_as_default"
    )]
    pub generated_prompt: String,
    pub created_at: DateTime<Utc>,
}

impl SituationalSession {
    /// Whether prompt synthesis has completed.
    pub fn has_prompt(&self) -> bool {
        !self.generated_prompt.trim().is_empty()
    }
}

/// Creation payload for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSituationalSession {
    #[serde(rename = "child_id")]
    pub dependent_id: String,
    pub mood: Mood,
    #[serde(rename = "environment", with = "crate::utils::serde_helpers::comma_list")]
    pub environment_tags: Vec<String>,
    #[serde(rename = "situation")]
    pub situation_narrative: String,
}
