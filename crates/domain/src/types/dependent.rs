//! Dependent ("child") profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;
use crate::utils::split_keywords;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationLevel {
    Low,
    Medium,
    High,
}

impl_domain_status_conversions!(CommunicationLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Shy,
    Active,
    Calm,
    Curious,
}

impl_domain_status_conversions!(Personality {
    Shy => "shy",
    Active => "active",
    Calm => "calm",
    Curious => "curious",
});

/// Long-lived dependent profile
///
/// The narrative fields hold the keyword lists the backend distilled from the
/// free text entered at creation, comma separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentProfile {
    #[serde(rename = "child_id")]
    pub id: String,
    pub nickname: String,
    pub age: u8,
    pub comm_level: CommunicationLevel,
    pub personality: Personality,
    #[serde(rename = "triggers", default)]
    pub sensitive_topics: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub target_skills: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DependentProfile {
    /// Trigger keywords.
    pub fn sensitive_topic_keywords(&self) -> Vec<&str> {
        split_keywords(&self.sensitive_topics)
    }

    /// Interest keywords.
    pub fn interest_keywords(&self) -> Vec<&str> {
        split_keywords(&self.interests)
    }

    /// Target skill keywords.
    pub fn target_skill_keywords(&self) -> Vec<&str> {
        split_keywords(&self.target_skills)
    }
}

/// Creation payload; narratives are free text distilled server-side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDependentProfile {
    pub nickname: String,
    pub age: u8,
    pub comm_level: CommunicationLevel,
    pub personality: Personality,
    #[serde(rename = "triggers_raw", skip_serializing_if = "Option::is_none", default)]
    pub sensitive_topics_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interests_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_skills_raw: Option<String>,
}

/// Envelope of the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentList {
    #[serde(default, deserialize_with = "crate::utils::serde_helpers::null_as_default")]
    pub children: Vec<DependentProfile>,
}
