//! Participant Data Structure
//!
//! Represents a member of the chat. Participant records are replaced wholesale
//! by later versions with the same ID; fields are never merged individually.

use serde::{Deserialize, Serialize};

use super::Entity;

/// A chat participant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique participant ID
    #[serde(rename = "uuid")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Short biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image locator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Creation time (ms since epoch)
    pub created_at: i64,
    /// Last modification time (ms since epoch)
    pub updated_at: i64,
}

impl Participant {
    /// Create a participant with only the required fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bio: None,
            avatar_url: None,
            email: None,
            job_title: None,
            created_at,
            updated_at: created_at,
        }
    }
}

impl Entity for Participant {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }
}
