//! User entity - an account that can chat and appear online

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A chat user as exchanged with clients
///
/// The password hash is never part of this type; repositories store it
/// separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Snowflake,
    pub full_name: String,
    pub email: String,
    /// Profile image reference; empty until the user uploads one
    #[serde(default)]
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, full_name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            full_name,
            email,
            profile_pic: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn has_profile_pic(&self) -> bool {
        !self.profile_pic.is_empty()
    }

    /// Replace the profile image, the only mutable user field
    pub fn set_profile_pic(&mut self, profile_pic: String) {
        self.profile_pic = profile_pic;
        self.updated_at = Utc::now();
    }
}
