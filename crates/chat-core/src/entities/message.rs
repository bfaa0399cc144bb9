//! Message entity - one direct message between two users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A direct message
///
/// Messages are immutable once created. A message carries text, an image
/// reference, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Snowflake,
    pub sender_id: Snowflake,
    pub receiver_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: Snowflake,
        sender_id: Snowflake,
        receiver_id: Snowflake,
        text: Option<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            sender_id,
            receiver_id,
            text,
            image,
            created_at: Utc::now(),
        }
    }

    /// Check whether this message belongs to the conversation between `a` and `b`
    pub fn is_between(&self, a: Snowflake, b: Snowflake) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }

    /// The other participant, seen from `user_id`
    pub fn peer_of(&self, user_id: Snowflake) -> Snowflake {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    #[inline]
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.is_empty())
    }
}
