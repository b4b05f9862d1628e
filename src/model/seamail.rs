use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    DecodeError, RestModel, User, assert_each_embedded, assert_has_properties, serde_utils,
};

/// Represents a Seamail thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeamailThread {
    /// The unique thread id.
    pub id: String,

    /// The users involved in the thread.
    #[serde(default, deserialize_with = "serde_utils::or_default")]
    pub users: Vec<User>,

    /// The subject of the thread.
    pub subject: String,

    /// The messages in the thread.
    #[serde(default, deserialize_with = "serde_utils::or_default")]
    pub messages: Vec<SeamailMessage>,

    /// The number of messages (or unread messages) in the thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,

    /// The time the most recent message was created.
    #[serde(with = "serde_utils::epoch_millis")]
    pub timestamp: DateTime<Utc>,

    /// Whether `message_count` counts unread messages or all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_is_unread: Option<bool>,

    /// Whether there are unread messages in the thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unread: Option<bool>,
}

impl RestModel for SeamailThread {
    const REQUIRED: &'static [&'static str] = &["id", "subject", "timestamp"];

    fn assert_valid(data: &Value) -> Result<(), DecodeError> {
        assert_has_properties(data, Self::REQUIRED)?;
        assert_each_embedded::<User>(data, "users")?;
        assert_each_embedded::<SeamailMessage>(data, "messages")
    }
}

/// A single message in a Seamail thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeamailMessage {
    /// The unique message id.
    pub id: String,

    /// Who wrote the message.
    pub author: User,

    /// The message text.
    pub text: String,

    /// When the message was sent.
    #[serde(with = "serde_utils::epoch_millis")]
    pub timestamp: DateTime<Utc>,

    /// The users who have read the message.
    #[serde(default, deserialize_with = "serde_utils::or_default")]
    pub read_users: Vec<User>,
}

impl RestModel for SeamailMessage {
    const REQUIRED: &'static [&'static str] = &["id", "author", "text", "timestamp"];

    fn assert_valid(data: &Value) -> Result<(), DecodeError> {
        assert_has_properties(data, Self::REQUIRED)?;
        User::assert_valid(&data["author"])?;
        assert_each_embedded::<User>(data, "read_users")
    }
}
