use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RestModel;

/// A Twitarr user, as embedded in other payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user's login name.
    pub username: String,

    /// The name shown in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// When the user's profile photo last changed.
    #[serde(
        default,
        with = "super::serde_utils::epoch_millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_photo_updated: Option<DateTime<Utc>>,
}

impl RestModel for User {
    const REQUIRED: &'static [&'static str] = &["username"];
}
