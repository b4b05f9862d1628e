use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DecodeError, RestModel, User, assert_embedded, assert_has_properties, serde_utils};

/// Represents a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionDetail {
    /// The reaction.
    pub reaction: String,

    /// The user who reacted. The server sends an empty object for deleted users.
    #[serde(
        default,
        deserialize_with = "serde_utils::non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<User>,
}

impl RestModel for ReactionDetail {
    const REQUIRED: &'static [&'static str] = &["reaction", "user"];

    fn assert_valid(data: &Value) -> Result<(), DecodeError> {
        assert_has_properties(data, Self::REQUIRED)?;
        assert_embedded::<User>(data, "user")
    }
}
