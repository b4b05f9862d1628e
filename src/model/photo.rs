use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RestModel, serde_utils};

/// Represents a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDetails {
    /// The photo's ID.
    pub id: String,

    /// Whether the photo is animated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,

    /// The filename stored on the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_filename: Option<String>,

    /// The photo's MD5 hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5_hash: Option<String>,

    /// The original filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,

    /// The user that uploaded the photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,

    /// When the photo was uploaded.
    #[serde(
        default,
        with = "serde_utils::epoch_millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_time: Option<DateTime<Utc>>,

    /// The sizes available, by size name.
    #[serde(default, deserialize_with = "serde_utils::or_default")]
    pub sizes: BTreeMap<String, String>,
}

impl RestModel for PhotoDetails {
    const REQUIRED: &'static [&'static str] = &["id"];
}
