//! Typed representations of Twitarr REST payloads.
//!
//! Every model implements [`RestModel`]: [`from_rest`](RestModel::from_rest)
//! checks the properties the server must always send and then decodes the
//! payload, and [`to_json`](RestModel::to_json) produces the JSON form, with
//! dates written as epoch milliseconds.

mod photo;
mod reaction;
mod seamail;
mod serde_utils;
mod user;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::prelude::*;

pub use photo::PhotoDetails;
pub use reaction::ReactionDetail;
pub use seamail::{SeamailMessage, SeamailThread};
pub use user::User;

/// Errors when decoding a REST payload into a model.
#[derive(Debug, Snafu)]
pub enum DecodeError {
    /// The payload is not a JSON object.
    #[snafu(display("expected a JSON object"))]
    NotAnObject,

    /// A required property is absent or `null`.
    #[snafu(display("missing required property `{name}`"))]
    MissingProperty {
        /// The name of the missing property.
        name: &'static str,
    },

    /// A property has the wrong shape.
    #[snafu(display("malformed payload: {source}"))]
    Malformed {
        /// The underlying decoding error.
        source: serde_json::Error,
    },
}

/// A model with a REST representation.
pub trait RestModel: Serialize + DeserializeOwned {
    /// Properties that must be present (and not `null`) in every payload.
    const REQUIRED: &'static [&'static str];

    /// Checks that `data` carries every required property.
    ///
    /// Models that embed other models extend this to check the embedded
    /// payloads too, so a bad nested value is reported by name.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingProperty`] for the first absent required
    /// property.
    fn assert_valid(data: &Value) -> Result<(), DecodeError> {
        assert_has_properties(data, Self::REQUIRED)
    }

    /// Decodes a payload received from the server.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingProperty`] for the first absent required
    /// property, or [`DecodeError::Malformed`] if a property cannot be decoded.
    fn from_rest(data: &Value) -> Result<Self, DecodeError> {
        Self::assert_valid(data)?;
        <Self as Deserialize>::deserialize(data).context(MalformedSnafu)
    }

    /// Encodes this model as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

fn assert_has_properties(data: &Value, names: &[&'static str]) -> Result<(), DecodeError> {
    let object = data.as_object().context(NotAnObjectSnafu)?;
    for &name in names {
        ensure!(
            object.get(name).is_some_and(|value| !value.is_null()),
            MissingPropertySnafu { name }
        );
    }
    Ok(())
}

// An embedded model is checked unless it is empty, which decodes as absent.
fn assert_embedded<T: RestModel>(data: &Value, name: &str) -> Result<(), DecodeError> {
    match data.get(name) {
        Some(value) if !serde_utils::is_empty(value) => T::assert_valid(value),
        _ => Ok(()),
    }
}

fn assert_each_embedded<T: RestModel>(data: &Value, name: &str) -> Result<(), DecodeError> {
    if let Some(Value::Array(items)) = data.get(name) {
        for item in items {
            T::assert_valid(item)?;
        }
    }
    Ok(())
}
