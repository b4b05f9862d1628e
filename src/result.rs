//! The result envelope returned by every successful call.

use serde_json::Value;

use crate::{error::TwitarrError, model::DecodeError};

/// A successful response from a Twitarr server.
#[derive(Debug, Clone, PartialEq)]
pub struct TwitarrResult<T> {
    success: bool,
    data: T,
    message: Option<String>,
    code: u16,
    content_type: Option<String>,
}

impl<T> TwitarrResult<T> {
    /// Creates a successful result.
    pub fn ok(data: T, message: Option<String>, code: u16, content_type: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            code,
            content_type,
        }
    }

    /// Whether the call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The payload.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the result, returning the payload.
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }

    /// An optional message accompanying the payload.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The HTTP status code.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The response's content type, if it declared one.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Transforms the payload, keeping everything else.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TwitarrResult<U> {
        TwitarrResult {
            success: self.success,
            data: f(self.data),
            message: self.message,
            code: self.code,
            content_type: self.content_type,
        }
    }
}

impl TwitarrResult<Value> {
    /// Decodes the JSON payload, typically with one of the models' `from_rest`.
    ///
    /// # Errors
    ///
    /// Returns a decode error carrying the status code and the raw payload if
    /// `decode` fails.
    pub fn try_map<U>(
        self,
        decode: impl FnOnce(&Value) -> Result<U, DecodeError>,
    ) -> Result<TwitarrResult<U>, TwitarrError> {
        match decode(&self.data) {
            Ok(data) => Ok(TwitarrResult {
                success: self.success,
                data,
                message: self.message,
                code: self.code,
                content_type: self.content_type,
            }),
            Err(err) => Err(TwitarrError::from(err)
                .with_code(i32::from(self.code))
                .with_data(self.data)),
        }
    }
}
