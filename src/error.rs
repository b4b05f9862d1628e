//! The error envelope and the [`TransportError`] trait.
//!
//! Every failing call surfaces as a [`TwitarrError`]. Transports plug into the
//! normalizer by implementing [`TransportError`] for their own error types, which
//! describes the failure in the loosely-typed [`TransportFailure`] shape the
//! message/status extraction reads.

use std::fmt;

use serde_json::Value;

use crate::{http::TransportFailure, model::DecodeError, options::EffectiveOptions};

/// A boxed error used as the chained source of a [`TwitarrError`].
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by a [`Transport`](crate::http::Transport).
pub trait TransportError: std::error::Error + Send + Sync + 'static {
    /// Describes this error in the shape read by the error normalizer.
    fn failure(&self) -> TransportFailure;
}

/// The broad category of a [`TwitarrError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The request could not be configured; nothing was sent.
    Configuration,
    /// The underlying call failed or returned a non-success status.
    Transport,
    /// A payload could not be decoded.
    Decode,
}

/// A Twitarr error.
#[derive(Debug)]
pub struct TwitarrError {
    kind: ErrorKind,
    message: String,
    code: Option<i32>,
    options: Option<Box<EffectiveOptions>>,
    data: Option<Value>,
    source: Option<BoxedError>,
}

impl TwitarrError {
    /// Creates an error of the given kind with only a message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            options: None,
            data: None,
            source: None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates a transport error carrying the full request context.
    pub fn transport(
        message: impl Into<String>,
        code: i32,
        options: Option<EffectiveOptions>,
        data: Option<Value>,
    ) -> Self {
        Self {
            code: Some(code),
            options: options.map(Box::new),
            data,
            ..Self::new(ErrorKind::Transport, message)
        }
    }

    /// Attaches a status code.
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches a response payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches the options of the request that failed.
    #[must_use]
    pub fn with_options(mut self, options: EffectiveOptions) -> Self {
        self.options = Some(Box::new(options));
        self
    }

    /// Chains the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The status code associated with this error, `-1` when the transport
    /// failed without one.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// The options of the request that resulted in this error.
    #[must_use]
    pub fn options(&self) -> Option<&EffectiveOptions> {
        self.options.as_deref()
    }

    /// The payload of the failed response, if any.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl fmt::Display for TwitarrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) if code != 0 => write!(f, "Error {code}: {}", self.message),
            _ => write!(f, "Error: {}", self.message),
        }
    }
}

impl std::error::Error for TwitarrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

impl From<DecodeError> for TwitarrError {
    fn from(err: DecodeError) -> Self {
        Self::new(ErrorKind::Decode, err.to_string()).with_source(err)
    }
}
