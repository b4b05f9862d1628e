//! The base URL of a Twitarr server.
//!
//! [`ServerUrl`] is a newtype over [`Url`] that guarantees the URL parsed and
//! has a host. It can be constructed from common string and URL types via
//! [`IntoServerUrl`].

use std::{convert::Infallible, fmt};

use snafu::prelude::*;
use url::Url;

/// A validated server base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerUrl(Url);

impl ServerUrl {
    /// Returns the inner [`Url`].
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The host portion of the URL.
    #[must_use]
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// The URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Errors when turning a value into a [`ServerUrl`].
#[derive(Debug, Snafu)]
pub enum ServerUrlError {
    /// The value is not a URL.
    Parse {
        /// The underlying parse error.
        source: url::ParseError,
    },
    /// The URL has no host, so requests cannot be sent to it.
    #[snafu(display("server URL `{url}` has no host"))]
    MissingHost {
        /// The offending URL.
        url: Url,
    },
}

/// Conversion trait for types that can be turned into a [`ServerUrl`].
pub trait IntoServerUrl {
    /// The error type returned if the conversion fails.
    type Error;

    /// Attempts to convert this value into a [`ServerUrl`].
    fn into_server_url(self) -> Result<ServerUrl, Self::Error>;
}

impl IntoServerUrl for ServerUrl {
    type Error = Infallible;

    fn into_server_url(self) -> Result<ServerUrl, Self::Error> {
        Ok(self)
    }
}

impl IntoServerUrl for Url {
    type Error = ServerUrlError;

    fn into_server_url(self) -> Result<ServerUrl, Self::Error> {
        ensure!(self.host_str().is_some(), MissingHostSnafu { url: self });
        Ok(ServerUrl(self))
    }
}

impl IntoServerUrl for &str {
    type Error = ServerUrlError;

    fn into_server_url(self) -> Result<ServerUrl, Self::Error> {
        Url::parse(self).context(ParseSnafu)?.into_server_url()
    }
}

impl IntoServerUrl for String {
    type Error = ServerUrlError;

    fn into_server_url(self) -> Result<ServerUrl, Self::Error> {
        self.as_str().into_server_url()
    }
}
