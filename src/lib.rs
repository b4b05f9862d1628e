//! Implements a client SDK for the Twitarr social and messaging service.
//!
//! A [`TwitarrServer`] names a server and its credentials, [`http::TwitarrHttp`]
//! makes calls against it through a pluggable [`http::Transport`], and the
//! types in [`model`] decode what comes back.

#![forbid(unsafe_code)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod auth;
pub mod error;
pub mod http;
pub mod model;
pub mod options;
pub mod prelude;
pub mod result;
mod server;
mod server_url;
mod url_resolver;

pub use auth::AuthConfig;
pub use error::{BoxedError, ErrorKind, TransportError, TwitarrError};
pub use options::{EffectiveOptions, ResponseType, TwitarrHttpOptions};
pub use result::TwitarrResult;
pub use server::TwitarrServer;
pub use server_url::{IntoServerUrl, ServerUrl, ServerUrlError};
pub use url_resolver::resolve_url;

/// Re-export of parts of the `secrecy` crate.
pub mod secrecy {
    pub use ::secrecy::{ExposeSecret, SecretString};
}

pub use bytes::Bytes;
