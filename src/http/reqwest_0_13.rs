use std::sync::OnceLock;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use snafu::prelude::*;

use super::{Transport, TransportFailure, normalize::raw_payload};
use crate::{error::TransportError, options::EffectiveOptions};

/// A [`Transport`] backed by `reqwest`.
///
/// The underlying [`reqwest::Client`] is built on first use and dropped when
/// the server changes, so pooled connections never outlive the server they
/// were opened for. A client passed to [`with_client`](Self::with_client) is
/// kept for the transport's lifetime.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    client: OnceLock<reqwest::Client>,
    supplied: bool,
}

impl ReqwestTransport {
    /// Creates a transport that builds its own client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: OnceLock::from(client),
            supplied: true,
        }
    }

    fn client(&self) -> Result<reqwest::Client, ReqwestTransportError> {
        if let Some(client) = self.client.get() {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder().build().context(BuildSnafu)?;
        Ok(self.client.get_or_init(|| client).clone())
    }
}

impl Transport for ReqwestTransport {
    type Error = ReqwestTransportError;

    /// Converts the `http::Request` into a `reqwest::Request`, applies the
    /// timeout and reads the whole body.
    async fn send(
        &self,
        request: Request<Bytes>,
        options: &EffectiveOptions,
    ) -> Result<Response<Bytes>, Self::Error> {
        let client = self.client()?;
        let (parts, body) = request.into_parts();
        let mut builder = client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body);
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.context(SendSnafu)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.context(BodySnafu)?;
        ensure!(status.is_success(), StatusSnafu { status, body });

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }

    fn on_set_server(&mut self) {
        if !self.supplied {
            tracing::trace!("dropping cached reqwest client");
            self.client = OnceLock::new();
        }
    }
}

/// Errors from [`ReqwestTransport`].
#[derive(Debug, Snafu)]
pub enum ReqwestTransportError {
    /// The client could not be built.
    #[snafu(display("failed to build HTTP client"))]
    Build {
        /// The underlying error.
        source: reqwest::Error,
    },
    /// The request could not be sent, or no response arrived in time.
    #[snafu(display("request failed"))]
    Send {
        /// The underlying error.
        source: reqwest::Error,
    },
    /// The response body could not be read.
    #[snafu(display("failed to read response body"))]
    Body {
        /// The underlying error.
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[snafu(display("server responded with {status}"))]
    Status {
        /// The response status.
        status: StatusCode,
        /// The response body.
        body: Bytes,
    },
}

impl TransportError for ReqwestTransportError {
    fn failure(&self) -> TransportFailure {
        match self {
            Self::Build { source } | Self::Send { source } | Self::Body { source } => {
                TransportFailure {
                    message: Some(source.to_string()),
                    status: source.status().map(|status| status.as_u16()),
                    ..Default::default()
                }
            }
            Self::Status { status, body } => TransportFailure {
                message: Some(format!(
                    "Request failed with status code {}",
                    status.as_u16()
                )),
                response: Some(Box::new(TransportFailure {
                    status: Some(status.as_u16()),
                    status_text: status.canonical_reason().map(str::to_owned),
                    data: raw_payload(body),
                    ..Default::default()
                })),
                ..Default::default()
            },
        }
    }
}
