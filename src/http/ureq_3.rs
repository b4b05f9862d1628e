use std::{fmt, sync::OnceLock, time::Duration};

use bon::Builder;
use bytes::Bytes;
use http::{HeaderMap, Method, Request, Response, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use snafu::prelude::*;
use ureq::{Agent, RequestBuilder, tls::TlsConfig};

use super::{
    Transport, TransportFailure,
    normalize::{is_json_media_type, raw_payload},
};
use crate::{
    error::TransportError,
    options::{EffectiveOptions, ResponseType},
};

/// A [`Transport`] backed by the blocking `ureq` client.
///
/// Calls run on the tokio blocking pool, so this transport needs a tokio
/// runtime. The agent is configured once, on the first request, and kept for
/// the transport's lifetime. Besides non-success statuses, a JSON body of the
/// form `{"status": "error", ...}` is reported as a failure.
#[derive(Default, Builder)]
pub struct UreqTransport {
    #[builder(skip)]
    agent: OnceLock<Agent>,

    /// Skip TLS certificate verification.
    #[builder(default)]
    accept_invalid_certs: bool,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("initialized", &self.agent.get().is_some())
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl UreqTransport {
    /// Creates a transport that verifies certificates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn agent(&self) -> &Agent {
        self.agent.get_or_init(|| {
            tracing::trace!(
                accept_invalid_certs = self.accept_invalid_certs,
                "initializing ureq agent"
            );
            let mut config = Agent::config_builder().http_status_as_error(false);
            if self.accept_invalid_certs {
                config =
                    config.tls_config(TlsConfig::builder().disable_verification(true).build());
            }
            config.build().into()
        })
    }
}

impl Transport for UreqTransport {
    type Error = UreqTransportError;

    async fn send(
        &self,
        request: Request<Bytes>,
        options: &EffectiveOptions,
    ) -> Result<Response<Bytes>, Self::Error> {
        let agent = self.agent().clone();
        let timeout = options.timeout();
        let response_type = options.response_type();
        let response = tokio::task::spawn_blocking(move || call(&agent, request, timeout))
            .await
            .context(JoinSnafu)??;

        let status = response.status();
        ensure!(
            status.is_success(),
            RejectedSnafu {
                status,
                body: response.into_body(),
            }
        );
        if let Some(data) = error_payload(&response, response_type) {
            return ErrorPayloadSnafu { status, data }.fail();
        }
        Ok(response)
    }
}

fn call(
    agent: &Agent,
    request: Request<Bytes>,
    timeout: Option<Duration>,
) -> Result<Response<Bytes>, UreqTransportError> {
    let (parts, body) = request.into_parts();
    let uri = parts.uri.to_string();

    let sent = match parts.method {
        Method::GET => prepare(agent.get(&uri), &parts.headers, timeout).call(),
        Method::DELETE if body.is_empty() => {
            prepare(agent.delete(&uri), &parts.headers, timeout).call()
        }
        Method::DELETE => prepare(agent.delete(&uri), &parts.headers, timeout)
            .force_send_body()
            .send(&body[..]),
        Method::POST => prepare(agent.post(&uri), &parts.headers, timeout).send(&body[..]),
        Method::PUT => prepare(agent.put(&uri), &parts.headers, timeout).send(&body[..]),
        method => return UnsupportedMethodSnafu { method }.fail(),
    };

    let (parts, mut body) = sent.context(RequestSnafu)?.into_parts();
    let body = body.read_to_vec().context(ReadSnafu)?;
    Ok(Response::from_parts(parts, Bytes::from(body)))
}

fn prepare<B>(
    mut builder: RequestBuilder<B>,
    headers: &HeaderMap,
    timeout: Option<Duration>,
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.clone(), value.clone());
    }
    builder.config().timeout_global(timeout).build()
}

// The server reports some failures as a successful JSON response with this
// shape. Bodies read as text are never inspected.
fn error_payload(response: &Response<Bytes>, response_type: ResponseType) -> Option<Value> {
    let is_json = response_type == ResponseType::Json
        || response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_media_type);
    if !is_json {
        return None;
    }
    serde_json::from_slice::<Value>(response.body())
        .ok()
        .filter(|data| data.get("status").and_then(Value::as_str) == Some("error"))
}

/// Errors from [`UreqTransport`].
#[derive(Debug, Snafu)]
pub enum UreqTransportError {
    /// The request could not be sent, or no response arrived in time.
    #[snafu(display("request failed"))]
    Request {
        /// The underlying error.
        source: ureq::Error,
    },
    /// The response body could not be read.
    #[snafu(display("failed to read response body"))]
    Read {
        /// The underlying error.
        source: ureq::Error,
    },
    /// The blocking task did not complete.
    #[snafu(display("request task failed"))]
    Join {
        /// The underlying error.
        source: tokio::task::JoinError,
    },
    /// The request method is not one this transport sends.
    #[snafu(display("unsupported method {method}"))]
    UnsupportedMethod {
        /// The rejected method.
        method: Method,
    },
    /// The server answered with a non-success status.
    #[snafu(display("server responded with {status}"))]
    Rejected {
        /// The response status.
        status: StatusCode,
        /// The response body.
        body: Bytes,
    },
    /// The server answered successfully but reported an error in the payload.
    #[snafu(display("server reported an error"))]
    ErrorPayload {
        /// The response status.
        status: StatusCode,
        /// The decoded payload.
        data: Value,
    },
}

impl TransportError for UreqTransportError {
    fn failure(&self) -> TransportFailure {
        match self {
            Self::Request { source } | Self::Read { source } => TransportFailure {
                message: Some(source.to_string()),
                ..Default::default()
            },
            Self::Join { source } => TransportFailure {
                message: Some(source.to_string()),
                ..Default::default()
            },
            Self::UnsupportedMethod { .. } => TransportFailure {
                message: Some(self.to_string()),
                ..Default::default()
            },
            Self::Rejected { status, body } => TransportFailure {
                status: Some(status.as_u16()),
                data: raw_payload(body),
                ..Default::default()
            },
            Self::ErrorPayload { status, data } => TransportFailure {
                status: Some(status.as_u16()),
                data: Some(data.clone()),
                ..Default::default()
            },
        }
    }
}
