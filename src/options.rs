//! Per-request options and the merge that produces the options actually used.
//!
//! Options come in three layers: the client's instance defaults, the
//! credentials of the server being talked to, and whatever the call site
//! passes. [`EffectiveOptions::merge`] folds them into a fresh value for each
//! call, so concurrent calls never see each other's overrides.

use std::{collections::BTreeMap, time::Duration};

use bon::Builder;
use http::{
    HeaderMap, HeaderName, HeaderValue,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde_json::Value;

use crate::{auth::AuthConfig, error::TwitarrError, server::TwitarrServer};

/// Marks a request as programmatic.
pub const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain";
const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Options for a single request, or defaults for every request of a client.
#[derive(Debug, Clone, Default, Builder)]
pub struct TwitarrHttpOptions {
    /// Request headers. Merged name by name over lower layers.
    #[builder(default)]
    headers: HeaderMap,

    /// Query parameters. Replace lower layers unless empty.
    #[builder(default)]
    parameters: BTreeMap<String, String>,

    /// The request body.
    data: Option<Value>,

    /// How long to wait for the request to complete.
    timeout: Option<Duration>,

    /// A server to use instead of the client's own.
    server: Option<TwitarrServer>,

    /// Credentials, merged field by field over lower layers.
    auth: Option<AuthConfig>,
}

impl TwitarrHttpOptions {
    /// Sets a header, replacing any previous value under the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The query parameters.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// The request body.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The server override.
    #[must_use]
    pub fn server(&self) -> Option<&TwitarrServer> {
        self.server.as_ref()
    }

    /// The credentials override.
    #[must_use]
    pub fn auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref()
    }
}

/// How a response body is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// Parse the body as JSON.
    Json,
    /// Keep the body as text.
    Text,
}

impl ResponseType {
    /// Selects the parsing mode for an `Accept` header value.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for anything other than `application/json`
    /// or `text/plain`.
    pub fn from_accept(accept: &HeaderValue) -> Result<Self, TwitarrError> {
        match accept.to_str() {
            Ok(APPLICATION_JSON) => Ok(Self::Json),
            Ok(TEXT_PLAIN) => Ok(Self::Text),
            _ => Err(TwitarrError::configuration(format!(
                "Unhandled \"Accept\" header: {}",
                String::from_utf8_lossy(accept.as_bytes())
            ))),
        }
    }
}

/// The fully merged configuration for one request.
#[derive(Debug, Clone)]
pub struct EffectiveOptions {
    headers: HeaderMap,
    parameters: BTreeMap<String, String>,
    data: Option<Value>,
    timeout: Option<Duration>,
    server: Option<TwitarrServer>,
    auth: AuthConfig,
    response_type: ResponseType,
}

impl EffectiveOptions {
    /// Merges instance defaults, the server's credentials and call-site options.
    ///
    /// The server is the call-site override if there is one, otherwise
    /// `server`. Precedence from lowest to highest is `defaults`, the server's
    /// credentials, then `call`. Missing `Accept`, `Content-Type` and
    /// `X-Requested-With` headers are filled in afterwards.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the resulting `Accept` header does not
    /// select a [`ResponseType`].
    pub fn merge(
        defaults: &TwitarrHttpOptions,
        server: Option<&TwitarrServer>,
        call: Option<&TwitarrHttpOptions>,
    ) -> Result<Self, TwitarrError> {
        let server = call
            .and_then(TwitarrHttpOptions::server)
            .or(server)
            .cloned();

        let mut auth = defaults.auth.clone().unwrap_or_default();
        if let Some(server_auth) = server.as_ref().and_then(TwitarrServer::auth) {
            auth.merge_from(server_auth);
        }

        let mut headers = defaults.headers.clone();
        let mut parameters = defaults.parameters.clone();
        let mut data = defaults.data.clone();
        let mut timeout = defaults.timeout;

        if let Some(call) = call {
            overlay_headers(&mut headers, &call.headers);
            if !call.parameters.is_empty() {
                parameters.clone_from(&call.parameters);
            }
            if call.data.is_some() {
                data.clone_from(&call.data);
            }
            if call.timeout.is_some() {
                timeout = call.timeout;
            }
            if let Some(call_auth) = &call.auth {
                auth.merge_from(call_auth);
            }
        }

        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static(APPLICATION_JSON));
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        headers
            .entry(X_REQUESTED_WITH)
            .or_insert(HeaderValue::from_static("XMLHttpRequest"));

        let response_type = headers
            .get(ACCEPT)
            .map_or(Ok(ResponseType::Json), ResponseType::from_accept)?;

        Ok(Self {
            headers,
            parameters,
            data,
            timeout,
            server,
            auth,
            response_type,
        })
    }

    /// The merged headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The merged query parameters.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// The request body.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The server the request goes to.
    #[must_use]
    pub fn server(&self) -> Option<&TwitarrServer> {
        self.server.as_ref()
    }

    /// The merged credentials.
    #[must_use]
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// How the response body will be parsed.
    #[must_use]
    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }
}

// Every value of a header named in `upper` replaces all values of that name in `lower`.
fn overlay_headers(lower: &mut HeaderMap, upper: &HeaderMap) {
    for name in upper.keys() {
        lower.remove(name);
    }
    for (name, value) in upper {
        lower.append(name.clone(), value.clone());
    }
}
