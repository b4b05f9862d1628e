//! The HTTP client front end and the transport abstraction.
//!
//! [`TwitarrHttp`] owns the instance defaults and the server reference and
//! walks every call through the same steps: merge options, resolve the URL,
//! build an [`http::Request`], hand it to a [`Transport`], and normalize what
//! comes back. Transports only implement the send primitive; users pick one
//! (e.g. [`ReqwestTransport`], backed by `reqwest`) or bring their own.

mod normalize;
#[cfg(feature = "http-client-reqwest-0_13")]
mod reqwest_0_13;
#[cfg(feature = "http-client-ureq-3")]
mod ureq_3;

use std::time::Duration;

use bon::bon;
use bytes::Bytes;
use http::{Method, Request, Response, Uri, header::AUTHORIZATION};
use serde_json::Value;
use url::Url;

use crate::{
    error::{TransportError, TwitarrError},
    options::{EffectiveOptions, TwitarrHttpOptions},
    result::TwitarrResult,
    server::TwitarrServer,
};

pub use normalize::{
    TransportFailure, UNKNOWN_STATUS, extract_data, extract_message, extract_status,
    normalize_error, normalize_response,
};
#[cfg(feature = "http-client-reqwest-0_13")]
pub use reqwest_0_13::{ReqwestTransport, ReqwestTransportError};
#[cfg(feature = "http-client-ureq-3")]
pub use ureq_3::{UreqTransport, UreqTransportError};

/// The timeout applied when neither the defaults nor the call set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends fully built requests.
pub trait Transport: Send + Sync {
    /// The error type returned for a failed request.
    type Error: TransportError;

    /// Sends a request and returns the complete response.
    ///
    /// # Arguments
    ///
    /// * `request`: The request, with URL, headers and body already final.
    /// * `options`: The merged options the request was built from, for settings
    ///   such as the timeout that are not part of the request itself.
    ///
    /// Implementations return an error for non-success statuses.
    fn send(
        &self,
        request: Request<Bytes>,
        options: &EffectiveOptions,
    ) -> impl Future<Output = Result<Response<Bytes>, Self::Error>> + Send;

    /// Called after the client's server reference changes.
    ///
    /// Transports that cache per-server state should drop it here.
    fn on_set_server(&mut self) {}
}

/// A Twitarr HTTP client over a [`Transport`].
///
/// ```no_run
/// # #[cfg(feature = "http-client-reqwest-0_13")]
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use twitarr::{
///     TwitarrServer,
///     http::{ReqwestTransport, TwitarrHttp},
///     model::{RestModel as _, SeamailThread},
/// };
///
/// let server = TwitarrServer::builder().url("http://demo.twitarr.com/")?.build();
/// let client = TwitarrHttp::builder(ReqwestTransport::new()).server(server).build();
///
/// let thread = client
///     .get("api/v2/seamail/abc123", None)
///     .await?
///     .try_map(SeamailThread::from_rest)?;
/// println!("{}", thread.data().subject);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TwitarrHttp<T> {
    transport: T,
    server: Option<TwitarrServer>,
    options: TwitarrHttpOptions,
}

#[bon]
impl<T: Transport> TwitarrHttp<T> {
    /// Creates a client.
    ///
    /// `timeout` only applies when `options` does not already carry one.
    #[builder]
    pub fn new(
        #[builder(start_fn)] transport: T,
        server: Option<TwitarrServer>,
        #[builder(default)] options: TwitarrHttpOptions,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
    ) -> Self {
        let options = if options.timeout().is_some() {
            options
        } else {
            options.with_timeout(timeout)
        };
        Self {
            transport,
            server,
            options,
        }
    }
}

impl<T: Transport> TwitarrHttp<T> {
    /// The transport requests are sent with.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The server requests go to unless a call overrides it.
    pub fn server(&self) -> Option<&TwitarrServer> {
        self.server.as_ref()
    }

    /// Replaces the server and notifies the transport.
    pub fn set_server(&mut self, server: TwitarrServer) {
        tracing::trace!(server = server.id(), "server changed");
        self.server = Some(server);
        self.transport.on_set_server();
    }

    /// The default options every call starts from.
    pub fn options(&self) -> &TwitarrHttpOptions {
        &self.options
    }

    /// Replaces the default options.
    pub fn set_options(&mut self, options: TwitarrHttpOptions) {
        self.options = options;
    }

    /// The options a call with `options` would be made with.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no server is set, or if the options
    /// cannot be merged.
    pub fn effective_options(
        &self,
        options: Option<&TwitarrHttpOptions>,
    ) -> Result<EffectiveOptions, TwitarrError> {
        let effective = EffectiveOptions::merge(&self.options, self.server.as_ref(), options)?;
        if effective.server().is_none() {
            return Err(TwitarrError::configuration(
                "You must set a server before attempting to make queries!",
            ));
        }
        Ok(effective)
    }

    /// Makes a GET call.
    ///
    /// `path` is resolved with [`resolve_url`](crate::resolve_url), which
    /// escapes a `?` into the path. Query parameters go through
    /// [`TwitarrHttpOptions::with_parameter`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the request cannot be built, and a
    /// transport or decode error if it fails.
    pub async fn get(
        &self,
        path: &str,
        options: Option<&TwitarrHttpOptions>,
    ) -> Result<TwitarrResult<Value>, TwitarrError> {
        self.request(Method::GET, path, options).await
    }

    /// Makes a PUT call. Without a body, the parameters are sent as a JSON object.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn put(
        &self,
        path: &str,
        options: Option<&TwitarrHttpOptions>,
    ) -> Result<TwitarrResult<Value>, TwitarrError> {
        self.request(Method::PUT, path, options).await
    }

    /// Makes a POST call.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn post(
        &self,
        path: &str,
        options: Option<&TwitarrHttpOptions>,
    ) -> Result<TwitarrResult<Value>, TwitarrError> {
        self.request(Method::POST, path, options).await
    }

    /// Makes a DELETE call.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn http_delete(
        &self,
        path: &str,
        options: Option<&TwitarrHttpOptions>,
    ) -> Result<TwitarrResult<Value>, TwitarrError> {
        self.request(Method::DELETE, path, options).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        options: Option<&TwitarrHttpOptions>,
    ) -> Result<TwitarrResult<Value>, TwitarrError> {
        let effective = self.effective_options(options)?;
        let request = build_request(method, path, &effective)?;
        tracing::debug!("{} {}", request.method(), request.uri());

        let response_type = effective.response_type();
        let sent = self.transport.send(request, &effective).await;
        match sent {
            Ok(response) => normalize_response(response, response_type)
                .map_err(|err| err.with_options(effective)),
            Err(err) => Err(normalize_error(err, Some(effective))),
        }
    }
}

/// Builds the request for one call from its merged options.
///
/// # Errors
///
/// Returns a configuration error if there is no server URL to resolve against
/// or the body cannot be serialized.
pub fn build_request(
    method: Method,
    path: &str,
    options: &EffectiveOptions,
) -> Result<Request<Bytes>, TwitarrError> {
    let server = options.server().ok_or_else(|| {
        TwitarrError::configuration("You must set a server before attempting to make queries!")
    })?;
    let (Some(base), Some(resolved)) = (server.url(), server.resolve_url(Some(path), None)) else {
        return Err(TwitarrError::configuration(format!(
            "server {} has no URL",
            server.id()
        )));
    };

    let mut url = absolute_url(base, &resolved)?;
    if !options.parameters().is_empty() {
        url.query_pairs_mut().extend_pairs(options.parameters());
    }
    let uri: Uri = url.as_str().parse().map_err(|err| {
        TwitarrError::configuration(format!("invalid request URL `{url}`")).with_source(err)
    })?;

    let body = match options.data() {
        Some(Value::String(text)) => Bytes::from(text.clone()),
        Some(data) => json_body(data)?,
        None if method == Method::PUT && !options.parameters().is_empty() => {
            json_body(options.parameters())?
        }
        None => Bytes::new(),
    };

    let mut headers = options.headers().clone();
    if !headers.contains_key(AUTHORIZATION)
        && let Some(authorization) = options.auth().basic_authorization()
    {
        headers.insert(AUTHORIZATION, authorization);
    }

    let (mut parts, ()) = Request::new(()).into_parts();
    parts.method = method;
    parts.uri = uri;
    parts.headers = headers;
    Ok(Request::from_parts(parts, body))
}

// Absolute-path results of URL resolution keep the server's origin. A leading
// `//` stays part of the path and never selects another host.
fn absolute_url(base: &Url, resolved: &str) -> Result<Url, TwitarrError> {
    if resolved.starts_with('/') {
        let (path, query) = match resolved.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (resolved, None),
        };
        let mut url = base.clone();
        url.set_path(path);
        url.set_query(query);
        url.set_fragment(None);
        return Ok(url);
    }
    Url::parse(resolved).map_err(|err| {
        TwitarrError::configuration(format!("invalid request URL `{resolved}`")).with_source(err)
    })
}

fn json_body(data: &impl serde::Serialize) -> Result<Bytes, TwitarrError> {
    serde_json::to_vec(data).map(Bytes::from).map_err(|err| {
        TwitarrError::configuration("request body could not be serialized").with_source(err)
    })
}
