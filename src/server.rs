//! The server reference every request is made against.

use bon::Builder;
use url::Url;
use uuid::Uuid;

use crate::{
    auth::AuthConfig,
    server_url::{IntoServerUrl, ServerUrl},
    url_resolver::resolve_url,
};

/// A Twitarr server: where to send requests, and as whom.
///
/// ```
/// # fn main() -> Result<(), twitarr::ServerUrlError> {
/// use twitarr::{AuthConfig, TwitarrServer};
///
/// let server = TwitarrServer::builder()
///     .name("Demo")
///     .url("http://demo.twitarr.com/")?
///     .auth(AuthConfig::new("demo", "demo"))
///     .build();
///
/// assert_eq!(server.host(), Some("demo.twitarr.com"));
/// assert_eq!(
///     server.resolve_url(Some("api/v2/seamail"), None).as_deref(),
///     Some("http://demo.twitarr.com/api/v2/seamail")
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(state_mod(name = "builder"))]
pub struct TwitarrServer {
    /// Unique identifier; a random UUID unless one is supplied.
    #[builder(into, default = Uuid::new_v4().to_string())]
    id: String,

    /// A human-readable name for the server.
    #[builder(into)]
    name: Option<String>,

    /// The base URL requests are resolved against.
    #[builder(setters(name = "server_url"))]
    url: Option<ServerUrl>,

    /// Credentials sent with every request to this server.
    auth: Option<AuthConfig>,
}

impl Default for TwitarrServer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TwitarrServer {
    /// The server's unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The server's display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The server's base URL.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref().map(ServerUrl::as_url)
    }

    /// The host portion of the base URL; `None` exactly when there is no URL.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.url.as_ref().map(ServerUrl::host)
    }

    /// The server-level credentials.
    #[must_use]
    pub fn auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref()
    }

    /// Resolves a request path against this server's URL.
    ///
    /// See [`resolve_url`](crate::resolve_url) for the rules.
    #[must_use]
    pub fn resolve_url(&self, path: Option<&str>, query: Option<&str>) -> Option<String> {
        resolve_url(self.url(), path, query)
    }
}

impl<S: builder::State> TwitarrServerBuilder<S> {
    /// Sets the server's base URL.
    ///
    /// Accepts any type that implements [`IntoServerUrl`], including `&str`,
    /// [`String`], [`Url`] and [`ServerUrl`].
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a URL with a host.
    pub fn url<U: IntoServerUrl>(
        self,
        url: U,
    ) -> Result<TwitarrServerBuilder<builder::SetUrl<S>>, U::Error>
    where
        S::Url: builder::IsUnset,
    {
        Ok(self.server_url(url.into_server_url()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids_and_unique() {
        let a = TwitarrServer::default();
        let b = TwitarrServer::default();
        assert_eq!(a.id().len(), 36);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn explicit_id_is_kept() {
        let server = TwitarrServer::builder().id("ship").build();
        assert_eq!(server.id(), "ship");
    }

    #[test]
    fn host_tracks_url() {
        let server = TwitarrServer::default();
        assert!(server.url().is_none());
        assert!(server.host().is_none());

        let server = TwitarrServer::builder()
            .url("https://twitarr.example:8443/")
            .unwrap()
            .build();
        assert_eq!(server.host(), Some("twitarr.example"));
    }
}
