//! Credentials used to authenticate against a Twitarr server.

use base64::prelude::*;
use bon::Builder;
use http::HeaderValue;
use secrecy::{ExposeSecret as _, SecretString};

/// Username and password credentials.
///
/// Either half may be missing; layered configurations are merged field by
/// field with [`AuthConfig::merge_from`], and credentials are only sent once
/// both halves are present.
#[derive(Debug, Clone, Default, Builder)]
pub struct AuthConfig {
    /// The user to authenticate as.
    #[builder(into)]
    username: Option<String>,

    /// The user's password.
    #[builder(into)]
    password: Option<SecretString>,
}

impl AuthConfig {
    /// Creates credentials with both a username and a password.
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// The username, if set.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The password, if set.
    #[must_use]
    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    /// Overwrites each field that is set in `other`.
    pub fn merge_from(&mut self, other: &AuthConfig) {
        if let Some(username) = &other.username {
            self.username = Some(username.clone());
        }
        if let Some(password) = &other.password {
            self.password = Some(password.clone());
        }
    }

    /// Builds the value of a `Basic` authorization header.
    ///
    /// Returns `None` unless both username and password are set (and the
    /// encoded value is a valid header).
    #[must_use]
    pub fn basic_authorization(&self) -> Option<HeaderValue> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return None;
        };
        if username.is_empty() || password.expose_secret().is_empty() {
            return None;
        }

        let credentials = format!("{username}:{}", password.expose_secret());
        let mut value =
            HeaderValue::try_from(format!("Basic {}", BASE64_STANDARD.encode(credentials))).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}
