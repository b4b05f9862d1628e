//! Server references and URL resolution.

use twitarr::{AuthConfig, TwitarrServer};

const SERVER_NAME: &str = "Demo";
const SERVER_URL: &str = "http://demo.twitarr.com/";

fn server() -> TwitarrServer {
    TwitarrServer::builder()
        .name(SERVER_NAME)
        .url(SERVER_URL)
        .unwrap()
        .auth(AuthConfig::new("demo", "demo"))
        .build()
}

fn resolve(path: &str) -> Option<String> {
    server().resolve_url(Some(path), None)
}

#[test]
fn bare_server_has_an_id_and_nothing_else() {
    let bare = TwitarrServer::default();
    assert_eq!(bare.id().len(), 36);
    assert!(bare.name().is_none());
    assert!(bare.url().is_none());
    assert!(bare.host().is_none());
    assert!(bare.resolve_url(None, None).is_none());
    assert!(bare.resolve_url(Some("foo"), Some("a=b")).is_none());
}

#[test]
fn configured_server_keeps_its_settings() {
    let server = server();
    assert_eq!(server.id().len(), 36);
    assert_eq!(server.name(), Some(SERVER_NAME));
    assert_eq!(server.url().map(url::Url::as_str), Some(SERVER_URL));
    assert_eq!(server.host(), Some("demo.twitarr.com"));
    assert_eq!(server.auth().and_then(AuthConfig::username), Some("demo"));
}

#[test]
fn no_path_resolves_to_the_base() {
    assert_eq!(server().resolve_url(None, None).as_deref(), Some(SERVER_URL));
}

#[test]
fn relative_paths_are_joined() {
    assert_eq!(resolve("foo"), Some(format!("{SERVER_URL}foo")));
    assert_eq!(resolve("foo/"), Some(format!("{SERVER_URL}foo")));
    assert_eq!(resolve("rest/foo/"), Some(format!("{SERVER_URL}rest/foo")));
}

#[test]
fn absolute_paths_are_returned_as_is() {
    assert_eq!(resolve("/rest/foo/").as_deref(), Some("/rest/foo/"));
    assert_eq!(
        server()
            .resolve_url(Some("/rest/foo"), Some("foo=bar"))
            .as_deref(),
        Some("/rest/foo?foo%3Dbar")
    );
}

#[test]
fn colons_are_not_escaped() {
    assert_eq!(
        resolve("rest/foo/A:B:0.0.0.0:C"),
        Some(format!("{SERVER_URL}rest/foo/A:B:0.0.0.0:C"))
    );
}

#[test]
fn escaped_slashes_stay_escaped() {
    assert_eq!(
        resolve("rest/S%2FA%3AB%3A0.0.0.0%3AC"),
        Some(format!("{SERVER_URL}rest/S%2FA:B:0.0.0.0:C"))
    );
}

#[test]
fn invalid_urls_are_rejected() {
    assert!(TwitarrServer::builder().url("not a url").is_err());
    assert!(TwitarrServer::builder().url("mailto:demo@example.com").is_err());
}
