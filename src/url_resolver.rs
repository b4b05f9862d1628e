//! Resolution of request paths against a server's base URL.

use std::borrow::Cow;

use url::Url;

/// Resolves `path` (plus an optional raw `query`) against `base`.
///
/// * Without a base there is nothing to resolve against, so the result is `None`.
/// * An absent or empty path yields the base unchanged.
/// * A path starting with `/` is returned as-is; it is not joined with the base.
/// * Any other path is joined to the base as a relative reference, with trailing
///   slashes stripped from the result.
///
/// Each path segment is normalized so that colons are never escaped while
/// pre-escaped slashes (`%2F`) stay escaped. The query is appended verbatim as a
/// single escaped component, so `foo=bar` becomes `foo%3Dbar`.
///
/// A `?` inside a relative `path` is escaped as part of its segment and does
/// not start a query. Requests should carry their query parameters in
/// [`TwitarrHttpOptions`](crate::TwitarrHttpOptions) instead.
#[must_use]
pub fn resolve_url(base: Option<&Url>, path: Option<&str>, query: Option<&str>) -> Option<String> {
    let base = base?;
    let path = match path {
        Some(path) if !path.is_empty() => path,
        _ => return Some(base.to_string()),
    };

    if path.starts_with('/') {
        return Some(append_query(path.to_owned(), query));
    }

    let relative = path.split('/').map(encode_segment).collect::<Vec<_>>().join("/");
    // The `./` prefix keeps a leading `a:b` segment from parsing as a scheme.
    let joined = match base.join(&format!("./{relative}")) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}/{relative}", base.as_str().trim_end_matches('/')),
    };

    Some(append_query(joined.trim_end_matches('/').to_owned(), query))
}

fn encode_segment(segment: &str) -> String {
    let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
    urlencoding::encode(&decoded).replace("%3A", ":")
}

fn append_query(mut url: String, query: Option<&str>) -> String {
    if let Some(query) = query.filter(|query| !query.is_empty()) {
        url.push('?');
        url.push_str(&urlencoding::encode(query));
    }
    url
}
