//! Turning transport responses and errors into envelopes.
//!
//! Transports report failures in a loosely-typed [`TransportFailure`] shape.
//! The extraction rules below read that shape in a fixed order, and callers
//! pattern-match on the resulting [`TwitarrError`], so the order matters.

use bytes::Bytes;
use http::{Response, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{ErrorKind, TransportError, TwitarrError},
    options::{EffectiveOptions, ResponseType},
    result::TwitarrResult,
};

/// The status reported when a failure carries none.
pub const UNKNOWN_STATUS: i32 = -1;

/// A transport failure, described in the shape the normalizer reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportFailure {
    /// An explicit error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,

    /// The HTTP status of the failure itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// A human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The HTTP reason phrase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,

    /// The payload that came with the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// The response that caused the failure, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Box<TransportFailure>>,
}

/// Determines the message for a failure.
///
/// Tries, in order: the failure's own message, the nested response's message
/// (recursively), a string payload, the status text, and finally a JSON dump of
/// the whole failure.
#[must_use]
pub fn extract_message(failure: Option<&TransportFailure>) -> String {
    let Some(failure) = failure else {
        return "no error message".to_owned();
    };

    if let Some(message) = failure.message.as_deref().filter(|m| !m.is_empty()) {
        return message.to_owned();
    }
    if let Some(response) = failure.response.as_deref() {
        return extract_message(Some(response));
    }
    if let Some(Value::String(data)) = &failure.data
        && !data.is_empty()
    {
        return data.clone();
    }
    if let Some(status_text) = failure.status_text.as_deref().filter(|t| !t.is_empty()) {
        return status_text.to_owned();
    }
    serde_json::to_string(failure).unwrap_or_else(|_| format!("{failure:?}"))
}

/// Determines the status code for a failure.
///
/// Tries the explicit code, then the status, then the nested response's status,
/// and falls back to [`UNKNOWN_STATUS`].
#[must_use]
pub fn extract_status(failure: &TransportFailure) -> i32 {
    if let Some(code) = failure.code.filter(|&code| code != 0) {
        return code;
    }
    if let Some(status) = failure.status.filter(|&status| status != 0) {
        return i32::from(status);
    }
    failure
        .response
        .as_ref()
        .and_then(|response| response.status)
        .filter(|&status| status != 0)
        .map_or(UNKNOWN_STATUS, i32::from)
}

/// Determines the payload of the response behind a failure.
#[must_use]
pub fn extract_data(failure: &TransportFailure) -> Option<Value> {
    failure
        .response
        .as_ref()
        .and_then(|response| response.data.clone())
        .filter(|data| !is_blank(data))
}

/// Creates the error envelope for a transport error.
pub fn normalize_error<E: TransportError>(err: E, options: Option<EffectiveOptions>) -> TwitarrError {
    let failure = err.failure();
    TwitarrError::transport(
        extract_message(Some(&failure)),
        extract_status(&failure),
        options,
        extract_data(&failure),
    )
    .with_source(err)
}

/// Creates the result envelope for a response.
///
/// The body is parsed as JSON when the response says it is JSON or when
/// `response_type` asks for it; otherwise it is returned as a string. An empty
/// JSON body becomes `null`.
///
/// # Errors
///
/// Returns a transport error for a non-success status, and a decode error if a
/// JSON body does not parse.
pub fn normalize_response(
    response: Response<Bytes>,
    response_type: ResponseType,
) -> Result<TwitarrResult<Value>, TwitarrError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response.into_body();

    if !status.is_success() {
        let data = raw_payload(&body);
        let mut err = TwitarrError::transport(
            format!("Request failed with status code {}", status.as_u16()),
            i32::from(status.as_u16()),
            None,
            None,
        );
        if let Some(data) = data {
            err = err.with_data(data);
        }
        return Err(err);
    }

    let is_json = content_type.as_deref().is_some_and(is_json_media_type)
        || response_type == ResponseType::Json;
    let data = if is_json {
        parse_json(&body).map_err(|err| {
            TwitarrError::new(ErrorKind::Decode, format!("invalid JSON response: {err}"))
                .with_code(i32::from(status.as_u16()))
                .with_data(Value::String(String::from_utf8_lossy(&body).into_owned()))
                .with_source(err)
        })?
    } else {
        Value::String(String::from_utf8_lossy(&body).into_owned())
    };

    Ok(TwitarrResult::ok(data, None, status.as_u16(), content_type))
}

/// A failure payload: JSON when it parses, the raw text otherwise, `None` when empty.
pub(crate) fn raw_payload(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(
        serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned())),
    )
}

fn parse_json(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

pub(crate) fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::json;

    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &'static str) -> Response<Bytes> {
        let mut builder = Response::builder().status(status);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder.body(Bytes::from_static(body.as_bytes())).unwrap()
    }

    #[test]
    fn message_prefers_the_direct_message() {
        let failure = TransportFailure {
            message: Some("direct".into()),
            status_text: Some("Not Found".into()),
            response: Some(Box::new(TransportFailure {
                message: Some("nested".into()),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(extract_message(Some(&failure)), "direct");
    }

    #[test]
    fn message_falls_back_to_the_nested_response() {
        let failure = TransportFailure {
            data: Some(json!("ignored payload")),
            response: Some(Box::new(TransportFailure {
                response: Some(Box::new(TransportFailure {
                    message: Some("deeply nested".into()),
                    ..Default::default()
                })),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(extract_message(Some(&failure)), "deeply nested");
    }

    #[test]
    fn message_falls_back_to_a_string_payload() {
        let failure = TransportFailure {
            data: Some(json!("user not found")),
            status_text: Some("Not Found".into()),
            ..Default::default()
        };
        assert_eq!(extract_message(Some(&failure)), "user not found");
    }

    #[test]
    fn message_falls_back_to_status_text() {
        let failure = TransportFailure {
            message: Some(String::new()),
            data: Some(json!({"error": "nope"})),
            status_text: Some("Bad Gateway".into()),
            ..Default::default()
        };
        assert_eq!(extract_message(Some(&failure)), "Bad Gateway");
    }

    #[test]
    fn message_falls_back_to_a_dump() {
        let failure = TransportFailure {
            status: Some(200),
            data: Some(json!({"status": "error"})),
            ..Default::default()
        };
        assert_eq!(
            extract_message(Some(&failure)),
            r#"{"status":200,"data":{"status":"error"}}"#
        );
    }

    #[test]
    fn message_without_failure() {
        assert_eq!(extract_message(None), "no error message");
    }

    #[test]
    fn status_order() {
        let nested = |status| {
            Some(Box::new(TransportFailure {
                status: Some(status),
                ..Default::default()
            }))
        };

        let failure = TransportFailure {
            code: Some(7),
            status: Some(500),
            response: nested(404),
            ..Default::default()
        };
        assert_eq!(extract_status(&failure), 7);

        let failure = TransportFailure {
            code: Some(0),
            status: Some(500),
            response: nested(404),
            ..Default::default()
        };
        assert_eq!(extract_status(&failure), 500);

        let failure = TransportFailure {
            response: nested(404),
            ..Default::default()
        };
        assert_eq!(extract_status(&failure), 404);

        assert_eq!(extract_status(&TransportFailure::default()), UNKNOWN_STATUS);
    }

    #[test]
    fn data_comes_from_the_nested_response() {
        let failure = TransportFailure {
            data: Some(json!("outer")),
            response: Some(Box::new(TransportFailure {
                data: Some(json!({"errors": ["bad"]})),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(extract_data(&failure), Some(json!({"errors": ["bad"]})));
        assert_eq!(extract_data(&TransportFailure::default()), None);
    }

    #[test]
    fn json_responses_are_parsed() {
        let result = normalize_response(
            response(200, Some("application/json; charset=utf-8"), r#"{"ok":true}"#),
            ResponseType::Text,
        )
        .unwrap();
        assert_eq!(result.data(), &json!({"ok": true}));
        assert_eq!(result.code(), 200);
        assert_eq!(result.content_type(), Some("application/json; charset=utf-8"));
    }

    #[test]
    fn text_responses_stay_text() {
        let result = normalize_response(
            response(200, Some("text/plain"), "pong"),
            ResponseType::Text,
        )
        .unwrap();
        assert_eq!(result.data(), &json!("pong"));
    }

    #[test]
    fn json_mode_parses_untyped_bodies() {
        let result = normalize_response(response(200, None, "[1,2]"), ResponseType::Json).unwrap();
        assert_eq!(result.data(), &json!([1, 2]));

        let result = normalize_response(response(204, None, ""), ResponseType::Json).unwrap();
        assert_eq!(result.data(), &Value::Null);
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = normalize_response(response(200, None, "<html>"), ResponseType::Json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.code(), Some(200));
        assert_eq!(err.data(), Some(&json!("<html>")));
    }

    #[test]
    fn non_success_responses_are_errors() {
        let err = normalize_response(
            response(StatusCode::NOT_FOUND.as_u16(), None, r#"{"status":"error"}"#),
            ResponseType::Json,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "Error 404: Request failed with status code 404");
        assert_eq!(err.data(), Some(&json!({"status": "error"})));
    }
}
