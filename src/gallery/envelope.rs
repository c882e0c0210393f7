//! Response envelope normalisation.
//!
//! The CMS answers in one of three shapes:
//!
//! 1. a plain envelope: `{ "success": true, "data": ..., "error": ... }`
//! 2. a form-action result wrapping the envelope:
//!    `{ "type": "success", "status": 200, "data": { ...envelope... } }`
//! 3. the same wrapper with `data` double-encoded as a string, either plain
//!    JSON or the flattened devalue encoding.
//!
//! [`decode`] accepts all of them and yields the payload under `data`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::devalue;
use super::ApiError;

/// Decode a response body into `T`.
///
/// Bodies without a `success` flag are treated as bare payloads.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let parsed: Value =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("invalid JSON: {e}")))?;
    let envelope = unwrap_action_result(parsed)?;
    let payload = into_payload(envelope)?;
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a response whose payload is irrelevant, only checking `success`.
pub fn expect_success(body: &str) -> Result<(), ApiError> {
    decode::<Value>(body).map(|_| ())
}

/// Best-effort error text from an error body, used for non-2xx responses.
pub fn error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    match unwrap_action_result(parsed) {
        Err(ApiError::Rejected(msg)) => Some(msg),
        Ok(envelope) => match into_payload(envelope) {
            Err(ApiError::Rejected(msg)) => Some(msg),
            _ => None,
        },
        Err(_) => None,
    }
}

/// Peel off the form-action wrapper, if present.
fn unwrap_action_result(value: Value) -> Result<Value, ApiError> {
    let kind = match &value {
        Value::Object(obj) if !obj.contains_key("success") => obj
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    let Some(kind) = kind else {
        return Ok(value);
    };
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => return Ok(other),
    };

    match kind.as_str() {
        "success" | "failure" => {
            let inner = match obj.remove("data").unwrap_or(Value::Null) {
                Value::String(s) => decode_embedded(&s)?,
                other => other,
            };
            // A wrapper may itself wrap another result.
            let inner = unwrap_action_result(inner)?;
            if kind == "failure" && !has_success_flag(&inner) {
                return Err(ApiError::Rejected(
                    message_of(&inner).unwrap_or_else(|| "request failed".to_string()),
                ));
            }
            Ok(inner)
        }
        "error" => Err(ApiError::Rejected(
            obj.get("error")
                .and_then(message_text)
                .unwrap_or_else(|| "server error".to_string()),
        )),
        "redirect" => Err(ApiError::Rejected(format!(
            "redirected to {}",
            obj.get("location").and_then(Value::as_str).unwrap_or("?")
        ))),
        _ => Ok(Value::Object(obj)),
    }
}

/// Decode a string-typed `data` field: devalue first, plain JSON second.
fn decode_embedded(s: &str) -> Result<Value, ApiError> {
    let parsed: Value = serde_json::from_str(s)
        .map_err(|e| ApiError::Decode(format!("invalid embedded JSON: {e}")))?;
    match parsed {
        Value::Array(_) | Value::Number(_) => {
            devalue::unflatten(&parsed).map_err(|e| ApiError::Decode(e.to_string()))
        }
        other => Ok(other),
    }
}

fn has_success_flag(value: &Value) -> bool {
    value.get("success").is_some()
}

/// Turn an envelope into its payload, or into [`ApiError::Rejected`].
fn into_payload(envelope: Value) -> Result<Value, ApiError> {
    let Some(flag) = envelope.get("success") else {
        return Ok(envelope);
    };
    let ok = match flag {
        Value::Bool(b) => *b,
        // Some handlers send 1/0 instead of booleans.
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    };
    if !ok {
        return Err(ApiError::Rejected(
            message_of(&envelope).unwrap_or_else(|| "request failed".to_string()),
        ));
    }
    match envelope {
        Value::Object(mut obj) => Ok(obj.remove("data").unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(message_text)
        .or_else(|| value.get("message").and_then(message_text))
}

/// `"text"` or `{ "message": "text" }`.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn plain_envelope_yields_data() {
        let body = r#"{ "success": true, "data": { "name": "a.jpg" } }"#;
        let item: Item = decode(body).expect("decode");
        assert_eq!(item.name, "a.jpg");
    }

    #[test]
    fn plain_envelope_failure_is_rejected_with_message() {
        let body = r#"{ "success": false, "error": "file is in use" }"#;
        let result = decode::<Value>(body);
        assert_eq!(result, Err(ApiError::Rejected("file is in use".to_string())));
    }

    #[test]
    fn action_wrapper_with_object_data() {
        let body = r#"{ "type": "success", "status": 200, "data": { "success": true, "data": { "name": "b.png" } } }"#;
        let item: Item = decode(body).expect("decode");
        assert_eq!(item.name, "b.png");
    }

    #[test]
    fn action_wrapper_with_json_string_data() {
        let body = r#"{ "type": "success", "data": "{\"success\":true,\"data\":{\"name\":\"c.webp\"}}" }"#;
        let item: Item = decode(body).expect("decode");
        assert_eq!(item.name, "c.webp");
    }

    #[test]
    fn action_wrapper_with_devalue_data() {
        let body = r#"{ "type": "success", "status": 200, "data": "[{\"success\":1,\"data\":2},true,{\"name\":3},\"d.avif\"]" }"#;
        let item: Item = decode(body).expect("decode");
        assert_eq!(item.name, "d.avif");
    }

    #[test]
    fn action_failure_without_envelope_is_rejected() {
        let body = r#"{ "type": "failure", "status": 400, "data": "[{\"message\":1},\"no file given\"]" }"#;
        let result = decode::<Value>(body);
        assert_eq!(result, Err(ApiError::Rejected("no file given".to_string())));
    }

    #[test]
    fn action_error_uses_error_message() {
        let body = r#"{ "type": "error", "error": { "message": "Internal Error" } }"#;
        assert_eq!(
            decode::<Value>(body),
            Err(ApiError::Rejected("Internal Error".to_string()))
        );
    }

    #[test]
    fn bare_payload_passes_through() {
        let item: Item = decode(r#"{ "name": "bare.jpg" }"#).expect("decode");
        assert_eq!(item.name, "bare.jpg");
    }

    #[test]
    fn numeric_success_flag_is_accepted() {
        assert!(expect_success(r#"{ "success": 1 }"#).is_ok());
        assert!(expect_success(r#"{ "success": 0 }"#).is_err());
    }

    #[test]
    fn invalid_json_is_decode_error() {
        assert!(matches!(decode::<Value>("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn error_message_extracts_server_text() {
        assert_eq!(
            error_message(r#"{ "success": false, "message": "forbidden" }"#).as_deref(),
            Some("forbidden")
        );
        assert_eq!(error_message("not json"), None);
    }
}
