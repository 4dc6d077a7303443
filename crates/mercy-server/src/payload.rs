//! JSON object bodies.

use crate::error::ApiError;
use axum::body::to_bytes;
use axum::extract::{FromRequest, Request};
use mercy_core::ErrorCode;
use mercy_store::Document;
use serde_json::Value;

/// Request bodies above this size are rejected as malformed.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// The request body as a JSON object. An empty body is an empty object.
pub struct Payload(pub Document);

impl<S: Send + Sync> FromRequest<S> for Payload {
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let bytes = to_bytes(req.into_body(), BODY_LIMIT)
            .await
            .map_err(|_| ApiError::new(ErrorCode::MalformedBody))?;
        Ok(Payload(parse_object(&bytes)?.unwrap_or_default()))
    }
}

/// Parse a body that must be a JSON object; `None` when empty.
pub fn parse_object(bytes: &[u8]) -> Result<Option<Document>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        _ => Err(ApiError::new(ErrorCode::MalformedBody)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        assert_eq!(parse_object(b"").unwrap(), None);
        assert_eq!(parse_object(b"  \n").unwrap(), None);
        let doc = parse_object(br#"{"a": 1}"#).unwrap().unwrap();
        assert_eq!(doc["a"], 1);
    }

    #[tokio::test]
    async fn test_oversized_body_is_malformed() {
        let mut raw = br#"{"pad": ""#.to_vec();
        raw.resize(BODY_LIMIT + 16, b'x');
        raw.extend_from_slice(br#""}"#);
        let req = Request::new(axum::body::Body::from(raw));

        let err = match Payload::from_request(req, &()).await {
            Ok(_) => panic!("oversized body accepted"),
            Err(err) => err,
        };
        assert_eq!(err.code(), ErrorCode::MalformedBody);
    }

    #[tokio::test]
    async fn test_body_within_limit_is_parsed() {
        let req = Request::new(axum::body::Body::from(r#"{"name": "pen"}"#));
        let Payload(doc) = Payload::from_request(req, &()).await.unwrap();
        assert_eq!(doc["name"], "pen");
    }

    #[test]
    fn test_non_objects_are_malformed() {
        for body in [&b"[1]"[..], b"\"x\"", b"{broken", b"null"] {
            let err = parse_object(body).unwrap_err();
            assert_eq!(err.code(), ErrorCode::MalformedBody);
        }
    }
}
