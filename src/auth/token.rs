//! Payload decoding for the bearer token the backend issues at login.
//!
//! The signature is never checked here. The decoded identity drives UI
//! decisions only; the API re-validates the token on every request.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::{
    auth::claims::TokenClaims,
    errors::{AppError, AppResult},
};

pub fn decode(token: &str) -> AppResult<TokenClaims> {
    let mut segments = token.split('.');
    let payload_segment = match (segments.next(), segments.next()) {
        (Some(_), Some(payload)) => payload,
        _ => {
            return Err(AppError::MalformedToken(
                "expected at least two dot-separated segments".to_string(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload_segment.trim_end_matches('='))
        .map_err(|e| AppError::MalformedToken(format!("payload is not base64url: {}", e)))?;

    let payload: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::MalformedToken(format!("payload is not a JSON object: {}", e)))?;

    Ok(TokenClaims::from_payload(&payload))
}

/// Like [`decode`], but a token whose `exp` is at or before `now` is an error.
pub fn decode_unexpired(token: &str, now: DateTime<Utc>) -> AppResult<TokenClaims> {
    let claims = decode(token)?;
    if claims.is_expired(now) {
        return Err(AppError::ExpiredToken);
    }
    Ok(claims)
}
