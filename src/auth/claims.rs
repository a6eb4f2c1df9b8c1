use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::models::{domain::user::Role, value_to_string};

pub const ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
pub const NAME_IDENTIFIER_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

/// Identity carried by a token payload. Nothing here has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject_id: Option<String>,
    pub role: Option<Role>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let role = payload
            .get(ROLE_CLAIM)
            .or_else(|| payload.get("role"))
            .and_then(role_from_value);

        let subject_id = payload
            .get(NAME_IDENTIFIER_CLAIM)
            .or_else(|| payload.get("sub"))
            .and_then(value_to_string);

        let expires_at = payload
            .get("exp")
            .and_then(|exp| exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64)))
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        TokenClaims {
            subject_id,
            role,
            expires_at,
        }
    }

    /// A token without `exp` never expires on the client side.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Role claims are a string, or an array when the user holds several roles.
fn role_from_value(value: &Value) -> Option<Role> {
    match value {
        Value::String(s) => parse_role(s),
        Value::Array(items) => items.iter().filter_map(Value::as_str).find_map(parse_role),
        _ => None,
    }
}

fn parse_role(raw: &str) -> Option<Role> {
    match raw.parse() {
        Ok(role) => Some(role),
        Err(e) => {
            log::warn!("Ignoring role claim: {}", e);
            None
        }
    }
}
