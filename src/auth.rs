// src/auth.rs
//! Local inspection of bearer tokens.
//!
//! The client never verifies signatures (it has no key); it only reads the
//! `exp` claim so an expired session is caught before a request goes out.

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Expiration timestamp in seconds. Kept as a float: issuers differ.
    pub exp: Option<f64>,
    pub iat: Option<f64>,
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default, rename = "roleId")]
    pub role_id: Option<serde_json::Value>,
}

fn inspection_rules() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Decode the claims of `token` without checking its signature.
pub fn read_claims(token: &str) -> Option<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &inspection_rules())
        .map(|data| data.claims)
        .ok()
}

/// Expiry of `token` in milliseconds since the epoch, if it carries a numeric `exp`.
pub fn token_expiry_ms(token: &str) -> Option<i64> {
    read_claims(token)
        .and_then(|claims| claims.exp)
        .filter(|exp| exp.is_finite())
        .map(|exp| (exp * 1000.0) as i64)
}

/// A token is expired when its expiry cannot be read or has passed.
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now().timestamp_millis())
}

pub fn is_token_expired_at(token: &str, now_ms: i64) -> bool {
    match token_expiry_ms(token) {
        Some(exp_ms) => now_ms >= exp_ms,
        None => true,
    }
}
