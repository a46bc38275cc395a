//! Project-scoped access credentials for the client dashboard.
//!
//! A credential is an HS256 JWT whose only claim of interest is the project
//! identifier, valid for seven days from issue. Verification collapses all
//! failure causes (malformed, tampered, expired) into a single `None`: the
//! caller never learns why a token was rejected.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Cookie sessions last a week, matching the cookie max-age.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    project_id: String,
    exp: i64,
}

/// Issues a signed token scoping the bearer to a single project.
pub fn issue(secret: &str, project_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
    issue_with_ttl(secret, project_id, Duration::days(TOKEN_TTL_DAYS))
}

fn issue_with_ttl(
    secret: &str,
    project_id: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        project_id: project_id.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validates signature and expiry, returning the embedded project id.
/// Expiry is absolute: no clock leeway past `exp`.
pub fn verify(secret: &str, token: &str) -> Option<String> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.project_id)
}
