use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Access tokens live for one hour, refresh tokens for a day. The two are
/// signed with distinct secrets so one can never stand in for the other.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
pub const REFRESH_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Expired tokens are reported distinctly from malformed or mis-signed ones;
/// clients use the distinction to decide whether a refresh is worth trying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "Token expired."),
            TokenError::Invalid => write!(f, "Invalid token."),
        }
    }
}

pub fn issue_access(username: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    issue(username, secret, Duration::seconds(ACCESS_TOKEN_TTL_SECS))
}

pub fn issue_refresh(username: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    issue(username, secret, Duration::seconds(REFRESH_TOKEN_TTL_SECS))
}

fn issue(
    username: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: username.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn token_with_exp(username: &str, exp: i64) -> String {
        let claims = Claims {
            sub: username.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issue_then_verify_round_trips_username() {
        let token = issue_access("sysadmin", SECRET).unwrap();
        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "sysadmin");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let token = token_with_exp("sysadmin", (Utc::now() - Duration::hours(2)).timestamp());
        assert_eq!(verify(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn token_valid_just_inside_the_window() {
        // A refresh token issued at T0 is still good at T0+23h.
        let token = token_with_exp("sysadmin", (Utc::now() + Duration::hours(1)).timestamp());
        assert!(verify(&token, SECRET).is_ok());
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = issue_access("sysadmin", SECRET).unwrap();
        assert_eq!(verify(&token, "other-secret"), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert_eq!(verify("not.a.jwt", SECRET), Err(TokenError::Invalid));
    }

    #[test]
    fn access_token_does_not_verify_against_refresh_secret() {
        let access = issue_access("sysadmin", "access-secret").unwrap();
        assert_eq!(verify(&access, "refresh-secret"), Err(TokenError::Invalid));
    }
}
