//! Signed bearer tokens (HS256 JWT) carrying the user id in `sub`.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Keys used to issue and verify access tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Issue a token for `user_id`, valid for the configured lifetime.
    pub fn issue(&self, user_id: i32) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Check signature and expiry, returning the user id.
    pub fn verify(&self, token: &str) -> Result<i32, JwtError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        data.claims
            .sub
            .parse()
            .map_err(|_| JwtError::from(ErrorKind::InvalidSubject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> TokenKeys {
        TokenKeys::new(secret.as_bytes(), TimeDelta::minutes(15))
    }

    #[test]
    fn issued_token_verifies() {
        let keys = keys("supersecret");
        let token = keys.issue(7).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), 7);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = keys("one").issue(7).unwrap();
        let err = keys("two").verify(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new(b"supersecret", TimeDelta::hours(-2));
        let token = keys.issue(7).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let keys = keys("supersecret");
        let claims = Claims {
            sub: "alice".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + TimeDelta::minutes(5)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSubject));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(keys("supersecret").verify("not.a.token").is_err());
    }
}
