#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stateless session tokens and password hashing.
//!
//! Tokens are HS256 JWTs carrying the account id and role, valid for
//! [`TOKEN_TTL_DAYS`] days. Handlers receive the verified identity through
//! the [`AuthUser`] extractor, which reads the `x-auth-token` header or a
//! standard `Authorization: Bearer` header.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rideway_ride_models::AccountRole;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long an issued token stays valid.
pub const TOKEN_TTL_DAYS: i64 = 7;

const SECRET_ENV_VAR: &str = "JWT_SECRET";
const FALLBACK_SECRET: &str = "your_jwt_secret";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Verified account identity carried by a session token.
///
/// Also usable as an actix extractor: handlers that take an `AuthUser`
/// parameter only run for requests bearing a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    #[serde(rename = "type")]
    pub role: AccountRole,
}

/// JWT payload: the identity plus issue/expiry timestamps in Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: AuthUser,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Reads the secret from `JWT_SECRET`, falling back to a development
    /// default when unset.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(SECRET_ENV_VAR) {
            Ok(secret) if !secret.is_empty() => Self::new(&secret),
            _ => {
                log::warn!("{SECRET_ENV_VAR} is not set, using the development default secret");
                Self::new(FALLBACK_SECRET)
            }
        }
    }

    /// Issues a token for the given account, valid for [`TOKEN_TTL_DAYS`]
    /// days from now.
    ///
    /// # Errors
    ///
    /// * If JWT encoding fails.
    pub fn issue(&self, id: i64, role: AccountRole) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            user: AuthUser { id, role },
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verifies the signature and expiry of a token and returns the identity
    /// it carries.
    ///
    /// # Errors
    ///
    /// * If the token is malformed, expired, or signed with another secret.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())?;

        Ok(data.claims.user)
    }
}

/// Hashes a plaintext password for storage.
///
/// # Errors
///
/// * If bcrypt hashing fails.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(plain, bcrypt::DEFAULT_COST)?)
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// # Errors
///
/// * If the stored hash is not a valid bcrypt string.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(plain, hash)?)
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, actix_web::Error> {
    let Some(codec) = req.app_data::<web::Data<TokenCodec>>() else {
        log::error!("TokenCodec app data is not registered");
        return Err(unauthorized("Token is not valid"));
    };
    let Some(token) = bearer_token(req) else {
        return Err(unauthorized("No token, authorization denied"));
    };

    codec.verify(token).map_err(|e| {
        log::debug!("Rejected auth token: {e}");
        unauthorized("Token is not valid")
    })
}

/// `x-auth-token` wins over `Authorization`; only the latter may carry a
/// `Bearer ` prefix.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    if let Some(value) = req.headers().get("x-auth-token") {
        return value.to_str().ok();
    }

    let value = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

fn unauthorized(message: &str) -> actix_web::Error {
    actix_web::error::InternalError::from_response(
        message.to_string(),
        HttpResponse::Unauthorized().json(serde_json::json!({ "error": message })),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn issues_and_verifies_round_trip() {
        let codec = TokenCodec::new("test-secret");

        let token = codec.issue(7, AccountRole::Passenger).unwrap();
        let user = codec.verify(&token).unwrap();

        assert_eq!(
            user,
            AuthUser {
                id: 7,
                role: AccountRole::Passenger,
            }
        );
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = TokenCodec::new("secret-a")
            .issue(1, AccountRole::Driver)
            .unwrap();

        assert!(TokenCodec::new("secret-b").verify(&token).is_err());
    }

    #[test]
    fn rejects_tampered_payload() {
        let codec = TokenCodec::new("test-secret");
        let original = codec.issue(1, AccountRole::Passenger).unwrap();
        let other = codec.issue(2, AccountRole::Passenger).unwrap();

        let original: Vec<&str> = original.split('.').collect();
        let other: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", original[0], other[1], original[2]);

        assert!(codec.verify(&forged).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let claims = Claims {
            user: AuthUser {
                id: 9,
                role: AccountRole::Driver,
            },
            iat: 0,
            exp: 0,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(TokenCodec::new("test-secret").verify(&token).is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("password123").unwrap();

        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[tokio::test]
    async fn extractor_accepts_x_auth_token() {
        let codec = TokenCodec::new("extractor-secret");
        let token = codec.issue(42, AccountRole::Driver).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(codec))
            .insert_header(("x-auth-token", token))
            .to_http_request();
        let user = AuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();

        assert_eq!(
            user,
            AuthUser {
                id: 42,
                role: AccountRole::Driver,
            }
        );
    }

    #[tokio::test]
    async fn extractor_strips_bearer_prefix() {
        let codec = TokenCodec::new("extractor-secret");
        let token = codec.issue(7, AccountRole::Passenger).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(codec))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        let user = AuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();

        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn extractor_rejects_missing_token() {
        let req = TestRequest::default()
            .app_data(web::Data::new(TokenCodec::new("extractor-secret")))
            .to_http_request();

        assert!(AuthUser::from_request(&req, &mut Payload::None)
            .await
            .is_err());
    }
}
