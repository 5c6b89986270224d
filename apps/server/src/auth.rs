//! Session tokens and request authentication.
//!
//! Login issues an HS256 JWT carrying the user's id, name and role.
//! Procedures that record an acting user pull a [`RequestContext`]
//! out of the `Authorization: Bearer` header; everything else about
//! the request stays untouched.

use crate::error::ApiError;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use till_core::{Role, User};
use uuid::Uuid;

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Token id, unique per issuance
    pub jti: String,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: u64,
}

impl JwtManager {
    pub fn new(secret: &str, lifetime_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Sign a fresh token for a just-authenticated user
    pub fn generate_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp: now + self.lifetime_secs as i64,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(ApiError::internal)
    }

    /// Decode and verify a token, expiry included
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::unauthorized("invalid or expired token"))
    }
}

/// The authenticated caller of a procedure
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

/// Pull the bearer token out of the request headers
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

    if !header.starts_with("Bearer ") {
        return Err(ApiError::unauthorized(
            "authorization header is not a bearer token",
        ));
    }

    Ok(&header[7..])
}

/// Authenticate a request: bearer token in, request context out
pub fn authenticate(headers: &HeaderMap, jwt: &JwtManager) -> Result<RequestContext, ApiError> {
    let token = extract_bearer_token(headers)?;
    let claims = jwt.validate_token(token)?;

    Ok(RequestContext {
        user_id: claims.sub,
        username: claims.username,
        role: claims.role,
    })
}
