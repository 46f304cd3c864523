use actix_web::http::header::Header;
use actix_web::HttpRequest;
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::session::{Claims, Session};
use crate::store::{SessionEntry, SessionStore};
use crate::utils::errors::ServiceError;

pub fn issue_token(session: &Session, config: &AppConfig) -> Result<String, ServiceError> {
    let claims = Claims {
        sub: session.id.to_string(),
        name: session.name.clone(),
        role: session.role,
        iat: Utc::now().timestamp() as usize,
    };

    encode(
        &JwtHeader::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_ref()),
    )
    .map_err(|e| {
        log::error!("Token encoding error: {}", e);
        ServiceError::AuthenticationError("Failed to generate token".to_string())
    })
}

/// Sessions live until logout, so the token carries no expiry.
pub fn decode_token(token: &str, config: &AppConfig) -> Result<Claims, ServiceError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::warn!("Token validation error: {}", e);
        ServiceError::Unauthorized("Invalid token".to_string())
    })
}

/// Resolves the bearer token on a request to its live session.
pub fn current_session(
    req: &HttpRequest,
    store: &SessionStore,
    config: &AppConfig,
) -> Result<Arc<SessionEntry>, ServiceError> {
    let bearer = Authorization::<Bearer>::parse(req)
        .map_err(|_| ServiceError::Unauthorized("Authentication required".to_string()))?
        .into_scheme();

    let claims = decode_token(bearer.token(), config)?;
    let session = claims
        .session()
        .ok_or_else(|| ServiceError::Unauthorized("Invalid session id in token".to_string()))?;

    let entry = store.get(&session.id).ok_or_else(|| {
        log::warn!("Token presented for closed session {}", session.id);
        ServiceError::Unauthorized("Session expired, please log in again".to_string())
    })?;
    entry.touch(Utc::now());
    Ok(entry)
}
