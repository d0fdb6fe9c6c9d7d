//! Authentication extractors - admin session cookie and ingestion API key.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use patrol_core::domain::Admin;
use patrol_core::ports::TokenClaims;

use super::error::AppError;
use crate::state::AppState;

/// Cookie carrying the signed admin session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Header carrying the ingestion API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Session cookie for a freshly issued token.
pub fn session_cookie(token: String, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(ttl_seconds))
        .finish()
}

/// Expired cookie that makes the browser drop the session.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish();
    cookie.make_removal();
    cookie
}

/// Authenticated admin, taken from the session cookie.
///
/// ```ignore
/// async fn protected(session: AdminSession) -> impl Responder {
///     format!("Hello, admin {}!", session.admin_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl AdminSession {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(Admin::ROLE_SUPER_ADMIN)
    }
}

impl From<TokenClaims> for AdminSession {
    fn from(claims: TokenClaims) -> Self {
        Self {
            admin_id: claims.subject,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal {
            error: "Server configuration error",
            details: None,
        }
    })
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match app_state(req) {
            Ok(state) => state,
            Err(e) => return ready(Err(e)),
        };

        let Some(cookie) = req.cookie(SESSION_COOKIE) else {
            return ready(Err(AppError::Unauthorized));
        };

        match state.tokens.validate_token(cookie.value()) {
            Ok(claims) => ready(Ok(AdminSession::from(claims))),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected admin session");
                ready(Err(AppError::Unauthorized))
            }
        }
    }
}

/// Compare secrets without leaking where they differ or how long they are.
fn keys_match(provided: &str, expected: &str) -> bool {
    if provided.is_empty() || expected.is_empty() {
        return false;
    }

    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided.ct_eq(&expected).into()
}

/// `Ok(true)` for a matching key, `Ok(false)` when the header is absent.
fn check_api_key(req: &HttpRequest) -> Result<bool, AppError> {
    let state = app_state(req)?;

    let Some(header) = req.headers().get(API_KEY_HEADER) else {
        return Ok(false);
    };

    let Some(expected) = state.config.ingest_api_key.as_deref() else {
        tracing::error!("INGEST_API_KEY is not configured; rejecting API key");
        return Err(AppError::Unauthorized);
    };

    let provided = header.to_str().map_err(|_| AppError::Unauthorized)?;
    if keys_match(provided, expected) {
        Ok(true)
    } else {
        tracing::info!("Request with invalid API key");
        Err(AppError::Unauthorized)
    }
}

/// Requires a valid `X-API-Key` header.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequest for ApiKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match check_api_key(req) {
            Ok(true) => Ok(ApiKey),
            Ok(false) => Err(AppError::Unauthorized),
            Err(e) => Err(e),
        })
    }
}

/// Accepts requests without `X-API-Key`, but a key that is sent must be valid.
#[derive(Debug, Clone, Copy)]
pub struct OptionalApiKey;

impl FromRequest for OptionalApiKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(check_api_key(req).map(|_| OptionalApiKey))
    }
}
