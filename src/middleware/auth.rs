use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{
    dto::auth::Claims,
    error::AppError,
    models::{Store, UserRole},
    state::AppState,
};

pub const ACCESS_CODE_HEADER: &str = "x-access-code";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub role: UserRole,
}

pub fn ensure_role(user: &AuthUser, role: UserRole) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, UserRole::Admin)
}

/// Whoever is calling a store-scoped mutation: an admin token, a store
/// access code, both or neither.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user: Option<AuthUser>,
    pub access_code: Option<String>,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == UserRole::Admin)
    }
}

/// Whether the caller may see `store.access_code`: admins, the owning user,
/// or someone who already holds the code.
pub fn can_view_access_code(caller: &Caller, store: &Store) -> bool {
    caller.is_admin()
        || caller
            .user
            .as_ref()
            .is_some_and(|u| store.owner_id == Some(u.user_id))
        || caller.access_code.as_deref() == Some(store.access_code.as_str())
}

/// Admins may touch any store; everyone else needs that store's access code.
pub fn ensure_store_access(caller: &Caller, store: &Store) -> Result<(), AppError> {
    if caller.is_admin() {
        return Ok(());
    }
    match caller.access_code.as_deref() {
        Some(code) if code == store.access_code => Ok(()),
        Some(_) => Err(AppError::Forbidden),
        None if caller.user.is_some() => Err(AppError::Forbidden),
        None => Err(AppError::Unauthorized),
    }
}

/// Upper-cased, trimmed form used for the exact-match code lookup.
pub fn normalize_access_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn bearer_user(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
    };

    let secret = state
        .jwt_secret
        .as_deref()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let decoded = decode::<Claims>(
        token.trim(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = decoded
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("Invalid user id in token".into()))?;
    let role = decoded
        .claims
        .role
        .parse::<UserRole>()
        .map_err(|_| AppError::BadRequest("Invalid role in token".into()))?;

    Ok(Some(AuthUser { user_id, role }))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_user(parts, state)?.ok_or(AppError::Unauthorized)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = bearer_user(parts, state)?;
        let access_code = parts
            .headers
            .get(ACCESS_CODE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(normalize_access_code)
            .filter(|code| !code.is_empty());
        Ok(Caller { user, access_code })
    }
}
