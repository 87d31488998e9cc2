use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::Principal;
use crate::auth::jwt::{self, TokenError};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTenantRequest {
    #[serde(default)]
    pub tenant_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTenant {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub status: String,
    pub active_tenant: ActiveTenant,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let mut details = Vec::new();
    if req.username.is_empty() {
        details.push("username is required".to_string());
    }
    if req.fullname.is_empty() {
        details.push("fullname is required".to_string());
    }
    if req.password.is_empty() {
        details.push("password is required".to_string());
    } else if req.password.len() < 6 {
        details.push("password must be at least 6 characters".to_string());
    }
    if details.is_empty() && db::users::username_exists(&state.pool, &req.username).await? {
        details.push("username already exists".to_string());
    }
    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    // New users land in the default public tenant; its absence is a
    // deployment fault, not a caller error.
    let public = db::tenants::find_by_code(&state.pool, "PUBLIC")
        .await?
        .ok_or_else(|| AppError::Internal("Public tenant not found".to_string()))?;

    let mut tx = state.pool.begin().await?;
    let user = db::users::create(&mut *tx, &req.username, &pw_hash, &req.fullname, public.id)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Validation(vec!["username already exists".to_string()])
            }
            _ => AppError::Database(e),
        })?;
    db::grants::add_membership(&mut *tx, user.id, public.id).await?;
    tx.commit().await?;

    tracing::info!(username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(vec![
            "username and password are required".to_string(),
        ]));
    }

    // Unknown, inactive, and wrong-password all answer identically so the
    // response never reveals whether the username exists.
    let user = db::users::find_active_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid credentials".to_string()))?;

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let access_token = jwt::issue_access(&user.username, &state.config.access_token_secret)
        .map_err(|e| AppError::Internal(format!("JWT encode failed: {e}")))?;
    let refresh_token = jwt::issue_refresh(&user.username, &state.config.refresh_token_secret)
        .map_err(|e| AppError::Internal(format!("JWT encode failed: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
    }))
}

/// Mint a fresh access token from a still-valid refresh token. The refresh
/// token is neither rotated nor stored; there is no revocation list.
pub async fn refresh(
    State(state): State<SharedState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let refresh_token = match req.refresh_token.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AppError::BadRequest("Invalid request body".to_string())),
    };

    let claims =
        jwt::verify(refresh_token, &state.config.refresh_token_secret).map_err(|e| match e {
            TokenError::Expired => AppError::Unauthorized("Token expired.".to_string()),
            TokenError::Invalid => AppError::Unauthorized("Invalid token.".to_string()),
        })?;

    let access_token = jwt::issue_access(&claims.sub, &state.config.access_token_secret)
        .map_err(|e| AppError::Internal(format!("JWT encode failed: {e}")))?;

    Ok(Json(RefreshResponse { access_token }))
}

pub async fn user(
    State(state): State<SharedState>,
    principal: Principal,
) -> Result<Json<ProfileResponse>, AppError> {
    // The user may have vanished between token issuance and this lookup.
    let user = db::users::find_by_username(&state.pool, &principal.username)
        .await?
        .ok_or_else(|| AppError::NotFound("Username not found".to_string()))?;

    let tenant = db::tenants::find_by_id(&state.pool, user.active_tenant_id)
        .await?
        .ok_or_else(|| AppError::Internal("Active tenant not found".to_string()))?;

    let roles = db::rbac::role_codes_for(&state.pool, user.id, tenant.id).await?;
    let permissions = db::rbac::permission_codes_for(&state.pool, user.id, tenant.id).await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        fullname: user.fullname,
        email: user.email,
        avatar: user.avatar,
        status: user.status,
        active_tenant: ActiveTenant {
            id: tenant.id,
            code: tenant.code,
            name: tenant.name,
            description: tenant.description,
        },
        roles,
        permissions,
    }))
}

/// Change the tenant context the caller operates under. Membership is
/// required; grants visible to later requests change immediately without
/// re-issuing tokens.
pub async fn switch_tenant(
    State(state): State<SharedState>,
    principal: Principal,
    Json(req): Json<SwitchTenantRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.tenant_code.is_empty() {
        return Err(AppError::BadRequest("tenantCode is required".to_string()));
    }

    let user = db::users::find_by_username(&state.pool, &principal.username)
        .await?
        .ok_or_else(|| AppError::NotFound("Username not found".to_string()))?;

    let tenant = db::tenants::find_by_code(&state.pool, &req.tenant_code)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown tenant".to_string()))?;

    if !db::grants::is_member(&state.pool, user.id, tenant.id).await? {
        return Err(AppError::Forbidden(
            "Not a member of this tenant.".to_string(),
        ));
    }

    db::users::set_active_tenant(&state.pool, user.id, tenant.id).await?;
    tracing::info!(username = %user.username, tenant = %tenant.code, "active tenant switched");

    Ok(Json(MessageResponse {
        message: "Active tenant switched".to_string(),
    }))
}
