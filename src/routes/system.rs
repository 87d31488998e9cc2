use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::authorize::{self, Operator};
use crate::auth::extractor::Principal;
use crate::db;
use crate::error::AppError;
use crate::models::{Permission, Role, Tenant};
use crate::routes::auth::MessageResponse;
use crate::state::SharedState;

/// Every system route carries the same requirement: the SYSADMIN role or
/// the system.admin permission, in the caller's active tenant.
async fn require_admin(state: &SharedState, principal: &Principal) -> Result<(), AppError> {
    authorize::require(
        &state.pool,
        &principal.username,
        &authorize::codes(["SYSADMIN"]),
        &authorize::codes(["system.admin"]),
        Operator::Or,
    )
    .await
}

fn map_duplicate(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::BadRequest(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[derive(Deserialize)]
pub struct CreateTenantRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    pub tenant_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub tenant_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRoleRequest {
    pub username: String,
    pub role_code: String,
    pub tenant_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub username: String,
    pub tenant_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionRequest {
    pub role_code: String,
    pub permission_code: String,
    pub tenant_code: String,
}

pub async fn list_permissions(
    State(state): State<SharedState>,
    principal: Principal,
) -> Result<Json<Vec<Permission>>, AppError> {
    require_admin(&state, &principal).await?;
    let permissions = db::permissions::list(&state.pool).await?;
    Ok(Json(permissions))
}

pub async fn create_tenant(
    State(state): State<SharedState>,
    principal: Principal,
    Json(req): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<Tenant>), AppError> {
    require_admin(&state, &principal).await?;

    let tenant = db::tenants::create(
        &state.pool,
        &req.code,
        &req.name,
        req.description.as_deref(),
    )
    .await
    .map_err(|e| map_duplicate(e, "Tenant code already exists"))?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn create_role(
    State(state): State<SharedState>,
    principal: Principal,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<Role>), AppError> {
    require_admin(&state, &principal).await?;

    let tenant = db::tenants::find_by_code(&state.pool, &req.tenant_code)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown tenant".to_string()))?;

    let role = db::roles::create(
        &state.pool,
        &req.code,
        &req.name,
        req.description.as_deref(),
        req.is_system,
        tenant.id,
    )
    .await
    .map_err(|e| map_duplicate(e, "Role code already exists in this tenant"))?;

    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn create_permission(
    State(state): State<SharedState>,
    principal: Principal,
    Json(req): Json<CreatePermissionRequest>,
) -> Result<(StatusCode, Json<Permission>), AppError> {
    require_admin(&state, &principal).await?;

    let tenant = db::tenants::find_by_code(&state.pool, &req.tenant_code)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown tenant".to_string()))?;

    let permission = db::permissions::create(
        &state.pool,
        &req.code,
        &req.name,
        req.description.as_deref(),
        tenant.id,
    )
    .await
    .map_err(|e| map_duplicate(e, "Permission code already exists in this tenant"))?;

    Ok((StatusCode::CREATED, Json(permission)))
}

/// Make a user a member of a tenant, allowing them to switch into it.
pub async fn add_member(
    State(state): State<SharedState>,
    principal: Principal,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    require_admin(&state, &principal).await?;

    let user = db::users::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown user".to_string()))?;
    let tenant = db::tenants::find_by_code(&state.pool, &req.tenant_code)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown tenant".to_string()))?;

    db::grants::add_membership(&state.pool, user.id, tenant.id)
        .await
        .map_err(|e| map_duplicate(e, "Already a member"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Member added".to_string(),
        }),
    ))
}

/// Grant a role to a user. The grant's tenant context is the role's own
/// tenant, so the redundant tags can never disagree at write time.
pub async fn grant_role(
    State(state): State<SharedState>,
    principal: Principal,
    Json(req): Json<GrantRoleRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    require_admin(&state, &principal).await?;

    let user = db::users::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown user".to_string()))?;
    let tenant = db::tenants::find_by_code(&state.pool, &req.tenant_code)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown tenant".to_string()))?;
    let role = db::roles::find_by_code(&state.pool, &req.role_code, tenant.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown role in this tenant".to_string()))?;

    db::grants::grant_role(&state.pool, user.id, role.id, tenant.id)
        .await
        .map_err(|e| map_duplicate(e, "Role already granted"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Role granted".to_string(),
        }),
    ))
}

pub async fn grant_permission(
    State(state): State<SharedState>,
    principal: Principal,
    Json(req): Json<GrantPermissionRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    require_admin(&state, &principal).await?;

    let tenant = db::tenants::find_by_code(&state.pool, &req.tenant_code)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown tenant".to_string()))?;
    let role = db::roles::find_by_code(&state.pool, &req.role_code, tenant.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown role in this tenant".to_string()))?;
    let permission = db::permissions::find_by_code(&state.pool, &req.permission_code, tenant.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown permission in this tenant".to_string()))?;

    db::grants::grant_permission(&state.pool, role.id, permission.id, tenant.id)
        .await
        .map_err(|e| map_duplicate(e, "Permission already granted"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Permission granted".to_string(),
        }),
    ))
}
