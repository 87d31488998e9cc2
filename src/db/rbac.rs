//! Read-only authorization queries.
//!
//! Tenant tags are re-checked at every join hop rather than trusted
//! transitively: a grant only counts when the grant row, the role (and for
//! permissions, the role-permission row and the permission itself) all carry
//! the user's current `active_tenant_id`. A role whose tenant tag drifted
//! from its grants therefore stops matching instead of widening access.

use std::collections::BTreeSet;

use sqlx::PgPool;
use uuid::Uuid;

/// True iff the user holds any of the given role codes in their active
/// tenant. An empty set is a vacuous requirement and short-circuits to true.
pub async fn user_has_any_role(
    pool: &PgPool,
    username: &str,
    role_codes: &BTreeSet<String>,
) -> Result<bool, sqlx::Error> {
    if role_codes.is_empty() {
        return Ok(true);
    }
    let codes: Vec<String> = role_codes.iter().cloned().collect();
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1
             FROM user_roles ur
             JOIN users u ON u.id = ur.user_id
             JOIN roles r ON r.id = ur.role_id
             WHERE u.username = $1
               AND r.code = ANY($2)
               AND ur.tenant_id = u.active_tenant_id
               AND r.tenant_id = u.active_tenant_id
         )",
    )
    .bind(username)
    .bind(&codes)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// True iff any role held by the user in their active tenant carries one of
/// the given permission codes. All four tenant-tagged rows on the chain
/// user -> role grant -> role -> permission grant -> permission must match
/// the active tenant. Empty set is vacuously true.
pub async fn user_has_any_permission(
    pool: &PgPool,
    username: &str,
    permission_codes: &BTreeSet<String>,
) -> Result<bool, sqlx::Error> {
    if permission_codes.is_empty() {
        return Ok(true);
    }
    let codes: Vec<String> = permission_codes.iter().cloned().collect();
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1
             FROM user_roles ur
             JOIN users u ON u.id = ur.user_id
             JOIN roles r ON r.id = ur.role_id
             JOIN role_permissions rp ON rp.role_id = r.id
             JOIN permissions p ON p.id = rp.permission_id
             WHERE u.username = $1
               AND p.code = ANY($2)
               AND ur.tenant_id = u.active_tenant_id
               AND r.tenant_id = u.active_tenant_id
               AND rp.tenant_id = u.active_tenant_id
               AND p.tenant_id = u.active_tenant_id
         )",
    )
    .bind(username)
    .bind(&codes)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Role codes held by the user in the given tenant.
pub async fn role_codes_for(
    pool: &PgPool,
    user_id: Uuid,
    tenant_id: Uuid,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT r.code
         FROM user_roles ur
         JOIN roles r ON r.id = ur.role_id
         WHERE ur.user_id = $1
           AND ur.tenant_id = $2
           AND r.tenant_id = $2
         ORDER BY r.code",
    )
    .bind(user_id)
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}

/// Permission codes reachable through the user's roles in the given tenant.
pub async fn permission_codes_for(
    pool: &PgPool,
    user_id: Uuid,
    tenant_id: Uuid,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT DISTINCT p.code
         FROM user_roles ur
         JOIN roles r ON r.id = ur.role_id
         JOIN role_permissions rp ON rp.role_id = r.id
         JOIN permissions p ON p.id = rp.permission_id
         WHERE ur.user_id = $1
           AND ur.tenant_id = $2
           AND r.tenant_id = $2
           AND rp.tenant_id = $2
           AND p.tenant_id = $2
         ORDER BY p.code",
    )
    .bind(user_id)
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}
