use uuid::Uuid;

use crate::models::{RolePermission, UserRole, UserTenant};

/// Record that a user may operate under a tenant.
pub async fn add_membership<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    tenant_id: Uuid,
) -> Result<UserTenant, sqlx::Error> {
    sqlx::query_as::<_, UserTenant>(
        "INSERT INTO user_tenants (user_id, tenant_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(user_id)
    .bind(tenant_id)
    .fetch_one(executor)
    .await
}

pub async fn is_member<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    tenant_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM user_tenants WHERE user_id = $1 AND tenant_id = $2)",
    )
    .bind(user_id)
    .bind(tenant_id)
    .fetch_one(executor)
    .await?;
    Ok(row.0)
}

/// Grant a role to a user. `tenant_id` is the tenant context of the grant
/// and must match the role's own tenant for the grant to ever apply.
pub async fn grant_role<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    role_id: Uuid,
    tenant_id: Uuid,
) -> Result<UserRole, sqlx::Error> {
    sqlx::query_as::<_, UserRole>(
        "INSERT INTO user_roles (user_id, role_id, tenant_id)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(user_id)
    .bind(role_id)
    .bind(tenant_id)
    .fetch_one(executor)
    .await
}

pub async fn grant_permission<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    role_id: Uuid,
    permission_id: Uuid,
    tenant_id: Uuid,
) -> Result<RolePermission, sqlx::Error> {
    sqlx::query_as::<_, RolePermission>(
        "INSERT INTO role_permissions (role_id, permission_id, tenant_id)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(role_id)
    .bind(permission_id)
    .bind(tenant_id)
    .fetch_one(executor)
    .await
}
