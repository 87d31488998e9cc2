use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Role;

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    code: &str,
    name: &str,
    description: Option<&str>,
    is_system: bool,
    tenant_id: Uuid,
) -> Result<Role, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        "INSERT INTO roles (id, code, name, description, is_system, tenant_id)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(code)
    .bind(name)
    .bind(description)
    .bind(is_system)
    .bind(tenant_id)
    .fetch_one(executor)
    .await
}

/// Role codes are tenant-local, so lookups always carry the tenant.
pub async fn find_by_code(
    pool: &PgPool,
    code: &str,
    tenant_id: Uuid,
) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE code = $1 AND tenant_id = $2")
        .bind(code)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_by_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE tenant_id = $1 ORDER BY code")
        .bind(tenant_id)
        .fetch_all(pool)
        .await
}
