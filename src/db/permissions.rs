use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Permission;

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    code: &str,
    name: &str,
    description: Option<&str>,
    tenant_id: Uuid,
) -> Result<Permission, sqlx::Error> {
    sqlx::query_as::<_, Permission>(
        "INSERT INTO permissions (id, code, name, description, tenant_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(code)
    .bind(name)
    .bind(description)
    .bind(tenant_id)
    .fetch_one(executor)
    .await
}

pub async fn find_by_code(
    pool: &PgPool,
    code: &str,
    tenant_id: Uuid,
) -> Result<Option<Permission>, sqlx::Error> {
    sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE code = $1 AND tenant_id = $2")
        .bind(code)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
    sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY code")
        .fetch_all(pool)
        .await
}
