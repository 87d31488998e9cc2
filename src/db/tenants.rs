use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Tenant;

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    code: &str,
    name: &str,
    description: Option<&str>,
) -> Result<Tenant, sqlx::Error> {
    sqlx::query_as::<_, Tenant>(
        "INSERT INTO tenants (id, code, name, description)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(code)
    .bind(name)
    .bind(description)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_code<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    code: &str,
) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE code = $1")
        .bind(code)
        .fetch_optional(executor)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Tenant>, sqlx::Error> {
    sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY code")
        .fetch_all(pool)
        .await
}
