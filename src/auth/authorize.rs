//! Request authorization: given a verified principal and a statically
//! declared requirement, answer allow or deny against the store.
//!
//! Denial is a normal return value here, never an error. Only store
//! failures propagate, and those surface as 500 at the boundary.

use std::collections::BTreeSet;

use sqlx::PgPool;

use crate::db;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Or,
    And,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Normalize a list of codes into the set representation the decision
/// procedure works on. Duplicates collapse; order is irrelevant.
pub fn codes<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

fn combine(operator: Operator, has_role: bool, has_permission: bool) -> bool {
    match operator {
        Operator::Or => has_role || has_permission,
        Operator::And => has_role && has_permission,
    }
}

/// Two-dimensional check: role membership and permission reachability,
/// combined per operator, both scoped to the principal's active tenant as
/// resolved at query time.
pub async fn authorize(
    pool: &PgPool,
    username: &str,
    roles: &BTreeSet<String>,
    permissions: &BTreeSet<String>,
    operator: Operator,
) -> Result<Decision, sqlx::Error> {
    let has_role = db::rbac::user_has_any_role(pool, username, roles).await?;
    let has_permission = db::rbac::user_has_any_permission(pool, username, permissions).await?;
    tracing::debug!(username, has_role, has_permission, ?operator, "authorization check");

    if combine(operator, has_role, has_permission) {
        Ok(Decision::Allow)
    } else {
        Ok(Decision::Deny)
    }
}

/// Roles-only guard: the permission dimension is ignored entirely.
pub async fn has_roles(
    pool: &PgPool,
    username: &str,
    roles: &BTreeSet<String>,
) -> Result<Decision, sqlx::Error> {
    match db::rbac::user_has_any_role(pool, username, roles).await? {
        true => Ok(Decision::Allow),
        false => Ok(Decision::Deny),
    }
}

/// Permissions-only guard.
pub async fn has_permissions(
    pool: &PgPool,
    username: &str,
    permissions: &BTreeSet<String>,
) -> Result<Decision, sqlx::Error> {
    match db::rbac::user_has_any_permission(pool, username, permissions).await? {
        true => Ok(Decision::Allow),
        false => Ok(Decision::Deny),
    }
}

/// Handler-boundary convenience: map `Deny` to 403 and store failures to
/// the database error path.
pub async fn require(
    pool: &PgPool,
    username: &str,
    roles: &BTreeSet<String>,
    permissions: &BTreeSet<String>,
    operator: Operator,
) -> Result<(), AppError> {
    match authorize(pool, username, roles, permissions, operator).await? {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(AppError::Forbidden("Forbidden.".to_string())),
    }
}
