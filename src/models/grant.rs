use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership: which tenants a user may switch into.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTenant {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
}

/// Role grant. `tenant_id` is the tenant context of the grant, carried
/// redundantly with the role's own tenant; both must match the user's
/// active tenant for the grant to apply.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub tenant_id: Uuid,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermission {
    pub role_id: Uuid,
    pub permission_id: Uuid,
    pub tenant_id: Uuid,
}
