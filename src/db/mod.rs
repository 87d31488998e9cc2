pub mod tenants;
pub mod users;
pub mod roles;
pub mod permissions;
pub mod grants;
pub mod rbac;
