pub mod tenant;
pub mod user;
pub mod role;
pub mod permission;
pub mod grant;

pub use tenant::Tenant;
pub use user::{User, STATUS_ACTIVE, STATUS_INACTIVE};
pub use role::Role;
pub use permission::Permission;
pub use grant::{RolePermission, UserRole, UserTenant};
