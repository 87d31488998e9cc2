pub mod auth;
pub mod system;

use axum::Router;
use axum::routing::{get, post, put};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/user", get(auth::user))
        .route("/api/auth/tenant", put(auth::switch_tenant))
        // System administration
        .route(
            "/api/system/permission",
            get(system::list_permissions).post(system::create_permission),
        )
        .route("/api/system/tenant", post(system::create_tenant))
        .route("/api/system/tenant/member", post(system::add_member))
        .route("/api/system/role", post(system::create_role))
        .route("/api/system/role/grant", post(system::grant_role))
        .route(
            "/api/system/permission/grant",
            post(system::grant_permission),
        )
}
