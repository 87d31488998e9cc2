use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;

pub type SharedState = Arc<AppState>;

/// No mutable in-process state: every request works off the pool.
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}
