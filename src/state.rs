use axum::extract::FromRef;
use sqlx::SqlitePool;

/// Shared handles passed to every request. Cloning is cheap: the pool is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
