pub mod routes;
pub mod signal;
pub mod state;

mod ws;

use axum::Router;

pub fn module_ready() -> bool {
    true
}

pub fn app() -> Router {
    routes::router(state::AppState::new())
}

pub fn app_with_state(state: state::AppState) -> Router {
    routes::router(state)
}
