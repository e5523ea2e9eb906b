use axum::{routing::get, Router};

use api::state::AppState;

pub fn build_app(state: AppState) -> Router {
    debug_assert!(ledger::workspace_bootstrap());
    debug_assert!(runtime::module_ready());
    debug_assert!(api::module_ready());
    debug_assert!(ui::module_ready());

    api::app_with_state(state).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}
