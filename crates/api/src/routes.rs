use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use ledger::OrderError;

use crate::signal;
use crate::state::{
    AccountView, AppState, BacktestView, ClosedPositionView, InstrumentView, OrderSide,
    PositionView,
};
use crate::ws;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(script))
        .route("/account", get(account))
        .route("/instruments", get(instruments).post(add_instrument))
        .route("/positions", get(positions))
        .route("/positions/:index/close", post(close_position))
        .route("/orders", post(place_order))
        .route("/backtests", post(run_backtest))
        .route("/api/trade-signal", post(signal::trade_signal))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn rejection(status: StatusCode, error: impl ToString) -> Rejection {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], ui::styles_css())
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        ui::app_js(),
    )
}

async fn account(State(state): State<AppState>) -> Json<AccountView> {
    Json(state.account())
}

async fn instruments(State(state): State<AppState>) -> Json<Vec<InstrumentView>> {
    Json(state.instruments())
}

#[derive(Debug, Deserialize)]
struct AddInstrumentRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct AddInstrumentResponse {
    added: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    instrument: Option<InstrumentView>,
}

async fn add_instrument(
    State(state): State<AppState>,
    Json(request): Json<AddInstrumentRequest>,
) -> Json<AddInstrumentResponse> {
    let instrument = state.add_instrument(&request.name);

    // Duplicate and empty submissions are deliberate no-ops, not errors.
    Json(AddInstrumentResponse {
        added: instrument.is_some(),
        instrument,
    })
}

async fn positions(State(state): State<AppState>) -> Json<Vec<PositionView>> {
    Json(state.positions())
}

#[derive(Debug, Deserialize)]
struct PlaceOrderRequest {
    symbol: String,
    side: OrderSide,
    amount: f64,
    leverage: u32,
    #[serde(default)]
    trailing_stop: bool,
}

async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PositionView>), Rejection> {
    let position = state
        .place_order(
            &request.symbol,
            request.side,
            request.amount,
            request.leverage,
            request.trailing_stop,
        )
        .map_err(|error| {
            let status = match error {
                OrderError::UnknownSymbol => StatusCode::NOT_FOUND,
                OrderError::InsufficientFunds => StatusCode::CONFLICT,
                OrderError::InvalidAmount | OrderError::InvalidLeverage => StatusCode::BAD_REQUEST,
            };
            rejection(status, error)
        })?;

    Ok((StatusCode::CREATED, Json(position)))
}

async fn close_position(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<ClosedPositionView>, Rejection> {
    state
        .close_position(index)
        .map(Json)
        .map_err(|error| rejection(StatusCode::NOT_FOUND, error))
}

#[derive(Debug, Deserialize)]
struct BacktestRequest {
    symbol: String,
    days: u32,
}

async fn run_backtest(
    State(state): State<AppState>,
    Json(request): Json<BacktestRequest>,
) -> Json<BacktestView> {
    Json(state.run_backtest(&request.symbol, request.days))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use ledger::{Ledger, LedgerConfig, ScriptedRandomSource};

    use crate::state::AppState;

    use super::router;

    fn panel_app() -> Router {
        // Every draw at 0.5 pins all watchlist prices at 250.00.
        let ledger = Ledger::with_default_watchlist(
            LedgerConfig::default(),
            Box::new(ScriptedRandomSource::new(vec![0.5])),
        );

        router(AppState::with_ledger(ledger))
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(uri: &str, payload: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn get_account_reports_the_opening_balance() {
        let app = panel_app();

        let response = app
            .oneshot(Request::get("/account").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["balance"], json!(50_000.0));
        assert_eq!(body["remaining_capital"], json!(50_000.0));
    }

    #[tokio::test]
    async fn get_instruments_lists_the_default_watchlist() {
        let app = panel_app();

        let response = app
            .oneshot(Request::get("/instruments").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = response_json(response).await;
        let symbols: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|instrument| instrument["symbol"].as_str().unwrap())
            .collect();
        assert_eq!(symbols, ["AAPL", "TSLA", "XAUUSD", "BTCUSD"]);
    }

    #[tokio::test]
    async fn post_instruments_adds_then_reports_the_duplicate_no_op() {
        let app = panel_app();

        let added = app
            .clone()
            .oneshot(json_request("/instruments", json!({"name": "msft"})))
            .await
            .unwrap();
        assert_eq!(added.status(), StatusCode::OK);
        let body = response_json(added).await;
        assert_eq!(body["added"], json!(true));
        assert_eq!(body["instrument"]["symbol"], json!("MSFT"));

        let state_app = panel_app();
        let first = state_app
            .clone()
            .oneshot(json_request("/instruments", json!({"name": "AAPL"})))
            .await
            .unwrap();
        let body = response_json(first).await;
        assert_eq!(body["added"], json!(false));
        assert!(body.get("instrument").is_none());
    }

    #[tokio::test]
    async fn post_orders_opens_a_position() {
        let app = panel_app();

        let response = app
            .oneshot(json_request(
                "/orders",
                json!({
                    "symbol": "AAPL",
                    "side": "long",
                    "amount": 1_000.0,
                    "leverage": 5,
                    "trailing_stop": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["symbol"], json!("AAPL"));
        assert_eq!(body["open_price"], json!(250.0));
        assert_eq!(body["floating_pnl"], json!(0.0));
        assert_eq!(body["trailing_stop"], json!(true));
    }

    #[tokio::test]
    async fn post_orders_rejects_insufficient_funds_with_conflict() {
        let app = panel_app();

        let response = app
            .oneshot(json_request(
                "/orders",
                json!({
                    "symbol": "AAPL",
                    "side": "long",
                    "amount": 60_000.0,
                    "leverage": 1
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = response_json(response).await;
        assert_eq!(
            body["error"],
            json!("order amount exceeds remaining capital")
        );
    }

    #[tokio::test]
    async fn post_orders_maps_unknown_symbols_to_not_found() {
        let app = panel_app();

        let response = app
            .oneshot(json_request(
                "/orders",
                json!({
                    "symbol": "NOPE",
                    "side": "short",
                    "amount": 100.0,
                    "leverage": 1
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_orders_maps_invalid_amounts_to_bad_request() {
        let app = panel_app();

        let response = app
            .oneshot(json_request(
                "/orders",
                json!({
                    "symbol": "AAPL",
                    "side": "long",
                    "amount": 0.0,
                    "leverage": 1
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn close_route_round_trips_a_position() {
        let app = panel_app();

        app.clone()
            .oneshot(json_request(
                "/orders",
                json!({
                    "symbol": "AAPL",
                    "side": "long",
                    "amount": 1_000.0,
                    "leverage": 1
                }),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request("/positions/0/close", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["pnl"], json!(0.0));
        assert_eq!(body["balance"], json!(50_000.0));
    }

    #[tokio::test]
    async fn close_route_rejects_stale_indexes_with_not_found() {
        let app = panel_app();

        let response = app
            .oneshot(json_request("/positions/3/close", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["error"], json!("no open position at that index"));
    }

    #[tokio::test]
    async fn post_backtests_returns_a_bounded_report() {
        let app = panel_app();

        let response = app
            .oneshot(json_request(
                "/backtests",
                json!({"symbol": "DOGE", "days": 30}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["symbol"], json!("DOGE"));
        assert_eq!(body["days"], json!(30));
        let win_rate = body["win_rate_pct"].as_f64().unwrap();
        assert!((50.0..=100.0).contains(&win_rate));
        assert!(!body["disclaimer"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn index_serves_the_panel_shell() {
        let app = panel_app();

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<!doctype html>"));
        assert!(html.contains("Open Positions"));
    }
}
