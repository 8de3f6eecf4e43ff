//! GET /api/v1/countdown - Time left until the delivery date.

use axum::Json;
use axum::extract::State;

use lovenote_core::countdown::Countdown;

use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

pub async fn get_countdown(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    let timer = RequestTimer::start();
    let target = state.config.delivery_date;
    let countdown = Countdown::until(target, chrono::Utc::now());

    Json(timer.success(serde_json::json!({
        "app_name": state.config.app_name,
        "delivery_date": target.to_rfc3339(),
        "countdown": countdown,
    })))
}
