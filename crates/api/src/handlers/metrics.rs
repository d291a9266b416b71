use actix_web::{web, HttpResponse};

use crate::state::AppState;

/// Prometheus exposition of everything the handlers have counted so far.
pub async fn metrics_handler(state: web::Data<AppState>) -> HttpResponse {
    let body = state.telemetry().render_metrics();
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body)
}
