use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};

use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/trial-balance", get(trial_balance))
        .route("/summary", get(summary_by_kind))
}

pub async fn trial_balance(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let report = services.store.trial_balance();
    Json(serde_json::json!({
        "is_balanced": report.is_balanced(),
        "difference": report.difference(),
        "total_debit": report.total_debit,
        "total_credit": report.total_credit,
        "rows": report.rows,
    }))
}

pub async fn summary_by_kind(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.store.summary_by_kind())
}
