use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use ledgerdesk_infra::projections::{board, InvoiceRow};
use ledgerdesk_invoicing::InvoiceId;

use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::app::dto;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_invoice).get(list_invoices))
        .route("/board", get(invoice_board))
        .route("/overdue", post(mark_overdue))
        .route("/:id", get(get_invoice).patch(update_invoice))
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateInvoiceRequest>,
) -> ApiResult {
    let new = body.into_domain().map_err(errors::domain_error_to_response)?;
    let invoice = services
        .store
        .create_invoice(new)
        .map_err(errors::domain_error_to_response)?;

    Ok((StatusCode::CREATED, Json(invoice)).into_response())
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> ApiResult {
    let table = query.table_query().map_err(errors::domain_error_to_response)?;
    let rows: Vec<InvoiceRow> = services
        .store
        .list_invoices()
        .iter()
        .map(InvoiceRow::from)
        .collect();
    let rows = table.apply(rows).map_err(errors::projection_error_to_response)?;

    Ok(Json(rows).into_response())
}

pub async fn invoice_board(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let rows: Vec<InvoiceRow> = services
        .store
        .list_invoices()
        .iter()
        .map(InvoiceRow::from)
        .collect();
    Json(board(rows, |r| r.status, |r| r.total))
}

/// Sweep pending invoices past due as of `as_of` (default today).
pub async fn mark_overdue(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::OverdueQuery>,
) -> ApiResult {
    let today = match query.as_of.as_deref() {
        Some(raw) => dto::parse_date(raw, "as_of").map_err(errors::domain_error_to_response)?,
        None => Utc::now().date_naive(),
    };
    let changed = services
        .store
        .mark_overdue_invoices(today)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(serde_json::json!({
        "as_of": today,
        "updated": changed.len(),
        "invoices": changed,
    }))
    .into_response())
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: InvoiceId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let invoice = services
        .store
        .get_invoice(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(invoice).into_response())
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateInvoiceRequest>,
) -> ApiResult {
    let id: InvoiceId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let patch = body.into_domain().map_err(errors::domain_error_to_response)?;
    let invoice = services
        .store
        .update_invoice(id, patch)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(invoice).into_response())
}
