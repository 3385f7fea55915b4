use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use ledgerdesk_expenses::ExpenseClaimId;
use ledgerdesk_infra::projections::{board, expense_tree, ExpenseRow};

use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::app::dto;

pub fn router() -> Router {
    Router::new()
        .route("/", post(submit_expense_claim).get(list_expense_claims))
        .route("/board", get(expense_board))
        .route("/tree", get(get_expense_tree))
        .route("/:id", get(get_expense_claim).patch(update_expense_claim))
        .route("/:id/approve", post(approve_expense_claim))
        .route("/:id/reject", post(reject_expense_claim))
}

pub async fn submit_expense_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateExpenseClaimRequest>,
) -> ApiResult {
    let new = body.into_domain().map_err(errors::domain_error_to_response)?;
    let claim = services
        .store
        .submit_expense_claim(new)
        .map_err(errors::domain_error_to_response)?;

    Ok((StatusCode::CREATED, Json(claim)).into_response())
}

pub async fn list_expense_claims(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> ApiResult {
    let table = query.table_query().map_err(errors::domain_error_to_response)?;
    let rows: Vec<ExpenseRow> = services
        .store
        .list_expense_claims()
        .iter()
        .map(ExpenseRow::from)
        .collect();
    let rows = table.apply(rows).map_err(errors::projection_error_to_response)?;

    Ok(Json(rows).into_response())
}

pub async fn expense_board(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let rows: Vec<ExpenseRow> = services
        .store
        .list_expense_claims()
        .iter()
        .map(ExpenseRow::from)
        .collect();
    Json(board(rows, |r| r.status, |r| r.total))
}

/// Department → employee.
pub async fn get_expense_tree(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(expense_tree(&services.store.list_expense_claims()))
}

pub async fn get_expense_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: ExpenseClaimId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let claim = services
        .store
        .get_expense_claim(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(claim).into_response())
}

pub async fn update_expense_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateExpenseClaimRequest>,
) -> ApiResult {
    let id: ExpenseClaimId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let patch = body.into_domain().map_err(errors::domain_error_to_response)?;
    let claim = services
        .store
        .update_expense_claim(id, patch)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(claim).into_response())
}

// The review body is optional: a bare POST approves/rejects without a note.

pub async fn approve_expense_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Option<Json<dto::ReviewRequest>>,
) -> ApiResult {
    let id: ExpenseClaimId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let note = body.and_then(|Json(b)| b.note);
    let claim = services
        .store
        .approve_expense_claim(id, note)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(claim).into_response())
}

pub async fn reject_expense_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Option<Json<dto::ReviewRequest>>,
) -> ApiResult {
    let id: ExpenseClaimId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let note = body.and_then(|Json(b)| b.note);
    let claim = services
        .store
        .reject_expense_claim(id, note)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(claim).into_response())
}
