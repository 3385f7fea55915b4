use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use ledgerdesk_accounting::JournalEntryId;
use ledgerdesk_infra::projections::{board, JournalRow};

use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::app::dto;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_journal_entry).get(list_journal_entries))
        .route("/board", get(journal_board))
        .route("/:id", get(get_journal_entry).patch(update_journal_entry))
        .route("/:id/post", post(post_journal_entry))
        .route("/:id/reject", post(reject_journal_entry))
}

pub async fn create_journal_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateJournalEntryRequest>,
) -> ApiResult {
    let new = body.into_domain().map_err(errors::domain_error_to_response)?;
    let entry = services
        .store
        .create_journal_entry(new)
        .map_err(errors::domain_error_to_response)?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

pub async fn list_journal_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> ApiResult {
    let table = query.table_query().map_err(errors::domain_error_to_response)?;
    let rows: Vec<JournalRow> = services
        .store
        .list_journal_entries()
        .iter()
        .map(JournalRow::from)
        .collect();
    let rows = table.apply(rows).map_err(errors::projection_error_to_response)?;

    Ok(Json(rows).into_response())
}

pub async fn journal_board(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let rows: Vec<JournalRow> = services
        .store
        .list_journal_entries()
        .iter()
        .map(JournalRow::from)
        .collect();
    Json(board(rows, |r| r.status, |r| r.total_debit))
}

pub async fn get_journal_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: JournalEntryId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let entry = services
        .store
        .get_journal_entry(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(entry).into_response())
}

pub async fn update_journal_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateJournalEntryRequest>,
) -> ApiResult {
    let id: JournalEntryId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let patch = body.into_domain().map_err(errors::domain_error_to_response)?;
    let entry = services
        .store
        .update_journal_entry(id, patch)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(entry).into_response())
}

pub async fn post_journal_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: JournalEntryId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let entry = services
        .store
        .post_journal_entry(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(entry).into_response())
}

pub async fn reject_journal_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: JournalEntryId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let entry = services
        .store
        .reject_journal_entry(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(entry).into_response())
}
