use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use ledgerdesk_reconciliation::{ReconciliationId, ReconciliationItemId};

use crate::app::dto::{self, ReconciliationView};
use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(open_reconciliation).get(list_reconciliations))
        .route("/:id", get(get_reconciliation))
        .route("/:id/items/:item_id/toggle", post(toggle_item))
        .route("/:id/complete", post(complete_reconciliation))
}

pub async fn open_reconciliation(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateReconciliationRequest>,
) -> ApiResult {
    let new = body.into_domain().map_err(errors::domain_error_to_response)?;
    let reconciliation = services
        .store
        .open_reconciliation(new)
        .map_err(errors::domain_error_to_response)?;

    Ok((StatusCode::CREATED, Json(ReconciliationView::from(reconciliation))).into_response())
}

pub async fn list_reconciliations(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let views: Vec<ReconciliationView> = services
        .store
        .list_reconciliations()
        .into_iter()
        .map(ReconciliationView::from)
        .collect();
    Json(views)
}

pub async fn get_reconciliation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: ReconciliationId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let reconciliation = services
        .store
        .get_reconciliation(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(ReconciliationView::from(reconciliation)).into_response())
}

pub async fn toggle_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult {
    let id: ReconciliationId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let item_id: ReconciliationItemId =
        dto::parse_id(&item_id).map_err(errors::domain_error_to_response)?;
    let reconciliation = services
        .store
        .toggle_reconciliation_item(id, item_id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(ReconciliationView::from(reconciliation)).into_response())
}

pub async fn complete_reconciliation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: ReconciliationId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let reconciliation = services
        .store
        .complete_reconciliation(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(ReconciliationView::from(reconciliation)).into_response())
}
