use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use ledgerdesk_accounting::AccountId;
use ledgerdesk_infra::projections::{account_tree, AccountRow};

use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::app::dto;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_account).get(list_accounts))
        .route("/tree", get(get_account_tree))
        .route("/:id", get(get_account).patch(update_account))
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateAccountRequest>,
) -> ApiResult {
    let new = body.into_domain().map_err(errors::domain_error_to_response)?;
    let account = services
        .store
        .create_account(new)
        .map_err(errors::domain_error_to_response)?;

    Ok((StatusCode::CREATED, Json(account)).into_response())
}

/// Table view. `kind` narrows to one account kind; `status` is `active` / `inactive`.
pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> ApiResult {
    let table = query.table_query().map_err(errors::domain_error_to_response)?;
    let kind = query.account_kind().map_err(errors::domain_error_to_response)?;

    let rows: Vec<AccountRow> = services
        .store
        .list_accounts()
        .iter()
        .filter(|a| kind.is_none_or(|k| a.kind == k))
        .map(AccountRow::from)
        .collect();
    let rows = table.apply(rows).map_err(errors::projection_error_to_response)?;

    Ok(Json(rows).into_response())
}

pub async fn get_account_tree(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(account_tree(&services.store.list_accounts()))
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id: AccountId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let account = services
        .store
        .get_account(id)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(account).into_response())
}

pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAccountRequest>,
) -> ApiResult {
    let id: AccountId = dto::parse_id(&id).map_err(errors::domain_error_to_response)?;
    let patch = body.into_domain().map_err(errors::domain_error_to_response)?;
    let account = services
        .store
        .update_account(id, patch)
        .map_err(errors::domain_error_to_response)?;

    Ok(Json(account).into_response())
}
