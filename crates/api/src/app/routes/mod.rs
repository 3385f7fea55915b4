use axum::Router;

pub mod accounts;
pub mod expenses;
pub mod invoices;
pub mod journal;
pub mod reconciliations;
pub mod reports;
pub mod system;

/// Router for every `/api/v1` endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/journal-entries", journal::router())
        .nest("/invoices", invoices::router())
        .nest("/expenses", expenses::router())
        .nest("/reconciliations", reconciliations::router())
        .nest("/reports", reports::router())
}
