use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::ProductQuery;
use super::repository::CatalogRepository;
use super::service::{CatalogQueryService, CatalogServiceError};

/// Router builder exposing the storefront product listing.
pub fn catalog_router<R>(service: Arc<CatalogQueryService<R>>) -> Router
where
    R: CatalogRepository + 'static,
{
    Router::new()
        .route("/api/products", get(list_products_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_products_handler<R>(
    State(service): State<Arc<CatalogQueryService<R>>>,
    Query(query): Query<ProductQuery>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    match service.list_products(&query) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(CatalogServiceError::Repository(err)) => {
            error!(error = %err, "failed to fetch products");
            let payload = json!({
                "error": "Failed to fetch products",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "product listing rejected");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
