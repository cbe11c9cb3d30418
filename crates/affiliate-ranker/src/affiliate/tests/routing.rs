use super::common::*;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use crate::affiliate::catalog::router::list_products_handler;
use crate::affiliate::catalog::{catalog_router, ProductQuery};

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn products_route_returns_listing() {
    let router = catalog_router(service(stocked_catalog()));

    let response = router
        .oneshot(
            Request::get("/api/products")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["strategy"], "highest_effective_value");
    assert_eq!(body["source"], "catalog");
    assert_eq!(body["products"][0]["affiliateLinkId"], "impact-1");
    assert_eq!(body["products"][0]["affiliateNetwork"], "impact");
    assert!(body["products"][1]["affiliateLink"].is_null());
    assert!(body["products"][0].get("allLinks").is_none());
}

#[tokio::test]
async fn products_route_parses_query_filters() {
    let router = catalog_router(service(stocked_catalog()));

    let response = router
        .oneshot(
            Request::get("/api/products?category=toys&ageRange=months&includeAllLinks=true")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 1);
    let all_links = body["products"][0]["allLinks"]
        .as_array()
        .expect("all links present");
    assert_eq!(all_links.len(), 2);
    assert_eq!(all_links[0]["id"], "impact-1");
    assert!(all_links[0]["effectiveValue"].as_f64().expect("numeric value") > 0.0);
}

#[tokio::test]
async fn products_route_treats_other_include_all_links_values_as_off() {
    for uri in [
        "/api/products?includeAllLinks=yes",
        "/api/products?includeAllLinks=",
    ] {
        let router = catalog_router(service(stocked_catalog()));
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["total"], 2);
        assert!(body["products"][0].get("allLinks").is_none(), "{uri}");
    }
}

#[tokio::test]
async fn handler_hides_repository_details_on_product_outage() {
    let mut catalog = stocked_catalog();
    catalog.fail_products = true;

    let response =
        list_products_handler(State(service(catalog)), Query(ProductQuery::default())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to fetch products");
}

#[tokio::test]
async fn handler_reports_invalid_settings() {
    let mut catalog = stocked_catalog();
    catalog.settings = Some(crate::affiliate::settings::AffiliateSettingsRecord {
        strategy: Some("newest_first".to_string()),
        ..Default::default()
    });

    let response =
        list_products_handler(State(service(catalog)), Query(ProductQuery::default())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("newest_first"));
}
