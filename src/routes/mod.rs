use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{catalog, command, health, read, write};
use crate::middleware::api_key_auth;
use crate::types::AppState;

/// Static route table. Health-check routes are mounted outside the gated
/// sub-router and require no credential; everything else passes through the
/// API-key middleware first.
pub fn create_routes(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check));

    let protected = Router::new()
        .route("/databases", get(catalog::list_databases))
        .route("/databases/:db/collections", get(catalog::list_collections))
        .route("/query", post(read::query))
        .route("/aggregate", post(read::aggregate))
        .route("/sample", post(read::sample))
        .route("/insert", post(write::insert))
        .route("/update", post(write::update))
        .route("/delete", post(write::delete))
        .route("/command", post(command::run_command))
        .route("/collection/:db/:collection/count", get(catalog::count_documents))
        .route("/collection/:db/:collection/indexes", get(catalog::list_indexes))
        .route_layer(middleware::from_fn_with_state(state.clone(), api_key_auth));

    public.merge(protected).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mongodb::MongoClient;
    use crate::types::error::ErrorBody;
    use crate::types::responses::ServiceInfo;
    use crate::types::ApiKey;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    const TEST_KEY: &str = "routing-test-key";

    async fn app() -> Router {
        let state = AppState {
            mongo: Arc::new(MongoClient::connect("mongodb://localhost:27017").await.unwrap()),
            api_key: Arc::new(ApiKey::new(TEST_KEY)),
        };
        create_routes(state)
    }

    fn get_request(uri: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(key) = key {
            builder = builder.header("X-API-Key", key);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, key: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("X-API-Key", key)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_exempt_from_auth() {
        let response = app().await.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_lists_endpoints_without_auth() {
        let response = app().await.oneshot(get_request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let info: ServiceInfo = body_json(response).await;
        assert!(info.auth_required);
        assert!(info.endpoints.iter().any(|e| e.contains("/query")));
    }

    #[tokio::test]
    async fn test_protected_route_without_key_is_unauthorized() {
        let response = app().await.oneshot(get_request("/databases", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: ErrorBody = body_json(response).await;
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .await
            .oneshot(get_request("/no-such-route", Some(TEST_KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_on_known_path_is_method_not_allowed() {
        let response = app()
            .await
            .oneshot(get_request("/query", Some(TEST_KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_required_fields_yield_bad_request() {
        // Validation fails before any driver call, so no server is needed.
        let response = app()
            .await
            .oneshot(post_request("/query", TEST_KEY, r#"{"database": "d"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = body_json(response).await;
        assert!(body.error.contains("database and collection are required"));
    }

    #[tokio::test]
    async fn test_malformed_json_yields_bad_request() {
        let response = app()
            .await
            .oneshot(post_request("/insert", TEST_KEY, "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = body_json(response).await;
        assert!(body.error.contains("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_update_without_spec_yields_bad_request() {
        let response = app()
            .await
            .oneshot(post_request(
                "/update",
                TEST_KEY,
                r#"{"database": "d", "collection": "c", "filter": {}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
