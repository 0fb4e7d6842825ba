// File: pagesmith-core/tests/facebook_gateway_tests.rs
//
// Drives the Graph gateway against a local stub upstream.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use pagesmith_core::platforms::facebook::paging::fetch_all_pages;
use pagesmith_core::platforms::facebook::requests::{feed, pages};
use pagesmith_core::platforms::facebook::FacebookClient;
use pagesmith_core::Error;

async fn bind_stub() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

fn serve(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

#[tokio::test]
async fn aggregates_all_pages_in_order() {
    let (listener, base) = bind_stub().await;
    let next = format!("{}/page2", base);
    let app = Router::new()
        .route(
            "/feed",
            get(move || async move {
                Json(json!({
                    "data": [{"id": "a"}, {"id": "b"}],
                    "paging": { "next": next },
                }))
            }),
        )
        .route(
            "/page2",
            get(|| async { Json(json!({ "data": [{"id": "c"}, {"id": "d"}] })) }),
        );
    serve(listener, app);

    let http = reqwest::Client::new();
    let items = fetch_all_pages(
        &http,
        &format!("{}/feed", base),
        &[("access_token", "token".to_string())],
    )
    .await
    .unwrap();

    let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["a", "b", "c", "d"]);
}

#[tokio::test]
async fn failing_page_discards_partial_results() {
    let (listener, base) = bind_stub().await;
    let next = format!("{}/page2", base);
    let app = Router::new()
        .route(
            "/feed",
            get(move || async move {
                Json(json!({
                    "data": [{"id": "a"}],
                    "paging": { "next": next },
                }))
            }),
        )
        .route(
            "/page2",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
    serve(listener, app);

    let http = reqwest::Client::new();
    let result = fetch_all_pages(
        &http,
        &format!("{}/feed", base),
        &[("access_token", "token".to_string())],
    )
    .await;

    match result {
        Err(Error::Upstream { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("exploded"));
        }
        other => panic!("expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn endless_next_chain_is_bounded() {
    let (listener, base) = bind_stub().await;
    let myself = format!("{}/feed", base);
    let app = Router::new().route(
        "/feed",
        get(move || async move {
            Json(json!({
                "data": [{"id": "x"}],
                "paging": { "next": myself },
            }))
        }),
    );
    serve(listener, app);

    let http = reqwest::Client::new();
    let result = fetch_all_pages(&http, &format!("{}/feed", base), &[]).await;
    assert!(matches!(result, Err(Error::Platform(_))));
}

#[tokio::test]
async fn publish_post_returns_upstream_id() {
    let (listener, base) = bind_stub().await;
    let app = Router::new().route(
        "/page1/feed",
        post(|| async { Json(json!({ "id": "page1_99" })) }),
    );
    serve(listener, app);

    let client = FacebookClient::with_base_url(base);
    let published = feed::publish_post(&client, "page1", "token", "hello world")
        .await
        .unwrap();
    assert_eq!(published.id, "page1_99");
}

#[tokio::test]
async fn upstream_error_body_is_relayed() {
    let (listener, base) = bind_stub().await;
    let app = Router::new().route(
        "/page1",
        get(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": "Invalid OAuth access token" } })),
            )
        }),
    );
    serve(listener, app);

    let client = FacebookClient::with_base_url(base);
    match pages::page_info(&client, "page1", "bad-token").await {
        Err(Error::Upstream { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("Invalid OAuth access token"));
        }
        other => panic!("expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn error_key_in_success_body_is_an_error() {
    let (listener, base) = bind_stub().await;
    let app = Router::new().route(
        "/search",
        get(|| async { Json(json!({ "error": { "message": "rate limited" } })) }),
    );
    serve(listener, app);

    let client = FacebookClient::with_base_url(base);
    let result = pages::search_pages(&client, &["coffee".to_string()], "token", 5).await;
    assert!(matches!(result, Err(Error::Upstream { .. })));
}
