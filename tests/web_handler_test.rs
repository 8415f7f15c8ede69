#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Dashboard renders momentum and weak lists with the allocation form
//! - Allocation form submission and input validation
//! - Comparison page with repeated `symbols` parameters
//! - Cache reuse across requests and the refresh endpoint
//! - Error pages and status codes

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use common::*;
use http_body_util::BodyExt;
use momentum::adapters::web::{AppState, build_router};
use momentum::domain::fetch::FetchPolicy;
use momentum::domain::settings::Settings;
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app(port: Arc<MockPricePort>, settings: Settings) -> Router {
    build_router(AppState::new(port, settings).with_as_of(as_of()))
}

fn fixture_app() -> (Router, Arc<MockPricePort>) {
    let port = Arc::new(fixture_port());
    (create_test_app(port.clone(), fixture_settings()), port)
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn renders_momentum_and_weak_lists() {
        let (app, _) = fixture_app();
        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("Momentum Stocks"));
        assert!(body.contains("Weak Stocks"));
        assert!(body.contains(r#"<td class="symbol">A</td>"#));
        assert!(body.contains(r#"<td class="symbol">Z2</td>"#));
        assert!(body.contains("45 day window"));
    }

    #[tokio::test]
    async fn shows_allocation_form_with_default_funds() {
        let (app, _) = fixture_app();
        let body = body_string(get(&app, "/").await).await;
        assert!(body.contains(r#"<form method="post" action="/allocate">"#));
        assert!(body.contains(r#"value="10000""#));
        assert!(body.contains(r#"action="/refresh""#));
    }

    #[tokio::test]
    async fn skipped_symbols_are_listed() {
        let port = Arc::new(fixture_port().with_error("X3", "timeout"));
        let settings = Settings {
            on_error: FetchPolicy::Skip,
            ..fixture_settings()
        };
        let app = create_test_app(port, settings);

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Skipped symbols"));
        assert!(body.contains("X3: data source error: timeout"));
    }

    #[tokio::test]
    async fn fetch_failure_under_abort_is_bad_gateway() {
        let port = Arc::new(fixture_port().with_error("X3", "timeout"));
        let app = create_test_app(port, fixture_settings());

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_string(response).await;
        assert!(body.contains("X3"));
    }
}

mod allocation {
    use super::*;

    #[tokio::test]
    async fn splits_submitted_funds() {
        let (app, _) = fixture_app();
        let response = post_form(&app, "/allocate", "total_funds=10000").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("Total funds 10000.00"));
        assert!(body.contains("5000.00"));
        assert!(body.contains("12.5000"));
    }

    #[tokio::test]
    async fn non_numeric_funds_is_bad_request() {
        let (app, _) = fixture_app();
        let response = post_form(&app, "/allocate", "total_funds=lots").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_funds_is_bad_request() {
        let (app, _) = fixture_app();
        let response = post_form(&app, "/allocate", "total_funds=-5").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

mod compare {
    use super::*;

    #[tokio::test]
    async fn empty_selection_shows_form_only() {
        let (app, port) = fixture_app();
        let response = get(&app, "/compare").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains(r#"<select name="symbols" multiple"#));
        assert!(body.contains(r#"value="2021-01-01""#));
        assert!(body.contains(r#"value="2024-06-28""#));
        assert!(!body.contains("<svg"));
        assert_eq!(port.calls(), 0);
    }

    #[tokio::test]
    async fn selected_symbols_are_charted() {
        let (app, port) = fixture_app();
        let response = get(
            &app,
            "/compare?symbols=A&symbols=Y1&start=2024-01-01&end=2024-06-28",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains(r#"<option value="A" selected>"#));
        assert!(body.contains(r#"<option value="Y1" selected>"#));
        assert!(body.contains(r#"<option value="B">"#));
        assert!(body.contains("<svg"));
        assert!(body.contains("300.00%"));
        assert_eq!(port.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_symbol_is_bad_request() {
        let (app, _) = fixture_app();
        let response = get(&app, "/compare?symbols=NOPE").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reversed_dates_are_bad_request() {
        let (app, _) = fixture_app();
        let response =
            get(&app, "/compare?symbols=A&start=2024-06-01&end=2024-01-01").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_date_is_bad_request() {
        let (app, _) = fixture_app();
        let response = get(&app, "/compare?symbols=A&start=June").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

mod cache {
    use super::*;

    #[tokio::test]
    async fn repeated_dashboard_reuses_prices() {
        let (app, port) = fixture_app();
        get(&app, "/").await;
        post_form(&app, "/allocate", "total_funds=5000").await;
        assert_eq!(port.calls(), 20);
    }

    #[tokio::test]
    async fn skipped_symbols_outlive_a_compare_fetch() {
        let port = Arc::new(fixture_port().with_error("X3", "timeout"));
        let settings = Settings {
            on_error: FetchPolicy::Skip,
            ..fixture_settings()
        };
        let app = create_test_app(port.clone(), settings);

        let first = body_string(get(&app, "/").await).await;
        assert!(first.contains("X3: data source error: timeout"));

        let response = get(&app, "/compare?symbols=A&start=2024-01-01&end=2024-06-28").await;
        assert_eq!(response.status(), StatusCode::OK);

        let second = body_string(get(&app, "/").await).await;
        assert!(second.contains("Skipped symbols"));
        assert!(second.contains("X3: data source error: timeout"));
        // 20 for the universe, 1 for the comparison, none for the cached dashboard.
        assert_eq!(port.calls(), 21);
    }

    #[tokio::test]
    async fn refresh_clears_cache_and_redirects() {
        let (app, port) = fixture_app();
        get(&app, "/").await;

        let response = post_form(&app, "/refresh", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        get(&app, "/").await;
        assert_eq!(port.calls(), 40);
    }
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = fixture_app();
    let response = get(&app, "/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("404"));
}
