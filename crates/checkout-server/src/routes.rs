//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{
    all_customers, all_merchants, client_token, create_checkout, create_customer, create_merchant, health_check,
    index, new_checkout, post_checkout, post_checkout_transact, show_checkout,
};
use crate::state::AppState;

/// Directory served under `/static`
const PUBLIC_DIR: &str = "public";

pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))
        // Checkout pages
        .route("/", get(index))
        .route("/client_token", get(client_token))
        .route("/checkouts", post(create_checkout))
        .route("/checkouts/new", get(new_checkout))
        .route("/checkouts/{id}", get(show_checkout))
        // JSON API
        .route("/post_checkout", post(post_checkout))
        .route("/post_checkout_transact", post(post_checkout_transact))
        .route("/all_merchants", post(all_merchants))
        .route("/create_merchant", post(create_merchant))
        .route("/all_customers", post(all_customers))
        .route("/create_customer", post(create_customer))
        // Static assets
        .nest_service("/static", ServeDir::new(PUBLIC_DIR))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use checkout_core::{PaymentGateway, TransactionStatus};
    use checkout_gateway::MockGateway;
    use checkout_gateway::mock::{PROCESSOR_DECLINED_NONCE, VALID_NONCE};
    use tower::ServiceExt;

    use super::*;
    use crate::handlers::{ErrorResponse, ResultResponse};

    fn test_app() -> (Router, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::new());
        (router(AppState::new(gateway.clone())), gateway)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_checkout() {
        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/checkouts/new");
    }

    #[tokio::test]
    async fn test_client_token_is_plain_text() {
        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/client_token").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.starts_with("mock-client-token-"));
    }

    #[tokio::test]
    async fn test_successful_checkout_renders_success_page() {
        let (app, _) = test_app();
        let response = app
            .clone()
            .oneshot(post_form(
                "/checkouts",
                &format!("amount=10.00&payment_method_nonce={VALID_NONCE}"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response).to_string();
        assert!(target.starts_with("/checkouts/"));

        let page = app
            .oneshot(Request::builder().uri(&target).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        let html = body_string(page).await;
        assert!(html.contains("Sweet Success!"));
        assert!(html.contains("submitted_for_settlement"));
    }

    #[tokio::test]
    async fn test_declined_checkout_renders_failure_page() {
        let (app, _) = test_app();
        let response = app
            .clone()
            .oneshot(post_form(
                "/checkouts",
                &format!("amount=10.00&payment_method_nonce={PROCESSOR_DECLINED_NONCE}"),
            ))
            .await
            .unwrap();

        let target = location(&response).to_string();
        let page = app
            .oneshot(Request::builder().uri(&target).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(page).await;
        assert!(html.contains("Transaction Failed"));
        assert!(html.contains("Your test transaction has a status of processor_declined."));
    }

    #[tokio::test]
    async fn test_invalid_checkout_flashes_errors() {
        let (app, _) = test_app();
        let response = app
            .clone()
            .oneshot(post_form("/checkouts", "amount=0&payment_method_nonce="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/checkouts/new");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let pair = cookie.split(';').next().unwrap().to_string();

        let page = app
            .oneshot(
                Request::builder()
                    .uri("/checkouts/new")
                    .header(header::COOKIE, pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(page.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));
        let html = body_string(page).await;
        assert!(html.contains("Error: 81531: Amount must be greater than zero."));
        assert!(html.contains("Error: 91508: Cannot determine payment method."));
    }

    #[tokio::test]
    async fn test_unparseable_amount_flashes_format_error() {
        let (app, _) = test_app();
        let response = app
            .oneshot(post_form("/checkouts", "amount=ten&payment_method_nonce=fake-valid-nonce"))
            .await
            .unwrap();

        assert_eq!(location(&response), "/checkouts/new");
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_empty_amount_flashes_required() {
        let (app, _) = test_app();
        let response = app
            .oneshot(post_form("/checkouts", &format!("amount=&payment_method_nonce={VALID_NONCE}")))
            .await
            .unwrap();

        assert_eq!(location(&response), "/checkouts/new");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let pair = cookie.split(';').next().unwrap();
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::COOKIE, pair.parse().unwrap());
        assert_eq!(
            crate::flash::read(&headers),
            vec!["Error: 81502: Amount is required.\n".to_string()]
        );
    }

    #[tokio::test]
    async fn test_post_checkout_without_amount() {
        let (app, _) = test_app();
        let response = app
            .oneshot(post_json(
                "/post_checkout",
                &serde_json::json!({ "paymentMethodNonce": VALID_NONCE }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ResultResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!body.success);
        assert!(body.transaction.is_none());
        assert_eq!(body.message.as_deref(), Some("Amount is required."));
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].code, "81502");
        assert_eq!(body.errors[0].attribute.as_deref(), Some("amount"));
    }

    #[tokio::test]
    async fn test_post_checkout_transact_rejects_text_amount() {
        let (app, _) = test_app();
        let response = app
            .oneshot(post_json(
                "/post_checkout_transact",
                &serde_json::json!({ "amount": "ten", "paymentMethodNonce": VALID_NONCE }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ResultResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!body.success);
        assert_eq!(body.errors[0].code, "81503");
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_404() {
        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/checkouts/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_checkout_json() {
        let (app, gateway) = test_app();
        let response = app
            .oneshot(post_json(
                "/post_checkout",
                &serde_json::json!({ "amount": "12.50", "paymentMethodNonce": VALID_NONCE }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ResultResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body.success);
        let transaction = body.transaction.unwrap();
        assert_eq!(transaction.status, TransactionStatus::SubmittedForSettlement);
        assert!(gateway.find_transaction(&transaction.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_post_checkout_transact_keeps_customer() {
        let (app, _) = test_app();
        let response = app
            .oneshot(post_json(
                "/post_checkout_transact",
                &serde_json::json!({
                    "amount": 20,
                    "paymentMethodNonce": VALID_NONCE,
                    "deviceData": "{\"device_session_id\":\"abc\"}",
                    "customer": { "firstName": "Jen", "email": "jen@example.com" },
                    "shipping": { "postalCode": "60606" },
                    "billing": { "postalCode": "60606" }
                }),
            ))
            .await
            .unwrap();

        let body: ResultResponse = serde_json::from_str(&body_string(response).await).unwrap();
        let customer = body.transaction.unwrap().customer.unwrap();
        assert_eq!(customer.email.as_deref(), Some("jen@example.com"));
    }

    #[tokio::test]
    async fn test_post_checkout_validation_errors_in_json() {
        let (app, _) = test_app();
        let response = app
            .oneshot(post_json(
                "/post_checkout",
                &serde_json::json!({ "amount": "-1", "paymentMethodNonce": VALID_NONCE }),
            ))
            .await
            .unwrap();

        let body: ResultResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!body.success);
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].code, "81531");
    }

    #[tokio::test]
    async fn test_customers_round() {
        let (app, _) = test_app();
        let created = app
            .clone()
            .oneshot(post_json(
                "/create_customer",
                &serde_json::json!({ "id": "the_customer_id", "firstName": "Jen" }),
            ))
            .await
            .unwrap();
        let body: ResultResponse = serde_json::from_str(&body_string(created).await).unwrap();
        assert!(body.success);

        let found = app
            .oneshot(Request::builder().method("POST").uri("/all_customers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let customers: Vec<checkout_core::Customer> = serde_json::from_str(&body_string(found).await).unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].id, "the_customer_id");
    }

    #[tokio::test]
    async fn test_merchants() {
        let (app, _) = test_app();
        let listed = app
            .clone()
            .oneshot(Request::builder().method("POST").uri("/all_merchants").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let accounts: Vec<checkout_core::MerchantAccount> = serde_json::from_str(&body_string(listed).await).unwrap();
        assert_eq!(accounts.len(), 1);

        let rejected = app
            .oneshot(post_json("/create_merchant", &serde_json::json!({ "id": "sub" })))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = serde_json::from_str(&body_string(rejected).await).unwrap();
        assert_eq!(error.code, "GATEWAY_ERROR");
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["gateway"], "MockGateway");
        assert_eq!(json["gateway_connected"], true);
    }
}
