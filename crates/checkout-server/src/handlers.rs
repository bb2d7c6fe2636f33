//! HTTP Handlers

use axum::{
    Form, Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use checkout_core::{
    Address, ClientToken, Customer, CustomerDetails, CustomerRequest, CustomerResult, GatewayError, GatewayResult,
    MerchantAccount, MerchantAccountRequest, SaleRequest, SaleResult, Transaction, ValidationErrorEntry,
    ValidationErrors, ValidationFailure, classify, format_errors,
};

use crate::flash;
use crate::pages;
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway: String,
    pub gateway_connected: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Form posted by the checkout page
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub payment_method_nonce: String,
}

/// `amount` is taken as posted (string or number) and validated here
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCheckoutRequest {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub payment_method_nonce: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactRequest {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub payment_method_nonce: String,
    #[serde(default)]
    pub device_data: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerDetails>,
    #[serde(default)]
    pub shipping: Option<Address>,
}

/// JSON view of a gateway result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationErrorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl From<SaleResult> for ResultResponse {
    fn from(result: SaleResult) -> Self {
        match result {
            GatewayResult::Success(transaction) => Self {
                success: true,
                message: None,
                errors: Vec::new(),
                transaction: Some(transaction),
                customer: None,
            },
            GatewayResult::Invalid(failure) => Self::invalid(failure),
        }
    }
}

impl From<CustomerResult> for ResultResponse {
    fn from(result: CustomerResult) -> Self {
        match result {
            GatewayResult::Success(customer) => Self {
                success: true,
                message: None,
                errors: Vec::new(),
                transaction: None,
                customer: Some(customer),
            },
            GatewayResult::Invalid(failure) => Self::invalid(failure),
        }
    }
}

impl ResultResponse {
    fn invalid(failure: ValidationFailure) -> Self {
        Self {
            success: false,
            message: Some(failure.message),
            errors: failure.errors.deep_errors(),
            transaction: failure.transaction,
            customer: None,
        }
    }
}

fn api_error(context: &str, err: &GatewayError) -> ApiError {
    tracing::error!("{} error: {}", context, err);
    let status = match err {
        GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        GatewayError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: err.code().into(),
        }),
    )
}

/// Amount from a form field, rejected with the gateway's amount codes
fn parse_amount(raw: &str) -> Result<Decimal, ValidationFailure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(amount_failure("81502", "Amount is required."));
    }
    raw.parse()
        .map_err(|_| amount_failure("81503", "Amount is an invalid format."))
}

/// Amount from a JSON body: missing or null is required, numbers and strings parse
fn json_amount(value: Option<&Value>) -> Result<Decimal, ValidationFailure> {
    match value {
        None | Some(Value::Null) => parse_amount(""),
        Some(Value::String(raw)) => parse_amount(raw),
        Some(Value::Number(number)) => parse_amount(&number.to_string()),
        Some(_) => Err(amount_failure("81503", "Amount is an invalid format.")),
    }
}

fn amount_failure(code: &str, message: &str) -> ValidationFailure {
    let mut errors = ValidationErrors::new();
    errors.add_at(
        ["transaction"],
        ValidationErrorEntry::new(code, message).with_attribute("amount"),
    );
    ValidationFailure {
        message: message.to_string(),
        errors,
        transaction: None,
    }
}

/// Redirect back to the checkout form with a flash message
fn flash_redirect(message: String) -> Response {
    (
        [(SET_COOKIE, flash::set_cookie(&[message]))],
        Redirect::to("/checkouts/new"),
    )
        .into_response()
}

// ============================================================================
// Pages
// ============================================================================

pub async fn index() -> Redirect {
    Redirect::to("/checkouts/new")
}

/// Client token as plain text
pub async fn client_token(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .gateway
        .generate_client_token()
        .await
        .map(|token| token.to_string())
        .map_err(|e| api_error("Client token", &e))
}

/// Checkout form
pub async fn new_checkout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let messages = flash::read(&headers);

    let token: ClientToken = match state.gateway.generate_client_token().await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Client token error: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Html(pages::error_page("Checkout unavailable", &e.user_message())),
            )
                .into_response();
        }
    };

    let mut response = Html(pages::checkout_form(&token, &messages)).into_response();
    if !messages.is_empty() {
        response
            .headers_mut()
            .insert(SET_COOKIE, HeaderValue::from_static(flash::CLEAR_COOKIE));
    }
    response
}

/// Transaction result page
pub async fn show_checkout(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.gateway.find_transaction(&id).await {
        Ok(transaction) => {
            let result = classify(&transaction.status);
            tracing::info!(
                transaction_id = %transaction.id,
                status = %transaction.status,
                icon = %result.icon,
                "Rendering transaction"
            );
            Html(pages::transaction_page(&transaction, &result)).into_response()
        }
        Err(e) => {
            let status = if matches!(e, GatewayError::NotFound(_)) {
                StatusCode::NOT_FOUND
            } else {
                tracing::error!("Transaction lookup error: {}", e);
                StatusCode::BAD_GATEWAY
            };
            (status, Html(pages::error_page("Transaction unavailable", &e.user_message()))).into_response()
        }
    }
}

/// Form checkout: sale, then redirect to the result page or back with errors
pub async fn create_checkout(State(state): State<AppState>, Form(form): Form<CheckoutForm>) -> Response {
    let amount = match parse_amount(&form.amount) {
        Ok(amount) => amount,
        Err(failure) => return flash_redirect(format_errors(&failure.errors.deep_errors())),
    };

    match state.gateway.sale(SaleRequest::new(amount, form.payment_method_nonce)).await {
        Ok(
            GatewayResult::Success(transaction)
            | GatewayResult::Invalid(ValidationFailure {
                transaction: Some(transaction),
                ..
            }),
        ) => Redirect::to(&format!("/checkouts/{}", transaction.id)).into_response(),
        Ok(GatewayResult::Invalid(failure)) => {
            let deep_errors = failure.errors.deep_errors();
            tracing::debug!(errors = ?deep_errors, "errors from transaction.sale");

            if deep_errors.is_empty() {
                flash_redirect(failure.message)
            } else {
                flash_redirect(format_errors(&deep_errors))
            }
        }
        Err(e) => {
            tracing::error!("Sale error: {}", e);
            flash_redirect(e.user_message())
        }
    }
}

// ============================================================================
// JSON API
// ============================================================================

/// Sale from a JSON body
pub async fn post_checkout(
    State(state): State<AppState>,
    Json(payload): Json<PostCheckoutRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    let amount = match json_amount(payload.amount.as_ref()) {
        Ok(amount) => amount,
        Err(failure) => return Ok(Json(ResultResponse::invalid(failure))),
    };
    let request = SaleRequest::new(amount, payload.payment_method_nonce);

    let result = state
        .gateway
        .sale(request)
        .await
        .map_err(|e| api_error("Sale", &e))?;

    Ok(Json(result.into()))
}

/// Sale with device data, customer and shipping details
pub async fn post_checkout_transact(
    State(state): State<AppState>,
    Json(payload): Json<TransactRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    let amount = match json_amount(payload.amount.as_ref()) {
        Ok(amount) => amount,
        Err(failure) => return Ok(Json(ResultResponse::invalid(failure))),
    };
    let request = SaleRequest {
        device_data: payload.device_data,
        customer: payload.customer,
        shipping: payload.shipping,
        ..SaleRequest::new(amount, payload.payment_method_nonce)
    };

    let result = state
        .gateway
        .sale(request)
        .await
        .map_err(|e| api_error("Sale", &e))?;

    Ok(Json(result.into()))
}

pub async fn all_merchants(State(state): State<AppState>) -> Result<Json<Vec<MerchantAccount>>, ApiError> {
    state
        .gateway
        .merchant_accounts()
        .await
        .map(Json)
        .map_err(|e| api_error("Merchant accounts", &e))
}

pub async fn create_merchant(
    State(state): State<AppState>,
    Json(payload): Json<MerchantAccountRequest>,
) -> Result<Json<MerchantAccount>, ApiError> {
    state
        .gateway
        .create_merchant_account(payload)
        .await
        .map(Json)
        .map_err(|e| api_error("Merchant account", &e))
}

/// Customers matching the configured search id
pub async fn all_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    state
        .gateway
        .search_customers(&state.customer_search_id)
        .await
        .map(Json)
        .map_err(|e| api_error("Customer search", &e))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CustomerRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    let result = state
        .gateway
        .create_customer(payload)
        .await
        .map_err(|e| api_error("Customer", &e))?;

    Ok(Json(result.into()))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway_connected = state.gateway.health_check().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway: state.gateway.name().to_string(),
        gateway_connected,
    })
}
