//! Braintree GraphQL wire types
//!
//! Response shapes as Braintree sends them, and their conversion into
//! `checkout_core` models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use checkout_core::{
    Address, Customer, CustomerDetails, CustomerRequest, GatewayError, MerchantAccount, PaymentInstrument,
    Result, SaleRequest, Transaction, TransactionStatus, ValidationErrorEntry, ValidationErrors,
};

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorExtensions {
    #[serde(default)]
    pub error_class: Option<String>,
    #[serde(default)]
    pub legacy_code: Option<String>,
    #[serde(default)]
    pub input_path: Option<Vec<Value>>,
}

impl GraphqlError {
    fn error_class(&self) -> Option<&str> {
        self.extensions.as_ref()?.error_class.as_deref()
    }

    fn is_validation(&self) -> bool {
        self.error_class() == Some("VALIDATION")
    }

    /// Place this error in a validation tree.
    ///
    /// `inputPath` `["input", "transaction", "amount"]` becomes attribute
    /// `amount` under the `transaction` group.
    fn add_to(&self, tree: &mut ValidationErrors) {
        let extensions = self.extensions.as_ref();
        let code = extensions
            .and_then(|e| e.legacy_code.clone())
            .unwrap_or_else(|| "unknown".into());
        let mut path: Vec<String> = extensions
            .and_then(|e| e.input_path.as_ref())
            .map(|segments| {
                segments
                    .iter()
                    .map(|s| s.as_str().map_or_else(|| s.to_string(), str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        if path.first().map(String::as_str) == Some("input") {
            path.remove(0);
        }

        let mut entry = ValidationErrorEntry::new(code, self.message.clone());
        if let Some(attribute) = path.pop() {
            entry = entry.with_attribute(attribute);
        }
        tree.add_at(path, entry);
    }
}

impl<T> GraphqlResponse<T> {
    /// A node lookup that missed: every error is NOT_FOUND, or VALIDATION
    /// for an id that is not a global id.
    pub fn is_lookup_miss(&self) -> bool {
        !self.errors.is_empty()
            && self
                .errors
                .iter()
                .all(|e| matches!(e.error_class(), Some("NOT_FOUND" | "VALIDATION")))
    }

    /// Data of a response that must not carry errors
    pub fn into_data(self) -> Result<T> {
        if !self.errors.is_empty() {
            return Err(gateway_error(&self.errors));
        }
        self.data
            .ok_or_else(|| GatewayError::Decode("response carried no data".into()))
    }

    /// Data plus validation errors; any other error class fails the call
    pub fn into_validated(self) -> Result<(Option<T>, ValidationErrors)> {
        let (validation, other): (Vec<_>, Vec<_>) = self.errors.into_iter().partition(GraphqlError::is_validation);
        if !other.is_empty() {
            return Err(gateway_error(&other));
        }

        let mut tree = ValidationErrors::new();
        for error in &validation {
            error.add_to(&mut tree);
        }
        Ok((self.data, tree))
    }
}

fn gateway_error(errors: &[GraphqlError]) -> GatewayError {
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    match errors.first().and_then(GraphqlError::error_class) {
        Some("NOT_FOUND") => GatewayError::NotFound(message),
        Some("AUTHENTICATION" | "AUTHORIZATION") => GatewayError::Authentication(message),
        _ => GatewayError::Gateway(message),
    }
}

// ============================================================================
// Response data
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingData {
    pub ping: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTokenData {
    pub create_client_token: ClientTokenPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTokenPayload {
    pub client_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleData {
    #[serde(default)]
    pub charge_payment_method: Option<TransactionPayload>,
    #[serde(default)]
    pub authorize_payment_method: Option<TransactionPayload>,
}

impl SaleData {
    pub fn into_transaction(self) -> Option<Transaction> {
        self.charge_payment_method
            .or(self.authorize_payment_method)
            .and_then(|p| p.transaction)
            .map(RawTransaction::into_transaction)
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    #[serde(default)]
    pub transaction: Option<RawTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub node: Option<RawTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionSearchData {
    pub search: TransactionSearch,
}

#[derive(Debug, Deserialize)]
pub struct TransactionSearch {
    pub transactions: Connection<RawTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerSearchData {
    pub search: CustomerSearch,
}

#[derive(Debug, Deserialize)]
pub struct CustomerSearch {
    pub customers: Connection<RawCustomer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerData {
    pub create_customer: Option<CustomerPayload>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    #[serde(default)]
    pub customer: Option<RawCustomer>,
}

#[derive(Debug, Deserialize)]
pub struct MerchantAccountsData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub struct Viewer {
    pub merchant: Merchant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub merchant_accounts: Connection<RawMerchantAccount>,
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub id: String,
    #[serde(default)]
    pub legacy_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merchant_account_id: Option<String>,
    #[serde(default)]
    pub amount: Option<RawMoney>,
    #[serde(default)]
    pub processor_response: Option<RawProcessorResponse>,
    #[serde(default)]
    pub customer: Option<RawCustomer>,
    #[serde(default)]
    pub payment_method_snapshot: Option<RawPaymentSnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoney {
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProcessorResponse {
    #[serde(default)]
    pub legacy_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPaymentSnapshot {
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub brand_code: Option<String>,
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub expiration_month: Option<String>,
    #[serde(default)]
    pub expiration_year: Option<String>,
    #[serde(default)]
    pub cardholder_name: Option<String>,
    #[serde(default)]
    pub payer: Option<RawPayer>,
}

#[derive(Debug, Deserialize)]
pub struct RawPayer {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCustomer {
    pub id: String,
    #[serde(default)]
    pub legacy_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMerchantAccount {
    pub id: String,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RawTransaction {
    pub fn into_transaction(self) -> Transaction {
        let (amount, currency_iso_code) = self
            .amount
            .map_or((Decimal::ZERO, None), |m| (m.value, m.currency_code));
        let (processor_response_code, processor_response_text) = self
            .processor_response
            .map_or((None, None), |p| (p.legacy_code, p.message));

        Transaction {
            id: self.id,
            legacy_id: self.legacy_id,
            status: TransactionStatus::parse(&self.status.to_ascii_lowercase()),
            amount,
            currency_iso_code,
            merchant_account_id: self.merchant_account_id,
            created_at: self.created_at,
            processor_response_code,
            processor_response_text,
            payment_instrument: self.payment_method_snapshot.map(RawPaymentSnapshot::into_instrument),
            customer: self.customer.map(|c| CustomerDetails {
                first_name: c.first_name,
                last_name: c.last_name,
                email: c.email,
                company: c.company,
                phone: c.phone_number,
            }),
        }
    }
}

impl RawPaymentSnapshot {
    fn into_instrument(self) -> PaymentInstrument {
        let kind = match self.typename.as_str() {
            "CreditCardDetails" => "credit_card".to_string(),
            "PayPalTransactionDetails" => "paypal_account".to_string(),
            other => other.to_string(),
        };
        let expiration_date = match (self.expiration_month, self.expiration_year) {
            (Some(month), Some(year)) => Some(format!("{month}/{year}")),
            _ => None,
        };

        PaymentInstrument {
            kind,
            card_type: self.brand_code,
            last4: self.last4,
            expiration_date,
            cardholder_name: self.cardholder_name,
            payer_email: self.payer.and_then(|p| p.email),
        }
    }
}

impl RawCustomer {
    pub fn into_customer(self) -> Customer {
        Customer {
            id: self.legacy_id.unwrap_or(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            company: self.company,
            phone: self.phone_number,
            created_at: self.created_at,
        }
    }
}

impl RawMerchantAccount {
    pub fn into_merchant_account(self) -> MerchantAccount {
        MerchantAccount {
            id: self.id,
            currency_iso_code: self.currency_code,
            status: self.status.map(|s| s.to_lowercase()),
            master_merchant_account_id: None,
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

pub fn sale_input(request: &SaleRequest) -> Value {
    let mut transaction = json!({ "amount": request.amount.to_string() });
    if let Some(device_data) = &request.device_data {
        transaction["riskData"] = json!({ "deviceData": device_data });
    }
    if let Some(customer) = &request.customer {
        transaction["customerDetails"] = json!({
            "email": customer.email,
            "phoneNumber": customer.phone,
        });
    }
    if let Some(shipping) = &request.shipping {
        transaction["shipping"] = json!({ "shippingAddress": address_input(shipping) });
    }

    json!({
        "input": {
            "paymentMethodId": request.payment_method_nonce,
            "transaction": transaction,
        }
    })
}

fn address_input(address: &Address) -> Value {
    json!({
        "firstName": address.first_name,
        "lastName": address.last_name,
        "company": address.company,
        "streetAddress": address.street_address,
        "extendedAddress": address.extended_address,
        "locality": address.locality,
        "region": address.region,
        "postalCode": address.postal_code,
        "countryCode": address.country_code_alpha2,
    })
}

pub fn customer_input(request: &CustomerRequest) -> Value {
    let details = &request.details;
    json!({
        "input": {
            "customer": {
                "firstName": details.first_name,
                "lastName": details.last_name,
                "email": details.email,
                "company": details.company,
                "phoneNumber": details.phone,
            }
        }
    })
}
