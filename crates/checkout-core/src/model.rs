//! Domain Models
//!
//! Gateway records and request payloads. Field names serialize in
//! camelCase, matching what the Braintree client libraries send back to
//! browsers. Amounts use `rust_decimal`, serialized as strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::TransactionStatus;
use crate::validation::ValidationErrors;

/// Client token handed to the browser-side Drop-in UI
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientToken(String);

impl ClientToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transaction record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Identifier used for lookups
    pub id: String,

    /// Identifier shown in the Control Panel, when it differs from `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,

    pub status: TransactionStatus,

    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    #[serde(default)]
    pub currency_iso_code: Option<String>,

    #[serde(default)]
    pub merchant_account_id: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub processor_response_code: Option<String>,

    #[serde(default)]
    pub processor_response_text: Option<String>,

    #[serde(default)]
    pub payment_instrument: Option<PaymentInstrument>,

    #[serde(default)]
    pub customer: Option<CustomerDetails>,
}

/// Payment method used for a transaction
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
    /// `credit_card`, `paypal_account`, ...
    pub kind: String,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub cardholder_name: Option<String>,
    #[serde(default)]
    pub payer_email: Option<String>,
}

/// Customer fields attached to a sale
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Postal address
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub extended_address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code_alpha2: Option<String>,
}

/// Request to run a sale
#[derive(Clone, Debug, PartialEq)]
pub struct SaleRequest {
    pub amount: Decimal,
    pub payment_method_nonce: String,
    pub device_data: Option<String>,
    pub customer: Option<CustomerDetails>,
    pub shipping: Option<Address>,
    /// Capture funds as soon as the authorization succeeds
    pub submit_for_settlement: bool,
}

impl SaleRequest {
    /// A sale that settles immediately, with no customer or address data
    pub fn new(amount: Decimal, payment_method_nonce: impl Into<String>) -> Self {
        Self {
            amount,
            payment_method_nonce: payment_method_nonce.into(),
            device_data: None,
            customer: None,
            shipping: None,
            submit_for_settlement: true,
        }
    }
}

/// A customer record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request to create a customer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    /// Requested id; the gateway assigns one when absent
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub details: CustomerDetails,
}

/// A merchant account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAccount {
    pub id: String,
    #[serde(default)]
    pub currency_iso_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub master_merchant_account_id: Option<String>,
}

/// Request to create a sub-merchant account
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAccountRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub master_merchant_account_id: Option<String>,
    #[serde(default)]
    pub currency_iso_code: Option<String>,
    #[serde(default)]
    pub tos_accepted: bool,
}

/// Validation failure from a gateway call
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationFailure {
    /// Summary message from the gateway
    pub message: String,

    pub errors: ValidationErrors,

    /// Declined sales still produce a transaction record
    pub transaction: Option<Transaction>,
}

/// Outcome of a gateway call that can fail validation
#[derive(Clone, Debug, PartialEq)]
pub enum GatewayResult<T> {
    Success(T),
    Invalid(ValidationFailure),
}

impl<T> GatewayResult<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Result of a sale
pub type SaleResult = GatewayResult<Transaction>;

/// Result of creating a customer
pub type CustomerResult = GatewayResult<Customer>;

impl SaleResult {
    /// The transaction record, if the gateway created one
    #[must_use]
    pub const fn transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Success(transaction) => Some(transaction),
            Self::Invalid(failure) => failure.transaction.as_ref(),
        }
    }
}
