//! # checkout-core
//!
//! Core logic for the Braintree demo checkout: classifying a transaction
//! status into a result page, and turning gateway validation errors into a
//! message block.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   status    ┌────────────┐   OutcomeResult
//! │              │────────────▶│  classify  │──────────────────▶ result page
//! │ PaymentGate- │             └────────────┘
//! │ way          │  errors     ┌────────────┐   ┌─────────────┐
//! │ (Strategy)   │────────────▶│ deep_errors│──▶│format_errors│──▶ flash
//! └──────────────┘             └────────────┘   └─────────────┘
//! ```
//!
//! Both `classify` and `format_errors` are pure; the gateway does the I/O.

pub mod error;
pub mod gateway;
pub mod model;
pub mod outcome;
pub mod status;
pub mod validation;

pub use error::{GatewayError, Result};
pub use gateway::PaymentGateway;
pub use model::{
    Address, ClientToken, Customer, CustomerDetails, CustomerRequest, CustomerResult, GatewayResult,
    MerchantAccount, MerchantAccountRequest, PaymentInstrument, SaleRequest, SaleResult, Transaction,
    ValidationFailure,
};
pub use outcome::{Icon, OutcomeResult, classify};
pub use status::{SUCCESS_STATUSES, TransactionStatus};
pub use validation::{ValidationErrorEntry, ValidationErrors, format_errors};
