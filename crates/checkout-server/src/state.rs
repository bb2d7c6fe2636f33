//! Application State

use std::sync::Arc;

use checkout_core::PaymentGateway;

/// Customer id searched by `/all_customers` unless configured otherwise
pub const DEFAULT_CUSTOMER_SEARCH_ID: &str = "the_customer_id";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (Braintree, or the mock when unconfigured)
    pub gateway: Arc<dyn PaymentGateway>,

    /// Customer id looked up by `/all_customers`
    pub customer_search_id: Arc<str>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            gateway,
            customer_search_id: Arc::from(DEFAULT_CUSTOMER_SEARCH_ID),
        }
    }

    #[must_use]
    pub fn with_customer_search_id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.customer_search_id = id.into();
        self
    }
}
