//! # checkout-gateway
//!
//! Payment gateways for the demo checkout.
//!
//! ## Gateways
//!
//! - **Braintree** (default): the Braintree GraphQL API, configured from
//!   `BT_*` environment variables
//! - **Mock**: in-memory gateway that understands the sandbox test nonces
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_gateway::{BraintreeGateway, MockGateway};
//!
//! let gateway: Arc<dyn PaymentGateway> = match BraintreeGateway::from_env() {
//!     Ok(braintree) => Arc::new(braintree),
//!     Err(_) => Arc::new(MockGateway::new()),
//! };
//! let token = gateway.generate_client_token().await?;
//! ```

#[cfg(feature = "braintree")]
pub mod braintree;
#[cfg(feature = "braintree")]
pub mod config;
pub mod mock;

#[cfg(feature = "braintree")]
pub use braintree::BraintreeGateway;
#[cfg(feature = "braintree")]
pub use config::{BraintreeConfig, Environment};
pub use mock::MockGateway;

// Re-export core types for convenience
pub use checkout_core::{GatewayError, PaymentGateway, Result};
