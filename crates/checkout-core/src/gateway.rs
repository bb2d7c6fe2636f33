//! Payment Gateway Strategy Pattern
//!
//! Common interface for payment gateways, so the checkout server can run
//! against Braintree or an in-memory gateway without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::{PaymentGateway, SaleRequest};
//!
//! let gateway: Arc<dyn PaymentGateway> = Arc::new(BraintreeGateway::from_env()?);
//! let result = gateway.sale(SaleRequest::new(dec!(10.00), nonce)).await?;
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    ClientToken, Customer, CustomerRequest, CustomerResult, MerchantAccount, MerchantAccountRequest,
    SaleRequest, SaleResult, Transaction,
};

/// Payment gateway trait (Strategy pattern)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Generate a client token for the browser-side payment form
    async fn generate_client_token(&self) -> Result<ClientToken>;

    /// Run a sale.
    ///
    /// Validation failures and declines are `Ok(GatewayResult::Invalid)`;
    /// `Err` means the gateway could not be asked or answered nonsense.
    async fn sale(&self, request: SaleRequest) -> Result<SaleResult>;

    /// Look up a transaction by id
    async fn find_transaction(&self, id: &str) -> Result<Transaction>;

    /// List the merchant accounts for the configured merchant
    async fn merchant_accounts(&self) -> Result<Vec<MerchantAccount>>;

    /// Create a sub-merchant account
    async fn create_merchant_account(&self, request: MerchantAccountRequest) -> Result<MerchantAccount>;

    /// Customers whose id is exactly `id`
    async fn search_customers(&self, id: &str) -> Result<Vec<Customer>>;

    /// Create a customer
    async fn create_customer(&self, request: CustomerRequest) -> Result<CustomerResult>;

    /// Check if the gateway is reachable with the configured credentials
    async fn health_check(&self) -> bool;

    /// Gateway name
    fn name(&self) -> &str;
}
