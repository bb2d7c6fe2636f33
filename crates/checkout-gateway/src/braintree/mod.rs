//! Braintree Gateway
//!
//! Implementation of `PaymentGateway` against the Braintree GraphQL API.

mod queries;
mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use checkout_core::{
    ClientToken, Customer, CustomerRequest, CustomerResult, GatewayError, GatewayResult, MerchantAccount,
    MerchantAccountRequest, PaymentGateway, Result, SaleRequest, SaleResult, Transaction, TransactionStatus,
    ValidationFailure,
};

use crate::config::BraintreeConfig;
use wire::{
    ClientTokenData, CreateCustomerData, CustomerSearchData, GraphqlResponse, MerchantAccountsData, NodeData,
    PingData, SaleData, TransactionSearchData,
};

/// Braintree API version sent with every request
const BRAINTREE_VERSION: &str = "2019-01-01";

/// Braintree payment gateway
pub struct BraintreeGateway {
    client: reqwest::Client,
    config: BraintreeConfig,
}

impl BraintreeGateway {
    /// Create from configuration
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the HTTP client cannot be built.
    pub fn new(config: BraintreeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when credentials are missing.
    pub fn from_env() -> Result<Self> {
        Self::new(BraintreeConfig::from_env()?)
    }

    #[must_use]
    pub const fn config(&self) -> &BraintreeConfig {
        &self.config
    }

    /// POST a GraphQL document and decode the envelope
    async fn execute<T: DeserializeOwned>(&self, document: &str, variables: Value) -> Result<GraphqlResponse<T>> {
        let query = queries::with_fragments(document);

        let response = self
            .client
            .post(self.config.environment.graphql_url())
            .basic_auth(&self.config.public_key, Some(&self.config.private_key))
            .header("Braintree-Version", BRAINTREE_VERSION)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::Authentication(format!(
                "Braintree answered {status} for merchant {}",
                self.config.merchant_id
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GraphqlResponse<T>>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn find_by_node(&self, id: &str) -> Result<Option<Transaction>> {
        let response: GraphqlResponse<NodeData> = self.execute(queries::FIND_TRANSACTION, json!({ "id": id })).await?;
        // Legacy ids are not global ids; Braintree rejects them here
        if response.is_lookup_miss() {
            tracing::debug!(id, errors = response.errors.len(), "Node lookup missed");
            return Ok(None);
        }
        Ok(response.into_data()?.node.map(wire::RawTransaction::into_transaction))
    }

    async fn find_by_legacy_id(&self, id: &str) -> Result<Option<Transaction>> {
        let response: GraphqlResponse<TransactionSearchData> = self
            .execute(queries::SEARCH_TRANSACTIONS, json!({ "input": { "id": { "is": id } } }))
            .await?;

        Ok(response
            .into_data()?
            .search
            .transactions
            .into_nodes()
            .next()
            .map(wire::RawTransaction::into_transaction))
    }
}

/// Declines come back as a transaction with no validation errors.
fn is_declined(status: &TransactionStatus) -> bool {
    matches!(
        status,
        TransactionStatus::ProcessorDeclined | TransactionStatus::GatewayRejected | TransactionStatus::Failed
    )
}

#[async_trait]
impl PaymentGateway for BraintreeGateway {
    async fn generate_client_token(&self) -> Result<ClientToken> {
        let response: GraphqlResponse<ClientTokenData> =
            self.execute(queries::CLIENT_TOKEN, json!({ "input": {} })).await?;

        Ok(ClientToken::new(response.into_data()?.create_client_token.client_token))
    }

    async fn sale(&self, request: SaleRequest) -> Result<SaleResult> {
        let document = if request.submit_for_settlement {
            queries::CHARGE
        } else {
            queries::AUTHORIZE
        };

        let response: GraphqlResponse<SaleData> = self.execute(document, wire::sale_input(&request)).await?;
        let (data, errors) = response.into_validated()?;
        let transaction = data.and_then(SaleData::into_transaction);

        if !errors.is_empty() {
            tracing::debug!(errors = errors.deep_size(), "Braintree sale failed validation");
            return Ok(GatewayResult::Invalid(ValidationFailure {
                message: errors.messages(),
                errors,
                transaction,
            }));
        }

        match transaction {
            Some(transaction) if is_declined(&transaction.status) => {
                tracing::info!(
                    transaction_id = %transaction.id,
                    status = %transaction.status,
                    "Braintree sale declined"
                );
                Ok(GatewayResult::Invalid(ValidationFailure {
                    message: transaction
                        .processor_response_text
                        .clone()
                        .unwrap_or_else(|| transaction.status.to_string()),
                    errors,
                    transaction: Some(transaction),
                }))
            }
            Some(transaction) => Ok(GatewayResult::Success(transaction)),
            None => Err(GatewayError::Decode("sale response carried no transaction".into())),
        }
    }

    async fn find_transaction(&self, id: &str) -> Result<Transaction> {
        if let Some(transaction) = self.find_by_node(id).await? {
            return Ok(transaction);
        }
        self.find_by_legacy_id(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("Transaction {id}")))
    }

    async fn merchant_accounts(&self) -> Result<Vec<MerchantAccount>> {
        let response: GraphqlResponse<MerchantAccountsData> =
            self.execute(queries::MERCHANT_ACCOUNTS, json!({})).await?;

        Ok(response
            .into_data()?
            .viewer
            .merchant
            .merchant_accounts
            .into_nodes()
            .map(wire::RawMerchantAccount::into_merchant_account)
            .collect())
    }

    async fn create_merchant_account(&self, _request: MerchantAccountRequest) -> Result<MerchantAccount> {
        Err(GatewayError::Unsupported(
            "Merchant account creation through the Braintree GraphQL API".into(),
        ))
    }

    async fn search_customers(&self, id: &str) -> Result<Vec<Customer>> {
        let response: GraphqlResponse<CustomerSearchData> = self
            .execute(queries::SEARCH_CUSTOMERS, json!({ "input": { "id": { "is": id } } }))
            .await?;

        Ok(response
            .into_data()?
            .search
            .customers
            .into_nodes()
            .map(wire::RawCustomer::into_customer)
            .collect())
    }

    async fn create_customer(&self, request: CustomerRequest) -> Result<CustomerResult> {
        if let Some(id) = &request.id {
            tracing::warn!(requested_id = %id, "Braintree assigns customer ids; requested id ignored");
        }

        let response: GraphqlResponse<CreateCustomerData> =
            self.execute(queries::CREATE_CUSTOMER, wire::customer_input(&request)).await?;
        let (data, errors) = response.into_validated()?;

        if !errors.is_empty() {
            return Ok(GatewayResult::Invalid(ValidationFailure {
                message: errors.messages(),
                errors,
                transaction: None,
            }));
        }

        data.and_then(|d| d.create_customer)
            .and_then(|p| p.customer)
            .map(|c| GatewayResult::Success(c.into_customer()))
            .ok_or_else(|| GatewayError::Decode("createCustomer response carried no customer".into()))
    }

    async fn health_check(&self) -> bool {
        let response: Result<GraphqlResponse<PingData>> = self.execute(queries::PING, json!({})).await;
        match response.and_then(GraphqlResponse::into_data) {
            Ok(data) => data.ping == "pong",
            Err(e) => {
                tracing::warn!("Braintree health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "Braintree"
    }
}
