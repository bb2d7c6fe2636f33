//! Mock Gateway
//!
//! In-memory gateway for demos and tests. Recognizes the Braintree sandbox
//! test nonces so declines and rejections can be exercised without
//! credentials.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use checkout_core::{
    ClientToken, Customer, CustomerRequest, CustomerResult, GatewayError, GatewayResult, MerchantAccount,
    MerchantAccountRequest, PaymentGateway, PaymentInstrument, Result, SaleRequest, SaleResult, Transaction,
    TransactionStatus, ValidationErrorEntry, ValidationErrors, ValidationFailure,
};

/// Nonce that always settles
pub const VALID_NONCE: &str = "fake-valid-nonce";
/// Nonce that the processor declines
pub const PROCESSOR_DECLINED_NONCE: &str = "fake-processor-declined-visa-nonce";
/// Prefix of nonces the gateway rejects (`fake-gateway-rejected-fraud-nonce`, ...)
pub const GATEWAY_REJECTED_PREFIX: &str = "fake-gateway-rejected";

const DEFAULT_MERCHANT_ACCOUNT: &str = "mock_merchant_usd";

/// Mock gateway with in-memory records
pub struct MockGateway {
    transactions: RwLock<HashMap<String, Transaction>>,
    customers: RwLock<Vec<Customer>>,
    merchant_accounts: RwLock<Vec<MerchantAccount>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            transactions: RwLock::new(HashMap::new()),
            customers: RwLock::new(Vec::new()),
            merchant_accounts: RwLock::new(vec![MerchantAccount {
                id: DEFAULT_MERCHANT_ACCOUNT.into(),
                currency_iso_code: Some("USD".into()),
                status: Some("active".into()),
                master_merchant_account_id: None,
            }]),
        }
    }

    /// Store a transaction as if the gateway had created it
    pub fn insert_transaction(&self, transaction: Transaction) {
        self.transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(transaction.id.clone(), transaction);
    }

    fn validate_sale(request: &SaleRequest) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if request.amount <= Decimal::ZERO {
            errors.add_at(
                ["transaction"],
                ValidationErrorEntry::new("81531", "Amount must be greater than zero.").with_attribute("amount"),
            );
        }
        if request.payment_method_nonce.trim().is_empty() {
            errors.add_at(
                ["transaction"],
                ValidationErrorEntry::new("91508", "Cannot determine payment method.").with_attribute("base"),
            );
        }
        errors
    }

    /// Status and processor response for a nonce
    fn outcome_for(request: &SaleRequest) -> (TransactionStatus, &'static str, &'static str) {
        let nonce = request.payment_method_nonce.as_str();
        if nonce == PROCESSOR_DECLINED_NONCE {
            (TransactionStatus::ProcessorDeclined, "2000", "Do Not Honor")
        } else if nonce.starts_with(GATEWAY_REJECTED_PREFIX) {
            (TransactionStatus::GatewayRejected, "", "Gateway Rejected: fraud")
        } else if request.submit_for_settlement {
            (TransactionStatus::SubmittedForSettlement, "1000", "Approved")
        } else {
            (TransactionStatus::Authorized, "1000", "Approved")
        }
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn generate_client_token(&self) -> Result<ClientToken> {
        Ok(ClientToken::new(format!("mock-client-token-{}", short_id())))
    }

    async fn sale(&self, request: SaleRequest) -> Result<SaleResult> {
        let errors = Self::validate_sale(&request);
        if !errors.is_empty() {
            return Ok(GatewayResult::Invalid(ValidationFailure {
                message: errors.messages(),
                errors,
                transaction: None,
            }));
        }

        let (status, code, text) = Self::outcome_for(&request);
        let transaction = Transaction {
            id: short_id(),
            legacy_id: None,
            status,
            amount: request.amount,
            currency_iso_code: Some("USD".into()),
            merchant_account_id: Some(DEFAULT_MERCHANT_ACCOUNT.into()),
            created_at: Some(Utc::now()),
            processor_response_code: Some(code.to_string()).filter(|c| !c.is_empty()),
            processor_response_text: Some(text.to_string()),
            payment_instrument: Some(PaymentInstrument {
                kind: "credit_card".into(),
                card_type: Some("Visa".into()),
                last4: Some("1111".into()),
                expiration_date: Some("12/2030".into()),
                ..Default::default()
            }),
            customer: request.customer,
        };
        self.insert_transaction(transaction.clone());

        tracing::debug!(
            transaction_id = %transaction.id,
            status = %transaction.status,
            "Mock sale processed"
        );

        if transaction.status.is_success() {
            Ok(GatewayResult::Success(transaction))
        } else {
            Ok(GatewayResult::Invalid(ValidationFailure {
                message: text.to_string(),
                errors: ValidationErrors::new(),
                transaction: Some(transaction),
            }))
        }
    }

    async fn find_transaction(&self, id: &str) -> Result<Transaction> {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("Transaction {id}")))
    }

    async fn merchant_accounts(&self) -> Result<Vec<MerchantAccount>> {
        Ok(self
            .merchant_accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn create_merchant_account(&self, request: MerchantAccountRequest) -> Result<MerchantAccount> {
        if !request.tos_accepted {
            return Err(GatewayError::Gateway("Terms Of Service needs to be accepted.".into()));
        }

        let account = MerchantAccount {
            id: request.id.unwrap_or_else(short_id),
            currency_iso_code: request.currency_iso_code.or_else(|| Some("USD".into())),
            status: Some("pending".into()),
            master_merchant_account_id: request
                .master_merchant_account_id
                .or_else(|| Some(DEFAULT_MERCHANT_ACCOUNT.into())),
        };
        self.merchant_accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(account.clone());
        Ok(account)
    }

    async fn search_customers(&self, id: &str) -> Result<Vec<Customer>> {
        Ok(self
            .customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| c.id == id)
            .cloned()
            .collect())
    }

    async fn create_customer(&self, request: CustomerRequest) -> Result<CustomerResult> {
        let mut customers = self.customers.write().unwrap_or_else(PoisonError::into_inner);

        let mut errors = ValidationErrors::new();
        if let Some(id) = &request.id {
            if customers.iter().any(|c| &c.id == id) {
                errors.add_at(
                    ["customer"],
                    ValidationErrorEntry::new("91609", "Customer ID has already been taken.").with_attribute("id"),
                );
            }
        }
        if let Some(email) = &request.details.email {
            if !email.contains('@') {
                errors.add_at(
                    ["customer"],
                    ValidationErrorEntry::new("81604", "Email is an invalid format.").with_attribute("email"),
                );
            }
        }
        if !errors.is_empty() {
            return Ok(GatewayResult::Invalid(ValidationFailure {
                message: errors.messages(),
                errors,
                transaction: None,
            }));
        }

        let details = request.details;
        let customer = Customer {
            id: request.id.unwrap_or_else(short_id),
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            company: details.company,
            phone: details.phone,
            created_at: Some(Utc::now()),
        };
        customers.push(customer.clone());
        Ok(GatewayResult::Success(customer))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{CustomerDetails, classify, format_errors};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_valid_nonce_settles() {
        let gateway = MockGateway::new();
        let result = gateway
            .sale(SaleRequest::new(dec!(10.00), VALID_NONCE))
            .await
            .unwrap();

        assert!(result.is_success());
        let transaction = result.transaction().unwrap().clone();
        assert_eq!(transaction.status, TransactionStatus::SubmittedForSettlement);

        let found = gateway.find_transaction(&transaction.id).await.unwrap();
        assert_eq!(found, transaction);
        assert!(classify(&found.status).is_success());
    }

    #[tokio::test]
    async fn test_declined_nonce_records_transaction() {
        let gateway = MockGateway::new();
        let result = gateway
            .sale(SaleRequest::new(dec!(10.00), PROCESSOR_DECLINED_NONCE))
            .await
            .unwrap();

        assert!(!result.is_success());
        let transaction = result.transaction().unwrap();
        assert_eq!(transaction.status, TransactionStatus::ProcessorDeclined);
        assert!(gateway.find_transaction(&transaction.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_gateway_rejected_prefix() {
        let gateway = MockGateway::new();
        let result = gateway
            .sale(SaleRequest::new(dec!(10.00), "fake-gateway-rejected-fraud-nonce"))
            .await
            .unwrap();
        assert_eq!(result.transaction().unwrap().status, TransactionStatus::GatewayRejected);
    }

    #[tokio::test]
    async fn test_invalid_sale_errors_in_order() {
        let gateway = MockGateway::new();
        let result = gateway.sale(SaleRequest::new(dec!(0), " ")).await.unwrap();

        let GatewayResult::Invalid(failure) = result else {
            panic!("expected validation failure");
        };
        assert!(failure.transaction.is_none());
        assert_eq!(
            format_errors(&failure.errors.deep_errors()),
            "Error: 81531: Amount must be greater than zero.\nError: 91508: Cannot determine payment method.\n"
        );
    }

    #[tokio::test]
    async fn test_authorize_only() {
        let gateway = MockGateway::new();
        let mut request = SaleRequest::new(dec!(5), VALID_NONCE);
        request.submit_for_settlement = false;

        let result = gateway.sale(request).await.unwrap();
        assert_eq!(result.transaction().unwrap().status, TransactionStatus::Authorized);
    }

    #[tokio::test]
    async fn test_missing_transaction() {
        let gateway = MockGateway::new();
        let err = gateway.find_transaction("missing").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_customers() {
        let gateway = MockGateway::new();
        let request = CustomerRequest {
            id: Some("the_customer_id".into()),
            details: CustomerDetails {
                first_name: Some("Jen".into()),
                email: Some("jen@example.com".into()),
                ..Default::default()
            },
        };

        assert!(gateway.create_customer(request.clone()).await.unwrap().is_success());
        let duplicate = gateway.create_customer(request).await.unwrap();
        assert!(!duplicate.is_success());

        let found = gateway.search_customers("the_customer_id").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name.as_deref(), Some("Jen"));
        assert!(gateway.search_customers("someone_else").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merchant_accounts() {
        let gateway = MockGateway::new();
        assert_eq!(gateway.merchant_accounts().await.unwrap().len(), 1);

        let rejected = gateway
            .create_merchant_account(MerchantAccountRequest::default())
            .await;
        assert!(rejected.is_err());

        let created = gateway
            .create_merchant_account(MerchantAccountRequest {
                id: Some("sub_merchant".into()),
                tos_accepted: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.master_merchant_account_id.as_deref(), Some(DEFAULT_MERCHANT_ACCOUNT));
        assert_eq!(gateway.merchant_accounts().await.unwrap().len(), 2);
    }
}
