//! GraphQL documents sent to Braintree

pub const TRANSACTION_FIELDS: &str = r"
fragment TransactionFields on Transaction {
  id
  legacyId
  status
  createdAt
  merchantAccountId
  amount { value currencyCode }
  processorResponse { legacyCode message }
  customer { id legacyId firstName lastName email company phoneNumber createdAt }
  paymentMethodSnapshot {
    __typename
    ... on CreditCardDetails { brandCode last4 expirationMonth expirationYear cardholderName }
    ... on PayPalTransactionDetails { payer { email } }
  }
}
";

pub const CUSTOMER_FIELDS: &str = r"
fragment CustomerFields on Customer {
  id
  legacyId
  firstName
  lastName
  email
  company
  phoneNumber
  createdAt
}
";

pub const PING: &str = "query Ping { ping }";

pub const CLIENT_TOKEN: &str = r"
mutation ClientToken($input: CreateClientTokenInput) {
  createClientToken(input: $input) { clientToken }
}
";

pub const CHARGE: &str = r"
mutation Charge($input: ChargePaymentMethodInput!) {
  chargePaymentMethod(input: $input) { transaction { ...TransactionFields } }
}
";

pub const AUTHORIZE: &str = r"
mutation Authorize($input: AuthorizePaymentMethodInput!) {
  authorizePaymentMethod(input: $input) { transaction { ...TransactionFields } }
}
";

pub const FIND_TRANSACTION: &str = r"
query FindTransaction($id: ID!) {
  node(id: $id) { ... on Transaction { ...TransactionFields } }
}
";

pub const SEARCH_TRANSACTIONS: &str = r"
query SearchTransactions($input: TransactionSearchInput!) {
  search { transactions(input: $input) { edges { node { ...TransactionFields } } } }
}
";

pub const MERCHANT_ACCOUNTS: &str = r"
query MerchantAccounts {
  viewer { merchant { merchantAccounts { edges { node { id currencyCode status } } } } }
}
";

pub const SEARCH_CUSTOMERS: &str = r"
query SearchCustomers($input: CustomerSearchInput!) {
  search { customers(input: $input) { edges { node { ...CustomerFields } } } }
}
";

pub const CREATE_CUSTOMER: &str = r"
mutation CreateCustomer($input: CreateCustomerInput!) {
  createCustomer(input: $input) { customer { ...CustomerFields } }
}
";

/// Append the fragments a document refers to
pub fn with_fragments(document: &str) -> String {
    let mut query = document.to_string();
    if document.contains("...TransactionFields") {
        query.push_str(TRANSACTION_FIELDS);
    }
    if document.contains("...CustomerFields") {
        query.push_str(CUSTOMER_FIELDS);
    }
    query
}
