//! Transaction Status
//!
//! Lifecycle codes reported by the gateway for a payment attempt, and the
//! fixed allowlist of codes that count as a successful checkout.

use serde::{Deserialize, Serialize};

/// Where a payment attempt stands, as reported by the gateway
///
/// Parsing never fails: a code this build does not know is kept verbatim in
/// [`TransactionStatus::Unrecognized`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    AuthorizationExpired,
    Authorized,
    Authorizing,
    Failed,
    GatewayRejected,
    ProcessorDeclined,
    Settled,
    SettlementConfirmed,
    SettlementDeclined,
    SettlementPending,
    Settling,
    SubmittedForSettlement,
    Voided,
    /// A code added to the gateway after this build
    Unrecognized(String),
}

/// Statuses shown as a successful checkout.
///
/// Membership is closed: every status not listed here, including
/// [`TransactionStatus::Unrecognized`], is a failure.
pub const SUCCESS_STATUSES: [TransactionStatus; 7] = [
    TransactionStatus::Authorizing,
    TransactionStatus::Authorized,
    TransactionStatus::Settled,
    TransactionStatus::Settling,
    TransactionStatus::SettlementConfirmed,
    TransactionStatus::SettlementPending,
    TransactionStatus::SubmittedForSettlement,
];

impl TransactionStatus {
    /// Wire form of the status (`submitted_for_settlement`, ...)
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AuthorizationExpired => "authorization_expired",
            Self::Authorized => "authorized",
            Self::Authorizing => "authorizing",
            Self::Failed => "failed",
            Self::GatewayRejected => "gateway_rejected",
            Self::ProcessorDeclined => "processor_declined",
            Self::Settled => "settled",
            Self::SettlementConfirmed => "settlement_confirmed",
            Self::SettlementDeclined => "settlement_declined",
            Self::SettlementPending => "settlement_pending",
            Self::Settling => "settling",
            Self::SubmittedForSettlement => "submitted_for_settlement",
            Self::Voided => "voided",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Parse a status code.
    ///
    /// Accepts the lowercase wire form and the uppercase enum form used by
    /// the GraphQL API (`SUBMITTED_FOR_SETTLEMENT`).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "authorization_expired" => Self::AuthorizationExpired,
            "authorized" => Self::Authorized,
            "authorizing" => Self::Authorizing,
            "failed" => Self::Failed,
            "gateway_rejected" => Self::GatewayRejected,
            "processor_declined" => Self::ProcessorDeclined,
            "settled" => Self::Settled,
            "settlement_confirmed" => Self::SettlementConfirmed,
            "settlement_declined" => Self::SettlementDeclined,
            "settlement_pending" => Self::SettlementPending,
            "settling" => Self::Settling,
            "submitted_for_settlement" => Self::SubmittedForSettlement,
            "voided" => Self::Voided,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Whether this status is in [`SUCCESS_STATUSES`]
    #[must_use]
    pub fn is_success(&self) -> bool {
        SUCCESS_STATUSES.contains(self)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TransactionStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for TransactionStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_casings() {
        assert_eq!(TransactionStatus::parse("settled"), TransactionStatus::Settled);
        assert_eq!(
            TransactionStatus::parse("SUBMITTED_FOR_SETTLEMENT"),
            TransactionStatus::SubmittedForSettlement
        );
    }

    #[test]
    fn test_unknown_status_kept_verbatim() {
        let status = TransactionStatus::parse("Settlement_Reversed");
        assert_eq!(status, TransactionStatus::Unrecognized("Settlement_Reversed".into()));
        assert_eq!(status.to_string(), "Settlement_Reversed");
        assert!(!status.is_success());
    }

    #[test]
    fn test_success_set_membership() {
        for status in &SUCCESS_STATUSES {
            assert!(status.is_success(), "{status} should be a success");
        }
        for status in [
            TransactionStatus::AuthorizationExpired,
            TransactionStatus::Failed,
            TransactionStatus::GatewayRejected,
            TransactionStatus::ProcessorDeclined,
            TransactionStatus::SettlementDeclined,
            TransactionStatus::Voided,
        ] {
            assert!(!status.is_success(), "{status} should not be a success");
        }
    }

    #[test]
    fn test_serde_uses_wire_form() {
        let json = serde_json::to_string(&TransactionStatus::SettlementPending).unwrap();
        assert_eq!(json, "\"settlement_pending\"");

        let parsed: TransactionStatus = serde_json::from_str("\"voided\"").unwrap();
        assert_eq!(parsed, TransactionStatus::Voided);
    }
}
