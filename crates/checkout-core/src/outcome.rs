//! Outcome Classification
//!
//! Maps a transaction status to what the checkout result page shows.

use serde::{Deserialize, Serialize};

use crate::status::TransactionStatus;

const SUCCESS_HEADER: &str = "Sweet Success!";
const SUCCESS_MESSAGE: &str =
    "Your test transaction has been successfully processed. See the Braintree API response and try again.";
const FAILURE_HEADER: &str = "Transaction Failed";

/// Result page icon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Success,
    Fail,
}

impl Icon {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user sees for a finished transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeResult {
    pub header: String,
    pub icon: Icon,
    pub message: String,
}

impl OutcomeResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.icon == Icon::Success
    }
}

/// Classify a transaction status into a result page.
///
/// Statuses in [`crate::SUCCESS_STATUSES`] get the fixed success result.
/// Everything else fails, and the message names the raw status so the
/// cause is visible. The message is plain text; escaping belongs to
/// whatever renders it.
#[must_use]
pub fn classify(status: &TransactionStatus) -> OutcomeResult {
    if status.is_success() {
        OutcomeResult {
            header: SUCCESS_HEADER.into(),
            icon: Icon::Success,
            message: SUCCESS_MESSAGE.into(),
        }
    } else {
        OutcomeResult {
            header: FAILURE_HEADER.into(),
            icon: Icon::Fail,
            message: format!(
                "Your test transaction has a status of {status}. See the Braintree API response and try again."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SUCCESS_STATUSES;

    #[test]
    fn test_settled_is_success() {
        let result = classify(&TransactionStatus::Settled);
        assert_eq!(
            result,
            OutcomeResult {
                header: "Sweet Success!".into(),
                icon: Icon::Success,
                message: "Your test transaction has been successfully processed. See the Braintree API response and try again.".into(),
            }
        );
    }

    #[test]
    fn test_processor_declined_is_failure() {
        let result = classify(&TransactionStatus::ProcessorDeclined);
        assert_eq!(result.header, "Transaction Failed");
        assert_eq!(result.icon, Icon::Fail);
        assert_eq!(
            result.message,
            "Your test transaction has a status of processor_declined. See the Braintree API response and try again."
        );
    }

    #[test]
    fn test_every_success_status_gets_success_page() {
        for status in &SUCCESS_STATUSES {
            let result = classify(status);
            assert!(result.is_success());
            assert_eq!(result.header, "Sweet Success!");
        }
    }

    #[test]
    fn test_unrecognized_status_fails_closed() {
        for raw in ["settlement_reversed", "", "<b>odd</b>", "AUTHORIZED_LATER"] {
            let result = classify(&TransactionStatus::parse(raw));
            assert_eq!(result.icon, Icon::Fail, "{raw:?} must not classify as success");
            assert!(result.message.contains(raw));
        }
    }

    #[test]
    fn test_icon_serializes_lowercase() {
        let json = serde_json::to_value(classify(&TransactionStatus::Voided)).unwrap();
        assert_eq!(json["icon"], "fail");
    }
}
