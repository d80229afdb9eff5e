use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Risk profile label that forces a decline regardless of the account limit.
pub const UNACCEPTABLE_RISK_PROFILE: &str = "HIGH";

/// Identifier wrapper for opened accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque token handed to the id issuer alongside the applicant's fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationToken(pub String);

impl CorrelationToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifying fields supplied by the caller. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: String,
    pub last_name: String,
    pub tax_id: String,
    pub date_of_birth: NaiveDate,
}

/// Risk assessment returned by the background check provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundCheckResult {
    pub risk_profile: String,
    pub upper_account_limit: u64,
}

impl BackgroundCheckResult {
    pub fn new(risk_profile: impl Into<String>, upper_account_limit: u64) -> Self {
        Self {
            risk_profile: risk_profile.into(),
            upper_account_limit,
        }
    }

    pub fn is_unacceptable(&self) -> bool {
        self.risk_profile == UNACCEPTABLE_RISK_PROFILE
    }
}

/// Terminal outcome of a single account opening attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOpeningStatus {
    Opened,
    Declined,
}

impl AccountOpeningStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AccountOpeningStatus::Opened => "opened",
            AccountOpeningStatus::Declined => "declined",
        }
    }
}
