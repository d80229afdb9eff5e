use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AccountId, BackgroundCheckResult, CorrelationToken};

/// Risk assessment hook (credit bureau, KYC vendor, ...).
///
/// `Ok(None)` means the provider holds no record for the applicant.
pub trait BackgroundCheckProvider: Send + Sync {
    fn confirm(
        &self,
        first_name: &str,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Option<BackgroundCheckResult>, BackgroundCheckError>;
}

/// Issues unique account identifiers. Uniqueness under concurrent calls is the
/// issuer's responsibility.
pub trait ReferenceIdIssuer: Send + Sync {
    fn obtain_id(
        &self,
        first_name: &str,
        correlation: &CorrelationToken,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
    ) -> Result<AccountId, IdIssuanceError>;
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AccountStore: Send + Sync {
    /// Returns whether the store reports the write as applied. Callers do not
    /// branch on it; failures come back as `Err`.
    fn save(
        &self,
        account_id: &AccountId,
        first_name: &str,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
        background_check: &BackgroundCheckResult,
    ) -> Result<bool, PersistenceError>;
}

/// Outbound event hook announcing an opened account.
pub trait EventNotifier: Send + Sync {
    fn notify(&self, account_id: &AccountId) -> Result<(), NotificationError>;
}

/// Event payload published once an account exists in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpenedEvent {
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackgroundCheckError {
    #[error("background check io failure: {0}")]
    Io(String),
    #[error("background check provider rejected request: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdIssuanceError {
    #[error("account id already issued: {0}")]
    Collision(String),
    #[error("id issuer unavailable: {0}")]
    Unavailable(String),
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("account already exists")]
    Conflict,
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}
