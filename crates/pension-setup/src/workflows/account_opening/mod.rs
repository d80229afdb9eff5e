//! Pension account opening: background check, id issuance, persistence, and
//! notification sequenced behind a single decision.

pub mod collaborators;
pub mod domain;
pub(crate) mod risk;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use collaborators::{
    AccountOpenedEvent, AccountStore, BackgroundCheckError, BackgroundCheckProvider,
    EventNotifier, IdIssuanceError, NotificationError, PersistenceError, ReferenceIdIssuer,
};
pub use domain::{
    AccountId, AccountOpeningStatus, Applicant, BackgroundCheckResult, CorrelationToken,
    UNACCEPTABLE_RISK_PROFILE,
};
pub use risk::{DeclineReason, RiskDecision};
pub use router::account_router;
pub use service::{AccountOpeningError, AccountOpeningService};
