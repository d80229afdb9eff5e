use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::collaborators::{
    AccountStore, BackgroundCheckError, BackgroundCheckProvider, EventNotifier, IdIssuanceError,
    NotificationError, PersistenceError, ReferenceIdIssuer,
};
use super::domain::{AccountOpeningStatus, Applicant, CorrelationToken};
use super::risk::{assess_risk, RiskDecision};

/// Orchestrator sequencing the background check, id issuance, persistence,
/// and notification collaborators.
///
/// The service holds no per-call state; concurrent callers share it freely.
pub struct AccountOpeningService<B, I, S, N> {
    background_checks: Arc<B>,
    id_issuer: Arc<I>,
    store: Arc<S>,
    notifier: Arc<N>,
}

static CORRELATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_correlation_token() -> CorrelationToken {
    let id = CORRELATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CorrelationToken(format!("corr-{id:06}"))
}

impl<B, I, S, N> AccountOpeningService<B, I, S, N>
where
    B: BackgroundCheckProvider + 'static,
    I: ReferenceIdIssuer + 'static,
    S: AccountStore + 'static,
    N: EventNotifier + 'static,
{
    pub fn new(
        background_checks: Arc<B>,
        id_issuer: Arc<I>,
        store: Arc<S>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            background_checks,
            id_issuer,
            store,
            notifier,
        }
    }

    /// Run the opening workflow for one applicant.
    ///
    /// An `Err` is an indeterminate outcome: earlier steps may already have
    /// taken effect and nothing is rolled back.
    pub fn open_account(
        &self,
        first_name: &str,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
    ) -> Result<AccountOpeningStatus, AccountOpeningError> {
        let background_check = self
            .background_checks
            .confirm(first_name, last_name, tax_id, date_of_birth)?;

        let decision = assess_risk(background_check.as_ref());
        let background_check = match (decision, background_check) {
            (RiskDecision::Acceptable, Some(result)) => result,
            (decision, _) => {
                info!(decision = %decision.summary(), "account opening declined");
                return Ok(AccountOpeningStatus::Declined);
            }
        };

        let correlation = next_correlation_token();
        let account_id = self.id_issuer.obtain_id(
            first_name,
            &correlation,
            last_name,
            tax_id,
            date_of_birth,
        )?;
        debug!(
            account_id = account_id.as_str(),
            correlation = correlation.as_str(),
            "account id issued"
        );

        let applied = self.store.save(
            &account_id,
            first_name,
            last_name,
            tax_id,
            date_of_birth,
            &background_check,
        )?;
        if !applied {
            warn!(
                account_id = account_id.as_str(),
                "account store reported save as not applied"
            );
        }

        self.notifier.notify(&account_id)?;

        info!(
            account_id = account_id.as_str(),
            risk_profile = %background_check.risk_profile,
            upper_account_limit = background_check.upper_account_limit,
            "account opened"
        );
        Ok(AccountOpeningStatus::Opened)
    }

    /// Convenience wrapper for callers holding a deserialized [`Applicant`].
    pub fn open(
        &self,
        applicant: &Applicant,
    ) -> Result<AccountOpeningStatus, AccountOpeningError> {
        self.open_account(
            &applicant.first_name,
            &applicant.last_name,
            &applicant.tax_id,
            applicant.date_of_birth,
        )
    }
}

/// Collaborator failure surfaced by [`AccountOpeningService::open_account`].
///
/// Each variant carries the collaborator's error value as-is.
#[derive(Debug, thiserror::Error)]
pub enum AccountOpeningError {
    #[error(transparent)]
    BackgroundCheck(#[from] BackgroundCheckError),
    #[error(transparent)]
    IdIssuance(#[from] IdIssuanceError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl AccountOpeningError {
    /// Workflow step that failed.
    pub const fn stage(&self) -> &'static str {
        match self {
            AccountOpeningError::BackgroundCheck(_) => "background_check",
            AccountOpeningError::IdIssuance(_) => "id_issuance",
            AccountOpeningError::Persistence(_) => "persistence",
            AccountOpeningError::Notification(_) => "notification",
        }
    }
}
