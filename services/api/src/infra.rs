use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use pension_setup::config::BackgroundCheckDefaults;
use pension_setup::workflows::account_opening::{
    AccountId, AccountOpenedEvent, AccountOpeningService, AccountStore, BackgroundCheckError,
    BackgroundCheckProvider, BackgroundCheckResult, CorrelationToken, EventNotifier,
    IdIssuanceError, NotificationError, PersistenceError, ReferenceIdIssuer,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryOpeningService = AccountOpeningService<
    InMemoryBackgroundCheckProvider,
    SequentialIdIssuer,
    InMemoryAccountStore,
    InMemoryEventNotifier,
>;

/// Handles kept next to the service so callers can inspect side effects.
pub(crate) struct InMemoryCollaborators {
    pub(crate) background_checks: Arc<InMemoryBackgroundCheckProvider>,
    pub(crate) id_issuer: Arc<SequentialIdIssuer>,
    pub(crate) store: Arc<InMemoryAccountStore>,
    pub(crate) notifier: Arc<InMemoryEventNotifier>,
}

impl InMemoryCollaborators {
    pub(crate) fn new(defaults: &BackgroundCheckDefaults) -> Self {
        Self {
            background_checks: Arc::new(InMemoryBackgroundCheckProvider::new(
                BackgroundCheckResult::new(
                    defaults.risk_profile.clone(),
                    defaults.upper_account_limit,
                ),
            )),
            id_issuer: Arc::new(SequentialIdIssuer::default()),
            store: Arc::new(InMemoryAccountStore::default()),
            notifier: Arc::new(InMemoryEventNotifier::default()),
        }
    }

    pub(crate) fn service(&self) -> InMemoryOpeningService {
        AccountOpeningService::new(
            self.background_checks.clone(),
            self.id_issuer.clone(),
            self.store.clone(),
            self.notifier.clone(),
        )
    }
}

/// Background check table keyed by tax id. `None` entries model applicants the
/// bureau has no record for.
#[derive(Clone)]
pub(crate) struct InMemoryBackgroundCheckProvider {
    default_result: BackgroundCheckResult,
    overrides: Arc<Mutex<HashMap<String, Option<BackgroundCheckResult>>>>,
}

impl InMemoryBackgroundCheckProvider {
    pub(crate) fn new(default_result: BackgroundCheckResult) -> Self {
        Self {
            default_result,
            overrides: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) fn set_result(&self, tax_id: &str, result: Option<BackgroundCheckResult>) {
        self.overrides
            .lock()
            .expect("background check mutex poisoned")
            .insert(tax_id.to_string(), result);
    }
}

impl BackgroundCheckProvider for InMemoryBackgroundCheckProvider {
    fn confirm(
        &self,
        _first_name: &str,
        _last_name: &str,
        tax_id: &str,
        _date_of_birth: NaiveDate,
    ) -> Result<Option<BackgroundCheckResult>, BackgroundCheckError> {
        let guard = self
            .overrides
            .lock()
            .expect("background check mutex poisoned");
        match guard.get(tax_id) {
            Some(result) => Ok(result.clone()),
            None => Ok(Some(self.default_result.clone())),
        }
    }
}

/// Issues `acct-000001`, `acct-000002`, ... and refuses to hand out an id twice.
#[derive(Default)]
pub(crate) struct SequentialIdIssuer {
    sequence: AtomicU64,
    issued: Mutex<HashSet<AccountId>>,
}

impl SequentialIdIssuer {
    #[cfg(test)]
    fn starting_at(next: u64) -> Self {
        Self {
            sequence: AtomicU64::new(next.saturating_sub(1)),
            issued: Mutex::new(HashSet::new()),
        }
    }
}

impl ReferenceIdIssuer for SequentialIdIssuer {
    fn obtain_id(
        &self,
        _first_name: &str,
        _correlation: &CorrelationToken,
        _last_name: &str,
        _tax_id: &str,
        _date_of_birth: NaiveDate,
    ) -> Result<AccountId, IdIssuanceError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = AccountId(format!("acct-{next:06}"));
        let mut issued = self.issued.lock().expect("issuer mutex poisoned");
        if !issued.insert(id.clone()) {
            return Err(IdIssuanceError::Collision(id.0));
        }
        Ok(id)
    }
}

/// Persisted view of an opened account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StoredAccount {
    pub(crate) account_id: AccountId,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) tax_id: String,
    pub(crate) date_of_birth: NaiveDate,
    pub(crate) background_check: BackgroundCheckResult,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountStore {
    accounts: Arc<Mutex<HashMap<AccountId, StoredAccount>>>,
}

impl InMemoryAccountStore {
    pub(crate) fn get(&self, account_id: &AccountId) -> Option<StoredAccount> {
        self.accounts
            .lock()
            .expect("store mutex poisoned")
            .get(account_id)
            .cloned()
    }

    pub(crate) fn accounts(&self) -> Vec<StoredAccount> {
        let guard = self.accounts.lock().expect("store mutex poisoned");
        let mut accounts: Vec<_> = guard.values().cloned().collect();
        accounts.sort_by(|a, b| a.account_id.0.cmp(&b.account_id.0));
        accounts
    }
}

impl AccountStore for InMemoryAccountStore {
    fn save(
        &self,
        account_id: &AccountId,
        first_name: &str,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
        background_check: &BackgroundCheckResult,
    ) -> Result<bool, PersistenceError> {
        let mut guard = self.accounts.lock().expect("store mutex poisoned");
        if guard.contains_key(account_id) {
            return Err(PersistenceError::Conflict);
        }
        guard.insert(
            account_id.clone(),
            StoredAccount {
                account_id: account_id.clone(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                tax_id: tax_id.to_string(),
                date_of_birth,
                background_check: background_check.clone(),
            },
        );
        Ok(true)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEventNotifier {
    events: Arc<Mutex<Vec<AccountOpenedEvent>>>,
}

impl EventNotifier for InMemoryEventNotifier {
    fn notify(&self, account_id: &AccountId) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(AccountOpenedEvent {
            account_id: account_id.clone(),
        });
        Ok(())
    }
}

impl InMemoryEventNotifier {
    pub(crate) fn events(&self) -> Vec<AccountOpenedEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
