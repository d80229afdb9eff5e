use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::account_opening::collaborators::{
    AccountStore, BackgroundCheckError, BackgroundCheckProvider, EventNotifier, IdIssuanceError,
    NotificationError, PersistenceError, ReferenceIdIssuer,
};
use crate::workflows::account_opening::domain::{
    AccountId, Applicant, BackgroundCheckResult, CorrelationToken,
};
use crate::workflows::account_opening::{
    account_router, AccountOpeningError, AccountOpeningService, AccountOpeningStatus,
};

pub(super) const FIRST_NAME: &str = "John";
pub(super) const LAST_NAME: &str = "Smith";
pub(super) const TAX_ID: &str = "123XYZ9";
pub(super) const ACCOUNT_ID: &str = "some_id";

pub(super) fn date_of_birth() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date")
}

pub(super) fn applicant() -> Applicant {
    Applicant {
        first_name: FIRST_NAME.to_string(),
        last_name: LAST_NAME.to_string(),
        tax_id: TAX_ID.to_string(),
        date_of_birth: date_of_birth(),
    }
}

pub(super) fn acceptable_result() -> BackgroundCheckResult {
    BackgroundCheckResult::new("something_not_unacceptable", 100)
}

/// Collaborator invocation captured in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Call {
    Confirm {
        first_name: String,
        last_name: String,
        tax_id: String,
        date_of_birth: NaiveDate,
    },
    ObtainId {
        first_name: String,
        correlation: CorrelationToken,
        last_name: String,
        tax_id: String,
        date_of_birth: NaiveDate,
    },
    Save {
        account_id: AccountId,
        first_name: String,
        last_name: String,
        tax_id: String,
        date_of_birth: NaiveDate,
        background_check: BackgroundCheckResult,
    },
    Notify {
        account_id: AccountId,
    },
}

impl Call {
    pub(super) fn name(&self) -> &'static str {
        match self {
            Call::Confirm { .. } => "confirm",
            Call::ObtainId { .. } => "obtain_id",
            Call::Save { .. } => "save",
            Call::Notify { .. } => "notify",
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    fn record(&self, call: Call) {
        self.calls.lock().expect("call log mutex poisoned").push(call);
    }

    pub(super) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("call log mutex poisoned").clone()
    }

    pub(super) fn names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }
}

pub(super) struct ScriptedBackgroundChecks {
    log: CallLog,
    response: Result<Option<BackgroundCheckResult>, BackgroundCheckError>,
}

impl BackgroundCheckProvider for ScriptedBackgroundChecks {
    fn confirm(
        &self,
        first_name: &str,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Option<BackgroundCheckResult>, BackgroundCheckError> {
        self.log.record(Call::Confirm {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            tax_id: tax_id.to_string(),
            date_of_birth,
        });
        self.response.clone()
    }
}

pub(super) struct ScriptedIdIssuer {
    log: CallLog,
    response: Result<AccountId, IdIssuanceError>,
}

impl ReferenceIdIssuer for ScriptedIdIssuer {
    fn obtain_id(
        &self,
        first_name: &str,
        correlation: &CorrelationToken,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
    ) -> Result<AccountId, IdIssuanceError> {
        self.log.record(Call::ObtainId {
            first_name: first_name.to_string(),
            correlation: correlation.clone(),
            last_name: last_name.to_string(),
            tax_id: tax_id.to_string(),
            date_of_birth,
        });
        self.response.clone()
    }
}

pub(super) struct RecordingStore {
    log: CallLog,
    response: Result<bool, PersistenceError>,
}

impl AccountStore for RecordingStore {
    fn save(
        &self,
        account_id: &AccountId,
        first_name: &str,
        last_name: &str,
        tax_id: &str,
        date_of_birth: NaiveDate,
        background_check: &BackgroundCheckResult,
    ) -> Result<bool, PersistenceError> {
        self.log.record(Call::Save {
            account_id: account_id.clone(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            tax_id: tax_id.to_string(),
            date_of_birth,
            background_check: background_check.clone(),
        });
        self.response.clone()
    }
}

pub(super) struct RecordingNotifier {
    log: CallLog,
    response: Result<(), NotificationError>,
}

impl EventNotifier for RecordingNotifier {
    fn notify(&self, account_id: &AccountId) -> Result<(), NotificationError> {
        self.log.record(Call::Notify {
            account_id: account_id.clone(),
        });
        self.response.clone()
    }
}

pub(super) type TestService = AccountOpeningService<
    ScriptedBackgroundChecks,
    ScriptedIdIssuer,
    RecordingStore,
    RecordingNotifier,
>;

/// Collaborator responses for a single test. Defaults describe the happy path.
pub(super) struct Scenario {
    pub(super) background_check: Result<Option<BackgroundCheckResult>, BackgroundCheckError>,
    pub(super) account_id: Result<AccountId, IdIssuanceError>,
    pub(super) save: Result<bool, PersistenceError>,
    pub(super) notify: Result<(), NotificationError>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            background_check: Ok(Some(acceptable_result())),
            account_id: Ok(AccountId(ACCOUNT_ID.to_string())),
            save: Ok(true),
            notify: Ok(()),
        }
    }
}

pub(super) fn build_service(scenario: Scenario) -> (TestService, CallLog) {
    let log = CallLog::default();
    let service = AccountOpeningService::new(
        Arc::new(ScriptedBackgroundChecks {
            log: log.clone(),
            response: scenario.background_check,
        }),
        Arc::new(ScriptedIdIssuer {
            log: log.clone(),
            response: scenario.account_id,
        }),
        Arc::new(RecordingStore {
            log: log.clone(),
            response: scenario.save,
        }),
        Arc::new(RecordingNotifier {
            log: log.clone(),
            response: scenario.notify,
        }),
    );
    (service, log)
}

pub(super) fn open(service: &TestService) -> Result<AccountOpeningStatus, AccountOpeningError> {
    service.open_account(FIRST_NAME, LAST_NAME, TAX_ID, date_of_birth())
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    account_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
