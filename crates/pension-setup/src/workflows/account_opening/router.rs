use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::collaborators::{
    AccountStore, BackgroundCheckProvider, EventNotifier, ReferenceIdIssuer,
};
use super::domain::{AccountOpeningStatus, Applicant};
use super::service::AccountOpeningService;

/// Router builder exposing the account opening endpoint.
pub fn account_router<B, I, S, N>(service: Arc<AccountOpeningService<B, I, S, N>>) -> Router
where
    B: BackgroundCheckProvider + 'static,
    I: ReferenceIdIssuer + 'static,
    S: AccountStore + 'static,
    N: EventNotifier + 'static,
{
    Router::new()
        .route("/api/v1/accounts", post(open_handler::<B, I, S, N>))
        .with_state(service)
}

pub(crate) async fn open_handler<B, I, S, N>(
    State(service): State<Arc<AccountOpeningService<B, I, S, N>>>,
    axum::Json(applicant): axum::Json<Applicant>,
) -> Response
where
    B: BackgroundCheckProvider + 'static,
    I: ReferenceIdIssuer + 'static,
    S: AccountStore + 'static,
    N: EventNotifier + 'static,
{
    match service.open(&applicant) {
        Ok(status) => {
            let code = match status {
                AccountOpeningStatus::Opened => StatusCode::CREATED,
                AccountOpeningStatus::Declined => StatusCode::OK,
            };
            let payload = json!({ "status": status.label() });
            (code, axum::Json(payload)).into_response()
        }
        // Side effects before the failed step may have landed.
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "stage": error.stage(),
                "outcome": "indeterminate",
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
