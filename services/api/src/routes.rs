use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use pension_setup::workflows::account_opening::{
    account_router, AccountOpeningService, AccountStore, BackgroundCheckProvider, EventNotifier,
    ReferenceIdIssuer,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_account_routes<B, I, S, N>(
    service: Arc<AccountOpeningService<B, I, S, N>>,
) -> axum::Router
where
    B: BackgroundCheckProvider + 'static,
    I: ReferenceIdIssuer + 'static,
    S: AccountStore + 'static,
    N: EventNotifier + 'static,
{
    account_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryCollaborators;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use pension_setup::config::BackgroundCheckDefaults;
    use pension_setup::workflows::account_opening::{
        AccountId, BackgroundCheckResult, UNACCEPTABLE_RISK_PROFILE,
    };
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn defaults() -> BackgroundCheckDefaults {
        BackgroundCheckDefaults {
            risk_profile: "LOW".to_string(),
            upper_account_limit: 50_000,
        }
    }

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn open_request(tax_id: &str) -> Request<Body> {
        let body = json!({
            "first_name": "John",
            "last_name": "Smith",
            "tax_id": tax_id,
            "date_of_birth": "1990-01-01",
        });
        Request::post("/api/v1/accounts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn account_route_persists_and_announces() {
        let collaborators = InMemoryCollaborators::new(&defaults());
        let router = with_account_routes(Arc::new(collaborators.service()))
            .layer(Extension(app_state(true)));

        let response = router
            .oneshot(open_request("123XYZ9"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = collaborators
            .store
            .get(&AccountId("acct-000001".to_string()))
            .expect("account stored");
        assert_eq!(stored.background_check.upper_account_limit, 50_000);
        assert_eq!(collaborators.notifier.events().len(), 1);
    }

    #[tokio::test]
    async fn account_route_declines_high_risk_without_side_effects() {
        let collaborators = InMemoryCollaborators::new(&defaults());
        collaborators.background_checks.set_result(
            "666BAD1",
            Some(BackgroundCheckResult::new(UNACCEPTABLE_RISK_PROFILE, 0)),
        );
        let router = with_account_routes(Arc::new(collaborators.service()));

        let response = router
            .oneshot(open_request("666BAD1"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(collaborators.store.accounts().is_empty());
        assert!(collaborators.notifier.events().is_empty());
    }
}
