//! HTTP request handlers for the Daily Payment Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_day;
use crate::error::EngineError;
use crate::models::DayScope;

use super::request::{
    ActorQuery, AdjustmentRequest, AuditQuery, CalculationRequest, CloseDayRequest,
    HourOverrideRequest, PaymentStatusRequest, ReopenDayRequest, ScopeQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/days/:date", get(get_day_handler))
        .route("/days/:date/overrides", post(set_override_handler))
        .route(
            "/days/:date/overrides/:person_id",
            delete(clear_override_handler),
        )
        .route("/days/:date/adjustments", post(add_adjustment_handler))
        .route(
            "/days/:date/adjustments/:adjustment_id",
            delete(remove_adjustment_handler),
        )
        .route("/days/:date/payments", post(set_payment_status_handler))
        .route("/days/:date/close", post(close_day_handler))
        .route("/days/:date/reopen", post(reopen_day_handler))
        .route("/audit", get(audit_log_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Converts a JSON body rejection into a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Recomputes the whole day after a mutation.
async fn day_after_mutation(state: &AppState, date: NaiveDate, correlation_id: Uuid) -> Response {
    let ledger = state.ledger().read().await;
    match ledger.compute_day(date, &DayScope::All, state.config()) {
        Ok(context) => json_response(StatusCode::OK, context),
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for POST /calculate endpoint.
///
/// Computes one day from the records in the request body, without touching
/// the ledger.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match compute_day(request.input(), request.date, &request.scope(), state.config()) {
        Ok(context) => {
            info!(
                correlation_id = %correlation_id,
                date = %request.date,
                people_count = context.totals.people_count,
                payable_total = %context.totals.payable_total,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, context)
        }
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for GET /days/:date endpoint.
async fn get_day_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Query(query): Query<ScopeQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let scope = query.scope();
    info!(correlation_id = %correlation_id, date = %date, scope = %scope, "Computing day");

    let ledger = state.ledger().read().await;
    match ledger.compute_day(date, &scope, state.config()) {
        Ok(context) => json_response(StatusCode::OK, context),
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for POST /days/:date/overrides endpoint.
async fn set_override_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    payload: Result<Json<HourOverrideRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, date = %date, "Setting hour override");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };
    let actor = request.author.clone();
    let hour_override = request.into_override(date);

    match state
        .mutate(|ledger, _| ledger.set_hour_override(hour_override, &actor))
        .await
    {
        Ok(()) => day_after_mutation(&state, date, correlation_id).await,
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for DELETE /days/:date/overrides/:person_id endpoint.
async fn clear_override_handler(
    State(state): State<AppState>,
    Path((date, person_id)): Path<(NaiveDate, String)>,
    Query(query): Query<ActorQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        date = %date,
        person_id = %person_id,
        "Clearing hour override"
    );

    match state
        .mutate(|ledger, _| ledger.clear_hour_override(&person_id, date, &query.actor))
        .await
    {
        Ok(()) => day_after_mutation(&state, date, correlation_id).await,
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for POST /days/:date/adjustments endpoint.
async fn add_adjustment_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    payload: Result<Json<AdjustmentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, date = %date, "Adding adjustment");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };
    let actor = request.actor.clone();
    let adjustment = request.into_adjustment(date);

    match state
        .mutate(|ledger, _| ledger.add_adjustment(adjustment, &actor))
        .await
    {
        Ok(()) => day_after_mutation(&state, date, correlation_id).await,
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for DELETE /days/:date/adjustments/:adjustment_id endpoint.
async fn remove_adjustment_handler(
    State(state): State<AppState>,
    Path((date, adjustment_id)): Path<(NaiveDate, String)>,
    Query(query): Query<ActorQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        date = %date,
        adjustment_id = %adjustment_id,
        "Removing adjustment"
    );

    match state
        .mutate(|ledger, _| ledger.remove_adjustment(date, &adjustment_id, &query.actor))
        .await
    {
        Ok(()) => day_after_mutation(&state, date, correlation_id).await,
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for POST /days/:date/payments endpoint.
async fn set_payment_status_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    payload: Result<Json<PaymentStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, date = %date, "Setting payment status");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };
    let actor = request.actor.clone();
    let record = request.into_record(date);

    match state
        .mutate(|ledger, _| ledger.set_payment_status(record, &actor))
        .await
    {
        Ok(()) => day_after_mutation(&state, date, correlation_id).await,
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for POST /days/:date/close endpoint.
async fn close_day_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    payload: Result<Json<CloseDayRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };
    let scope = DayScope::for_unit(request.unit_id.as_deref());
    info!(correlation_id = %correlation_id, date = %date, scope = %scope, "Closing day");

    match state
        .mutate(|ledger, config| ledger.close_day(date, scope, &request.actor, config))
        .await
    {
        Ok(closure) => {
            info!(
                correlation_id = %correlation_id,
                closure_id = %closure.id,
                lines = closure.snapshot.len(),
                "Day closed"
            );
            json_response(StatusCode::CREATED, closure)
        }
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for POST /days/:date/reopen endpoint.
async fn reopen_day_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    payload: Result<Json<ReopenDayRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };
    let scope = DayScope::for_unit(request.unit_id.as_deref());
    info!(correlation_id = %correlation_id, date = %date, scope = %scope, "Reopening day");

    match state
        .mutate(|ledger, _| ledger.reopen_day(date, &scope, &request.actor, &request.reason))
        .await
    {
        Ok(closure) => json_response(StatusCode::OK, closure),
        Err(err) => error_response(err, correlation_id),
    }
}

/// Handler for GET /audit endpoint.
async fn audit_log_handler(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, date = ?query.date, "Reading audit log");

    let ledger = state.ledger().read().await;
    match query.date {
        Some(date) => json_response(StatusCode::OK, ledger.audit_log_for(date)),
        None => json_response(StatusCode::OK, ledger.audit_log()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::ledger::{AuditEvent, DayLedger};
    use crate::models::{
        Adjustment, AdjustmentKind, DayClosure, DayPaymentContext, EmploymentType, Person,
        ScheduledShift,
    };
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_config() -> ConfigLoader {
        ConfigLoader::load("./config/demo").expect("Failed to load config")
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn person(id: &str, role: &str) -> Person {
        Person {
            id: id.to_string(),
            name: format!("Person {}", id),
            role_id: role.to_string(),
            unit_id: Some("ward_a".to_string()),
            employment_type: EmploymentType::Contractor,
            pix_key: Some(format!("{}@pix", id)),
            active: true,
        }
    }

    fn shift(id: &str, person_id: &str) -> ScheduledShift {
        ScheduledShift {
            id: id.to_string(),
            person_id: person_id.to_string(),
            date: test_date(),
            unit_id: None,
            start: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            unpaid_break_minutes: 0,
        }
    }

    fn create_test_state() -> AppState {
        let mut ledger = DayLedger::new("demo");
        ledger.upsert_person(person("p_nurse", "nurse"), "admin").unwrap();
        ledger.upsert_shift(shift("s_1", "p_nurse"), "admin").unwrap();
        AppState::with_ledger(test_config(), ledger, None)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_returns_day_context() {
        let router = create_router(AppState::new(test_config()));
        let request = serde_json::json!({
            "date": "2026-03-02",
            "people": [person("p_nurse", "nurse")],
            "shifts": [shift("s_1", "p_nurse")]
        });

        let response = router
            .oneshot(json_request("POST", "/calculate", request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let context: DayPaymentContext = body_json(response).await;
        assert_eq!(context.lines.len(), 1);
        assert_eq!(context.lines[0].base_amount, dec("200.00"));
    }

    #[tokio::test]
    async fn test_calculate_malformed_json_returns_400() {
        let router = create_router(AppState::new(test_config()));
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculate")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_calculate_missing_field_returns_validation_error() {
        let router = create_router(AppState::new(test_config()));
        let response = router
            .oneshot(json_request("POST", "/calculate", serde_json::json!({ "people": [] })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("date"));
    }

    #[tokio::test]
    async fn test_calculate_negative_rule_returns_400() {
        let router = create_router(AppState::new(test_config()));
        let request = serde_json::json!({
            "date": "2026-03-02",
            "people": [person("p_nurse", "nurse")],
            "shifts": [shift("s_1", "p_nurse")],
            "rules": [{
                "id": "r_bad",
                "scope": { "person": "p_nurse" },
                "kind": "hourly",
                "amount": "-1"
            }]
        });

        let response = router
            .oneshot(json_request("POST", "/calculate", request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_PAYMENT_RULE");
    }

    #[tokio::test]
    async fn test_get_day_from_ledger() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/days/2026-03-02?unit=ward_a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let context: DayPaymentContext = body_json(response).await;
        assert_eq!(context.scope, DayScope::Unit("ward_a".to_string()));
        assert_eq!(context.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_override_then_clear() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/days/2026-03-02/overrides",
                serde_json::json!({ "person_id": "p_nurse", "hours": "4", "author": "manager" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let context: DayPaymentContext = body_json(response).await;
        assert_eq!(context.lines[0].base_amount, dec("100.00"));

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/days/2026-03-02/overrides/p_nurse?actor=manager")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let context: DayPaymentContext = body_json(response).await;
        assert_eq!(context.lines[0].base_amount, dec("200.00"));
    }

    #[tokio::test]
    async fn test_override_for_unknown_person_returns_404() {
        let response = create_router(create_test_state())
            .oneshot(json_request(
                "POST",
                "/days/2026-03-02/overrides",
                serde_json::json!({ "person_id": "p_ghost", "hours": "4" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_missing_adjustment_returns_404() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/days/2026-03-02/adjustments/adj_missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "RECORD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_remove_adjustment_under_wrong_date_returns_404() {
        let state = create_test_state();
        state
            .mutate(|ledger, _| {
                ledger.add_adjustment(
                    Adjustment {
                        id: "adj_tue".to_string(),
                        person_id: Some("p_nurse".to_string()),
                        date: test_date().succ_opt().unwrap(),
                        kind: AdjustmentKind::Bonus,
                        amount: dec("20"),
                        description: None,
                    },
                    "manager",
                )
            })
            .await
            .unwrap();

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/days/2026-03-02/adjustments/adj_tue")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "RECORD_NOT_FOUND");
        assert_eq!(state.ledger().read().await.adjustments().len(), 1);

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/days/2026-03-03/adjustments/adj_tue")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.ledger().read().await.adjustments().is_empty());
    }

    #[tokio::test]
    async fn test_closed_day_rejects_adjustment_with_409() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/days/2026-03-02/close",
                serde_json::json!({ "actor": "manager" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let closure: DayClosure = body_json(response).await;
        assert_eq!(closure.snapshot.len(), 1);

        let response = create_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/days/2026-03-02/adjustments",
                serde_json::json!({ "person_id": "p_nurse", "kind": "bonus", "amount": "50" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "DAY_LOCKED");
    }

    #[tokio::test]
    async fn test_reopen_without_closure_returns_409() {
        let response = create_router(create_test_state())
            .oneshot(json_request(
                "POST",
                "/days/2026-03-02/reopen",
                serde_json::json!({ "actor": "director", "reason": "late entry" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "DAY_NOT_CLOSED");
    }

    #[tokio::test]
    async fn test_payment_status_on_closed_day() {
        let state = create_test_state();
        create_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/days/2026-03-02/close",
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        let response = create_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/days/2026-03-02/payments",
                serde_json::json!({ "person_id": "p_nurse", "status": "paid", "reference": "E2E-1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let context: DayPaymentContext = body_json(response).await;
        assert!(context.read_only);
        assert_eq!(context.pix_summary.entries[0].status, crate::models::PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_audit_log_lists_events() {
        let state = create_test_state();
        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/audit?date=2026-03-02")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let events: Vec<AuditEvent> = body_json(response).await;
        // Only the shift is day-scoped; the person upsert has no date.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sequence, 2);
    }
}
