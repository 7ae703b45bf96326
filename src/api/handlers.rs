//! HTTP request handlers for the site payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_batch;
use crate::error::PayrollError;
use crate::models::{
    AttendanceUpdate, NewAttendance, NewMeasurement, NewPayment, NewRole, NewSite, NewWorker,
    PaymentMethod, PaymentStatus, PaymentUpdate, PayrollBatch, SiteUpdate, WorkerUpdate,
};
use crate::report::render_report;
use crate::store::AttendanceFilter;

use super::request::{BatchPaymentsRequest, DuplicateCheckRequest, MeasurementsQuery, PaymentsQuery};
use super::response::{
    ApiError, ApiErrorResponse, BatchPaymentsResponse, DuplicateCheckResponse, HealthResponse,
};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/sites", get(list_sites_handler).post(create_site_handler))
        .route("/sites/:id", put(update_site_handler).delete(delete_site_handler))
        .route("/workers", get(list_workers_handler).post(create_worker_handler))
        .route(
            "/workers/:id",
            get(get_worker_handler)
                .put(update_worker_handler)
                .delete(delete_worker_handler),
        )
        .route("/roles", get(list_roles_handler).post(create_role_handler))
        .route(
            "/attendance",
            get(list_attendance_handler).post(create_attendance_handler),
        )
        .route(
            "/attendance/:id",
            put(update_attendance_handler).delete(delete_attendance_handler),
        )
        .route(
            "/measurements",
            get(list_measurements_handler).post(create_measurement_handler),
        )
        .route("/payments", get(list_payments_handler).post(create_payment_handler))
        .route("/payments/check", post(check_payments_handler))
        .route(
            "/payments/:id",
            put(update_payment_handler).delete(delete_payment_handler),
        )
        .route("/payroll/batch", get(batch_handler))
        .route(
            "/payroll/batches",
            get(list_batches_handler).post(save_batch_handler),
        )
        .route("/payroll/batch/payments", post(batch_payments_handler))
        .route("/payroll/batch/report", get(batch_report_handler))
        .route("/stats", get(stats_handler))
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

/// Unwraps a JSON body, mapping extractor rejections to 400 responses.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
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
    Err(ApiErrorResponse::bad_request(error))
}

/// Logs a failed operation and converts the error for the response.
fn failure(correlation_id: Uuid, operation: &str, err: PayrollError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Request failed"
    );
    err.into()
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn list_sites_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let sites = state
        .store()
        .list_sites()
        .await
        .map_err(|e| failure(correlation_id, "list_sites", e))?;
    Ok(json_response(StatusCode::OK, sites))
}

async fn create_site_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewSite>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let site = parse_body(payload, correlation_id)?;
    let site = state
        .store()
        .create_site(site)
        .await
        .map_err(|e| failure(correlation_id, "create_site", e))?;
    info!(correlation_id = %correlation_id, site_id = %site.id, "Site created");
    Ok(json_response(StatusCode::CREATED, site))
}

async fn update_site_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SiteUpdate>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let update = parse_body(payload, correlation_id)?;
    let site = state
        .store()
        .update_site(&id, update)
        .await
        .map_err(|e| failure(correlation_id, "update_site", e))?;
    Ok(json_response(StatusCode::OK, site))
}

async fn delete_site_handler(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    state
        .store()
        .delete_site(&id)
        .await
        .map_err(|e| failure(correlation_id, "delete_site", e))?;
    info!(correlation_id = %correlation_id, site_id = %id, "Site deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_workers_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let workers = state
        .store()
        .fetch_roster()
        .await
        .map_err(|e| failure(correlation_id, "list_workers", e))?;
    Ok(json_response(StatusCode::OK, workers))
}

async fn get_worker_handler(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let worker = state
        .store()
        .get_worker(&id)
        .await
        .map_err(|e| failure(correlation_id, "get_worker", e))?;
    Ok(json_response(StatusCode::OK, worker))
}

async fn create_worker_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewWorker>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let worker = parse_body(payload, correlation_id)?;
    let worker = state
        .store()
        .create_worker(worker)
        .await
        .map_err(|e| failure(correlation_id, "create_worker", e))?;
    info!(
        correlation_id = %correlation_id,
        worker_id = %worker.id,
        compensation_type = %worker.compensation_type,
        "Worker created"
    );
    Ok(json_response(StatusCode::CREATED, worker))
}

async fn update_worker_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<WorkerUpdate>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let update = parse_body(payload, correlation_id)?;
    let worker = state
        .store()
        .update_worker(&id, update)
        .await
        .map_err(|e| failure(correlation_id, "update_worker", e))?;
    Ok(json_response(StatusCode::OK, worker))
}

async fn delete_worker_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    state
        .store()
        .delete_worker(&id)
        .await
        .map_err(|e| failure(correlation_id, "delete_worker", e))?;
    info!(correlation_id = %correlation_id, worker_id = %id, "Worker deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_roles_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let roles = state
        .store()
        .list_roles()
        .await
        .map_err(|e| failure(correlation_id, "list_roles", e))?;
    Ok(json_response(StatusCode::OK, roles))
}

async fn create_role_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewRole>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let role = parse_body(payload, correlation_id)?;
    let role = state
        .store()
        .create_role(role)
        .await
        .map_err(|e| failure(correlation_id, "create_role", e))?;
    Ok(json_response(StatusCode::CREATED, role))
}

async fn list_attendance_handler(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let records = state
        .store()
        .list_attendance(filter)
        .await
        .map_err(|e| failure(correlation_id, "list_attendance", e))?;
    Ok(json_response(StatusCode::OK, records))
}

async fn create_attendance_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewAttendance>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let attendance = parse_body(payload, correlation_id)?;
    let record = state
        .store()
        .create_attendance(attendance)
        .await
        .map_err(|e| failure(correlation_id, "create_attendance", e))?;
    info!(
        correlation_id = %correlation_id,
        worker_id = %record.worker_id,
        date = %record.date,
        "Attendance logged"
    );
    Ok(json_response(StatusCode::CREATED, record))
}

async fn update_attendance_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AttendanceUpdate>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let update = parse_body(payload, correlation_id)?;
    let record = state
        .store()
        .update_attendance(&id, update)
        .await
        .map_err(|e| failure(correlation_id, "update_attendance", e))?;
    Ok(json_response(StatusCode::OK, record))
}

async fn delete_attendance_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    state
        .store()
        .delete_attendance(&id)
        .await
        .map_err(|e| failure(correlation_id, "delete_attendance", e))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_measurements_handler(
    State(state): State<AppState>,
    Query(query): Query<MeasurementsQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let measurements = state
        .store()
        .list_measurements(query.worker_id.as_deref())
        .await
        .map_err(|e| failure(correlation_id, "list_measurements", e))?;
    Ok(json_response(StatusCode::OK, measurements))
}

async fn create_measurement_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewMeasurement>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let measurement = parse_body(payload, correlation_id)?;
    let record = state
        .store()
        .create_measurement(measurement)
        .await
        .map_err(|e| failure(correlation_id, "create_measurement", e))?;
    info!(
        correlation_id = %correlation_id,
        worker_id = %record.worker_id,
        period = %record.period(),
        "Measurement recorded"
    );
    Ok(json_response(StatusCode::CREATED, record))
}

async fn list_payments_handler(
    State(state): State<AppState>,
    Query(query): Query<PaymentsQuery>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let payments = state
        .store()
        .list_payments(query.site_id.as_deref())
        .await
        .map_err(|e| failure(correlation_id, "list_payments", e))?;
    Ok(json_response(StatusCode::OK, payments))
}

async fn create_payment_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewPayment>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let payment = parse_body(payload, correlation_id)?;
    let payment = state
        .store()
        .create_payment(payment)
        .await
        .map_err(|e| failure(correlation_id, "create_payment", e))?;
    info!(
        correlation_id = %correlation_id,
        payment_id = %payment.id,
        worker_id = %payment.worker_id,
        amount = %payment.amount,
        "Payment created"
    );
    Ok(json_response(StatusCode::CREATED, payment))
}

async fn update_payment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentUpdate>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let update = parse_body(payload, correlation_id)?;
    let payment = state
        .store()
        .update_payment(&id, update)
        .await
        .map_err(|e| failure(correlation_id, "update_payment", e))?;
    Ok(json_response(StatusCode::OK, payment))
}

async fn delete_payment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    state
        .store()
        .delete_payment(&id)
        .await
        .map_err(|e| failure(correlation_id, "delete_payment", e))?;
    info!(correlation_id = %correlation_id, payment_id = %id, "Payment deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for POST /payments/check: the duplicate-check gate.
async fn check_payments_handler(
    State(state): State<AppState>,
    payload: Result<Json<DuplicateCheckRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;
    let matches = state
        .store()
        .payments_in_period(&request.worker_id, request.period())
        .await
        .map_err(|e| failure(correlation_id, "check_payments", e))?;
    Ok(json_response(
        StatusCode::OK,
        DuplicateCheckResponse {
            exists: !matches.is_empty(),
            matches,
        },
    ))
}

/// Computes the batch for today, logging under `correlation_id`.
async fn current_batch(state: &AppState, correlation_id: Uuid) -> Result<PayrollBatch, ApiErrorResponse> {
    let today = state.today();
    info!(correlation_id = %correlation_id, today = %today, "Computing payroll batch");
    compute_batch(state.store(), today, state.settings().default_cut_weekday)
        .await
        .map_err(|e| failure(correlation_id, "compute_batch", e))
}

/// Handler for GET /payroll/batch.
async fn batch_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let batch = current_batch(&state, correlation_id).await?;
    Ok(json_response(StatusCode::OK, batch))
}

/// Handler for POST /payroll/batches: computes and persists the batch.
async fn save_batch_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let batch = current_batch(&state, correlation_id).await?;

    let Some(draft) = batch.to_draft() else {
        warn!(correlation_id = %correlation_id, "Batch has no payable items");
        return Err(ApiErrorResponse::bad_request(ApiError::validation_error(
            "Batch has no payable items to save",
        )));
    };

    let saved = state
        .store()
        .save_batch(draft)
        .await
        .map_err(|e| failure(correlation_id, "save_batch", e))?;
    info!(
        correlation_id = %correlation_id,
        batch_id = %saved.id,
        period = %saved.period,
        items = saved.items.len(),
        total = %saved.total_amount,
        "Payroll batch saved"
    );
    Ok(json_response(StatusCode::CREATED, saved))
}

async fn list_batches_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let batches = state
        .store()
        .list_batches()
        .await
        .map_err(|e| failure(correlation_id, "list_batches", e))?;
    Ok(json_response(StatusCode::OK, batches))
}

/// Handler for POST /payroll/batch/payments.
///
/// Creates one pending pix payment per computed line item, dated at the end of
/// the item's period. Items whose worker already has a payment in that period,
/// or whose amount is not positive, are skipped. Every planned payment is
/// validated before the first one is written.
async fn batch_payments_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchPaymentsRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;
    let batch = current_batch(&state, correlation_id).await?;

    let mut planned = Vec::new();
    let mut skipped = 0;
    for item in batch.computed_items() {
        if item.amount <= Decimal::ZERO {
            warn!(
                correlation_id = %correlation_id,
                worker_id = %item.worker_id,
                amount = %item.amount,
                "Non-positive amount, skipping"
            );
            skipped += 1;
            continue;
        }

        let existing = state
            .store()
            .payments_in_period(&item.worker_id, item.period)
            .await
            .map_err(|e| failure(correlation_id, "check_payments", e))?;
        if !existing.is_empty() {
            info!(
                correlation_id = %correlation_id,
                worker_id = %item.worker_id,
                period = %item.period,
                "Payment already exists for period, skipping"
            );
            skipped += 1;
            continue;
        }

        planned.push(NewPayment {
            site_id: request.site_id.clone(),
            worker_id: item.worker_id.clone(),
            amount: item.amount,
            payment_date: item.period.end_date,
            method: PaymentMethod::Pix,
            status: PaymentStatus::Pending,
        });
    }

    for payment in &planned {
        payment
            .validate()
            .map_err(|e| failure(correlation_id, "validate_payment", e))?;
    }
    if !planned.is_empty() {
        let sites = state
            .store()
            .list_sites()
            .await
            .map_err(|e| failure(correlation_id, "list_sites", e))?;
        if !sites.iter().any(|site| site.id == request.site_id) {
            return Err(failure(
                correlation_id,
                "create_payment",
                PayrollError::not_found("site", &request.site_id),
            ));
        }
    }

    let mut payments = Vec::with_capacity(planned.len());
    for payment in planned {
        let payment = state
            .store()
            .create_payment(payment)
            .await
            .map_err(|e| failure(correlation_id, "create_payment", e))?;
        payments.push(payment);
    }

    info!(
        correlation_id = %correlation_id,
        created = payments.len(),
        skipped,
        "Payments created from batch"
    );
    Ok(json_response(
        StatusCode::OK,
        BatchPaymentsResponse {
            created: payments.len(),
            skipped,
            payments,
        },
    ))
}

/// Handler for GET /payroll/batch/report.
async fn batch_report_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let batch = current_batch(&state, correlation_id).await?;
    let report = render_report(&batch, state.settings());
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report,
    )
        .into_response())
}

async fn stats_handler(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let stats = state
        .store()
        .statistics()
        .await
        .map_err(|e| failure(correlation_id, "statistics", e))?;
    Ok(json_response(StatusCode::OK, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::PayrollSettings;
    use crate::models::{CompensationType, Worker};
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_state(store: InMemoryStore) -> AppState {
        AppState::new(
            Arc::new(store),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())),
            PayrollSettings::default(),
        )
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let router = create_router(create_test_state(InMemoryStore::new()));
        let response = router.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state(InMemoryStore::new()));
        let response = router
            .oneshot(post_json("/workers", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state(InMemoryStore::new()));
        let response = router
            .oneshot(post_json("/payments/check", r#"{"worker_id":"w-1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_worker_returns_404() {
        let router = create_router(create_test_state(InMemoryStore::new()));
        let response = router.oneshot(get_request("/workers/nobody")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_empty_batch_returns_400() {
        let router = create_router(create_test_state(InMemoryStore::new()));
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payroll/batches")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_lists_missing_measurement() {
        let seed = crate::config::SeedData {
            workers: vec![Worker {
                id: "w-2".to_string(),
                name: "Bruno Lima".to_string(),
                compensation_type: CompensationType::AreaRate,
                cut_weekday: None,
                default_daily_rate: None,
                default_area_rate: Some(Decimal::new(25, 0)),
                payout_destination: None,
                tax_id: None,
                email: None,
                phone: None,
                created_at: None,
            }],
            ..Default::default()
        };
        let router = create_router(create_test_state(InMemoryStore::from_seed(seed)));

        let response = router.oneshot(get_request("/payroll/batch")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let batch: PayrollBatch = serde_json::from_slice(&body).unwrap();
        assert_eq!(batch.items.len(), 1);
        assert!(batch.items[0].is_failed());
        assert_eq!(batch.grand_total, Decimal::ZERO);
    }
}
