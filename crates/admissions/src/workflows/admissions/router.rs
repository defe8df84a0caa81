use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantDetails, ApplicationId, ApplicationStatus, StatusOverride};
use super::forms::{FormKind, StageForm};
use super::repository::{ApplicationRepository, FormRepository, RepositoryError};
use super::service::{AdmissionService, AdmissionServiceError};

/// Router builder exposing intake, stage forms, and the admin console endpoints.
pub fn admissions_router<R, F>(service: Arc<AdmissionService<R, F>>) -> Router
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/admissions/applications",
            post(submit_handler::<R, F>).get(list_handler::<R, F>),
        )
        .route(
            "/api/v1/admissions/applications/:application_id",
            get(status_handler::<R, F>),
        )
        .route(
            "/api/v1/admissions/applications/:application_id/progress",
            get(progress_handler::<R, F>),
        )
        .route(
            "/api/v1/admissions/applications/:application_id/forms",
            post(record_form_handler::<R, F>),
        )
        .route(
            "/api/v1/admissions/applications/:application_id/forms/:form",
            get(form_handler::<R, F>),
        )
        .route(
            "/api/v1/admissions/applications/:application_id/status",
            post(override_handler::<R, F>),
        )
        .route(
            "/api/v1/admissions/applications/:application_id/payment",
            post(payment_handler::<R, F>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) status: Option<ApplicationStatus>,
}

pub(crate) async fn submit_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    axum::Json(applicant): axum::Json<ApplicantDetails>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    match service.submit(applicant) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    match service.list(query.status) {
        Ok(records) => {
            let rows: Vec<_> = records.iter().map(|record| record.summary_view()).collect();
            (StatusCode::OK, axum::Json(rows)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn status_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn progress_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    match service.progress(&ApplicationId(application_id)) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn record_form_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    Path(application_id): Path<String>,
    axum::Json(form): axum::Json<StageForm>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    match service.record_form(&ApplicationId(application_id), form) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn form_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    Path((application_id, form)): Path<(String, String)>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    let kind = match form.parse::<FormKind>() {
        Ok(kind) => kind,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    match service.form(&ApplicationId(application_id), kind) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn override_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    Path(application_id): Path<String>,
    axum::Json(decision): axum::Json<StatusOverride>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    match service.override_status(&ApplicationId(application_id), decision) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn payment_handler<R, F>(
    State(service): State<Arc<AdmissionService<R, F>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.record_payment(&id) {
        Ok(receipt) => {
            let payload = json!({
                "application_id": id.0,
                "is_paid": true,
                "payment_amount": receipt.amount,
                "paid_at": receipt.paid_at,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// The single HTTP mapping for workflow errors; `AppError` delegates here.
impl IntoResponse for AdmissionServiceError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            AdmissionServiceError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "errors": errors.errors }),
            ),
            AdmissionServiceError::NotFound(_) | AdmissionServiceError::FormNotFound { .. } => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            AdmissionServiceError::Payment(_) => {
                (StatusCode::CONFLICT, json!({ "error": self.to_string() }))
            }
            AdmissionServiceError::Repository(RepositoryError::Conflict) => (
                StatusCode::CONFLICT,
                json!({ "error": "application already exists" }),
            ),
            AdmissionServiceError::Repository(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "storage unavailable" }),
            ),
        };
        (status, axum::Json(payload)).into_response()
    }
}
