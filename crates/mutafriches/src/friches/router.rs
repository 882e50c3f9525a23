use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::evaluation::MutabiliteError;
use super::repository::{AnalyticsSink, EvaluationId, EvaluationRepository, RepositoryError};
use super::service::{EvaluationRequest, MutabiliteService, MutabiliteServiceError};

const DEFAULT_RECENT_LIMIT: usize = 20;

/// Router exposing evaluation, lookup and catalog endpoints.
pub fn friches_router<R, A>(service: Arc<MutabiliteService<R, A>>) -> Router
where
    R: EvaluationRepository + 'static,
    A: AnalyticsSink + 'static,
{
    Router::new()
        .route("/api/v1/friches/mutabilite", post(evaluate_handler::<R, A>))
        .route("/api/v1/friches/evaluations", get(recent_handler::<R, A>))
        .route(
            "/api/v1/friches/evaluations/:evaluation_id",
            get(evaluation_handler::<R, A>),
        )
        .route(
            "/api/v1/friches/catalogue/recharger",
            post(reload_handler::<R, A>),
        )
        .route(
            "/api/v1/friches/catalogue/:usage",
            get(catalogue_handler::<R, A>),
        )
        .with_state(service)
}

pub(crate) async fn evaluate_handler<R, A>(
    State(service): State<Arc<MutabiliteService<R, A>>>,
    Json(request): Json<EvaluationRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AnalyticsSink + 'static,
{
    match service.evaluate(request) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(MutabiliteServiceError::Evaluation(error)) if error.is_input_error() => {
            input_error(&error)
        }
        Err(MutabiliteServiceError::Repository(RepositoryError::Conflict)) => error_response(
            StatusCode::CONFLICT,
            "evaluation already exists".to_string(),
        ),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn evaluation_handler<R, A>(
    State(service): State<Arc<MutabiliteService<R, A>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AnalyticsSink + 'static,
{
    let id = EvaluationId(evaluation_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(MutabiliteServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "evaluation not found",
                "id": id.0,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentParams {
    limit: Option<usize>,
}

pub(crate) async fn recent_handler<R, A>(
    State(service): State<Arc<MutabiliteService<R, A>>>,
    Query(params): Query<RecentParams>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AnalyticsSink + 'static,
{
    match service.recent(params.limit.unwrap_or(DEFAULT_RECENT_LIMIT)) {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn catalogue_handler<R, A>(
    State(service): State<Arc<MutabiliteService<R, A>>>,
    Path(usage): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AnalyticsSink + 'static,
{
    match service.criteria(&usage) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(MutabiliteServiceError::Evaluation(MutabiliteError::UnknownUsageType(error))) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn reload_handler<R, A>(
    State(service): State<Arc<MutabiliteService<R, A>>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AnalyticsSink + 'static,
{
    match service.reload() {
        Ok(criteria) => {
            let payload = json!({ "criteres": criteria });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn input_error(error: &MutabiliteError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "field": error.field(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
