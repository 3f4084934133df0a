//! Grades HTTP Routes
//!
//! CSV upload and the aggregate "twos" reports.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::ingest::{CsvIngestor, IngestConfig, UploadSummary};
use crate::queries::{
    Comparison, GradeQueryService, TwosFilter, DEFAULT_FEWER_THAN_THRESHOLD,
    DEFAULT_MORE_THAN_THRESHOLD,
};
use crate::records::StudentTwoCount;
use crate::storage::GradeStore;

use super::errors::{ApiError, ApiResult};

/// Multipart field carrying the CSV file
pub const UPLOAD_FIELD: &str = "file";

// ==================
// Shared State
// ==================

/// Grades state shared across handlers
pub struct GradesState {
    pub ingestor: CsvIngestor,
    pub queries: GradeQueryService,
}

impl GradesState {
    pub fn new(store: Arc<dyn GradeStore>, ingest: IngestConfig) -> Self {
        Self {
            ingestor: CsvIngestor::new(ingest, store.clone()),
            queries: GradeQueryService::new(store),
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: String,
    pub records_loaded: usize,
    pub students: usize,
}

impl From<UploadSummary> for UploadResponse {
    fn from(summary: UploadSummary) -> Self {
        Self {
            status: "ok".to_string(),
            records_loaded: summary.records_loaded,
            students: summary.students,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TwosQuery {
    pub comparison: Comparison,
    pub threshold: u32,
}

impl From<TwosQuery> for TwosFilter {
    fn from(query: TwosQuery) -> Self {
        TwosFilter::new(query.comparison, query.threshold as i64)
    }
}

// ==================
// Grades Routes
// ==================

/// Create grades routes
pub fn grades_routes(state: Arc<GradesState>) -> Router {
    Router::new()
        .route("/upload-grades", post(upload_grades_handler))
        .route("/students/more-than-3-twos", get(more_than_three_twos_handler))
        .route("/students/less-than-5-twos", get(fewer_than_five_twos_handler))
        .route("/students/twos", get(twos_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn upload_grades_handler(
    State(state): State<Arc<GradesState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidMultipart(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidMultipart(e.to_string()))?;

        let summary = state.ingestor.upload(&data, &filename).await?;
        return Ok(Json(summary.into()));
    }

    Err(ApiError::MissingFile)
}

async fn more_than_three_twos_handler(
    State(state): State<Arc<GradesState>>,
) -> ApiResult<Json<Vec<StudentTwoCount>>> {
    let students = state
        .queries
        .students_with_more_than_n_twos(DEFAULT_MORE_THAN_THRESHOLD)
        .await?;
    Ok(Json(students))
}

async fn fewer_than_five_twos_handler(
    State(state): State<Arc<GradesState>>,
) -> ApiResult<Json<Vec<StudentTwoCount>>> {
    let students = state
        .queries
        .students_with_fewer_than_n_twos(DEFAULT_FEWER_THAN_THRESHOLD)
        .await?;
    Ok(Json(students))
}

async fn twos_handler(
    State(state): State<Arc<GradesState>>,
    Query(query): Query<TwosQuery>,
) -> ApiResult<Json<Vec<StudentTwoCount>>> {
    let students = state.queries.students_by_twos(query.into()).await?;
    Ok(Json(students))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_shape() {
        let response = UploadResponse::from(UploadSummary {
            records_loaded: 10,
            students: 4,
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["records_loaded"], 10);
        assert_eq!(value["students"], 4);
    }

    #[test]
    fn test_twos_query_to_filter() {
        let filter: TwosFilter = TwosQuery {
            comparison: Comparison::FewerThan,
            threshold: 2,
        }
        .into();
        assert_eq!(filter, TwosFilter::fewer_than(2));
    }
}
