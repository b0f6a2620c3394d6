use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CanonicalProperty, ImportResult};
use super::{ImportError, PropertyImporter, SourceFormat};

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    pub format: SourceFormat,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    #[serde(flatten)]
    pub result: ImportResult,
    pub format: SourceFormat,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub total: usize,
    pub properties: Vec<CanonicalProperty>,
}

/// Router builder exposing the bulk import endpoints used by the admin screen.
pub fn import_router(importer: Arc<PropertyImporter>) -> Router {
    Router::new()
        .route("/api/v1/properties/import", post(import_handler))
        .route("/api/v1/properties/import/preview", post(preview_handler))
        .with_state(importer)
}

pub(crate) async fn import_handler(
    State(importer): State<Arc<PropertyImporter>>,
    Json(request): Json<ImportRequest>,
) -> Response {
    match importer.import(request.format, &request.content).await {
        Ok(result) => {
            let body = ImportResponse {
                result,
                format: request.format,
                completed_at: Utc::now(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => format_error(error),
    }
}

pub(crate) async fn preview_handler(
    State(importer): State<Arc<PropertyImporter>>,
    Json(request): Json<ImportRequest>,
) -> Response {
    match importer.preview(request.format, &request.content) {
        Ok(properties) => {
            let body = PreviewResponse {
                total: properties.len(),
                properties,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => format_error(error),
    }
}

fn format_error(error: ImportError) -> Response {
    let status = match error {
        ImportError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ImportError::Csv(_) | ImportError::MissingHeader { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
