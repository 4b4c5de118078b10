//! Axum route handlers for the stateless preview and generation API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::form::{collect, collect_non_empty};
use crate::generation::submit::GeneratedDocument;
use crate::render::{render, to_html, Document};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Flat form submission: `[["name", "Ada"], ["exp_title[]", "Engineer"], ...]`.
/// Repeated names are kept in order.
#[derive(Debug, Deserialize)]
pub struct FieldsRequest {
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub document: Document,
    pub html: String,
}

impl PreviewResponse {
    pub fn from_document(document: Document) -> Self {
        let html = to_html(&document);
        Self { document, html }
    }
}

/// PDF bytes served as a download.
pub fn document_response(document: GeneratedDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/preview
///
/// Renders a preview from submitted fields without touching the draft.
pub async fn handle_preview(Json(request): Json<FieldsRequest>) -> Json<PreviewResponse> {
    let record = collect_non_empty(&request.fields);
    Json(PreviewResponse::from_document(render(&record)))
}

/// POST /api/v1/generate
///
/// Sends submitted fields to the document-generation endpoint and returns
/// the PDF as an attachment.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<FieldsRequest>,
) -> Result<Response, AppError> {
    let record = collect(&request.fields);
    info!("Generating {} document", record.template);
    let document = state.submitter.submit(&record).await?;
    Ok(document_response(document))
}
