//! Axum route handlers for the Draft API.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::draft::{FieldEdit, LoadOutcome};
use crate::errors::AppError;
use crate::form::{DraftForm, EntryId, EntrySlot, FormError};
use crate::generation::handlers::{document_response, PreviewResponse};
use crate::models::{Group, ResumeRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    /// Storage key the draft persists under.
    pub storage_key: String,
    pub form: DraftForm,
    pub record: ResumeRecord,
    pub autosave_pending: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub edits: Vec<FieldEdit>,
}

#[derive(Debug, Serialize)]
pub struct EntryLocation {
    pub id: EntryId,
    pub group: Group,
    pub position: usize,
}

#[derive(Debug, Serialize)]
pub struct RemoveEntryResponse {
    pub removed: EntrySlot,
    pub group: Group,
    pub remaining: usize,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    #[serde(flatten)]
    pub outcome: LoadOutcome,
    pub preview: PreviewResponse,
}

fn parse_group(name: &str) -> Result<Group, AppError> {
    Group::from_name(name).ok_or_else(|| FormError::UnknownGroup(name.to_string()).into())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/draft
///
/// Returns the form as the UI should show it, plus the collected record.
pub async fn handle_get_draft(State(state): State<AppState>) -> Json<DraftResponse> {
    let draft = state.draft.lock().await;
    Json(DraftResponse {
        storage_key: state.config.storage_key.clone(),
        form: draft.form().clone(),
        record: draft.record(),
        autosave_pending: draft.autosave().is_pending().await,
        last_saved_at: draft.autosave().last_written_at().await,
    })
}

/// PUT /api/v1/draft/fields
///
/// Applies a batch of field edits and returns the refreshed preview.
/// Schedules a debounced autosave.
pub async fn handle_edit_fields(
    State(state): State<AppState>,
    Json(request): Json<EditRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let mut draft = state.draft.lock().await;
    draft.apply(&request.edits).await?;
    Ok(Json(PreviewResponse::from_document(draft.preview())))
}

/// POST /api/v1/draft/sections/:group
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<EntryLocation>, AppError> {
    let group = parse_group(&group)?;
    let mut draft = state.draft.lock().await;
    let id = draft.add_entry(group).await;
    let position = draft.form().entries(group).len() - 1;

    Ok(Json(EntryLocation {
        id,
        group,
        position,
    }))
}

/// DELETE /api/v1/draft/sections/:group/:position
///
/// Later entries move up one position.
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((group, position)): Path<(String, usize)>,
) -> Result<Json<RemoveEntryResponse>, AppError> {
    let group = parse_group(&group)?;
    let mut draft = state.draft.lock().await;
    let removed = draft.remove_entry(group, position).await?;

    Ok(Json(RemoveEntryResponse {
        removed,
        group,
        remaining: draft.form().entries(group).len(),
    }))
}

/// DELETE /api/v1/draft/entries/:id
pub async fn handle_remove_entry_by_id(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> Result<Json<EntryLocation>, AppError> {
    let mut draft = state.draft.lock().await;
    let (group, position) = draft.remove_entry_by_id(id).await?;
    Ok(Json(EntryLocation {
        id,
        group,
        position,
    }))
}

/// GET /api/v1/draft/preview
pub async fn handle_draft_preview(State(state): State<AppState>) -> Json<PreviewResponse> {
    let draft = state.draft.lock().await;
    Json(PreviewResponse::from_document(draft.preview()))
}

/// POST /api/v1/draft/save
pub async fn handle_save(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    let draft = state.draft.lock().await;
    draft.save().await?;
    Ok(Json(SaveResponse {
        saved_at: draft.autosave().last_written_at().await,
    }))
}

/// POST /api/v1/draft/load
///
/// Restores the stored draft. An empty store or an unreadable payload is
/// reported in the body, not as an error status.
pub async fn handle_load(State(state): State<AppState>) -> Result<Json<LoadResponse>, AppError> {
    let mut draft = state.draft.lock().await;
    let outcome = draft.load().await?;
    Ok(Json(LoadResponse {
        outcome,
        preview: PreviewResponse::from_document(draft.preview()),
    }))
}

/// DELETE /api/v1/draft
pub async fn handle_clear(State(state): State<AppState>) -> Result<Json<DraftResponse>, AppError> {
    let mut draft = state.draft.lock().await;
    draft.clear().await?;
    Ok(Json(DraftResponse {
        storage_key: state.config.storage_key.clone(),
        form: draft.form().clone(),
        record: draft.record(),
        autosave_pending: false,
        last_saved_at: None,
    }))
}

/// POST /api/v1/draft/generate
///
/// Sends the current draft to the document-generation endpoint.
pub async fn handle_generate_draft(State(state): State<AppState>) -> Result<Response, AppError> {
    // The lock is released before the endpoint call.
    let record = state.draft.lock().await.record();
    info!("Generating {} document from draft", record.template);
    let document = state.submitter.submit(&record).await?;
    Ok(document_response(document))
}
