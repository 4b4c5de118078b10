//! Draft session: the one résumé being edited, its autosave, and its
//! save / load / clear lifecycle.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::autosave::Autosaver;
use crate::codec::{self, CodecError, RepeatCounts};
use crate::form::{collect, collect_non_empty, DraftForm, EntryId, EntrySlot, FormError};
use crate::models::{Group, ResumeRecord};
use crate::render::{render, Document};
use crate::storage::{Storage, StorageError};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// A single edit to the form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum FieldEdit {
    /// A scalar field, or `template` / `color`.
    Scalar { name: String, value: String },
    Entry {
        group: Group,
        position: usize,
        field: String,
        value: String,
    },
}

/// Result of reading the stored draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Stored draft applied; `counts` entries were recreated per group.
    Restored { counts: RepeatCounts },
    /// Nothing stored.
    Empty,
    /// Something was stored but could not be decoded; the form was reset.
    Unusable { reason: String },
}

pub struct DraftSession {
    form: DraftForm,
    storage: Arc<dyn Storage>,
    key: String,
    autosave: Autosaver,
}

impl DraftSession {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>, debounce: Duration) -> Self {
        let key = key.into();
        Self {
            form: DraftForm::with_starter_sections(),
            autosave: Autosaver::new(Arc::clone(&storage), key.clone(), debounce),
            storage,
            key,
        }
    }

    pub fn form(&self) -> &DraftForm {
        &self.form
    }

    pub fn autosave(&self) -> &Autosaver {
        &self.autosave
    }

    /// Full snapshot, blank entries included.
    pub fn record(&self) -> ResumeRecord {
        collect(&self.form)
    }

    pub fn preview(&self) -> Document {
        render(&collect_non_empty(&self.form))
    }

    // ── Edits ──────────────────────────────────────────────────────────────

    /// Applies a batch of edits. Either every edit applies or none does.
    pub async fn apply(&mut self, edits: &[FieldEdit]) -> Result<(), DraftError> {
        let mut next = self.form.clone();
        for edit in edits {
            match edit {
                FieldEdit::Scalar { name, value } => next.set_scalar(name, value)?,
                FieldEdit::Entry {
                    group,
                    position,
                    field,
                    value,
                } => next.set_entry_field(*group, *position, field, value)?,
            }
        }
        self.form = next;
        self.touch().await;
        Ok(())
    }

    pub async fn add_entry(&mut self, group: Group) -> EntryId {
        let id = self.form.add_entry(group);
        self.touch().await;
        id
    }

    pub async fn remove_entry(
        &mut self,
        group: Group,
        position: usize,
    ) -> Result<EntrySlot, DraftError> {
        let removed = self.form.remove_entry(group, position)?;
        self.touch().await;
        Ok(removed)
    }

    pub async fn remove_entry_by_id(&mut self, id: EntryId) -> Result<(Group, usize), DraftError> {
        let removed = self.form.remove_by_id(id)?;
        self.touch().await;
        Ok(removed)
    }

    /// Schedules an autosave of the current form.
    async fn touch(&mut self) {
        match codec::to_payload(&self.record()) {
            Ok(payload) => self.autosave.schedule(payload).await,
            Err(e) => warn!("Could not encode draft for auto-save: {e}"),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────

    /// Writes the current form immediately.
    pub async fn save(&self) -> Result<(), DraftError> {
        let payload = codec::to_payload(&self.record())?;
        self.autosave.flush(&payload).await?;
        Ok(())
    }

    /// Replaces the form with the stored draft. A stored draft that cannot be
    /// decoded resets the form instead of partially applying it. With nothing
    /// stored, the form and its pending autosave are left alone.
    pub async fn load(&mut self) -> Result<LoadOutcome, DraftError> {
        let Some(payload) = self.storage.get(&self.key).await? else {
            info!("No saved draft under '{}'", self.key);
            return Ok(LoadOutcome::Empty);
        };

        // The form is about to be replaced; its pending write is stale.
        self.autosave.cancel().await;

        match codec::from_payload(&payload) {
            Ok((record, counts)) => {
                self.form.refill(&record, &counts);
                info!(
                    "Draft restored: {} experience, {} education, {} project, {} certification entries",
                    counts.get(Group::Experience),
                    counts.get(Group::Education),
                    counts.get(Group::Project),
                    counts.get(Group::Certification)
                );
                Ok(LoadOutcome::Restored { counts })
            }
            Err(e) => {
                warn!("Saved draft is unusable: {e}");
                self.form.reset();
                Ok(LoadOutcome::Unusable {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Resets the form and deletes the stored draft.
    pub async fn clear(&mut self) -> Result<(), DraftError> {
        self.autosave.cancel().await;
        self.form.reset();
        self.storage.remove(&self.key).await?;
        info!("Draft cleared");
        Ok(())
    }
}
