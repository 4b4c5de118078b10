// Input surface: the draft form the user edits and the collector that snapshots it.
// Every preview and every autosave starts from `collect` over the current form.

pub mod collector;
pub mod sections;

pub use collector::{collect, collect_non_empty};
pub use sections::{DraftForm, EntryId, EntrySlot, FormError};
