// Draft lifecycle: the session that owns the form and its persistence, plus
// the HTTP handlers that drive it.

pub mod handlers;
pub mod session;

pub use session::{DraftError, DraftSession, FieldEdit, LoadOutcome};
