//! Submission: required-field check, single in-flight request, and the
//! download name of the finished document.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use crate::generation::client::{DocumentGenerator, GenerationError};
use crate::models::ResumeRecord;

/// Fields that must be non-blank before a record is sent for generation.
pub const REQUIRED_FIELDS: &[&str] = &["name", "email"];

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

pub fn validate_required(record: &ResumeRecord) -> Result<(), GenerationError> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| record.scalar(field).map_or(true, |v| v.trim().is_empty()))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::MissingRequired(missing))
    }
}

/// `Ada Lovelace` → `Ada_Lovelace_Resume.pdf`.
pub fn download_filename(record: &ResumeRecord) -> String {
    let name = record
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Resume");
    let stem: Vec<&str> = name.split_whitespace().collect();
    format!("{}_Resume.pdf", stem.join("_"))
}

/// Sends records to a [`DocumentGenerator`], one at a time.
pub struct Submitter {
    generator: Arc<dyn DocumentGenerator>,
    in_flight: AtomicBool,
}

impl Submitter {
    pub fn new(generator: Arc<dyn DocumentGenerator>) -> Self {
        Self {
            generator,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validates, then generates. A second call while one is running is
    /// rejected with `InFlight` rather than queued.
    pub async fn submit(&self, record: &ResumeRecord) -> Result<GeneratedDocument, GenerationError> {
        validate_required(record)?;

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(GenerationError::InFlight)?;

        let bytes = self.generator.generate(record).await?;
        let filename = download_filename(record);
        info!("Generated {filename} ({} bytes)", bytes.len());

        Ok(GeneratedDocument { filename, bytes })
    }
}

/// Holds the in-flight flag; releases it on drop, success or not.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
