//! CSV upload flow.
//!
//! `Idle -> Validating -> Uploading -> Success | Error`. Files are checked
//! for presence, extension and size before any request is made. Progress is
//! reported only as the `Uploading` phase; the transfer exposes no byte
//! counts, so no percentage is shown.

use tracing::{info, warn};

use crate::config::{ALLOWED_EXTENSION, MAX_FILE_SIZE_BYTES};
use crate::error::{AppError, FileRejection};
use crate::models::DatasetSummary;

/// Delay between a successful upload and handing the result to the caller,
/// so the success banner can be read.
pub const SUCCESS_DISPLAY_DELAY_MS: u64 = 1500;

pub const UPLOAD_FALLBACK_MESSAGE: &str = "Upload failed. Please check your file format and try again.";

/// A file picked by the user, held until it is uploaded or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub name: String,
    pub size: u64,
    pub content: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Size for display, e.g. `8.00 KB`.
    pub fn size_display(&self) -> String {
        format!("{:.2} KB", self.size as f64 / 1024.0)
    }
}

/// Check name and size. Usable before the file body has been read.
pub fn validate_file(name: &str, size: u64, max_bytes: u64) -> Result<(), FileRejection> {
    if !name.ends_with(ALLOWED_EXTENSION) {
        return Err(FileRejection::NotCsv);
    }
    if size > max_bytes {
        return Err(FileRejection::TooLarge { size });
    }
    Ok(())
}

pub fn validate(candidate: Option<&UploadCandidate>, max_bytes: u64) -> Result<(), FileRejection> {
    let file = candidate.ok_or(FileRejection::Missing)?;
    validate_file(&file.name, file.size, max_bytes)
}

pub fn success_message(summary: &DatasetSummary) -> String {
    format!(
        "Success! Processed {} equipment records with {} different types.",
        summary.total_equipment,
        summary.distinct_types()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Validating,
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct UploadFlow {
    phase: UploadPhase,
    file: Option<UploadCandidate>,
    error: Option<String>,
    success: Option<String>,
    max_bytes: u64,
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self::new(MAX_FILE_SIZE_BYTES)
    }
}

impl UploadFlow {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            phase: UploadPhase::Idle,
            file: None,
            error: None,
            success: None,
            max_bytes,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn file(&self) -> Option<&UploadCandidate> {
        self.file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    /// A picked file is being read and validated.
    pub fn is_reading(&self) -> bool {
        self.phase == UploadPhase::Validating
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.is_uploading() && !self.is_reading()
    }

    /// A new file was picked and its body is being read. Submitting is
    /// refused until [`UploadFlow::select`] settles the selection.
    pub fn begin_read(&mut self) -> Result<(), FileRejection> {
        if self.is_uploading() {
            return Err(FileRejection::UploadInFlight);
        }
        self.error = None;
        self.success = None;
        self.phase = UploadPhase::Validating;
        Ok(())
    }

    /// Record a rejection without a candidate, e.g. when the browser-side
    /// size check fails before the body is read.
    pub fn reject(&mut self, rejection: FileRejection) {
        if self.is_uploading() {
            return;
        }
        warn!("File rejected: {}", rejection);
        self.file = None;
        self.success = None;
        self.error = Some(rejection.to_string());
        self.phase = UploadPhase::Error;
    }

    /// Validate and hold a newly selected file. A rejected file is dropped.
    pub fn select(&mut self, candidate: Option<UploadCandidate>) -> Result<(), FileRejection> {
        if self.is_uploading() {
            return Err(FileRejection::UploadInFlight);
        }

        self.phase = UploadPhase::Validating;
        if let Err(rejection) = validate(candidate.as_ref(), self.max_bytes) {
            self.reject(rejection);
            return Err(rejection);
        }

        self.file = candidate;
        self.error = None;
        self.success = None;
        self.phase = UploadPhase::Idle;
        Ok(())
    }

    /// Move to `Uploading` and hand back the file to send.
    ///
    /// Refused while another upload from this flow is in flight.
    pub fn begin_upload(&mut self) -> Result<UploadCandidate, FileRejection> {
        if self.is_uploading() {
            return Err(FileRejection::UploadInFlight);
        }
        if self.is_reading() {
            return Err(FileRejection::StillReading);
        }

        let Some(file) = self.file.clone() else {
            self.error = Some(FileRejection::NothingSelected.to_string());
            self.phase = UploadPhase::Error;
            return Err(FileRejection::NothingSelected);
        };

        info!("Uploading {} ({} bytes)", file.name, file.size);
        self.error = None;
        self.success = None;
        self.phase = UploadPhase::Uploading;
        Ok(file)
    }

    /// Apply the upload result. Returns the summary to pass on to the caller
    /// once [`SUCCESS_DISPLAY_DELAY_MS`] has elapsed.
    pub fn finish(&mut self, result: Result<DatasetSummary, AppError>) -> Option<DatasetSummary> {
        match result {
            Ok(summary) => {
                info!("Upload accepted as dataset {}", summary.id);
                self.file = None;
                self.success = Some(success_message(&summary));
                self.phase = UploadPhase::Success;
                Some(summary)
            }
            Err(e) => {
                warn!("Upload failed: {}", e);
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string());
                self.error = Some(message);
                self.phase = UploadPhase::Error;
                None
            }
        }
    }

    /// Drop the selection and any messages. No effect mid-upload.
    pub fn clear(&mut self) -> bool {
        if self.is_uploading() {
            return false;
        }
        self.file = None;
        self.error = None;
        self.success = None;
        self.phase = UploadPhase::Idle;
        true
    }
}
