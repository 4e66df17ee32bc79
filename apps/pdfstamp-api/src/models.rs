//! Wire models for PdfStamp API

use pdfstamp_core::Field;
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/sign-pdf`.
///
/// `pdf_data` is either a bare base64 string or a full
/// `data:application/pdf;base64,...` URL, matching what the editor sends.
#[derive(Debug, Deserialize)]
pub struct SignPdfRequest {
    #[serde(rename = "pdfData")]
    pub pdf_data: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Serialize)]
pub struct SignPdfResponse {
    /// Relative URL where the flattened document can be fetched.
    pub url: String,
    #[serde(rename = "skippedFields", skip_serializing_if = "Vec::is_empty")]
    pub skipped_fields: Vec<SkippedField>,
}

/// A field that could not be drawn, reported alongside the otherwise
/// successful result.
#[derive(Debug, Serialize)]
pub struct SkippedField {
    pub id: String,
    pub reason: String,
}
