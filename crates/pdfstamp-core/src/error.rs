use thiserror::Error;

#[derive(Debug, Error)]
pub enum StampError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Field {field_id}: page {page} out of range (document has {page_count} pages)")]
    PageRange {
        field_id: String,
        page: u32,
        page_count: usize,
    },

    #[error("Field {field_id}: cannot decode signature image: {reason}")]
    AssetDecode { field_id: String, reason: String },

    #[error("PDF operation failed: {0}")]
    Operation(String),

    #[error("Failed to serialize PDF: {0}")]
    Save(String),
}

/// A per-field failure that did not abort the rest of the batch.
#[derive(Debug)]
pub struct FieldError {
    pub field_id: String,
    pub error: StampError,
}
