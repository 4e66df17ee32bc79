//! HTTP handlers for PdfStamp API

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;
use pdfstamp_core::{flatten, AuditRecord, StampError};

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Flatten placed fields into an uploaded PDF and store the result.
///
/// The document is decoded from base64 (with or without a data-URL header),
/// stamped on a blocking worker since the transform is CPU-bound, hashed on
/// both sides for the audit log, and written under the configured upload
/// directory. Fields that could not be drawn are reported in the response
/// rather than failing the whole request.
pub async fn sign_pdf(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignPdfRequest>,
) -> Result<Json<SignPdfResponse>, ApiError> {
    let pdf_data = req
        .pdf_data
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingInput)?;

    let payload = pdf_data.rsplit(',').next().unwrap_or(pdf_data);
    let original = BASE64
        .decode(payload.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid PDF base64: {}", e)))?;

    let fields = req.fields;
    let field_count = fields.len();
    // Bounded so a malformed document cannot pin a blocking worker past the
    // configured deadline.
    let flatten_task = tokio::task::spawn_blocking(move || {
        let outcome = flatten(&original, &fields)?;
        let audit = AuditRecord::new(&original, &outcome.bytes, outcome.fields_drawn);
        Ok::<_, StampError>((outcome, audit))
    });
    let (outcome, audit) = tokio::time::timeout(state.config.flatten_timeout, flatten_task)
        .await
        .map_err(|_| ApiError::Timeout)?
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("flatten task failed: {e}")))??;

    audit.emit();

    // Millisecond timestamp plus a short random suffix so concurrent
    // requests never collide on the filename.
    let suffix = Uuid::new_v4().simple().to_string();
    let filename = format!(
        "signed_{}_{}.pdf",
        Utc::now().timestamp_millis(),
        &suffix[..8]
    );
    let path = state.config.upload_dir.join(&filename);
    tokio::fs::write(&path, &outcome.bytes).await?;

    tracing::info!(
        filename = %filename,
        fields = field_count,
        drawn = outcome.fields_drawn,
        skipped = outcome.field_errors.len(),
        "stored signed document"
    );

    Ok(Json(SignPdfResponse {
        url: format!("/uploads/{}", filename),
        skipped_fields: outcome
            .field_errors
            .into_iter()
            .map(|e| SkippedField {
                id: e.field_id,
                reason: e.error.to_string(),
            })
            .collect(),
    }))
}
