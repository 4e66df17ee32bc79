//! Integrity hashing for the transform boundary.
//!
//! Both sides of a transform are hashed so an operator can later verify that
//! a stored document matches what the service produced, and that the input
//! matches what the client claims to have sent.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::info;

/// Lowercase hex SHA-256 of a byte buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// A before/after digest pair for one transform.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub original_sha256: String,
    pub signed_sha256: String,
    pub fields_drawn: usize,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(original: &[u8], signed: &[u8], fields_drawn: usize) -> Self {
        AuditRecord {
            original_sha256: sha256_hex(original),
            signed_sha256: sha256_hex(signed),
            fields_drawn,
            timestamp: Utc::now(),
        }
    }

    /// Emit the record as a single structured log event.
    pub fn emit(&self) {
        info!(
            original_sha256 = %self.original_sha256,
            signed_sha256 = %self.signed_sha256,
            fields_drawn = self.fields_drawn,
            timestamp = %self.timestamp.to_rfc3339(),
            "document signed"
        );
    }
}
