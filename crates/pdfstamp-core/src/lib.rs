//! PDF field flattening core.
//!
//! Takes a PDF plus a list of overlay field placements captured in a browser
//! editor (normalized 0..1 coordinates, `y` measured from the page top) and
//! draws each field's value into the page content streams, producing a new
//! PDF. Field kinds: text, date, checkbox, signature.
//!
//! The transform is request-local: one call owns one `lopdf::Document` and
//! performs no I/O of its own.

pub mod audit;
pub mod coords;
pub mod error;
pub mod field;
pub mod transform;

mod asset;
mod render;

pub use audit::{sha256_hex, AuditRecord};
pub use coords::{map_to_page, page_size, PageSize, PdfRect};
pub use error::{FieldError, StampError};
pub use field::{Field, FieldKind};
pub use transform::{flatten, FlattenOutcome};
