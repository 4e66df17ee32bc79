//! The overlay field data model shared with the editor.

use serde::{Deserialize, Serialize};

/// The closed set of field kinds the renderer understands.
///
/// Unrecognized wire values deserialize to `Unknown`, which renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Date,
    Checkbox,
    Signature,
    #[serde(other)]
    Unknown,
}

/// A single placed annotation.
///
/// `x`, `y`, `w`, `h` are fractions of the page width/height and `y = 0` is
/// the page top. `page` is 1-based. The editor maintains the in-range
/// invariants; the renderer clamps degenerate geometry instead of
/// re-validating here.
///
/// `value` semantics depend on `kind`: free text for `Text`, an ISO date
/// string for `Date`, the literal [`Field::CHECKED`] marker for an active
/// `Checkbox`, and a data-URL raster image for `Signature`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub value: Option<String>,
}

impl Field {
    /// Marker value that activates a checkbox. Any other value, including
    /// absence, leaves the checkbox undrawn.
    pub const CHECKED: &'static str = "checked";

    pub fn is_checked(&self) -> bool {
        self.value.as_deref() == Some(Self::CHECKED)
    }
}
