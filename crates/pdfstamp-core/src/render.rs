//! Per-field drawing operations.
//!
//! Each field maps to a short run of content-stream operations at its
//! page-space rectangle. Nothing here touches the document; the driver
//! applies the returned operations and registers the returned resources.

use chrono::{DateTime, Local, NaiveDate};
use lopdf::content::Operation;
use lopdf::Object;

use crate::asset;
use crate::coords::PdfRect;
use crate::error::StampError;
use crate::field::{Field, FieldKind};

/// Font resource name registered on every page that receives text.
pub(crate) const FONT_RESOURCE: &str = "StampF1";

/// The drawing output for one field.
#[derive(Debug)]
pub(crate) struct RenderedField {
    pub ops: Vec<Operation>,
    /// Image stream to add to the document and register on the page under
    /// the given resource name before the ops run.
    pub image: Option<(String, lopdf::Stream)>,
    pub uses_font: bool,
}

impl RenderedField {
    fn nothing() -> Self {
        RenderedField {
            ops: Vec::new(),
            image: None,
            uses_font: false,
        }
    }
}

/// Render one field at its mapped rectangle.
///
/// `image_seq` feeds the per-document XObject naming sequence. Unknown
/// kinds and absent values render nothing; that is not an error.
pub(crate) fn render_field(
    field: &Field,
    rect: PdfRect,
    image_seq: usize,
) -> Result<RenderedField, StampError> {
    // Out-of-range editor geometry collapses to zero instead of going
    // negative; the mapper itself never clamps.
    let rect = PdfRect {
        width: rect.width.max(0.0),
        height: rect.height.max(0.0),
        ..rect
    };

    match field.kind {
        FieldKind::Text => Ok(match field.value.as_deref() {
            Some(v) if !v.is_empty() => text_ops(v, rect),
            _ => RenderedField::nothing(),
        }),
        FieldKind::Date => Ok(text_ops(&format_date(field.value.as_deref()), rect)),
        FieldKind::Checkbox => Ok(if field.is_checked() {
            checkbox_ops(rect)
        } else {
            // Preserved quirk: an unchecked checkbox draws nothing at all,
            // not even the outline square.
            RenderedField::nothing()
        }),
        FieldKind::Signature => match field.value.as_deref() {
            Some(v) if !v.is_empty() => signature_ops(field, v, rect, image_seq),
            _ => Ok(RenderedField::nothing()),
        },
        FieldKind::Unknown => Ok(RenderedField::nothing()),
    }
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

/// Single line, left-anchored, baseline 30% up the box, size 60% of the box
/// height. No wrapping and no truncation; overflow is clipped by whatever
/// renders the page.
fn text_ops(text: &str, rect: PdfRect) -> RenderedField {
    let size = rect.height * 0.6;
    let baseline = rect.y + rect.height * 0.3;
    let ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![FONT_RESOURCE.into(), real(size)]),
        Operation::new("Td", vec![real(rect.x), real(baseline)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ];
    RenderedField {
        ops,
        image: None,
        uses_font: true,
    }
}

/// ISO date in, `MM/DD/YYYY` out; missing or unparseable values fall back
/// to the current local date.
fn format_date(value: Option<&str>) -> String {
    let parsed = value.and_then(|v| {
        NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(v).ok().map(|dt| dt.date_naive()))
    });
    let date = parsed.unwrap_or_else(|| Local::now().date_naive());
    date.format("%m/%d/%Y").to_string()
}

/// An unfilled square of side `rect.height` with a 1pt border, plus a
/// two-segment checkmark at 2pt.
fn checkbox_ops(rect: PdfRect) -> RenderedField {
    let (x, y, side) = (rect.x, rect.y, rect.height);
    let pad = side * 0.2;
    let ops = vec![
        Operation::new("w", vec![real(1.0)]),
        Operation::new("re", vec![real(x), real(y), real(side), real(side)]),
        Operation::new("S", vec![]),
        Operation::new("w", vec![real(2.0)]),
        Operation::new("m", vec![real(x + pad), real(y + side * 0.5)]),
        Operation::new("l", vec![real(x + side * 0.4), real(y + pad)]),
        Operation::new("l", vec![real(x + side - pad), real(y + side - pad)]),
        Operation::new("S", vec![]),
    ];
    RenderedField {
        ops,
        image: None,
        uses_font: false,
    }
}

/// Uniformly scale the raster to fit the box and center it.
fn signature_ops(
    field: &Field,
    value: &str,
    rect: PdfRect,
    image_seq: usize,
) -> Result<RenderedField, StampError> {
    let decoded = asset::decode_signature(value).map_err(|reason| StampError::AssetDecode {
        field_id: field.id.clone(),
        reason,
    })?;

    let (img_w, img_h) = (f64::from(decoded.width), f64::from(decoded.height));
    let scale = (rect.width / img_w).min(rect.height / img_h);
    let draw_w = img_w * scale;
    let draw_h = img_h * scale;
    let draw_x = rect.x + (rect.width - draw_w) / 2.0;
    let draw_y = rect.y + (rect.height - draw_h) / 2.0;

    let name = format!("StampIm{image_seq}");
    let ops = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                real(draw_w),
                real(0.0),
                real(0.0),
                real(draw_h),
                real(draw_x),
                real(draw_y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
        Operation::new("Q", vec![]),
    ];

    Ok(RenderedField {
        ops,
        image: Some((name, decoded.xobject)),
        uses_font: false,
    })
}
