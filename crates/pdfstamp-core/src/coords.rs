//! Normalized-overlay to page-space coordinate mapping.
//!
//! The editor reports field rectangles as fractions of the page size with
//! the origin at the top-left; PDF page space has its origin at the
//! bottom-left. The vertical flip happens here and nowhere else:
//!
//! ```text
//! abs_y = page_height - y * page_height - abs_h
//! ```

use lopdf::{Document, Object, ObjectId};

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US Letter, the fallback when a page carries no MediaBox anywhere in
    /// its parent chain.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };
}

/// An absolute rectangle in page space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a field's normalized rectangle onto a page.
///
/// A field at normalized `y = 0` sits at the visual top of the page in the
/// editor and must land at `height - abs_h` in page space, not at `0`.
///
/// Pure arithmetic: no clamping and no error conditions. Degenerate inputs
/// produce degenerate outputs and the renderer deals with them.
pub fn map_to_page(x: f64, y: f64, w: f64, h: f64, page: PageSize) -> PdfRect {
    let abs_w = w * page.width;
    let abs_h = h * page.height;
    PdfRect {
        x: x * page.width,
        y: page.height - y * page.height - abs_h,
        width: abs_w,
        height: abs_h,
    }
}

/// Read a page's size from its MediaBox.
///
/// Handles inline and indirect MediaBox arrays and walks up the Pages tree
/// for inherited values, with a depth limit since malformed documents can
/// contain parent cycles.
pub fn page_size(doc: &Document, page_id: ObjectId) -> PageSize {
    doc.get_object(page_id)
        .ok()
        .and_then(|obj| media_box(doc, obj, 10))
        .map(|mb| PageSize {
            width: f64::from(mb[2] - mb[0]),
            height: f64::from(mb[3] - mb[1]),
        })
        .unwrap_or(PageSize::LETTER)
}

fn media_box(doc: &Document, page_obj: &Object, depth: usize) -> Option<[f32; 4]> {
    if depth == 0 {
        return None;
    }
    let dict = page_obj.as_dict().ok()?;

    if let Ok(obj) = dict.get(b"MediaBox") {
        let arr = match obj {
            Object::Array(arr) => Some(arr),
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Array(arr)) => Some(arr),
                _ => None,
            },
            _ => None,
        };
        if let Some(arr) = arr {
            let values: Vec<f32> = arr
                .iter()
                .filter_map(|o| match o {
                    Object::Integer(i) => Some(*i as f32),
                    Object::Real(r) => Some(*r),
                    _ => None,
                })
                .collect();
            if values.len() == 4 {
                return Some([values[0], values[1], values[2], values[3]]);
            }
        }
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
        if let Ok(parent) = doc.get_object(*parent_id) {
            return media_box(doc, parent, depth - 1);
        }
    }

    None
}
