//! The document transform driver: decode, draw fields per page, re-encode.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::coords;
use crate::error::{FieldError, StampError};
use crate::field::Field;
use crate::render::{self, FONT_RESOURCE};

/// The result of one transform.
///
/// Per-field failures (bad page reference, undecodable signature asset) are
/// isolated: the offending field is skipped and reported here while the rest
/// of the batch is still drawn. Only parse and serialize failures abort.
#[derive(Debug)]
pub struct FlattenOutcome {
    pub bytes: Vec<u8>,
    pub fields_drawn: usize,
    pub field_errors: Vec<FieldError>,
}

/// Flatten `fields` into the page content of `pdf_bytes`.
///
/// Pure with respect to its inputs apart from the clock feeding empty date
/// fields: no network or disk I/O, one in-memory document per call.
pub fn flatten(pdf_bytes: &[u8], fields: &[Field]) -> Result<FlattenOutcome, StampError> {
    let mut doc = Document::load_mem(pdf_bytes).map_err(|e| StampError::Parse(e.to_string()))?;

    let pages: BTreeMap<u32, ObjectId> = doc.get_pages();
    let page_count = pages.len();

    let mut field_errors = Vec::new();
    let mut by_page: BTreeMap<u32, Vec<&Field>> = BTreeMap::new();

    for field in fields {
        if pages.contains_key(&field.page) {
            by_page.entry(field.page).or_default().push(field);
        } else {
            field_errors.push(FieldError {
                field_id: field.id.clone(),
                error: StampError::PageRange {
                    field_id: field.id.clone(),
                    page: field.page,
                    page_count,
                },
            });
        }
    }

    let mut fields_drawn = 0usize;
    let mut font_id: Option<ObjectId> = None;
    let mut image_seq = 0usize;

    for (page_no, page_fields) in by_page {
        let page_id = pages[&page_no];
        let size = coords::page_size(&doc, page_id);
        debug!(page = page_no, width = size.width, height = size.height, "stamping page");

        // One content stream per touched page, isolated from whatever
        // graphics state the existing streams leave behind.
        let mut ops: Vec<Operation> = vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
            Operation::new("RG", vec![0.into(), 0.into(), 0.into()]),
        ];
        let mut images: Vec<(String, Stream)> = Vec::new();
        let mut uses_font = false;
        let mut drew_any = false;

        for field in page_fields {
            let rect = coords::map_to_page(field.x, field.y, field.w, field.h, size);
            match render::render_field(field, rect, image_seq) {
                Ok(rendered) => {
                    if rendered.ops.is_empty() {
                        continue;
                    }
                    uses_font |= rendered.uses_font;
                    ops.extend(rendered.ops);
                    if let Some(img) = rendered.image {
                        images.push(img);
                        image_seq += 1;
                    }
                    drew_any = true;
                    fields_drawn += 1;
                }
                Err(error) => field_errors.push(FieldError {
                    field_id: field.id.clone(),
                    error,
                }),
            }
        }

        if !drew_any {
            continue;
        }
        ops.push(Operation::new("Q", vec![]));

        // Register resources before rewriting the content entry.
        if uses_font {
            let id = match font_id {
                Some(id) => id,
                None => {
                    let id = add_helvetica(&mut doc);
                    font_id = Some(id);
                    id
                }
            };
            register_resource(&mut doc, page_id, "Font", FONT_RESOURCE, id)?;
        }
        for (name, stream) in images {
            let img_id = doc.add_object(stream);
            register_resource(&mut doc, page_id, "XObject", &name, img_id)?;
        }

        let encoded = Content { operations: ops }
            .encode()
            .map_err(|e| StampError::Operation(e.to_string()))?;
        append_content(&mut doc, page_id, encoded)?;
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| StampError::Save(e.to_string()))?;

    Ok(FlattenOutcome {
        bytes,
        fields_drawn,
        field_errors,
    })
}

fn add_helvetica(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    })
}

/// Merge one entry into a category of the page's `Resources`, preserving
/// everything already visible to the page.
///
/// The effective dictionary may be inline, an indirect reference, or
/// inherited from an ancestor Pages node; the merged result is written back
/// inline on the page so other pages sharing the original object are
/// unaffected.
fn register_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    name: &str,
    id: ObjectId,
) -> Result<(), StampError> {
    let mut resources = effective_resources(doc, page_id);

    let mut sub = match resources.get(category.as_bytes()) {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(r)) => match doc.get_object(*r) {
            Ok(Object::Dictionary(d)) => d.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };
    sub.set(name, Object::Reference(id));
    resources.set(category, Object::Dictionary(sub));

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| StampError::Operation(e.to_string()))?;
    match page {
        Object::Dictionary(dict) => {
            dict.set("Resources", Object::Dictionary(resources));
            Ok(())
        }
        _ => Err(StampError::Operation("page object is not a dictionary".into())),
    }
}

/// Resolve the resources dictionary a page actually sees, walking the
/// parent chain with a depth limit since malformed documents can cycle.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut obj = doc.get_object(page_id).ok();
    for _ in 0..10 {
        let Some(Object::Dictionary(dict)) = obj else {
            break;
        };
        if let Ok(res) = dict.get(b"Resources") {
            match res {
                Object::Dictionary(d) => return d.clone(),
                Object::Reference(r) => {
                    if let Ok(Object::Dictionary(d)) = doc.get_object(*r) {
                        return d.clone();
                    }
                }
                _ => {}
            }
        }
        obj = match dict.get(b"Parent") {
            Ok(Object::Reference(p)) => doc.get_object(*p).ok(),
            _ => None,
        };
    }
    Dictionary::new()
}

/// Append an encoded content stream to the page's `Contents` entry,
/// whatever shape it currently has.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    encoded: Vec<u8>,
) -> Result<(), StampError> {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| StampError::Operation(e.to_string()))?;
    let Object::Dictionary(dict) = page else {
        return Err(StampError::Operation("page object is not a dictionary".into()));
    };

    match dict.get(b"Contents").ok().cloned() {
        Some(Object::Reference(existing)) => {
            dict.set(
                "Contents",
                Object::Array(vec![
                    Object::Reference(existing),
                    Object::Reference(content_id),
                ]),
            );
        }
        Some(Object::Array(mut arr)) => {
            arr.push(Object::Reference(content_id));
            dict.set("Contents", Object::Array(arr));
        }
        _ => dict.set("Contents", Object::Reference(content_id)),
    }

    Ok(())
}
