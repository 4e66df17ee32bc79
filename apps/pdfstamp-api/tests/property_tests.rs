//! Property-based tests for pdfstamp-api
//!
//! Tests the wire model parsing and coordinate mapping using proptest.

use pdfstamp_core::{map_to_page, Field, FieldKind, PageSize};
use proptest::prelude::*;

// ============================================================
// Field Deserialization
// ============================================================

fn known_kind() -> impl Strategy<Value = (&'static str, FieldKind)> {
    prop_oneof![
        Just(("text", FieldKind::Text)),
        Just(("date", FieldKind::Date)),
        Just(("checkbox", FieldKind::Checkbox)),
        Just(("signature", FieldKind::Signature)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================================
    // Field Kind Tests
    // ============================================================

    #[test]
    fn known_field_kinds_deserialize((wire, expected) in known_kind()) {
        let json = format!(
            r#"{{"id":"f","type":"{}","page":1,"x":0.1,"y":0.2,"w":0.3,"h":0.4}}"#,
            wire
        );
        let field: Field = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(field.kind, expected);
    }

    #[test]
    fn unknown_field_kinds_do_not_fail(kind in "[a-z]{1,12}") {
        let json = format!(
            r#"{{"id":"f","type":"{}","page":1,"x":0.0,"y":0.0,"w":0.1,"h":0.1}}"#,
            kind
        );
        let field: Field = serde_json::from_str(&json).unwrap();
        let known = ["text", "date", "checkbox", "signature"];
        if !known.contains(&kind.as_str()) {
            prop_assert_eq!(field.kind, FieldKind::Unknown);
        }
    }

    #[test]
    fn field_geometry_round_trips(
        x in 0.0f64..1.0,
        y in 0.0f64..1.0,
        w in 0.0f64..1.0,
        h in 0.0f64..1.0,
        page in 1u32..100,
    ) {
        let json = format!(
            r#"{{"id":"f","type":"text","page":{page},"x":{x},"y":{y},"w":{w},"h":{h}}}"#
        );
        let field: Field = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(field.page, page);
        prop_assert!((field.x - x).abs() < 1e-12);
        prop_assert!((field.h - h).abs() < 1e-12);
    }

    // ============================================================
    // Coordinate Mapping Tests
    // ============================================================

    #[test]
    fn mapped_rect_stays_inside_page_for_valid_fields(
        x in 0.0f64..0.5,
        y in 0.0f64..0.5,
        w in 0.0f64..0.5,
        h in 0.0f64..0.5,
    ) {
        let page = PageSize { width: 612.0, height: 792.0 };
        let rect = map_to_page(x, y, w, h, page);
        prop_assert!(rect.x >= 0.0);
        prop_assert!(rect.y >= 0.0);
        prop_assert!(rect.x + rect.width <= page.width + 1e-9);
        prop_assert!(rect.y + rect.height <= page.height + 1e-9);
    }

    #[test]
    fn vertical_order_is_flipped(
        y1 in 0.0f64..0.4,
        y2 in 0.5f64..0.9,
    ) {
        // A field higher in the editor lands higher on the page.
        let page = PageSize { width: 600.0, height: 800.0 };
        let upper = map_to_page(0.1, y1, 0.1, 0.05, page);
        let lower = map_to_page(0.1, y2, 0.1, 0.05, page);
        prop_assert!(upper.y > lower.y);
    }

    // ============================================================
    // Data URL Payload Tests
    // ============================================================

    #[test]
    fn data_url_payload_split_recovers_base64(data in "[A-Za-z0-9+/]{20,200}") {
        let data_url = format!("data:application/pdf;base64,{}", data);
        let payload = data_url.rsplit(',').next().unwrap_or(&data_url);
        prop_assert_eq!(payload, data.as_str());
    }

    #[test]
    fn bare_base64_passes_through(data in "[A-Za-z0-9+/]{20,200}") {
        let payload = data.rsplit(',').next().unwrap_or(&data);
        prop_assert_eq!(payload, data.as_str());
    }
}
