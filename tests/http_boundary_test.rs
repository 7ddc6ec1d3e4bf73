use epost_quote::adapters::http::{price_shipment, quote_from_json, RequestContext};
use epost_quote::core::pricing;
use epost_quote::QuoteRequest;
use serde_json::json;

#[test]
fn test_priced_body_is_attached_to_context() {
    let mut ctx = RequestContext::new(json!({
        "packageType": "express_intl",
        "weight": 3,
        "dimensions": {"length": 20, "width": 20, "height": 20},
        "customsDeclaration": {"value": 1000}
    }));

    price_shipment(&mut ctx).unwrap();

    let quote = ctx.shipping_quote().expect("quote should be attached");
    assert_eq!(quote.tier_code, "express_intl");
    assert_eq!(quote.total, 3850.0);
}

#[test]
fn test_rejected_body_leaves_context_untouched() {
    let mut ctx = RequestContext::new(json!({
        "packageType": "bulk_shipment",
        "weight": 20.01
    }));

    let rejection = price_shipment(&mut ctx).unwrap_err();

    assert!(ctx.shipping_quote().is_none());
    assert_eq!(rejection.status, 400);
    assert_eq!(
        serde_json::to_value(&rejection.body).unwrap(),
        json!({
            "success": false,
            "message": "Weight exceeds the 20 kg limit for package type 'bulk_shipment'"
        })
    );
}

#[test]
fn test_form_strings_match_engine_quote() {
    let from_form = quote_from_json(&json!({
        "packageType": "standard_parcel",
        "weight": "0.5",
        "dimensions": {"length": "10", "width": "10", "height": "10"},
        "customsDeclaration": {"value": "0"}
    }))
    .unwrap();

    let direct = pricing::quote(
        &QuoteRequest::new("standard_parcel", 0.5)
            .with_dimensions(10.0, 10.0, 10.0)
            .with_declared_value(0.0),
    )
    .unwrap();

    assert_eq!(from_form, direct);
    assert_eq!(from_form.total, 210.0);
}

#[test]
fn test_missing_fields() {
    let rejection = quote_from_json(&json!({})).unwrap_err();
    assert_eq!(rejection.body.message, "Invalid package type ''");

    let rejection = quote_from_json(&json!({"packageType": "basic_letter"})).unwrap_err();
    assert_eq!(
        rejection.body.message,
        "Invalid weight '(missing)': weight must be a number greater than 0 kg"
    );
}

#[test]
fn test_customs_declaration_without_value() {
    let quote = quote_from_json(&json!({
        "packageType": "basic_intl",
        "weight": 0.1,
        "customsDeclaration": {}
    }))
    .unwrap();

    assert_eq!(quote.insurance_charge, 0.0);
    // 250 base + 30 weight + 37.5 surcharge
    assert_eq!(quote.total, 317.5);
}

#[test]
fn test_negative_declared_value_rejected() {
    let rejection = quote_from_json(&json!({
        "packageType": "express_parcel",
        "weight": 2,
        "customsDeclaration": {"value": -5}
    }))
    .unwrap_err();

    assert_eq!(
        rejection.body.message,
        "Invalid declared value '-5': declared value must be a number not below 0"
    );
}

#[test]
fn test_non_numeric_dimension_keeps_submitted_text() {
    let rejection = quote_from_json(&json!({
        "packageType": "standard_parcel",
        "weight": 0.5,
        "dimensions": {"length": "x", "width": 10, "height": 10}
    }))
    .unwrap_err();

    assert_eq!(rejection.status, 400);
    assert_eq!(
        rejection.body.message,
        "Invalid length 'x': dimensions must be numbers greater than 0 cm"
    );
}

#[test]
fn test_non_numeric_declared_value_keeps_submitted_text() {
    let rejection = quote_from_json(&json!({
        "packageType": "express_parcel",
        "weight": 2,
        "customsDeclaration": {"value": "abc"}
    }))
    .unwrap_err();

    assert_eq!(rejection.status, 400);
    assert_eq!(
        rejection.body.message,
        "Invalid declared value 'abc': declared value must be a number not below 0"
    );
}

#[test]
fn test_overflowing_volume_is_rejected_not_priced() {
    let mut ctx = RequestContext::new(json!({
        "packageType": "standard_parcel",
        "weight": 0.5,
        "dimensions": {"length": "1e200", "width": "1e200", "height": "1e200"}
    }));

    let rejection = price_shipment(&mut ctx).unwrap_err();

    assert!(ctx.shipping_quote().is_none());
    assert_eq!(rejection.status, 400);
    assert_eq!(
        rejection.body.message,
        "Invalid width '1e200': dimensions must be numbers greater than 0 cm"
    );
}

#[test]
fn test_non_string_package_type_is_rejected_as_tier() {
    let rejection = quote_from_json(&json!({"packageType": 123, "weight": 1})).unwrap_err();
    assert_eq!(rejection.body.message, "Invalid package type '123'");
}
