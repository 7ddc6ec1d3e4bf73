//! Shipment-pricing step of the order-creation request chain.
//!
//! The order route runs [`price_shipment`] before its handler: a bad body is
//! turned into a `400 {success: false, message}` rejection, a good one gets
//! its quote attached to the [`RequestContext`] for the handler to persist.

use crate::core::pricing;
use crate::core::{QuoteRequest, QuoteResult};
use crate::domain::model::Dimensions;
use crate::utils::error::{PostalError, QuoteError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const BAD_REQUEST: u16 = 400;

const MISSING: &str = "(missing)";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBody {
    #[serde(default)]
    pub package_type: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub dimensions: Option<DimensionsBody>,
    #[serde(default)]
    pub customs_declaration: Option<CustomsDeclarationBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DimensionsBody {
    #[serde(default)]
    pub length: Option<Value>,
    #[serde(default)]
    pub width: Option<Value>,
    #[serde(default)]
    pub height: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomsDeclarationBody {
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub status: u16,
    pub body: ErrorBody,
}

impl Rejection {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: BAD_REQUEST,
            body: ErrorBody {
                success: false,
                message: message.into(),
            },
        }
    }
}

impl From<Rejection> for PostalError {
    fn from(rejection: Rejection) -> Self {
        PostalError::ShipmentRejected {
            message: rejection.body.message,
        }
    }
}

impl From<QuoteError> for Rejection {
    fn from(e: QuoteError) -> Self {
        Rejection::bad_request(e.to_string())
    }
}

/// The slice of an incoming request the pricing step reads and writes.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub body: Value,
    shipping_quote: Option<QuoteResult>,
}

impl RequestContext {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            shipping_quote: None,
        }
    }

    /// Quote attached by [`price_shipment`], if it ran and accepted the body.
    pub fn shipping_quote(&self) -> Option<&QuoteResult> {
        self.shipping_quote.as_ref()
    }
}

/// JSON numbers, or strings holding one (form posts send everything as text).
fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Converts a body into an engine request. Fields that are missing or not
/// numeric become NaN so the engine reports them in its usual order. The
/// submitted text of every numeric field is kept for the error message.
struct ParsedBody {
    request: QuoteRequest,
    raw: HashMap<&'static str, String>,
}

impl ParsedBody {
    fn number(
        raw: &mut HashMap<&'static str, String>,
        field: &'static str,
        value: Option<&Value>,
    ) -> f64 {
        match value {
            Some(v) => {
                raw.insert(field, raw_text(v));
                numeric(v).unwrap_or(f64::NAN)
            }
            None => {
                raw.insert(field, MISSING.to_string());
                f64::NAN
            }
        }
    }

    fn from_body(body: QuoteBody) -> Self {
        let mut raw = HashMap::new();

        let tier_code = body
            .package_type
            .map(|v| raw_text(&v))
            .unwrap_or_default();
        let declared_weight_kg = Self::number(&mut raw, "declared_weight_kg", body.weight.as_ref());

        let dimensions_cm = body.dimensions.map(|d| {
            Dimensions::new(
                Self::number(&mut raw, "length", d.length.as_ref()),
                Self::number(&mut raw, "width", d.width.as_ref()),
                Self::number(&mut raw, "height", d.height.as_ref()),
            )
        });

        let declared_value = body
            .customs_declaration
            .and_then(|c| c.value)
            .map(|v| Self::number(&mut raw, "declared_value", Some(&v)));

        Self {
            request: QuoteRequest {
                tier_code,
                declared_weight_kg,
                dimensions_cm,
                declared_value,
            },
            raw,
        }
    }

    fn restore_raw(&self, err: QuoteError) -> QuoteError {
        let Some(text) = self.raw.get(err.field()).cloned() else {
            return err;
        };
        match err {
            QuoteError::InvalidWeight { .. } => QuoteError::InvalidWeight { value: text },
            QuoteError::InvalidDimension { dimension, .. } => {
                QuoteError::InvalidDimension { dimension, value: text }
            }
            QuoteError::InvalidDeclaredValue { .. } => {
                QuoteError::InvalidDeclaredValue { value: text }
            }
            other => other,
        }
    }
}

/// Reads a JSON body in the order form's shape and prices it.
pub fn quote_from_json(body: &Value) -> Result<QuoteResult, Rejection> {
    let body: QuoteBody = serde_json::from_value(body.clone())
        .map_err(|e| Rejection::bad_request(format!("Malformed shipment details: {}", e)))?;
    let parsed = ParsedBody::from_body(body);

    pricing::quote(&parsed.request).map_err(|e| {
        let e = parsed.restore_raw(e);
        tracing::debug!(field = e.field(), "Shipment quote rejected: {}", e);
        Rejection::from(e)
    })
}

/// Prices the request body and attaches the quote, or rejects the request.
pub fn price_shipment(ctx: &mut RequestContext) -> Result<(), Rejection> {
    let quote = quote_from_json(&ctx.body)?;
    tracing::debug!(
        tier = %quote.tier_code,
        total = quote.total,
        "Shipment priced"
    );
    ctx.shipping_quote = Some(quote);
    Ok(())
}
