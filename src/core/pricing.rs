//! Rate card, request validation and quote arithmetic.
//!
//! Everything in here is a pure function of its arguments. The rate card is a
//! `static` table, so any number of threads can quote at once without locks.

use crate::domain::model::{
    Dimensions, QuoteBreakdown, QuoteRequest, QuoteResult, Scope, ServiceTier,
};
use crate::utils::error::QuoteError;

/// Dimensional-weight divisor: cm³ per billable unit of volume.
pub const VOLUMETRIC_DIVISOR: f64 = 5000.0;
pub const INSURANCE_RATE: f64 = 0.01;
/// Applied to the base rate only, never to the running total.
pub const INTERNATIONAL_SURCHARGE_RATE: f64 = 0.15;

static RATE_CARD: [ServiceTier; 10] = [
    tier("basic_letter", Scope::Domestic, 50.0, 0.1),
    tier("standard_parcel", Scope::Domestic, 150.0, 1.0),
    tier("express_parcel", Scope::Domestic, 300.0, 5.0),
    tier("premium_parcel", Scope::Domestic, 600.0, 10.0),
    tier("bulk_shipment", Scope::Domestic, 1200.0, 20.0),
    tier("basic_intl", Scope::International, 250.0, 0.1),
    tier("standard_intl", Scope::International, 800.0, 1.0),
    tier("express_intl", Scope::International, 2000.0, 5.0),
    tier("premium_intl", Scope::International, 4000.0, 10.0),
    tier("bulk_intl", Scope::International, 9000.0, 20.0),
];

const fn tier(code: &'static str, scope: Scope, base_rate: f64, max_weight_kg: f64) -> ServiceTier {
    ServiceTier {
        code,
        scope,
        base_rate,
        max_weight_kg,
    }
}

pub fn weight_rate_per_kg(scope: Scope) -> f64 {
    match scope {
        Scope::Domestic => 80.0,
        Scope::International => 300.0,
    }
}

pub fn volume_rate(scope: Scope) -> f64 {
    match scope {
        Scope::Domestic => 100.0,
        Scope::International => 400.0,
    }
}

/// Round half up to two decimal places.
pub fn round2(amount: f64) -> f64 {
    // Amounts are never negative here, so half-away-from-zero is half-up.
    let cents = amount * 100.0;
    if !cents.is_finite() {
        // Far beyond cent precision already.
        return amount;
    }
    cents.round() / 100.0
}

pub fn rate_card() -> &'static [ServiceTier] {
    &RATE_CARD
}

/// Tiers of one scope, lightest first.
pub fn tiers_for(scope: Scope) -> impl Iterator<Item = &'static ServiceTier> {
    RATE_CARD.iter().filter(move |t| t.scope == scope)
}

pub fn resolve_tier(scope: Scope, tier_code: &str) -> Result<&'static ServiceTier, QuoteError> {
    tiers_for(scope)
        .find(|t| t.code == tier_code)
        .ok_or_else(|| QuoteError::InvalidTier {
            tier_code: tier_code.to_string(),
        })
}

/// Lightest tier of `scope` whose ceiling admits `weight_kg`.
pub fn suggest_tier(scope: Scope, weight_kg: f64) -> Option<&'static ServiceTier> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return None;
    }
    tiers_for(scope).find(|t| weight_kg <= t.max_weight_kg)
}

/// A request that passed every check, bound to its rate card row.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    tier: &'static ServiceTier,
    weight_kg: f64,
    dimensions: Option<Dimensions>,
    declared_value: Option<f64>,
}

impl ValidatedRequest {
    pub fn tier(&self) -> &'static ServiceTier {
        self.tier
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn declared_value(&self) -> Option<f64> {
        self.declared_value
    }
}

/// Checks run in a fixed order and the first failure is returned.
pub fn validate(request: &QuoteRequest) -> Result<ValidatedRequest, QuoteError> {
    let scope = Scope::from_tier_code(&request.tier_code);
    let tier = resolve_tier(scope, &request.tier_code)?;

    let weight = request.declared_weight_kg;
    if !(weight.is_finite() && weight > 0.0) {
        return Err(QuoteError::InvalidWeight {
            value: weight.to_string(),
        });
    }
    if weight > tier.max_weight_kg {
        return Err(QuoteError::WeightExceedsLimit {
            tier_code: tier.code.to_string(),
            max_allowed: tier.max_weight_kg,
        });
    }

    if let Some(dims) = &request.dimensions_cm {
        for (dimension, value) in [
            ("length", dims.length),
            ("width", dims.width),
            ("height", dims.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(QuoteError::InvalidDimension {
                    dimension,
                    value: value.to_string(),
                });
            }
        }
        // Each side may be fine while the volume is not.
        let base_area = dims.length * dims.width;
        if !base_area.is_finite() {
            return Err(QuoteError::InvalidDimension {
                dimension: "width",
                value: dims.width.to_string(),
            });
        }
        if !(base_area * dims.height).is_finite() {
            return Err(QuoteError::InvalidDimension {
                dimension: "height",
                value: dims.height.to_string(),
            });
        }
    }

    if let Some(value) = request.declared_value {
        if !(value.is_finite() && value >= 0.0) {
            return Err(QuoteError::InvalidDeclaredValue {
                value: value.to_string(),
            });
        }
    }

    Ok(ValidatedRequest {
        tier,
        weight_kg: weight,
        dimensions: request.dimensions_cm,
        declared_value: request.declared_value,
    })
}

pub fn calculate(request: &ValidatedRequest) -> QuoteResult {
    let tier = request.tier;
    let scope = tier.scope;

    let base_rate = tier.base_rate;
    let weight_charge = request.weight_kg * weight_rate_per_kg(scope);
    let volumetric_weight = request
        .dimensions
        .map(|d| d.volume_cm3() / VOLUMETRIC_DIVISOR)
        .unwrap_or(0.0);
    let volume_charge = volumetric_weight * volume_rate(scope);
    let insurance_charge = request
        .declared_value
        .map(|v| v * INSURANCE_RATE)
        .unwrap_or(0.0);
    let international_surcharge = match scope {
        Scope::International => base_rate * INTERNATIONAL_SURCHARGE_RATE,
        Scope::Domestic => 0.0,
    };

    let total = round2(
        base_rate + weight_charge + volume_charge + insurance_charge + international_surcharge,
    );

    QuoteResult {
        tier_code: tier.code.to_string(),
        scope,
        volumetric_weight,
        base_rate,
        weight_charge,
        volume_charge,
        insurance_charge,
        international_surcharge,
        total,
    }
}

/// Validate then calculate. Every caller that needs a price goes through here.
pub fn quote(request: &QuoteRequest) -> Result<QuoteResult, QuoteError> {
    validate(request).map(|validated| calculate(&validated))
}

/// Quote for a live form preview; incomplete or invalid input shows nothing.
pub fn preview(request: &QuoteRequest) -> Option<QuoteResult> {
    quote(request).ok()
}

impl QuoteResult {
    pub fn breakdown(&self) -> QuoteBreakdown {
        QuoteBreakdown {
            base_rate: round2(self.base_rate),
            weight_charge: round2(self.weight_charge),
            volume_charge: round2(self.volume_charge),
            insurance_charge: round2(self.insurance_charge),
            international_surcharge: round2(self.international_surcharge),
            total: self.total,
        }
    }
}
