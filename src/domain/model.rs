use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Domestic,
    International,
}

impl Scope {
    /// Tier codes ending in `_intl` are international, everything else is domestic.
    pub fn from_tier_code(tier_code: &str) -> Self {
        if tier_code.ends_with("_intl") {
            Scope::International
        } else {
            Scope::Domestic
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Scope::Domestic => "domestic",
            Scope::International => "international",
        })
    }
}

/// A row of the rate card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceTier {
    pub code: &'static str,
    pub scope: Scope,
    pub base_rate: f64,
    pub max_weight_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn volume_cm3(&self) -> f64 {
        self.length * self.width * self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub tier_code: String,
    pub declared_weight_kg: f64,
    #[serde(default)]
    pub dimensions_cm: Option<Dimensions>,
    #[serde(default)]
    pub declared_value: Option<f64>,
}

impl QuoteRequest {
    pub fn new(tier_code: impl Into<String>, declared_weight_kg: f64) -> Self {
        Self {
            tier_code: tier_code.into(),
            declared_weight_kg,
            dimensions_cm: None,
            declared_value: None,
        }
    }

    pub fn with_dimensions(mut self, length: f64, width: f64, height: f64) -> Self {
        self.dimensions_cm = Some(Dimensions::new(length, width, height));
        self
    }

    pub fn with_declared_value(mut self, declared_value: f64) -> Self {
        self.declared_value = Some(declared_value);
        self
    }
}

/// Itemized quote. Components are unrounded; `total` is rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub tier_code: String,
    pub scope: Scope,
    pub volumetric_weight: f64,
    pub base_rate: f64,
    pub weight_charge: f64,
    pub volume_charge: f64,
    pub insurance_charge: f64,
    pub international_surcharge: f64,
    pub total: f64,
}

/// Display form of a [`QuoteResult`], every amount rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub base_rate: f64,
    pub weight_charge: f64,
    pub volume_charge: f64,
    pub insurance_charge: f64,
    pub international_surcharge: f64,
    pub total: f64,
}

/// One line of a batch manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentLine {
    pub reference: String,
    pub request: QuoteRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LineOutcome {
    Quoted { quote: QuoteResult },
    Rejected { field: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteLine {
    pub reference: String,
    pub tier_code: String,
    #[serde(flatten)]
    pub outcome: LineOutcome,
}

impl QuoteLine {
    pub fn quote(&self) -> Option<&QuoteResult> {
        match &self.outcome {
            LineOutcome::Quoted { quote } => Some(quote),
            LineOutcome::Rejected { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub batch_name: String,
    pub total_lines: usize,
    pub quoted: usize,
    pub rejected: usize,
    pub grand_total: f64,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub lines: Vec<QuoteLine>,
    pub summary: BatchSummary,
    pub csv_output: String,
    pub json_output: String,
}
