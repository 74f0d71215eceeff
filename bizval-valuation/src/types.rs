//! Valuation Types.
//!
//! Input metrics, the heuristic lookup tables (industry, business age,
//! revenue trend), and the result record produced by the calculator.

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// Fraction of revenue assumed as net income when none is reported.
pub const DEFAULT_NET_INCOME_FRACTION: f64 = 0.10;

/// Follower count used when none is reported.
pub const DEFAULT_FOLLOWERS: u64 = 1;

// ============================================================================
// Industry
// ============================================================================

/// Industry category, each carrying a fixed earnings multiple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Tech,
    Manufacturing,
    Service,
    Retail,
    FoodAndBeverage,
    Other,
}

impl Industry {
    /// Every category, ordered by descending multiplier.
    pub const ALL: [Industry; 6] = [
        Industry::Tech,
        Industry::Manufacturing,
        Industry::Service,
        Industry::Retail,
        Industry::FoodAndBeverage,
        Industry::Other,
    ];

    /// Resolve a free-text label (case-insensitive). Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "tech" => Self::Tech,
            "manufacturing" => Self::Manufacturing,
            "service" => Self::Service,
            "retail" => Self::Retail,
            "food & beverage" | "food and beverage" => Self::FoodAndBeverage,
            _ => Self::Other,
        }
    }

    /// Multiple applied to net income.
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Tech => 3.0,
            Self::Manufacturing => 2.5,
            Self::Service => 2.2,
            Self::Retail => 2.0,
            Self::FoodAndBeverage => 1.8,
            Self::Other => 1.5,
        }
    }

    /// Canonical lower-case label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Manufacturing => "manufacturing",
            Self::Service => "service",
            Self::Retail => "retail",
            Self::FoodAndBeverage => "food & beverage",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Business Age
// ============================================================================

/// Age bucket of the business, ordered from least to most stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessAge {
    LessThanOneYear,
    OneToThreeYears,
    ThreeToFiveYears,
    FiveToTenYears,
    TenPlusYears,
}

impl BusinessAge {
    pub const ALL: [BusinessAge; 5] = [
        BusinessAge::LessThanOneYear,
        BusinessAge::OneToThreeYears,
        BusinessAge::ThreeToFiveYears,
        BusinessAge::FiveToTenYears,
        BusinessAge::TenPlusYears,
    ];

    /// Resolve a label such as "1–3 years". Unknown labels map to the lowest bucket.
    pub fn from_label(label: &str) -> Self {
        match normalize_age_label(label).as_str() {
            "less than 1 year" => Self::LessThanOneYear,
            "1-3 years" => Self::OneToThreeYears,
            "3-5 years" => Self::ThreeToFiveYears,
            "5-10 years" => Self::FiveToTenYears,
            "10+ years" => Self::TenPlusYears,
            _ => Self::LessThanOneYear,
        }
    }

    /// Stability multiplier.
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::LessThanOneYear => 0.8,
            Self::OneToThreeYears => 0.9,
            Self::ThreeToFiveYears => 1.0,
            Self::FiveToTenYears => 1.1,
            Self::TenPlusYears => 1.2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LessThanOneYear => "less than 1 year",
            Self::OneToThreeYears => "1-3 years",
            Self::ThreeToFiveYears => "3-5 years",
            Self::FiveToTenYears => "5-10 years",
            Self::TenPlusYears => "10+ years",
        }
    }
}

impl std::fmt::Display for BusinessAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonicalize an age label: trim, lower-case, map every dash variant to
/// `-`, collapse whitespace, and drop spaces around the hyphen.
pub fn normalize_age_label(label: &str) -> String {
    let dashed: String = label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            // hyphen, non-breaking hyphen, figure dash, en dash, em dash, horizontal bar
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            c => c,
        })
        .collect();

    dashed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" - ", "-")
        .replace(" -", "-")
        .replace("- ", "-")
}

// ============================================================================
// Revenue Trend
// ============================================================================

/// Direction of revenue over recent periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueTrend {
    Growing,
    #[default]
    Stable,
    Declining,
}

impl RevenueTrend {
    /// Resolve an optional label. Missing or unknown labels are `Stable`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("growing") => Self::Growing,
            Some("declining") => Self::Declining,
            _ => Self::Stable,
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Growing => 1.1,
            Self::Stable => 1.0,
            Self::Declining => 0.9,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Growing => "growing",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

impl std::fmt::Display for RevenueTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Input Types
// ============================================================================

/// Business metrics submitted for valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
    /// Annual gross revenue
    pub revenue: f64,
    /// Annual profit; derived from revenue when absent
    #[serde(default)]
    pub net_income: Option<f64>,
    /// Free-text industry label
    pub industry: String,
    /// Total asset value
    pub assets: f64,
    /// Total liability value
    pub liabilities: f64,
    /// Age bucket label, e.g. "3-5 years"
    pub years_in_operation: String,
    /// Follower count on the most active platform
    #[serde(default)]
    pub social_followers: Option<u64>,
    /// "growing", "stable" or "declining"
    #[serde(default)]
    pub revenue_trend: Option<String>,
    /// 3-letter currency code
    #[serde(default)]
    pub currency: String,
}

impl BusinessMetrics {
    /// Net income, falling back to a fixed fraction of revenue.
    pub fn effective_net_income(&self) -> f64 {
        self.net_income
            .unwrap_or(self.revenue * DEFAULT_NET_INCOME_FRACTION)
    }

    pub fn effective_followers(&self) -> u64 {
        self.social_followers.unwrap_or(DEFAULT_FOLLOWERS)
    }

    pub fn industry(&self) -> Industry {
        Industry::from_label(&self.industry)
    }

    pub fn age(&self) -> BusinessAge {
        BusinessAge::from_label(&self.years_in_operation)
    }

    pub fn trend(&self) -> RevenueTrend {
        RevenueTrend::from_label(self.revenue_trend.as_deref())
    }

    pub fn currency(&self) -> Currency {
        Currency::from_code(&self.currency)
    }

    /// Whether every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        self.revenue.is_finite()
            && self.assets.is_finite()
            && self.liabilities.is_finite()
            && self.net_income.map_or(true, f64::is_finite)
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Intermediate values of each pipeline stage, unformatted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationBreakdown {
    /// Earnings multiple plus net assets, before any adjustment
    pub base_valuation: f64,
    /// Capped social media bonus as a fraction (0.1 = +10%)
    pub social_media_factor: f64,
    pub valuation_with_social_media: f64,
    pub valuation_with_age: f64,
    pub final_valuation: f64,
}

/// Inputs each stage actually used after default substitution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFactors {
    pub net_income: f64,
    pub followers: u64,
    pub industry: Industry,
    pub industry_multiplier: f64,
    pub age: BusinessAge,
    pub age_multiplier: f64,
    pub trend: RevenueTrend,
    pub trend_multiplier: f64,
    pub currency: Currency,
}

/// Outcome of a valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub total_valuation: f64,
    pub breakdown: ValuationBreakdown,
    pub factors: AppliedFactors,
    /// Short human-readable summary embedding the formatted valuation
    pub explanation: String,
}

impl ValuationResult {
    /// Final valuation rendered in the resolved currency.
    pub fn formatted_valuation(&self) -> String {
        self.factors.currency.format(self.total_valuation)
    }
}
