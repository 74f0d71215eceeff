//! Bizval Valuation - business valuation heuristics for the lead-generation tool.
//!
//! A pure, deterministic calculator over a handful of business metrics, plus
//! the supporting pieces around it.
//!
//! # Pipeline
//!
//! 1. **Base value**: industry multiple applied to net income, plus net assets
//! 2. **Social media bonus**: capped per-follower premium
//! 3. **Age adjustment**: stability multiplier by years in operation
//! 4. **Trend adjustment**: growing / stable / declining revenue
//!
//! # Usage
//!
//! ```ignore
//! use bizval_valuation::{calculate, ValuationForm};
//!
//! let form: ValuationForm = serde_json::from_str(body)?;
//! let metrics = form.normalize();
//! let result = calculate(&metrics);
//!
//! println!("{}", result.formatted_valuation());
//! println!("{}", result.explanation);
//! ```

pub mod calculator;
pub mod currency;
pub mod form;
pub mod record;
pub mod report;
pub mod types;

pub use calculator::{calculate, social_media_factor, SOCIAL_FACTOR_CAP, SOCIAL_WEIGHT_PER_FOLLOWER};
pub use currency::{format_currency_value, format_number, Currency, CurrencyStyle};
pub use form::{Contact, ValuationForm};
pub use record::ValuationRecord;
pub use report::ValuationReport;
pub use types::{
    AppliedFactors, BusinessAge, BusinessMetrics, Industry, RevenueTrend, ValuationBreakdown,
    ValuationResult, DEFAULT_FOLLOWERS, DEFAULT_NET_INCOME_FRACTION,
};
