//! Valuation Calculator.
//!
//! Runs the fixed five-stage pipeline: default substitution, industry
//! multiple, social media bonus, age adjustment, and trend adjustment. Each
//! stage compounds on the previous stage's output.

use super::currency::format_number;
use super::types::*;

/// Bonus fraction contributed by each follower.
pub const SOCIAL_WEIGHT_PER_FOLLOWER: f64 = 0.0001;

/// Upper bound of the social media bonus (+50%).
pub const SOCIAL_FACTOR_CAP: f64 = 0.5;

/// Compute the valuation for a set of business metrics.
///
/// Total over its input: every unknown label or missing value has a fallback.
/// Deterministic; no clock, randomness or shared state is involved.
pub fn calculate(metrics: &BusinessMetrics) -> ValuationResult {
    debug_assert!(
        metrics.is_finite(),
        "non-finite metrics must be rejected before valuation: {metrics:?}"
    );

    let factors = resolve_factors(metrics);

    let base_valuation =
        factors.industry_multiplier * factors.net_income + (metrics.assets - metrics.liabilities);
    let social_media_factor = social_media_factor(factors.followers);
    let valuation_with_social_media = base_valuation * (1.0 + social_media_factor);
    let valuation_with_age = valuation_with_social_media * factors.age_multiplier;
    let final_valuation = valuation_with_age * factors.trend_multiplier;

    let breakdown = ValuationBreakdown {
        base_valuation,
        social_media_factor,
        valuation_with_social_media,
        valuation_with_age,
        final_valuation,
    };

    let explanation = generate_explanation(&breakdown, &factors, metrics);

    ValuationResult {
        total_valuation: final_valuation,
        breakdown,
        factors,
        explanation,
    }
}

/// Capped social media bonus for a follower count.
pub fn social_media_factor(followers: u64) -> f64 {
    (followers as f64 * SOCIAL_WEIGHT_PER_FOLLOWER).min(SOCIAL_FACTOR_CAP)
}

fn resolve_factors(metrics: &BusinessMetrics) -> AppliedFactors {
    let industry = metrics.industry();
    let age = metrics.age();
    let trend = metrics.trend();

    AppliedFactors {
        net_income: metrics.effective_net_income(),
        followers: metrics.effective_followers(),
        industry,
        industry_multiplier: industry.multiplier(),
        age,
        age_multiplier: age.multiplier(),
        trend,
        trend_multiplier: trend.multiplier(),
        currency: metrics.currency(),
    }
}

fn generate_explanation(
    breakdown: &ValuationBreakdown,
    factors: &AppliedFactors,
    metrics: &BusinessMetrics,
) -> String {
    let currency = factors.currency;
    let net_assets = metrics.assets - metrics.liabilities;

    format!(
        "Business Valuation Breakdown:\n\
         - Base Value: {base} ({industry} multiple x{industry_mult:.1} on net income of {income}, net assets {assets})\n\
         - Social Media Adjustment: {social:+.1}% ({followers} followers)\n\
         - Business Age Adjustment: x{age_mult:.2} ({age})\n\
         - Revenue Trend Adjustment: x{trend_mult:.2} ({trend})\n\
         - Estimated Valuation: {total}",
        base = currency.format(breakdown.base_valuation),
        industry = factors.industry,
        industry_mult = factors.industry_multiplier,
        income = currency.format(factors.net_income),
        assets = currency.format(net_assets),
        social = breakdown.social_media_factor * 100.0,
        followers = format_number(factors.followers as f64),
        age_mult = factors.age_multiplier,
        age = factors.age,
        trend_mult = factors.trend_multiplier,
        trend = factors.trend,
        total = currency.format(breakdown.final_valuation),
    )
}
