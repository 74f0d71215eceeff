//! Form normalization.
//!
//! The web form posts every field as text. This module turns that raw payload
//! into typed [`BusinessMetrics`] plus the contact details needed to deliver
//! the report.

use bizval_common::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};

use crate::currency::Currency;
use crate::types::{BusinessAge, BusinessMetrics, Industry};

/// Raw form submission. Every field defaults to an empty string.
///
/// Numeric fields also accept JSON numbers, which are kept as their textual form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValuationForm {
    pub email: String,
    pub company_name: String,
    #[serde(rename = "businessIndividualName")]
    pub contact_name: String,
    pub currency: String,
    #[serde(deserialize_with = "text_or_number")]
    pub revenue: String,
    #[serde(deserialize_with = "text_or_number")]
    pub net_income: String,
    pub industry: String,
    #[serde(deserialize_with = "text_or_number")]
    pub assets: String,
    #[serde(deserialize_with = "text_or_number")]
    pub liabilities: String,
    pub years_in_operation: String,
    #[serde(deserialize_with = "text_or_number")]
    pub social_followers: String,
    pub revenue_trend: String,
}

/// Who the report is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub company_name: String,
    pub contact_name: Option<String>,
}

impl ValuationForm {
    /// Coerce the raw fields into metrics, defaulting an empty currency to USD.
    pub fn normalize(&self) -> BusinessMetrics {
        self.normalize_with_currency(Currency::default())
    }

    /// Coerce the raw fields into metrics, using `default_currency` when the
    /// form leaves the currency empty.
    pub fn normalize_with_currency(&self, default_currency: Currency) -> BusinessMetrics {
        BusinessMetrics {
            revenue: parse_amount(&self.revenue).unwrap_or(0.0).max(0.0),
            net_income: parse_amount(&self.net_income),
            industry: non_empty(&self.industry)
                .unwrap_or_else(|| Industry::Other.label().to_string()),
            assets: parse_amount(&self.assets).unwrap_or(0.0),
            liabilities: parse_amount(&self.liabilities).unwrap_or(0.0),
            years_in_operation: non_empty(&self.years_in_operation)
                .unwrap_or_else(|| BusinessAge::LessThanOneYear.label().to_string()),
            social_followers: parse_followers(&self.social_followers),
            revenue_trend: non_empty(&self.revenue_trend),
            currency: non_empty(&self.currency)
                .map(|c| c.to_lowercase())
                .unwrap_or_else(|| default_currency.code().to_string()),
        }
    }

    /// Extract and check the contact details.
    pub fn contact(&self) -> Result<Contact, ValidationError> {
        let mut errors = Vec::new();

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "email".into(),
            });
        } else if !is_plausible_email(email) {
            errors.push(ValidationError::InvalidValue {
                field: "email".into(),
                reason: "must be an email address".into(),
            });
        }

        let company_name = self.company_name.trim();
        if company_name.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "companyName".into(),
            });
        }

        match errors.len() {
            0 => Ok(Contact {
                email: email.to_string(),
                company_name: company_name.to_string(),
                contact_name: non_empty(&self.contact_name),
            }),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a monetary amount such as `"1,250,000"` or `" 12 500.50 "`.
///
/// Returns `None` for empty, unparseable, or non-finite input.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' ' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_followers(raw: &str) -> Option<u64> {
    let value = parse_amount(raw)?;
    if value < 0.0 {
        return None;
    }
    // Saturating cast; fractional followers are truncated.
    Some(value.trunc() as u64)
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
