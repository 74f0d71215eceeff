//! Persisted valuation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::Contact;
use crate::types::{BusinessMetrics, ValuationResult};

/// One completed valuation, as stored and as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRecord {
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// Normalized metrics the valuation was computed from
    pub form_data: BusinessMetrics,
    /// Explanation text
    pub valuation_result: String,
    pub total_valuation: f64,
    pub formatted_valuation: String,
    pub created_at: DateTime<Utc>,
}

impl ValuationRecord {
    /// Build a record with a fresh id.
    pub fn new(
        contact: Contact,
        metrics: BusinessMetrics,
        result: &ValuationResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name: contact.company_name,
            email: contact.email,
            contact_name: contact.contact_name,
            form_data: metrics,
            valuation_result: result.explanation.clone(),
            total_valuation: result.total_valuation,
            formatted_valuation: result.formatted_valuation(),
            created_at,
        }
    }

    /// Salutation used in the report.
    pub fn greeting_name(&self) -> &str {
        self.contact_name.as_deref().unwrap_or(&self.company_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate;
    use crate::form::ValuationForm;

    fn make_record() -> ValuationRecord {
        let form = ValuationForm {
            email: "owner@acme.test".into(),
            company_name: "Acme Ltd".into(),
            revenue: "200000".into(),
            industry: "retail".into(),
            currency: "eur".into(),
            ..Default::default()
        };
        let metrics = form.normalize();
        let result = calculate(&metrics);
        ValuationRecord::new(form.contact().unwrap(), metrics, &result, Utc::now())
    }

    #[test]
    fn test_record_copies_result() {
        let record = make_record();

        assert_eq!(record.company_name, "Acme Ltd");
        assert_eq!(record.email, "owner@acme.test");
        assert_eq!(record.form_data.currency, "eur");
        assert!(record.formatted_valuation.starts_with('€'));
        assert!(record.valuation_result.contains(&record.formatted_valuation));
        assert_eq!(record.greeting_name(), "Acme Ltd");
    }

    #[test]
    fn test_records_get_distinct_ids() {
        assert_ne!(make_record().id, make_record().id);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(make_record()).unwrap();

        assert!(json.get("companyName").is_some());
        assert!(json.get("formattedValuation").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("contactName").is_none());
        assert_eq!(json["formData"]["industry"], "retail");
    }
}
