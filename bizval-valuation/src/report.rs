//! Valuation report rendering.
//!
//! Produces the subject plus HTML and plain-text bodies handed to the
//! notification service. All user-provided text is HTML-escaped.

use serde::{Deserialize, Serialize};

use crate::record::ValuationRecord;

const HEADING: &str = "Your Business Valuation Report";
const ACCENT_COLOR: &str = "#00AB84";
const SIGNATURE: &str = "Your Business Valuation Team";

/// Rendered report for one valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl ValuationReport {
    pub fn render(record: &ValuationRecord) -> Self {
        let date = record.created_at.format("%B %-d, %Y").to_string();

        Self {
            subject: format!("Business Valuation Report - {}", record.company_name),
            html: render_html(record, &date),
            text: render_text(record, &date),
        }
    }
}

fn render_html(record: &ValuationRecord, date: &str) -> String {
    let explanation = record
        .valuation_result
        .lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>\n");

    format!(
        r#"<h1>{HEADING}</h1>
<p>Dear {name},</p>
<p>Thank you for using our business valuation tool. Your valuation report dated {date} is below.</p>
<p style="font-size: 18px; font-weight: bold;">Company Name: <span style="color: {ACCENT_COLOR};">{company}</span></p>
<p style="font-size: 18px; font-weight: bold;">Final Valuation: <span style="color: {ACCENT_COLOR};">{valuation}</span></p>
<p>{explanation}</p>
<br>
<p>Best regards,</p>
<p>{SIGNATURE}</p>
"#,
        name = escape_html(record.greeting_name()),
        company = escape_html(&record.company_name),
        valuation = escape_html(&record.formatted_valuation),
    )
}

fn render_text(record: &ValuationRecord, date: &str) -> String {
    format!(
        "{HEADING}\n\n\
         Dear {name},\n\n\
         Thank you for using our business valuation tool. Your valuation report dated {date} is below.\n\n\
         Company Name: {company}\n\
         Final Valuation: {valuation}\n\n\
         {explanation}\n\n\
         Best regards,\n\
         {SIGNATURE}\n",
        name = record.greeting_name(),
        company = record.company_name,
        valuation = record.formatted_valuation,
        explanation = record.valuation_result,
    )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
