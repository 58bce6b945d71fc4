use askama::Template;
use chrono::{DateTime, Utc};

use crate::services::submission::{Outcome, SubmissionPhase};

/// Result area of the main page.
#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub submitting: bool,
    pub success: Option<SuccessView>,
    pub failure: Option<String>,
}

pub struct SuccessView {
    pub price: String,
    pub currency: String,
    pub timestamp: Option<String>,
    pub input_summary: Option<String>,
    pub received_at: String,
}

/// Format an amount as euros with thousands separators and two decimals,
/// e.g. `275000.5` becomes `€275,000.50`.
pub fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("€{amount}");
    }

    let formatted = format!("{amount:.2}");
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(unsigned) => ("-", unsigned),
        None => ("", formatted.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("€{sign}{grouped}.{fraction}")
}

/// Render a settled submission.
pub fn render_outcome(outcome: &Outcome, settled_at: DateTime<Utc>) -> Result<String, askama::Error> {
    let template = match outcome {
        Outcome::Success(result) => ResultTemplate {
            submitting: false,
            success: Some(SuccessView {
                price: format_price(result.predicted_price),
                currency: result.currency().to_string(),
                timestamp: result.timestamp.clone(),
                input_summary: result
                    .input_summary
                    .as_ref()
                    .map(|summary| {
                        serde_json::to_string_pretty(summary).unwrap_or_else(|_| summary.to_string())
                    }),
                received_at: settled_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            }),
            failure: None,
        },
        Outcome::Failure(message) => ResultTemplate {
            submitting: false,
            success: None,
            failure: Some(message.clone()),
        },
    };
    template.render()
}

/// Render whatever the result area should show for `phase`.
pub fn render_phase(phase: &SubmissionPhase) -> Result<String, askama::Error> {
    match phase {
        SubmissionPhase::Idle => Ok(String::new()),
        SubmissionPhase::Submitting => ResultTemplate {
            submitting: true,
            success: None,
            failure: None,
        }
        .render(),
        SubmissionPhase::Settled {
            outcome,
            settled_at,
        } => render_outcome(outcome, *settled_at),
    }
}
