//! PIX payout summary.

use rust_decimal::Decimal;

use crate::models::{AuditStep, AuditWarning, PaymentLine, Person, PixEntry, PixSummary};

/// Warning code for a payable person without a PIX key.
pub const MISSING_PIX_KEY_WARNING: &str = "MISSING_PIX_KEY";

/// The PIX summary and its audit record.
#[derive(Debug, Clone)]
pub struct PixSummaryResult {
    /// The summary.
    pub summary: PixSummary,
    /// The audit step recording the summary.
    pub audit_step: AuditStep,
    /// One warning per payable person without a key.
    pub warnings: Vec<AuditWarning>,
}

/// Builds the PIX payout summary for a day's lines.
///
/// Only lines with a positive `payable_amount` are considered. Each produces
/// an entry if the person has a PIX key, otherwise the person is listed in
/// `missing_pix_key`. `total` sums the entries only.
pub fn build_pix_summary(
    lines: &[PaymentLine],
    people: &[Person],
    step_number: u32,
) -> PixSummaryResult {
    let mut summary = PixSummary::default();
    let mut warnings = Vec::new();

    for line in lines.iter().filter(|l| l.payable_amount > Decimal::ZERO) {
        summary.payable_count += 1;

        let pix_key = people
            .iter()
            .find(|p| p.id == line.person_id)
            .filter(|p| p.has_pix_key())
            .and_then(|p| p.pix_key.as_deref())
            .map(str::trim);

        match pix_key {
            Some(key) => {
                summary.total += line.payable_amount;
                summary.entries.push(PixEntry {
                    person_id: line.person_id.clone(),
                    person_name: line.person_name.clone(),
                    pix_key: key.to_string(),
                    amount: line.payable_amount,
                    status: line.status,
                });
            }
            None => {
                summary.missing_pix_key.push(line.person_id.clone());
                warnings.push(AuditWarning {
                    code: MISSING_PIX_KEY_WARNING.to_string(),
                    message: format!(
                        "{} has R${} payable but no PIX key",
                        line.person_name, line.payable_amount
                    ),
                    severity: "high".to_string(),
                    person_id: Some(line.person_id.clone()),
                });
            }
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "pix_summary".to_string(),
        rule_name: "PIX Payout Summary".to_string(),
        person_id: None,
        input: serde_json::json!({
            "lines": lines.len(),
            "payable_lines": summary.payable_count
        }),
        output: serde_json::json!({
            "entries": summary.entries.len(),
            "total": summary.total.to_string(),
            "missing_pix_key": summary.missing_pix_key
        }),
        reasoning: format!(
            "{} PIX payouts totalling R${}; {} payable without a key",
            summary.entries.len(),
            summary.total,
            summary.missing_pix_key.len()
        ),
    };

    PixSummaryResult {
        summary,
        audit_step,
        warnings,
    }
}
