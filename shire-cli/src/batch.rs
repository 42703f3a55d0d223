//! `batch`: check a CSV of `address,amount` rows in one display unit.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use shire_core::{
    money_range, parse, AddressCheckValidator, Amount, OutputMode, RowIssue, TextValidator,
    Verdict,
};

/// A row that passed every check.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub row: usize,
    pub address: String,
    pub amount: Amount,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
    pub issues: Vec<RowIssue>,
    pub total: Amount,
}

fn issue(row: usize, field: &str, message: impl Into<String>) -> RowIssue {
    RowIssue {
        row,
        field: field.to_string(),
        message: message.into(),
    }
}

fn spinner(mode: OutputMode, message: &str) -> Option<ProgressBar> {
    if mode != OutputMode::Human {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Read and check every row. Row numbers count the header as row 1.
pub fn check_file(path: &Path, unit: i32, mode: OutputMode) -> Result<BatchReport> {
    let pb = spinner(mode, "Reading CSV…");

    let file =
        File::open(path).with_context(|| format!("failed to open input file: {path:?}"))?;
    let mut rdr = csv::Reader::from_reader(file);
    let validator = AddressCheckValidator::new();
    let mut report = BatchReport::default();

    for (i, result) in rdr.records().enumerate() {
        let row_num = i + 2;
        let row_issue_start = report.issues.len();
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report
                    .issues
                    .push(issue(row_num, "csv", format!("csv parse error: {e}")));
                continue;
            }
        };

        let raw_address = record.get(0).unwrap_or("");
        let amount_str = record.get(1).unwrap_or("").trim();

        let checked = validator.validate(raw_address, 0);
        match checked.verdict {
            Verdict::Acceptable => {}
            Verdict::Intermediate => report
                .issues
                .push(issue(row_num, "address", "address is empty")),
            Verdict::Invalid => report.issues.push(issue(
                row_num,
                "address",
                "address contains invalid characters",
            )),
        }

        let amount = match parse(unit, amount_str) {
            Ok(v) => Some(v),
            Err(e) => {
                report.issues.push(issue(row_num, "amount", e.to_string()));
                None
            }
        };

        if let Some(amount) = amount.filter(|a| !money_range(*a)) {
            report.issues.push(issue(
                row_num,
                "amount",
                format!("amount {amount} outside 0..=MAX_MONEY"),
            ));
        }

        // Accumulate only rows that introduced no issues.
        if report.issues.len() == row_issue_start {
            if let Some(amount) = amount {
                report.total = report
                    .total
                    .checked_add(amount)
                    .context("total amount overflow")?;
                report.rows.push(BatchRow {
                    row: row_num,
                    address: checked.text,
                    amount,
                });
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    tracing::debug!(
        accepted = report.rows.len(),
        issues = report.issues.len(),
        "batch checked"
    );
    Ok(report)
}
