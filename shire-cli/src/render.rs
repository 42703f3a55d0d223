//! Human-mode rendering: boxed headers, tables and colored verdicts.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};

use shire_core::units::{self, UnitData, UnitRole};
use shire_core::{truncate_address, RowIssue, UnitListModel, Verdict};

pub fn human_header(title: &str) {
    println!(
        "{}",
        "╔═══════════════════════════════════════════════════════════════╗".bright_white()
    );
    println!("{}", format!("║  {:<61}║", title).bright_white());
    println!(
        "{}",
        "╚═══════════════════════════════════════════════════════════════╝".bright_white()
    );
    println!();
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn render_units_table(model: &UnitListModel) -> Table {
    let mut table = new_table(&["Id", "Unit", "Short", "Factor", "Decimals", "Description"]);

    for row in 0..model.row_count() {
        let Some(UnitData::Unit(id)) = model.data(row, UnitRole::Unit) else {
            continue;
        };
        let long = match model.data(row, UnitRole::Display) {
            Some(UnitData::Text(text)) => text,
            _ => units::long_name(id),
        };
        let tooltip = match model.data(row, UnitRole::ToolTip) {
            Some(UnitData::Text(text)) => text,
            _ => units::description(id),
        };
        table.add_row(vec![
            Cell::new(id),
            Cell::new(long),
            Cell::new(units::short_name(id)),
            Cell::new(units::factor(id)),
            Cell::new(units::decimals(id)),
            Cell::new(tooltip),
        ]);
    }

    table
}

pub fn render_issues_table(issues: &[RowIssue]) -> Table {
    let mut table = new_table(&["Row", "Field", "Message"]);

    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.row),
            Cell::new(&issue.field),
            Cell::new(&issue.message),
        ]);
    }

    table
}

/// One accepted batch row, amount already rendered for display.
pub struct DisplayRow<'a> {
    pub row: usize,
    pub address: &'a str,
    pub amount: String,
}

pub fn render_batch_table(rows: &[DisplayRow<'_>], unit: i32) -> Table {
    let mut table = new_table(&["Row", "Address", &units::amount_column_title(unit), "Status"]);

    for r in rows {
        let status = format!("{} {}", "✓".green(), "Valid".green());
        table.add_row(vec![
            Cell::new(r.row),
            Cell::new(truncate_address(r.address)),
            Cell::new(&r.amount),
            Cell::new(status),
        ]);
    }

    table
}

pub fn verdict_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::Acceptable => format!("{} {}", "✓".green(), "acceptable".green()),
        Verdict::Intermediate => format!("{} {}", "…".yellow(), "intermediate".yellow()),
        Verdict::Invalid => format!("{} {}", "✗".red(), "invalid".red()),
    }
}
