//! Shire CLI entry point: format, parse and check Shirecoin amounts and addresses.

mod batch;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use is_terminal::IsTerminal;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use shire_core::consensus::VerifyFlags;
use shire_core::units::{self, Unit};
use shire_core::{
    format, format_html_with_unit, format_with_unit, money_range, parse, AddressCheckValidator,
    AddressEntryValidator, AgentError, OutputMode, SeparatorStyle, TextValidator, UnitListModel,
    Verdict,
};

use render::{human_header, DisplayRow};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Auto,
    Json,
    Human,
}

/// CLI-only enum to satisfy clap's ValueEnum without adding clap to core.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliUnit {
    Shire,
    Mshire,
    #[value(alias = "bits")]
    Ushire,
    Sat,
}

impl CliUnit {
    fn to_core(self) -> Unit {
        match self {
            CliUnit::Shire => Unit::Shire,
            CliUnit::Mshire => Unit::MilliShire,
            CliUnit::Ushire => Unit::MicroShire,
            CliUnit::Sat => Unit::Sat,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSeparators {
    Never,
    Standard,
    Always,
}

impl CliSeparators {
    fn to_core(self) -> SeparatorStyle {
        match self {
            CliSeparators::Never => SeparatorStyle::Never,
            CliSeparators::Standard => SeparatorStyle::Standard,
            CliSeparators::Always => SeparatorStyle::Always,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shire", version)]
#[command(about = "Format, parse and check Shirecoin amounts and addresses")]
struct Cli {
    /// Output format: auto (tty=human, pipe=agent), json (agent), human (operator).
    #[arg(long, value_enum, default_value = "auto", global = true)]
    output: OutputFormat,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    /// Log debug events to stderr (SHIRE_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// List the supported display units.
    Units,
    /// Render a base-unit amount in a display unit.
    Format {
        #[arg(allow_negative_numbers = true)]
        amount: i64,
        #[arg(long, value_enum, default_value = "shire")]
        unit: CliUnit,
        /// Prefix positive amounts with '+'.
        #[arg(long)]
        plus: bool,
        #[arg(long, value_enum, default_value = "standard")]
        separators: CliSeparators,
        /// Append the unit's short name.
        #[arg(long, conflicts_with = "html")]
        with_unit: bool,
        /// Emit a non-wrapping HTML span (implies the unit suffix).
        #[arg(long)]
        html: bool,
    },
    /// Parse a display string into base units.
    Parse {
        #[arg(allow_hyphen_values = true)]
        text: String,
        #[arg(long, value_enum, default_value = "shire")]
        unit: CliUnit,
        /// Also reject values outside 0..=MAX_MONEY.
        #[arg(long)]
        check_range: bool,
    },
    /// Re-express a display string from one unit in another.
    Convert {
        #[arg(allow_hyphen_values = true)]
        text: String,
        #[arg(long, value_enum)]
        from: CliUnit,
        #[arg(long, value_enum)]
        to: CliUnit,
        #[arg(long, value_enum, default_value = "standard")]
        separators: CliSeparators,
    },
    /// Run the address entry validator over TEXT.
    CheckAddress {
        text: String,
        /// Cursor position (characters); defaults to the end of TEXT.
        #[arg(long)]
        cursor: Option<usize>,
        /// Use the final-form check (empty input is intermediate).
        #[arg(long = "final")]
        final_form: bool,
    },
    /// Decode a script verification flag word (decimal or 0x-prefixed hex).
    Flags { bits: String },
    /// Check a CSV of `address,amount` rows (header required).
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value = "shire")]
        unit: CliUnit,
    },
}

/// Detect output mode based on CLI flags and TTY detection.
fn detect_output_mode(output: OutputFormat) -> OutputMode {
    match output {
        OutputFormat::Human => OutputMode::Human,
        OutputFormat::Json => OutputMode::Agent,
        OutputFormat::Auto => {
            if std::io::stdout().is_terminal() {
                OutputMode::Human
            } else {
                OutputMode::Agent
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SHIRE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn emit_agent_error(err: AgentError) -> Result<()> {
    let json = serde_json::to_string(&err).context("failed to serialize agent error")?;
    eprintln!("{json}");
    Ok(())
}

fn emit_agent_result(value: &Value) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize result")?;
    println!("{json}");
    Ok(())
}

/// Report a single-value failure and return exit code 1.
fn fail(mode: OutputMode, error: &str, message: String) -> Result<i32> {
    match mode {
        OutputMode::Human => {
            println!("{} {}", "✗".red(), message.red());
        }
        OutputMode::Agent => {
            emit_agent_error(AgentError::new(error, 1).with_message(message))?;
        }
    }
    Ok(1)
}

/// Report an I/O or configuration failure; the caller exits with code 2.
fn report_fatal(mode: OutputMode, err: &anyhow::Error) -> Result<()> {
    let message = format!("{err:#}");
    match mode {
        OutputMode::Human => {
            eprintln!("{} {}", "✗".red(), message.red());
            Ok(())
        }
        OutputMode::Agent => emit_agent_error(AgentError::new("io_error", 2).with_message(message)),
    }
}

fn run_units(mode: OutputMode) -> Result<i32> {
    let model = UnitListModel::new();
    match mode {
        OutputMode::Human => {
            human_header("SHIRE — Display Units");
            println!("{}", render::render_units_table(&model));
        }
        OutputMode::Agent => {
            let rows: Vec<Value> = units::list_denominations()
                .iter()
                .map(|d| {
                    json!({
                        "id": d.unit.id(),
                        "unit": d.unit,
                        "longName": d.long_name,
                        "shortName": d.short_name(),
                        "description": d.description,
                        "factor": d.factor,
                        "decimals": d.decimals,
                    })
                })
                .collect();
            emit_agent_result(&json!({ "units": rows }))?;
        }
    }
    Ok(0)
}

fn run_format(
    mode: OutputMode,
    amount: i64,
    unit: Unit,
    plus: bool,
    separators: SeparatorStyle,
    with_unit: bool,
    html: bool,
) -> Result<i32> {
    let text = if html {
        format_html_with_unit(unit, amount, plus, separators)
    } else if with_unit {
        format_with_unit(unit, amount, plus, separators)
    } else {
        format(unit, amount, plus, separators)
    };

    match mode {
        OutputMode::Human => println!("{text}"),
        OutputMode::Agent => emit_agent_result(&json!({
            "unit": unit,
            "amount": amount,
            "text": text,
        }))?,
    }
    Ok(0)
}

fn run_parse(mode: OutputMode, text: &str, unit: Unit, check_range: bool) -> Result<i32> {
    let amount = match parse(unit, text) {
        Ok(v) => v,
        Err(e) => return fail(mode, "parse_failed", e.to_string()),
    };
    if check_range && !money_range(amount) {
        return fail(
            mode,
            "out_of_range",
            format!("amount {amount} is outside 0..={}", shire_core::max_money()),
        );
    }

    match mode {
        OutputMode::Human => println!("{amount}"),
        OutputMode::Agent => emit_agent_result(&json!({
            "unit": unit,
            "text": text,
            "amount": amount,
        }))?,
    }
    Ok(0)
}

fn run_convert(
    mode: OutputMode,
    text: &str,
    from: Unit,
    to: Unit,
    separators: SeparatorStyle,
) -> Result<i32> {
    let amount = match parse(from, text) {
        Ok(v) => v,
        Err(e) => return fail(mode, "parse_failed", e.to_string()),
    };
    let converted = format_with_unit(to, amount, false, separators);

    match mode {
        OutputMode::Human => println!("{converted}"),
        OutputMode::Agent => emit_agent_result(&json!({
            "from": from,
            "to": to,
            "amount": amount,
            "text": format(to, amount, false, separators),
        }))?,
    }
    Ok(0)
}

fn run_check_address(
    mode: OutputMode,
    text: &str,
    cursor: Option<usize>,
    final_form: bool,
) -> Result<i32> {
    let cursor = cursor.unwrap_or_else(|| text.chars().count());
    let checked = if final_form {
        AddressCheckValidator::new().validate(text, cursor)
    } else {
        AddressEntryValidator.validate(text, cursor)
    };

    match mode {
        OutputMode::Human => {
            println!("{}", render::verdict_label(checked.verdict));
            println!("{} {}", "Text:".bright_white().bold(), checked.text);
            println!("{} {}", "Cursor:".bright_white().bold(), checked.cursor);
        }
        OutputMode::Agent => emit_agent_result(&json!(checked))?,
    }

    Ok(if checked.verdict == Verdict::Invalid { 1 } else { 0 })
}

fn parse_flag_word(input: &str) -> Option<u32> {
    let s = input.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn run_flags(mode: OutputMode, input: &str) -> Result<i32> {
    let Some(bits) = parse_flag_word(input) else {
        return fail(mode, "parse_failed", format!("'{input}' is not a flag word"));
    };
    let flags = match VerifyFlags::from_bits(bits) {
        Ok(flags) => flags,
        Err(e) => {
            return fail(
                mode,
                "invalid_flags",
                format!("{e}: 0x{bits:x} (code {})", e.code()),
            )
        }
    };

    match mode {
        OutputMode::Human => println!("{flags}"),
        OutputMode::Agent => emit_agent_result(&json!({
            "bits": flags.bits(),
            "flags": flags.iter_names().collect::<Vec<_>>(),
        }))?,
    }
    Ok(0)
}

fn run_batch(mode: OutputMode, input: &Path, unit: Unit) -> Result<i32> {
    let report = batch::check_file(input, unit.id(), mode)?;

    if !report.issues.is_empty() {
        match mode {
            OutputMode::Human => {
                human_header("SHIRE — Batch Rejected");
                println!(
                    "{} {}",
                    "✗".red(),
                    "Validation failed. Fix the rows below and re-run.".red()
                );
                println!();
                println!("{}", render::render_issues_table(&report.issues));
            }
            OutputMode::Agent => {
                emit_agent_error(
                    AgentError::new("validation_failed", 1).with_details(report.issues),
                )?;
            }
        }
        return Ok(1);
    }

    match mode {
        OutputMode::Human => {
            human_header("SHIRE — Batch Review");
            let rows: Vec<DisplayRow<'_>> = report
                .rows
                .iter()
                .map(|r| DisplayRow {
                    row: r.row,
                    address: &r.address,
                    amount: format(unit, r.amount, false, SeparatorStyle::Standard),
                })
                .collect();
            println!("{}", render::render_batch_table(&rows, unit.id()));
            println!();
            println!(
                "{} {}",
                "Total:".bright_white().bold(),
                format_with_unit(unit, report.total, false, SeparatorStyle::Standard)
                    .bright_white()
                    .bold()
            );
            println!(
                "{} {}",
                "Rows:".bright_white().bold(),
                report.rows.len().to_string().bright_white().bold()
            );
        }
        OutputMode::Agent => emit_agent_result(&json!({
            "unit": unit,
            "rowCount": report.rows.len(),
            "total": report.total,
            "totalText": format(unit, report.total, false, SeparatorStyle::Never),
            "rows": report.rows,
        }))?,
    }
    Ok(0)
}

fn run(command: &Commands, mode: OutputMode) -> Result<i32> {
    match command {
        Commands::Units => run_units(mode),
        Commands::Format {
            amount,
            unit,
            plus,
            separators,
            with_unit,
            html,
        } => run_format(
            mode,
            *amount,
            unit.to_core(),
            *plus,
            separators.to_core(),
            *with_unit,
            *html,
        ),
        Commands::Parse {
            text,
            unit,
            check_range,
        } => run_parse(mode, text, unit.to_core(), *check_range),
        Commands::Convert {
            text,
            from,
            to,
            separators,
        } => run_convert(mode, text, from.to_core(), to.to_core(), separators.to_core()),
        Commands::CheckAddress {
            text,
            cursor,
            final_form,
        } => run_check_address(mode, text, *cursor, *final_form),
        Commands::Flags { bits } => run_flags(mode, bits),
        Commands::Batch { input, unit } => run_batch(mode, input, unit.to_core()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mode = detect_output_mode(cli.output);
    tracing::debug!(?mode, command = ?cli.command, "starting");

    let code = match run(&cli.command, mode) {
        Ok(code) => code,
        Err(err) => {
            report_fatal(mode, &err)?;
            2
        }
    };
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_words_accept_decimal_and_hex() {
        assert_eq!(parse_flag_word("3605"), Some(0xE15));
        assert_eq!(parse_flag_word("0xe15"), Some(0xE15));
        assert_eq!(parse_flag_word("0XE15"), Some(0xE15));
        assert_eq!(parse_flag_word("zz"), None);
    }

    #[test]
    fn cli_units_map_to_core_units() {
        assert_eq!(CliUnit::Shire.to_core(), Unit::Shire);
        assert_eq!(CliUnit::Mshire.to_core(), Unit::MilliShire);
        assert_eq!(CliUnit::Ushire.to_core(), Unit::MicroShire);
        assert_eq!(CliUnit::Sat.to_core(), Unit::Sat);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
