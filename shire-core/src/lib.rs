//! Core library for Shirecoin amount display and address entry.
//!
//! - [`units`]: the fixed registry of display units (SHIRE, mSHIRE, bits, sat).
//! - [`amount`]: lossless conversion between base-unit integers and display
//!   strings, with locale-independent thin-space grouping.
//! - [`validator`]: tri-state keystroke validation for address fields.
//! - [`consensus`]: the script verification ABI (error codes and flag bits).
//!
//! Everything here is a pure function over its inputs; the registry is
//! immutable static data, so all of it is safe to call from any thread.

#![forbid(unsafe_code)]

pub mod amount;
pub mod consensus;
pub mod error;
pub mod output;
pub mod units;
pub mod validator;

pub use amount::{
    format, format_html_with_unit, format_with_unit, max_money, money_range, parse, Amount,
    SeparatorStyle, COIN, MAX_MONEY,
};
pub use consensus::{ConsensusError, ScriptVerifier, VerifyFlags, API_VERSION};
pub use error::ParseAmountError;
pub use output::{truncate_address, AgentError, OutputMode, RowIssue};
pub use units::{Denomination, Unit, UnitListModel, UnitRole, THIN_SP};
pub use validator::{
    AddressCheckValidator, AddressDecoder, AddressEntryValidator, TextValidator, Validated,
    Verdict,
};
