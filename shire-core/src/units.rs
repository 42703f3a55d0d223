//! Display denominations and the fixed registry describing them.
//!
//! Amounts are always counted in base units (satoshis). A [`Unit`] only
//! decides how many base units make up one displayed unit and how many
//! fractional digits a display string may carry.
//!
//! The free functions in this module take a raw unit id, as stored in
//! settings or handed over by a UI list. Unknown ids never fail: numeric
//! lookups fall back to the whole-coin factor with zero decimals and text
//! lookups fall back to `"???"`.

use serde::{Deserialize, Serialize};

use crate::amount::{Amount, COIN};

/// Locale-independent digit grouping mark (U+2009 THIN SPACE).
pub const THIN_SP: char = '\u{2009}';
/// Markup entity substituted for [`THIN_SP`] in HTML output.
pub const THIN_SP_HTML: &str = "&thinsp;";
/// Placeholder returned for any text lookup on an unknown unit id.
pub const UNKNOWN_UNIT_TEXT: &str = "???";

/// Supported display units, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Unit {
    #[serde(rename = "SHIRE")]
    Shire = 0,
    #[serde(rename = "mSHIRE")]
    MilliShire = 1,
    #[serde(rename = "uSHIRE")]
    MicroShire = 2,
    #[serde(rename = "sat")]
    Sat = 3,
}

/// Immutable registry record for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Denomination {
    pub unit: Unit,
    /// Base units per one display unit.
    pub factor: Amount,
    /// Maximum number of fractional digits.
    pub decimals: usize,
    pub long_name: &'static str,
    #[serde(skip)]
    short_form: Option<&'static str>,
    pub description: &'static str,
}

impl Denomination {
    /// Dedicated short form, or the long name when the unit has none.
    pub fn short_name(&self) -> &'static str {
        self.short_form.unwrap_or(self.long_name)
    }
}

static DENOMINATIONS: [Denomination; 4] = [
    Denomination {
        unit: Unit::Shire,
        factor: COIN,
        decimals: 8,
        long_name: "SHIRE",
        short_form: None,
        description: "Shirecoins",
    },
    Denomination {
        unit: Unit::MilliShire,
        factor: 100_000,
        decimals: 5,
        long_name: "mSHIRE",
        short_form: None,
        description: "Milli-Shirecoins (1 / 1\u{2009}000)",
    },
    Denomination {
        unit: Unit::MicroShire,
        factor: 100,
        decimals: 2,
        long_name: "\u{b5}SHIRE (bits)",
        short_form: Some("bits"),
        description: "Micro-Shirecoins (bits) (1 / 1\u{2009}000\u{2009}000)",
    },
    Denomination {
        unit: Unit::Sat,
        factor: 1,
        decimals: 0,
        long_name: "Satoshi (sat)",
        short_form: Some("sat"),
        description: "Satoshi (sat) (1 / 100\u{2009}000\u{2009}000)",
    },
];

impl Unit {
    pub const fn id(self) -> i32 {
        self as i32
    }

    pub const fn from_id(id: i32) -> Option<Unit> {
        match id {
            0 => Some(Unit::Shire),
            1 => Some(Unit::MilliShire),
            2 => Some(Unit::MicroShire),
            3 => Some(Unit::Sat),
            _ => None,
        }
    }

    pub fn denomination(self) -> &'static Denomination {
        &DENOMINATIONS[self as usize]
    }

    pub fn factor(self) -> Amount {
        self.denomination().factor
    }

    pub fn decimals(self) -> usize {
        self.denomination().decimals
    }

    pub fn long_name(self) -> &'static str {
        self.denomination().long_name
    }

    pub fn short_name(self) -> &'static str {
        self.denomination().short_name()
    }

    pub fn description(self) -> &'static str {
        self.denomination().description
    }
}

impl TryFrom<i32> for Unit {
    type Error = i32;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Unit::from_id(id).ok_or(id)
    }
}

impl From<Unit> for i32 {
    fn from(unit: Unit) -> Self {
        unit.id()
    }
}

/// All units in display order. Stable across calls.
pub fn available_units() -> impl Iterator<Item = Unit> {
    DENOMINATIONS.iter().map(|d| d.unit)
}

/// The registry table in display order.
pub fn list_denominations() -> &'static [Denomination] {
    &DENOMINATIONS
}

pub fn valid(id: i32) -> bool {
    Unit::from_id(id).is_some()
}

/// Base units per display unit; unknown ids count as whole coins.
pub fn factor(id: i32) -> Amount {
    Unit::from_id(id).map_or(COIN, Unit::factor)
}

/// Fractional digits; unknown ids have none.
pub fn decimals(id: i32) -> usize {
    Unit::from_id(id).map_or(0, Unit::decimals)
}

pub fn long_name(id: i32) -> &'static str {
    Unit::from_id(id).map_or(UNKNOWN_UNIT_TEXT, Unit::long_name)
}

pub fn short_name(id: i32) -> &'static str {
    Unit::from_id(id).map_or(UNKNOWN_UNIT_TEXT, Unit::short_name)
}

pub fn description(id: i32) -> &'static str {
    Unit::from_id(id).map_or(UNKNOWN_UNIT_TEXT, Unit::description)
}

/// Column header for amount tables, e.g. `Amount (bits)`.
pub fn amount_column_title(id: i32) -> String {
    let mut title = String::from("Amount");
    if valid(id) {
        title.push_str(" (");
        title.push_str(short_name(id));
        title.push(')');
    }
    title
}

/// Data roles a list view can ask a [`UnitListModel`] row for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRole {
    Display,
    Edit,
    ToolTip,
    Unit,
}

/// Value stored under a [`UnitRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UnitData {
    Text(&'static str),
    Unit(i32),
}

/// Row-oriented view over the registry for unit pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitListModel {
    units: Vec<Unit>,
}

impl Default for UnitListModel {
    fn default() -> Self {
        Self {
            units: available_units().collect(),
        }
    }
}

impl UnitListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.units.len()
    }

    pub fn data(&self, row: usize, role: UnitRole) -> Option<UnitData> {
        let unit = *self.units.get(row)?;
        let data = match role {
            UnitRole::Display | UnitRole::Edit => UnitData::Text(unit.long_name()),
            UnitRole::ToolTip => UnitData::Text(unit.description()),
            UnitRole::Unit => UnitData::Unit(unit.id()),
        };
        Some(data)
    }
}
