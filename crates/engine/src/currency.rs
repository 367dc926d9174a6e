use serde::{Deserialize, Serialize};

/// Currency used for every recorded expense.
///
/// The bot tracks a single fixed locale, so there is only one variant. It is
/// still modelled explicitly so formatting never hardcodes the code string.
///
/// ## Minor units
///
/// Amounts are stored as an `i64` number of **minor units** (see `Money`).
/// KHR uses 2 minor units, so `3.50 KHR` ⇄ `350`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Khr,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Khr => "KHR",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Khr => 2,
        }
    }

    /// `10^minor_units`, the number of minor units in one major unit.
    #[must_use]
    pub const fn scale(self) -> i64 {
        10i64.pow(self.minor_units() as u32)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}
