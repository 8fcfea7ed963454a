//! BAC input types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Sex as used by the body-water distribution model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacSex {
    /// Distribution coefficient 0.55.
    Female,
    /// Distribution coefficient 0.70.
    Male,
    /// Not stated; distribution coefficient 0.62.
    #[default]
    Unknown,
}

impl BacSex {
    /// Returns the body-mass distribution coefficient.
    #[must_use]
    pub const fn coefficient(self) -> Decimal {
        match self {
            Self::Female => dec!(0.55),
            Self::Male => dec!(0.70),
            Self::Unknown => dec!(0.62),
        }
    }

    /// Returns the value as stored in the `bac_sex` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BacSex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BacSex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "female" => Ok(Self::Female),
            "male" => Ok(Self::Male),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown BAC sex: {s}")),
        }
    }
}

/// Per-account inputs of the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BacProfile {
    /// Body mass in kg; the default mass is used when absent.
    pub body_mass_kg: Option<i32>,
    /// Sex for the distribution coefficient.
    pub sex: BacSex,
}

/// One alcoholic purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drink {
    /// When it was bought.
    pub timestamp: DateTime<Utc>,
    /// Standard units of alcohol.
    pub standard_units: Decimal,
}
