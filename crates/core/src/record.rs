use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// Transaction amount, always non-negative; the sign lives in [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Amount(decimal.round_dp(2))
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Amount(Decimal::ZERO)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Amount(self.0 + rhs.0)
    }
}

/// Direction of a statement line: Debit is an outflow, Credit an inflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Debit,
    Credit,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(Direction::Debit),
            "credit" => Ok(Direction::Credit),
            other => Err(format!("unrecognized direction: '{other}'")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Debit => write!(f, "Debit"),
            Direction::Credit => write!(f, "Credit"),
        }
    }
}

/// One canonical statement line. `details` keeps the export's original
/// casing; matching always goes through [`normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub details: String,
    pub amount: Amount,
    pub direction: Direction,
    pub category: String,
}

impl Record {
    pub fn normalized_details(&self) -> String {
        normalize(&self.details)
    }
}

/// Matching key for details and keywords: trimmed and lowercased.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn amount_display_two_decimal_places() {
        let a = Amount::from_decimal(Decimal::from_str("1234.5").unwrap());
        assert_eq!(a.to_string(), "1234.50");
    }

    #[test]
    fn amount_rounds_to_cents() {
        let a = Amount::from_decimal(Decimal::from_str("9.999").unwrap());
        assert_eq!(a.to_string(), "10.00");
    }

    #[test]
    fn direction_from_str_tolerates_case_and_whitespace() {
        assert_eq!(" Debit ".parse::<Direction>().unwrap(), Direction::Debit);
        assert_eq!("CREDIT".parse::<Direction>().unwrap(), Direction::Credit);
        assert!("transfer".parse::<Direction>().is_err());
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize("  COFFEE SHOP  "), "coffee shop");
    }
}
