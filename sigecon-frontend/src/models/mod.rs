pub mod contract;
pub mod order;
pub mod user;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric fields arrive from the backend either as JSON numbers or as
/// pt-BR formatted strings ("1.234,56", "R$ 10,00").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RawNumber::Number(n) => Decimal::from_f64(*n),
            RawNumber::Text(s) => crate::domain::parse::parse_decimal(s),
        }
    }
}

/// Resolves an optional raw field to a decimal, None when absent or
/// unparseable.
pub fn num(value: Option<&RawNumber>) -> Option<Decimal> {
    value.and_then(RawNumber::as_decimal)
}

/// Entity ids come back as integers or strings depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Int(n) => write!(f, "{}", n),
            RawId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn raw_number_accepts_numbers_and_formatted_text() {
        let n: RawNumber = serde_json::from_str("1234.56").unwrap();
        assert_eq!(n.as_decimal(), Some(dec!(1234.56)));

        let t: RawNumber = serde_json::from_str("\"1.234,56\"").unwrap();
        assert_eq!(t.as_decimal(), Some(dec!(1234.56)));

        let bad: RawNumber = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(bad.as_decimal(), None);
    }

    #[test]
    fn raw_id_displays_both_variants() {
        assert_eq!(RawId::Int(42).to_string(), "42");
        assert_eq!(RawId::Text("abc".into()).to_string(), "abc");
    }
}
