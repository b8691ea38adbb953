use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses pt-BR formatted amounts ("1.234,56", "R$ 10,00") as well as plain
/// decimals. Recognized shapes, in priority order: thousands-dot with comma
/// decimals, comma decimals, dot with exactly two fraction digits, plain
/// integer. Anything else falls back to stripping dots and treating the
/// comma as the decimal separator. Returns None when the input is not a
/// number.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.replace("R$", "").replace("r$", "");
    if cleaned.is_empty() {
        return None;
    }

    if is_grouped_brl(&cleaned) {
        let normalized = cleaned.replace('.', "").replace(',', ".");
        return Decimal::from_str(&normalized).ok();
    }
    if is_comma_decimal(&cleaned) {
        return Decimal::from_str(&cleaned.replace(',', ".")).ok();
    }
    if is_dot_decimal(&cleaned) || is_plain_integer(&cleaned) {
        return Decimal::from_str(&cleaned).ok();
    }

    let fallback = cleaned.replace('.', "").replace(',', ".");
    Decimal::from_str(&fallback).ok()
}

/// Normalization used by order quantity inputs. A comma marks the decimal
/// separator and dots are thousands grouping; without a comma the value is
/// taken as a plain decimal, so "12.7" keeps its fraction.
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(',') {
        let normalized = trimmed.replace('.', "").replace(',', ".");
        Decimal::from_str(&normalized).ok()
    } else {
        Decimal::from_str(trimmed).ok()
    }
}

fn is_plain_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_comma_decimal(s: &str) -> bool {
    match s.split_once(',') {
        Some((int, frac)) => is_plain_integer(int) && frac.len() == 2 && is_plain_integer(frac),
        None => false,
    }
}

fn is_dot_decimal(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => is_plain_integer(int) && frac.len() == 2 && is_plain_integer(frac),
        None => false,
    }
}

// "1.234,56": first group of 1 to 3 digits, the rest exactly 3, two decimals.
fn is_grouped_brl(s: &str) -> bool {
    let Some((int, frac)) = s.split_once(',') else {
        return false;
    };
    if frac.len() != 2 || !is_plain_integer(frac) {
        return false;
    }
    let mut groups = int.split('.');
    let Some(first) = groups.next() else {
        return false;
    };
    if first.is_empty() || first.len() > 3 || !is_plain_integer(first) {
        return false;
    }
    let mut rest = 0;
    for group in groups {
        if group.len() != 3 || !is_plain_integer(group) {
            return false;
        }
        rest += 1;
    }
    rest >= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_grouped_brl() {
        assert_eq!(parse_decimal("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_decimal("12.345.678,90"), Some(dec!(12345678.90)));
    }

    #[test]
    fn parses_comma_decimal() {
        assert_eq!(parse_decimal("1234,56"), Some(dec!(1234.56)));
    }

    #[test]
    fn parses_dot_decimal_with_two_places() {
        assert_eq!(parse_decimal("1234.56"), Some(dec!(1234.56)));
    }

    #[test]
    fn parses_plain_integer() {
        assert_eq!(parse_decimal("1234"), Some(dec!(1234)));
    }

    #[test]
    fn strips_currency_and_whitespace() {
        assert_eq!(parse_decimal(" R$ 1.234,56 "), Some(dec!(1234.56)));
        assert_eq!(parse_decimal("R$10,00"), Some(dec!(10.00)));
    }

    #[test]
    fn fallback_treats_dots_as_grouping() {
        // three fraction digits do not match the dot-decimal shape
        assert_eq!(parse_decimal("1.234"), Some(dec!(1234)));
        assert_eq!(parse_decimal("1.234,5"), Some(dec!(1234.5)));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("R$ "), None);
    }

    #[test]
    fn quantity_keeps_dot_fraction_without_comma() {
        assert_eq!(parse_quantity("12.7"), Some(dec!(12.7)));
        assert_eq!(parse_quantity("1.234,5"), Some(dec!(1234.5)));
        assert_eq!(parse_quantity("2,5"), Some(dec!(2.5)));
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("abc"), None);
    }
}
