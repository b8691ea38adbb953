use crate::domain::parse::parse_quantity;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Normalizes a raw quantity entry against the contract's available
/// quantity. Non-numeric, empty or non-positive entries exclude the item
/// (None); entries above the available quantity are clamped down; the result
/// is floored to a whole number.
pub fn clamp_quantity(raw: &str, available: Decimal) -> Option<u64> {
    let parsed = parse_quantity(raw)?;
    if parsed <= Decimal::ZERO {
        return None;
    }
    let clamped = if parsed > available { available } else { parsed };
    let floored = clamped.floor();
    if floored <= Decimal::ZERO {
        return None;
    }
    floored.to_u64()
}

/// Order total: quantity times unit price over lines with a positive
/// quantity.
pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    lines
        .into_iter()
        .filter(|(quantity, _)| *quantity > Decimal::ZERO)
        .map(|(quantity, unit_price)| quantity * unit_price)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn clamps_above_available() {
        assert_eq!(clamp_quantity("999", dec!(50)), Some(50));
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        assert_eq!(clamp_quantity("0", dec!(50)), None);
        assert_eq!(clamp_quantity("-5", dec!(50)), None);
        assert_eq!(clamp_quantity("abc", dec!(50)), None);
        assert_eq!(clamp_quantity("", dec!(50)), None);
    }

    #[test]
    fn floors_fractional_entries() {
        assert_eq!(clamp_quantity("12.7", dec!(50)), Some(12));
        assert_eq!(clamp_quantity("12,7", dec!(50)), Some(12));
    }

    #[test]
    fn fraction_below_one_is_excluded() {
        assert_eq!(clamp_quantity("0,5", dec!(50)), None);
        // available below one floors away too
        assert_eq!(clamp_quantity("3", dec!(0.5)), None);
    }

    #[test]
    fn totals_skip_non_positive_quantities() {
        let total = order_total(vec![
            (dec!(2), dec!(5)),
            (dec!(0), dec!(100)),
            (dec!(3), dec!(1.5)),
        ]);
        assert_eq!(total, dec!(14.5));
    }
}
