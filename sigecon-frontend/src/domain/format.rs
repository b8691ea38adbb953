use rust_decimal::{Decimal, RoundingStrategy};

/// pt-BR currency: "R$ 1.234,56".
pub fn format_brl(value: Decimal) -> String {
    format!("R$ {}", format_number(value, 2))
}

/// Placeholder for unknown amounts.
pub fn format_brl_opt(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format_brl(v),
        None => "—".to_string(),
    }
}

/// pt-BR grouping: dot for thousands, comma for decimals.
pub fn format_number(value: Decimal, places: u32) -> String {
    // half-up, not banker's rounding
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", places as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, String::new()),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(&frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_currency() {
        assert_eq!(format_brl(dec!(1234.5)), "R$ 1.234,50");
        assert_eq!(format_brl(dec!(0)), "R$ 0,00");
        assert_eq!(format_brl(dec!(12345678.9)), "R$ 12.345.678,90");
        assert_eq!(format_brl(dec!(-42.1)), "R$ -42,10");
    }

    #[test]
    fn formats_plain_numbers() {
        assert_eq!(format_number(dec!(1000), 0), "1.000");
        assert_eq!(format_number(dec!(12.345), 2), "12,35");
    }

    #[test]
    fn unknown_amounts_render_placeholder() {
        assert_eq!(format_brl_opt(None), "—");
        assert_eq!(format_brl_opt(Some(dec!(1))), "R$ 1,00");
    }
}
