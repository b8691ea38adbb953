/// Progressive CPF mask: up to eleven digits grouped 3/3/3-2, with each
/// separator emitted only once the following group has started.
pub fn format_cpf(value: &str) -> String {
    let digits = cpf_digits(value);

    let part1 = &digits[..digits.len().min(3)];
    let part2 = digits.get(3..digits.len().min(6)).unwrap_or("");
    let part3 = digits.get(6..digits.len().min(9)).unwrap_or("");
    let part4 = digits.get(9..digits.len().min(11)).unwrap_or("");

    let mut formatted = part1.to_string();
    if !part2.is_empty() {
        formatted.push('.');
        formatted.push_str(part2);
    }
    if !part3.is_empty() {
        formatted.push('.');
        formatted.push_str(part3);
    }
    if !part4.is_empty() {
        formatted.push('-');
        formatted.push_str(part4);
    }
    formatted
}

/// Digits-only CPF, truncated to eleven. This is the shape sent to the
/// backend.
pub fn cpf_digits(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(11)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_full_cpf() {
        assert_eq!(format_cpf("12345678901"), "123.456.789-01");
    }

    #[test]
    fn formats_partial_entries_progressively() {
        assert_eq!(format_cpf(""), "");
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_cpf("1234"), "123.4");
        assert_eq!(format_cpf("1234567"), "123.456.7");
        assert_eq!(format_cpf("1234567890"), "123.456.789-0");
    }

    #[test]
    fn strips_non_digits_and_truncates() {
        assert_eq!(format_cpf("123.456.789-01"), "123.456.789-01");
        assert_eq!(format_cpf("123456789012345"), "123.456.789-01");
        assert_eq!(cpf_digits("a1b2c3"), "123");
    }
}
