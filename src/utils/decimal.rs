/// Parse a seconds value written with either `.` or `,` as decimal separator.
///
/// Surrounding whitespace is ignored. Non-finite values (`NaN`, `inf`) are
/// rejected so that every parsed bound can be used as a map key.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_separators() {
        assert_eq!(parse_decimal("3.5"), Some(3.5));
        assert_eq!(parse_decimal(" 3,5 "), Some(3.5));
        assert_eq!(parse_decimal("12"), Some(12.0));
    }

    #[test]
    fn rejects_garbage_and_non_finite() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("1,2,3"), None);
    }
}
