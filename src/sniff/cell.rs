//! Cell shape detection.

use std::sync::LazyLock;

use regex::Regex;

use crate::field_type::Type;

static FLOAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][-+]?\d+)?$").expect("Invalid float pattern")
});

/// Numbers with thousand separators (1,234,567.89).
static FLOAT_THOUSANDS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\d{1,3}(?:,\d{3})+(?:\.\d+)?$").expect("Invalid thousands pattern")
});

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4})$")
        .expect("Invalid date pattern")
});

static DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{1,4}[-/.]\d{1,2}[-/.]\d{1,4}[T ]\d{1,2}:\d{2}(?::\d{2})?(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2}|\s*[AaPp][Mm])?$",
    )
    .expect("Invalid datetime pattern")
});

#[inline]
fn is_null_value(s: &str) -> bool {
    matches!(s, "" | "-" | "--" | "?" | "#N/A")
        || s.eq_ignore_ascii_case("null")
        || s.eq_ignore_ascii_case("none")
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("n/a")
        || s.eq_ignore_ascii_case("nan")
}

/// Limited to 19 digits so every match fits in a u64.
#[inline]
fn is_unsigned_int(s: &str) -> bool {
    let s = s.strip_prefix('+').unwrap_or(s);
    !s.is_empty() && s.len() <= 19 && s.bytes().all(|b| b.is_ascii_digit())
}

#[inline]
fn is_signed_int(s: &str) -> bool {
    s.strip_prefix('-').is_some_and(|rest| {
        !rest.is_empty() && rest.len() <= 19 && rest.bytes().all(|b| b.is_ascii_digit())
    })
}

#[inline]
fn is_boolean(s: &str) -> bool {
    ["true", "false", "yes", "no"]
        .iter()
        .any(|b| s.eq_ignore_ascii_case(b))
}

/// Detect the shape of a single cell value.
pub fn detect_cell_type(value: &str) -> Type {
    let trimmed = value.trim();

    if is_null_value(trimmed) {
        return Type::NULL;
    }
    if is_unsigned_int(trimmed) {
        return Type::Unsigned;
    }
    if is_signed_int(trimmed) {
        return Type::Signed;
    }
    if is_boolean(trimmed) {
        return Type::Boolean;
    }
    if FLOAT_PATTERN.is_match(trimmed) || FLOAT_THOUSANDS_PATTERN.is_match(trimmed) {
        return Type::Float;
    }
    if DATETIME_PATTERN.is_match(trimmed) {
        return Type::DateTime;
    }
    if DATE_PATTERN.is_match(trimmed) {
        return Type::Date;
    }

    Type::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_cell_type() {
        assert_eq!(detect_cell_type("123"), Type::Unsigned);
        assert_eq!(detect_cell_type("-123"), Type::Signed);
        assert_eq!(detect_cell_type("12.34"), Type::Float);
        assert_eq!(detect_cell_type("-35.3536"), Type::Float);
        assert_eq!(detect_cell_type("1,234.5"), Type::Float);
        assert_eq!(detect_cell_type("true"), Type::Boolean);
        assert_eq!(detect_cell_type("2023-12-31"), Type::Date);
        assert_eq!(detect_cell_type("31.12.2023"), Type::Date);
        assert_eq!(detect_cell_type("2023-12-31T12:30:45"), Type::DateTime);
        assert_eq!(detect_cell_type("hello"), Type::Text);
        assert_eq!(detect_cell_type("9:00-17:00"), Type::Text);
        assert_eq!(detect_cell_type(""), Type::NULL);
        assert_eq!(detect_cell_type("NULL"), Type::NULL);
    }
}
