//! The numeric literal grammars from the glossary:
//!
//! ```text
//! int   = -?\d{1,3}(_\d{3})*|\-?\d*
//! float = -?\d{1,3}(_\d{3})+\.(...)|\-?\d+\.\d+
//! num   = int | float
//! ```
//!
//! Underscores are thousands separators, permitted only in the fixed `\d{1,3}(_\d{3})*`
//! grouping shown above - not anywhere else in the literal.
//!
//! A hand-written scanner is used in place of a regex engine (spec 9, open question):
//! the grammar above is regular and small enough that a linear scan gives the same
//! answer with precise failure classification, and without a `regex` dependency.

/// The two outcomes a numeric literal may resolve to under `:num`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumLiteral {
    Int(i64),
    Float(f64),
}

/// Distinguishes "not a number at all" (spec `TypeMismatch`) from "numeric-looking but
/// grammar-invalid" (spec `UnknownFormat`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericError {
    TypeMismatch,
    UnknownFormat,
}

fn is_numeric_looking(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    !body.is_empty()
        && body.chars().all(|c| c.is_ascii_digit() || c == '_' || c == '.')
        && body.chars().any(|c| c.is_ascii_digit())
}

/// `\d{1,3}(_\d{3})*` applied to a sign-stripped, dot-free body.
fn grouped_or_plain_digits(body: &str) -> bool {
    if !body.contains('_') {
        return !body.is_empty() && body.chars().all(|c| c.is_ascii_digit());
    }

    let mut groups = body.split('_');
    let head = groups.next().unwrap_or("");
    if head.is_empty() || head.len() > 3 || !head.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// `\d{1,3}(_\d{3})+` applied to a sign-stripped integer part: at least one group required.
fn grouped_digits_at_least_one(body: &str) -> bool {
    if !body.contains('_') {
        return false;
    }
    grouped_or_plain_digits(body)
}

fn strip_underscores(body: &str) -> String {
    body.chars().filter(|c| *c != '_').collect()
}

/// Validates `s` against the `int` grammar. Errors distinguish non-numeric input from
/// numeric-but-malformed input.
pub(crate) fn parse_int(s: &str) -> Result<i64, NumericError> {
    if !is_numeric_looking(s) {
        return Err(NumericError::TypeMismatch);
    }

    let negative = s.starts_with('-');
    let body = s.strip_prefix('-').unwrap_or(s);

    if body.contains('.') || !grouped_or_plain_digits(body) {
        return Err(NumericError::UnknownFormat);
    }

    let digits = strip_underscores(body);
    let magnitude: i64 = digits.parse().map_err(|_| NumericError::UnknownFormat)?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Validates `s` against the `float` grammar.
pub(crate) fn parse_float(s: &str) -> Result<f64, NumericError> {
    if !is_numeric_looking(s) {
        return Err(NumericError::TypeMismatch);
    }

    let negative = s.starts_with('-');
    let body = s.strip_prefix('-').unwrap_or(s);

    let mut parts = body.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = match parts.next() {
        Some(f) => f,
        None => return Err(NumericError::UnknownFormat),
    };

    if body.matches('.').count() != 1
        || frac_part.is_empty()
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(NumericError::UnknownFormat);
    }

    let int_ok = if int_part.contains('_') {
        grouped_digits_at_least_one(int_part)
    } else {
        !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit())
    };
    if !int_ok {
        return Err(NumericError::UnknownFormat);
    }

    let normalized = format!("{}.{}", strip_underscores(int_part), frac_part);
    let magnitude: f64 = normalized.parse().map_err(|_| NumericError::UnknownFormat)?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Validates `s` against `num = int | float`, preferring `float` when a `.` is present.
pub(crate) fn parse_num(s: &str) -> Result<NumLiteral, NumericError> {
    if !is_numeric_looking(s) {
        return Err(NumericError::TypeMismatch);
    }

    if s.contains('.') {
        parse_float(s).map(NumLiteral::Float)
    } else {
        parse_int(s).map(NumLiteral::Int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Ok(0))]
    #[case("42", Ok(42))]
    #[case("-42", Ok(-42))]
    #[case("007", Ok(7))]
    #[case("12_345", Ok(12345))]
    #[case("1_234_567", Ok(1234567))]
    #[case("-1_234", Ok(-1234))]
    fn parse_int_ok(#[case] input: &str, #[case] expected: Result<i64, NumericError>) {
        assert_eq!(parse_int(input), expected);
    }

    #[rstest]
    #[case("abc", NumericError::TypeMismatch)]
    #[case("", NumericError::TypeMismatch)]
    #[case("12_34", NumericError::UnknownFormat)]
    #[case("1234_567", NumericError::UnknownFormat)]
    #[case("1.5", NumericError::UnknownFormat)]
    #[case("--5", NumericError::TypeMismatch)]
    fn parse_int_err(#[case] input: &str, #[case] expected: NumericError) {
        assert_eq!(parse_int(input), Err(expected));
    }

    #[rstest]
    #[case("1.5", Ok(1.5))]
    #[case("-1.5", Ok(-1.5))]
    #[case("0.0", Ok(0.0))]
    #[case("12_345.678", Ok(12345.678))]
    fn parse_float_ok(#[case] input: &str, #[case] expected: Result<f64, NumericError>) {
        assert_eq!(parse_float(input), expected);
    }

    #[rstest]
    #[case("abc", NumericError::TypeMismatch)]
    #[case("1", NumericError::UnknownFormat)]
    #[case("1.", NumericError::UnknownFormat)]
    #[case(".5", NumericError::TypeMismatch)]
    #[case("1.2.3", NumericError::UnknownFormat)]
    #[case("12_34.5", NumericError::UnknownFormat)]
    fn parse_float_err(#[case] input: &str, #[case] expected: NumericError) {
        assert_eq!(parse_float(input), Err(expected));
    }

    #[test]
    fn parse_num_picks_branch() {
        assert_eq!(parse_num("42"), Ok(NumLiteral::Int(42)));
        assert_eq!(parse_num("4.2"), Ok(NumLiteral::Float(4.2)));
        assert_eq!(parse_num("abc"), Err(NumericError::TypeMismatch));
        assert_eq!(parse_num("4.2.1"), Err(NumericError::UnknownFormat));
    }
}
