//! Number formatting and token parsing for the `.par` text format.
//!
//! Legacy files are written by C tools with `%d` and `%g`. [`format_g`]
//! reproduces `%g` (six significant digits) whenever that text parses back
//! to the same `f64`, and falls back to the shortest exact representation
//! otherwise, so a save never rounds a value away.

use crate::resize::MAX_DECLARED_COUNT;

/// Errors produced while decoding a single value token.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("empty value")]
    Empty,
    #[error("expected an integer, found `{0}`")]
    NotAnInteger(String),
    #[error("expected a number, found `{0}`")]
    NotANumber(String),
    #[error("count {value} is outside 0..={max}")]
    CountOutOfRange { value: i32, max: usize },
}

/// Format a float like C's `%g`, keeping the value exact.
pub fn format_g(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let short = format_g_precision(value, 6);
    match short.parse::<f64>() {
        Ok(back) if back == value => short,
        _ => value.to_string(),
    }
}

/// `%.<precision>g` for a finite, non-zero value.
fn format_g_precision(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// First whitespace-separated token of a line, if any.
#[inline]
pub fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Parse an integer token. Integral floats such as `3.0` are accepted.
pub fn parse_int(token: &str) -> Result<i32, ValueError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ValueError::Empty);
    }
    if let Ok(v) = token.parse::<i32>() {
        return Ok(v);
    }
    match token.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 => Ok(v as i32),
        _ => Err(ValueError::NotAnInteger(token.to_string())),
    }
}

pub fn parse_float(token: &str) -> Result<f64, ValueError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ValueError::Empty);
    }
    token
        .parse::<f64>()
        .map_err(|_| ValueError::NotANumber(token.to_string()))
}

/// Parse a declared list length such as `n_img`. Negative values and
/// values above [`MAX_DECLARED_COUNT`] are rejected.
pub fn parse_count(token: &str) -> Result<usize, ValueError> {
    let value = parse_int(token)?;
    usize::try_from(value)
        .ok()
        .filter(|n| *n <= MAX_DECLARED_COUNT)
        .ok_or(ValueError::CountOutOfRange {
            value,
            max: MAX_DECLARED_COUNT,
        })
}

/// Flags are stored as integers; anything non-zero is `true`.
pub fn parse_flag(token: &str) -> Result<bool, ValueError> {
    parse_int(token).map(|v| v != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_c_percent_g_for_short_values() {
        assert_eq!(format_g(1.0), "1");
        assert_eq!(format_g(-40.0), "-40");
        assert_eq!(format_g(1.33), "1.33");
        assert_eq!(format_g(0.012), "0.012");
        assert_eq!(format_g(0.0001), "0.0001");
        assert_eq!(format_g(0.00001), "1e-05");
        assert_eq!(format_g(123456.0), "123456");
        assert_eq!(format_g(1_000_000.0), "1e+06");
        assert_eq!(format_g(2.5e-7), "2.5e-07");
        assert_eq!(format_g(0.0), "0");
    }

    #[test]
    fn keeps_precision_beyond_six_digits() {
        for v in [0.123_456_789, 1234567.0, 1.0 / 3.0, -9.87654321e-12] {
            let text = format_g(v);
            assert_eq!(text.parse::<f64>().unwrap(), v, "{text}");
        }
    }

    #[test]
    fn integers_accept_integral_floats_only() {
        assert_eq!(parse_int(" 42 "), Ok(42));
        assert_eq!(parse_int("3.0"), Ok(3));
        assert!(matches!(parse_int("3.5"), Err(ValueError::NotAnInteger(_))));
        assert_eq!(parse_int(""), Err(ValueError::Empty));
    }

    #[test]
    fn counts_are_bounded() {
        assert_eq!(parse_count("4"), Ok(4));
        assert_eq!(parse_count("0"), Ok(0));
        assert!(matches!(
            parse_count("2147483647"),
            Err(ValueError::CountOutOfRange { value: i32::MAX, .. })
        ));
        assert!(matches!(
            parse_count("-1"),
            Err(ValueError::CountOutOfRange { value: -1, .. })
        ));
    }

    #[test]
    fn flags_are_non_zero_integers() {
        assert_eq!(parse_flag("0"), Ok(false));
        assert_eq!(parse_flag("1"), Ok(true));
        assert_eq!(parse_flag("2"), Ok(true));
        assert!(parse_flag("yes").is_err());
    }

    #[test]
    fn first_token_ignores_trailing_text() {
        assert_eq!(first_token("  12   # comment"), Some("12"));
        assert_eq!(first_token("   "), None);
    }
}
