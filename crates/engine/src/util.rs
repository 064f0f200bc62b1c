//! Internal helpers shared by the fixed-point types.
//!
//! Money and quantities use the same lexical rules for user input (optional
//! sign, `.` or `,` as decimal separator, at most two fraction digits), so
//! the scanner lives here and each type maps failures to its own error.

/// Parses a decimal string into signed hundredths.
///
/// Returns a static reason on failure so callers can embed it in their own
/// error variant.
pub(crate) fn parse_fixed2(input: &str) -> Result<i64, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty value");
    }

    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(stripped) => (-1i64, stripped),
        None => (1i64, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if rest.is_empty() {
        return Err("empty value");
    }

    let rest = rest.replace(',', ".");
    let (whole, frac) = match rest.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (rest.as_str(), ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid number");
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid number");
    }
    if frac.len() > 2 {
        return Err("too many decimals");
    }

    let whole: i64 = whole.parse().map_err(|_| "value out of range")?;
    let hundredths: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| "invalid number")? * 10,
        _ => frac.parse::<i64>().map_err(|_| "invalid number")?,
    };

    let total = whole
        .checked_mul(100)
        .and_then(|value| value.checked_add(hundredths))
        .ok_or("value out of range")?;

    if sign < 0 {
        total.checked_neg().ok_or("value out of range")
    } else {
        Ok(total)
    }
}
