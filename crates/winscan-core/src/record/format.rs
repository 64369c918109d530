//! Numeric formatting helpers for the record layout

/// Fixed notation with `digits` significant digits.
pub(crate) fn fixed_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", digits - 1, value);
    }
    // Take the exponent after rounding so a carry (9.99999 -> 10.000) is counted
    let rounded = format!("{:.*e}", digits - 1, value);
    let magnitude = rounded
        .split_once('e')
        .and_then(|(_, exp)| exp.parse::<i64>().ok())
        .unwrap_or(0);
    let decimals = (digits as i64 - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, value)
}

/// Scientific notation with `digits` significant digits and a signed,
/// at least two digit exponent (`1.2345679e-01`).
pub(crate) fn scientific(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    let raw = format!("{:.*e}", digits - 1, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, exponent) = match exponent.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{exponent:0>2}")
        }
        // NaN and infinities carry no exponent
        None => raw,
    }
}
