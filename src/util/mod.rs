/// 1) Canonical text form of a number.
///
/// Integral values print without a fraction (`5`, not `5.0`), negative zero
/// prints as `0`, and the non-finite values print as `NaN`, `Infinity` and
/// `-Infinity` so they match what spreadsheet exports already contain.
/// Magnitudes from 1e21 up, or below 1e-6, switch to exponent form with an
/// explicit exponent sign (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponent_form(n)
    } else {
        n.to_string()
    }
}

// `{:e}` gives the shortest mantissa but writes `1e21`; add the `+`.
fn exponent_form(n: f64) -> String {
    let s = format!("{:e}", n);
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => s,
    }
}

/// 2) Prefix `0`s until the integer part of `num` has at least `min_digits`
/// characters. The fraction, if any, is kept as-is.
///
/// The integer part is `floor(num)`, so for negatives the sign counts toward
/// the width.
pub fn zero_pad(num: f64, min_digits: usize) -> String {
    let int_len = format_number(num.floor()).len();
    let needed = min_digits.saturating_sub(int_len);
    format!("{}{}", "0".repeat(needed), format_number(num))
}
