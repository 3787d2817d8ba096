/// Rounds to `places` fractional digits, ties to even.
pub fn round_decimal(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || !factor.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

/// Shortest representation that reads back to the same value, always with a
/// fractional part for integral values (`1024.0`, not `1024`). Magnitudes
/// below `1e-4` or from `1e16` up use exponent form with a signed, two-digit
/// exponent (`1e-07`, `1.5e+16`).
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(value);
    }
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn format_exponent(value: f64) -> String {
    let formatted = format!("{value:e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}
