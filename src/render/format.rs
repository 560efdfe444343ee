/// SI prefixes from yocto (1e-24) to yotta (1e24), in steps of 1e3.
const PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Format a number with `precision` significant digits and an SI prefix.
///
/// `1234567 → "1.2M"`, `300 → "300"`, `0 → "0.0"` for two digits. Trailing
/// zeros are kept, like a fixed-precision SI formatter.
pub fn format_si(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let p = precision.max(1);
    let sign = if value < 0.0 { "\u{2212}" } else { "" };

    // Round to `p` significant digits first; the exponent must be read
    // after rounding so 999_999 becomes 1.0M and not 1000k.
    let sci = format!("{:.*e}", p - 1, value.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let prefix_exponent = exponent.div_euclid(3).clamp(-8, 8) * 3;
    let prefix = PREFIXES[(prefix_exponent / 3 + 8) as usize];
    let i = exponent - prefix_exponent + 1;
    let n = digits.len() as i32;

    let body = if i == n {
        digits
    } else if i > n {
        format!("{}{}", digits, "0".repeat((i - n) as usize))
    } else if i > 0 {
        format!("{}.{}", &digits[..i as usize], &digits[i as usize..])
    } else {
        format!("0.{}{}", "0".repeat((-i) as usize), digits)
    };

    format!("{sign}{body}{prefix}")
}

/// Money amounts as shown in totals, cards and the tooltip.
pub fn format_money(value: f64) -> String {
    format!("${}", format_si(value, 2))
}

/// Spend ratio as a whole percentage; `None` (zero budget) renders as a dash.
pub fn format_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r.is_finite() => format!("{:.0}%", r * 100.0),
        _ => "–".to_string(),
    }
}
