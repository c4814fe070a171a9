//! Size and rounding helpers shared by the extractors.

pub const KIB: f64 = 1024.0;
pub const MIB: f64 = 1024.0 * 1024.0;
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert a `df -h` style size (`12G`, `512M`, `2.5K`, or bare bytes,
/// commas allowed) to gigabytes rounded to 2 places. Unreadable input is 0.0.
pub fn convert_to_gb(value: &str) -> f64 {
    let cleaned = value.replace(',', "");
    let (number, factor) = match cleaned.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('G') => (&cleaned[..cleaned.len() - 1], GIB),
        Some('M') => (&cleaned[..cleaned.len() - 1], MIB),
        Some('K') => (&cleaned[..cleaned.len() - 1], KIB),
        _ => (cleaned.as_str(), 1.0),
    };
    match number.parse::<f64>() {
        Ok(n) => {
            let gb = round2(n * factor / GIB);
            if gb.is_finite() {
                gb
            } else {
                0.0
            }
        }
        Err(_) => 0.0,
    }
}

/// Rounds to `places` decimals, half-to-even on the exact binary value
/// (`0.125` → `0.12`, `2.675` → `2.67`).
pub fn round_to(v: f64, places: usize) -> f64 {
    format!("{v:.places$}").parse().unwrap_or(v)
}

pub fn round1(v: f64) -> f64 {
    round_to(v, 1)
}

pub fn round2(v: f64) -> f64 {
    round_to(v, 2)
}

pub fn round3(v: f64) -> f64 {
    round_to(v, 3)
}

/// Shortest decimal form of `v`, keeping at least one fractional digit
/// (`12.0`, `12.35`). Magnitudes from `1e16` up, or below `1e-4`, switch to
/// exponent form with a signed two-digit exponent (`1e+16`, `2.5e-05`).
pub fn format_decimal(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let abs = v.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let sci = format!("{v:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => match exp.strip_prefix('-') {
                Some(digits) => format!("{mantissa}e-{digits:0>2}"),
                None => format!("{mantissa}e+{exp:0>2}"),
            },
            None => sci,
        };
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
