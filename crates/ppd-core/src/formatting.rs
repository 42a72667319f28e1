/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use ppd_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints such
    // as 1.005 round away from zero despite their binary representation.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` looks like "0.50"; keep ".50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a whole-pound amount with a `£` sign and thousands separators.
///
/// Accepts single prices (`u64`) as well as summed totals (`u128`).
///
/// # Examples
///
/// ```
/// use ppd_core::formatting::format_pounds;
///
/// assert_eq!(format_pounds(250_000u64), "£250,000");
/// assert_eq!(format_pounds(0u64), "£0");
/// ```
pub fn format_pounds(amount: impl Into<u128>) -> String {
    format!("£{}", group_thousands(&amount.into().to_string()))
}

/// Format a possibly fractional price (e.g. a median) rounded to whole
/// pounds; `None` renders as `"n/a"`.
///
/// # Examples
///
/// ```
/// use ppd_core::formatting::format_price;
///
/// assert_eq!(format_price(Some(412_500.5)), "£412,501");
/// assert_eq!(format_price(None), "n/a");
/// ```
pub fn format_price(amount: Option<f64>) -> String {
    match amount {
        Some(v) => format!("£{}", format_number(v, 0)),
        None => "n/a".to_string(),
    }
}

/// Format a signed percentage with two decimals and an explicit `+` for
/// increases.
///
/// # Examples
///
/// ```
/// use ppd_core::formatting::format_percent_change;
///
/// assert_eq!(format_percent_change(100.0), "+100.00%");
/// assert_eq!(format_percent_change(-50.0), "-50.00%");
/// assert_eq!(format_percent_change(0.0), "0.00%");
/// ```
pub fn format_percent_change(value: f64) -> String {
    let body = format_number(value, 2);
    if value > 0.0 && body != "0.00" {
        format!("+{}%", body)
    } else {
        format!("{}%", body)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
