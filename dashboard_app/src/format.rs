//! Number formatting for dashboard widgets.

/// Placeholder shown for missing values.
pub const MISSING: &str = "n/a";

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Formats `value` with `decimals` fraction digits and `,` between thousands.
pub fn thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    for (index, digit) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

/// Applies `format` to a present value, or returns [`MISSING`].
pub fn or_missing(value: Option<f64>, format: impl FnOnce(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| String::from(MISSING))
}

/// One-line bar chart of `values`; missing points render as spaces.
pub fn sparkline(values: &[Option<f64>]) -> String {
    let present = values.iter().flatten();
    let (low, high) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    });
    let span = high - low;

    values
        .iter()
        .map(|value| match value {
            None => ' ',
            Some(_) if span <= 0.0 => SPARK_LEVELS[SPARK_LEVELS.len() / 2],
            Some(v) => {
                let scaled = (v - low) / span * (SPARK_LEVELS.len() - 1) as f64;
                SPARK_LEVELS[scaled.round() as usize]
            }
        })
        .collect()
}
