//! Display formatting for estimate figures.

use std::time::SystemTime;

/// Whole-dollar amount with thousands separators; zero, negative and
/// non-finite values are shown as "N/A" since the estimators use 0 for
/// "not enough data".
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "N/A".to_string();
    }

    let rounded = value.round() as u64;
    format!("${}", group_thousands(rounded))
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value:.1}%")
    }
}

pub fn humanize_age(updated_at: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(updated_at)
        .unwrap_or_default()
        .as_secs();
    humanize_secs(age)
}

fn humanize_secs(age: u64) -> String {
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
