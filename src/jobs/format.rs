//! Display helpers for job fields.

use chrono::{DateTime, Utc};

/// `60000.0` -> `"$60,000"`, `1234.5` -> `"$1,234.50"`
pub fn format_salary(salary: f64) -> String {
    let negative = salary < 0.0;
    let cents = (salary.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let frac = cents % 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&whole);
    if frac != 0 {
        out.push_str(&format!(".{:02}", frac));
    }
    out
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Day-first calendar date, e.g. `31/08/2025`
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Shorten to `max_len` characters, marking the cut with `...`
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
