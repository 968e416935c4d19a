use chrono::{DateTime, Utc};
use ratatui::style::{Color, Style};

use crate::types::BonusStatus;

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Number and date conventions for display. Never used for parsing or sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub tag: &'static str,
    pub thousands_sep: char,
    pub decimal_sep: char,
    /// chrono format string for calendar dates.
    pub date_pattern: &'static str,
    pub currency_symbol: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            tag: "en-US",
            thousands_sep: ',',
            decimal_sep: '.',
            date_pattern: "%m/%d/%Y",
            currency_symbol: "$".to_string(),
        }
    }
}

impl Locale {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let base = Self::default();
        let locale = match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en-us" => base,
            "en-gb" => Self { tag: "en-GB", date_pattern: "%d/%m/%Y", ..base },
            "de-de" => Self {
                tag: "de-DE",
                thousands_sep: '.',
                decimal_sep: ',',
                date_pattern: "%d.%m.%Y",
                ..base
            },
            "fr-fr" => Self {
                tag: "fr-FR",
                thousands_sep: ' ',
                decimal_sep: ',',
                date_pattern: "%d/%m/%Y",
                ..base
            },
            _ => return None,
        };
        Some(locale)
    }
}

// ---------------------------------------------------------------------------
// Per-row derivations
// ---------------------------------------------------------------------------

/// Style for statuses we have no mapping for.
pub const DEFAULT_STATUS_STYLE: Style = Style::new().fg(Color::White);

pub fn status_color(status: BonusStatus) -> Style {
    match status {
        BonusStatus::Active => Style::new().fg(Color::Green),
        BonusStatus::Completed => Style::new().fg(Color::Blue),
        BonusStatus::Expired => Style::new().fg(Color::DarkGray),
        BonusStatus::Forfeited => Style::new().fg(Color::Red),
        BonusStatus::Unknown => DEFAULT_STATUS_STYLE,
    }
}

/// Share of the wagering requirement already played through, in `0.0..=100.0`.
/// A bonus with no requirement (`required <= 0`) counts as fully wagered.
pub fn wager_progress_percent(required: i64, remaining: i64) -> f64 {
    if required <= 0 {
        return 100.0;
    }
    let done = (required as f64 - remaining as f64) / required as f64 * 100.0;
    done.clamp(0.0, 100.0)
}

/// Fixed-width text bar, e.g. `███████░░░  70%`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    format!(
        "{}{} {:>3.0}%",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled)),
        percent
    )
}

fn group_thousands(mut n: u64, sep: char) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push(n % 1000);
        n /= 1000;
    }
    let mut out = groups.pop().map(|g| g.to_string()).unwrap_or_default();
    for g in groups.iter().rev() {
        out.push(sep);
        out.push_str(&format!("{g:03}"));
    }
    out
}

pub fn format_currency(amount_cents: i64, locale: &Locale) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let abs = amount_cents.unsigned_abs();
    format!(
        "{sign}{}{}{}{:02}",
        locale.currency_symbol,
        group_thousands(abs / 100, locale.thousands_sep),
        locale.decimal_sep,
        abs % 100
    )
}

pub fn format_date(ts: DateTime<Utc>, locale: &Locale) -> String {
    ts.format(locale.date_pattern).to_string()
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

pub fn format_count(value: f64, locale: &Locale) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let n = value.round();
    let sign = if n < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(n.abs() as u64, locale.thousands_sep))
}

pub fn format_rate(percent: f64, locale: &Locale) -> String {
    if !percent.is_finite() {
        return "—".to_string();
    }
    format!("{percent:.2}%").replace('.', &locale.decimal_sep.to_string())
}

/// Signed change versus the previous period, e.g. `+4.2%` / `-0.3%`.
pub fn format_percent_change(percent: f64) -> String {
    if !percent.is_finite() {
        return "—".to_string();
    }
    format!("{percent:+.1}%")
}

pub fn change_color(percent: f64) -> Color {
    if percent >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
