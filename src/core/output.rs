//! Display formatting for costs, weights and derived metrics.

const ABSENT: &str = "—";

/// Rendering mode for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole US dollars from integer cents: `Some(123456)` -> "$1,235".
pub fn format_currency(cents: Option<i64>) -> String {
    let Some(cents) = cents else {
        return ABSENT.to_string();
    };
    let dollars = (cents as f64 / 100.0).round() as i64;
    let sign = if dollars < 0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(dollars.unsigned_abs()))
}

/// "N g" below a kilogram, "X.XX kg" from there on.
pub fn format_weight(grams: Option<i64>) -> String {
    match grams {
        None => ABSENT.to_string(),
        Some(g) if g >= 1000 => format!("{:.2} kg", g as f64 / 1000.0),
        Some(g) => format!("{} g", g),
    }
}

pub fn format_twr(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}:1", r),
        None => ABSENT.to_string(),
    }
}

pub fn format_flight_time(minutes: Option<f64>) -> String {
    match minutes {
        Some(m) => format!("{:.1} min", m),
        None => ABSENT.to_string(),
    }
}

/// Collapse whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}
