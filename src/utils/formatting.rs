//! Formatting utilities used for CLI and export outputs.

/// "7.00"
pub fn hours2readable(hours: f64) -> String {
    format!("{:.2}", hours)
}

/// "$1234.50"
pub fn money(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

/// Replace every character outside `[A-Za-z0-9]` with `_`, one for one.
pub fn sanitize_file_component(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_each_symbol() {
        assert_eq!(sanitize_file_component("Acme & Co."), "Acme___Co_");
        assert_eq!(sanitize_file_component("Zoë-GmbH"), "Zo__GmbH");
        assert_eq!(sanitize_file_component("plain42"), "plain42");
    }

    #[test]
    fn money_and_hours_use_two_decimals() {
        assert_eq!(money("$", 0.0), "$0.00");
        assert_eq!(money("€", 12.5), "€12.50");
        assert_eq!(hours2readable(7.0), "7.00");
    }
}
