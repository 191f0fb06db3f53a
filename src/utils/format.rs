use chrono::NaiveDateTime;

/// Render a backend timestamp (naive ISO-8601) as a short date for
/// list rows. Unparseable input falls back to the raw date portion.
pub fn format_date(timestamp: &str) -> String {
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        Ok(parsed) => parsed.format("%b %e, %Y").to_string(),
        Err(_) => timestamp.split('T').next().unwrap_or(timestamp).to_string(),
    }
}

/// Render a backend timestamp with time-of-day for detail panes.
pub fn format_datetime(timestamp: &str) -> String {
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        Ok(parsed) => parsed.format("%b %e, %Y %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

pub fn format_cost(cost: Option<f64>) -> String {
    match cost {
        Some(amount) => format!("₦{:.2}", amount),
        None => "—".to_string(),
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-05-12T09:30:00"), "May 12, 2026");
    }

    #[test]
    fn test_format_date_fallback_on_unparseable_input() {
        assert_eq!(format_date("2026-05-12"), "2026-05-12");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2026-05-12T09:30:00"), "May 12, 2026 09:30");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(Some(45.5)), "₦45.50");
        assert_eq!(format_cost(None), "—");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
    }
}
