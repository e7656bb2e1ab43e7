//! ISO-8601 duration formatting for video lengths.

/// Formats an ISO-8601 duration (`PT1M30S`) as a clock string.
///
/// Hours are included only when present: `PT1M30S` becomes `1:30`,
/// `PT1H2M3S` becomes `1:02:03`. Unparsable input formats as `0:00`,
/// matching how an absent duration is displayed.
pub fn format_duration(iso: &str) -> String {
    let Ok(span) = iso.parse::<jiff::Span>() else {
        return "0:00".to_string();
    };

    let hours = span.get_hours();
    let minutes = span.get_minutes();
    let seconds = span.get_seconds();

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_duration("PT1M30S"), "1:30");
    }

    #[test]
    fn hours_pad_minutes_and_seconds() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
    }

    #[test]
    fn seconds_only() {
        assert_eq!(format_duration("PT45S"), "0:45");
    }

    #[test]
    fn zero_duration() {
        assert_eq!(format_duration("PT0S"), "0:00");
    }

    #[test]
    fn garbage_formats_as_zero() {
        assert_eq!(format_duration("not-a-duration"), "0:00");
    }
}
