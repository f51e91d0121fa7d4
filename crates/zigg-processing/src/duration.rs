/// Render whole seconds as `HH:MM:SS`. Hours are not capped at 24.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_hms(125), "00:02:05");
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(3 * 3600 + 25 * 60 + 9), "03:25:09");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
    }
}
