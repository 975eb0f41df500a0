// Header and timeline captions
use crate::domain::timeline::Timeline;
use chrono::{DateTime, Utc};

pub fn status_line(last_update: Option<DateTime<Utc>>, missing_files: usize, updating: bool) -> String {
    let mut line = match last_update {
        Some(at) => format!("Last update: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => "Last update: Never".to_string(),
    };
    if updating {
        line.push_str(" · updating…");
    }
    if missing_files > 0 {
        line.push_str(&format!(" · {} missing files", missing_files));
    }
    line
}

pub fn timeline_caption(timeline: &Timeline) -> String {
    format!(
        "{} · Viewing {} resolution · Day {} of 7",
        timeline.label(),
        timeline.granularity().label().to_lowercase(),
        timeline.day_of_week()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timeline::Granularity;
    use chrono::TimeZone;

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(None, 0, false), "Last update: Never");
        assert_eq!(
            status_line(None, 4, true),
            "Last update: Never · updating… · 4 missing files"
        );

        let at = Utc.with_ymd_and_hms(2025, 8, 2, 9, 30, 0).unwrap();
        assert_eq!(status_line(Some(at), 0, false), "Last update: 2025-08-02 09:30:00 UTC");
    }

    #[test]
    fn test_timeline_caption() {
        let mut timeline = Timeline::new();
        timeline.set_granularity(Granularity::Weeks);
        timeline.scrub(100);
        assert_eq!(
            timeline_caption(&timeline),
            "Week of Aug 7, 2025 · Viewing weeks resolution · Day 7 of 7"
        );
    }
}
