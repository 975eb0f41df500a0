// Timeline domain model - scrub position within the fixed cruise week
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// 2025-08-01T00:00:00Z
pub const FIXED_START_MS: i64 = 1_754_006_400_000;
/// 2025-08-07T23:59:59Z
pub const FIXED_END_MS: i64 = 1_754_611_199_000;

pub const POSITION_MAX: u8 = 100;
const STEP: u8 = 5;
const DAYS_IN_WINDOW: u8 = 7;

pub fn fixed_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(FIXED_START_MS)
}

pub fn fixed_end() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(FIXED_END_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Months,
    Weeks,
    Days,
    Hours,
}

impl Granularity {
    /// Approximate window width; not calendar-aware.
    pub fn duration(self) -> TimeDelta {
        match self {
            Granularity::Months => TimeDelta::days(30),
            Granularity::Weeks => TimeDelta::days(7),
            Granularity::Days => TimeDelta::days(1),
            Granularity::Hours => TimeDelta::hours(1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Months => "Months",
            Granularity::Weeks => "Weeks",
            Granularity::Days => "Days",
            Granularity::Hours => "Hours",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

impl TimeRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Linear interpolation of a 0..=100 scrub position onto the fixed week.
/// Out-of-range positions are clamped.
pub fn position_to_instant(position: f64) -> DateTime<Utc> {
    let position = if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, f64::from(POSITION_MAX))
    };
    let total_ms = FIXED_END_MS - FIXED_START_MS;
    let offset_ms = (total_ms as f64 * position / f64::from(POSITION_MAX)).round() as i64;
    fixed_start() + TimeDelta::milliseconds(offset_ms)
}

/// Window of `duration` centred on `instant`. Each bound is clamped to the
/// fixed week on its own, so the window narrows near the edges.
pub fn window_around(instant: DateTime<Utc>, duration: TimeDelta) -> (DateTime<Utc>, DateTime<Utc>) {
    let instant = instant.clamp(fixed_start(), fixed_end());
    let half = duration / 2;
    let start = (instant - half).max(fixed_start());
    let end = (instant + half).min(fixed_end());
    (start, end)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayStep {
    Advanced,
    Finished,
}

/// Scrub state shared by every map panel.
#[derive(Debug, Clone)]
pub struct Timeline {
    position: u8,
    granularity: Granularity,
    playing: bool,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            position: 0,
            granularity: Granularity::Days,
            playing: false,
        }
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_instant(&self) -> DateTime<Utc> {
        position_to_instant(f64::from(self.position))
    }

    pub fn time_range(&self) -> TimeRange {
        let (start, end) = window_around(self.current_instant(), self.granularity.duration());
        TimeRange {
            start,
            end,
            granularity: self.granularity,
        }
    }

    pub fn scrub(&mut self, position: u8) {
        self.position = position.min(POSITION_MAX);
    }

    pub fn step_back(&mut self) {
        self.position = self.position.saturating_sub(STEP);
    }

    pub fn step_forward(&mut self) {
        self.scrub(self.position.saturating_add(STEP));
    }

    pub fn jump_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = POSITION_MAX;
    }

    /// Recentres on the current position with the new width.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// One autoplay tick. Past the end the position wraps to 0 and playback stops.
    pub fn advance(&mut self) -> AutoplayStep {
        if self.position >= POSITION_MAX {
            self.position = 0;
            self.playing = false;
            AutoplayStep::Finished
        } else {
            self.position += 1;
            AutoplayStep::Advanced
        }
    }

    /// 1-based day of the week being viewed.
    pub fn day_of_week(&self) -> u8 {
        let per_day = f64::from(POSITION_MAX) / f64::from(DAYS_IN_WINDOW);
        let day = (f64::from(self.position) / per_day).floor() as u8 + 1;
        day.min(DAYS_IN_WINDOW)
    }

    pub fn label(&self) -> String {
        let instant = self.current_instant();
        match self.granularity {
            Granularity::Months => instant.format("%B %Y").to_string(),
            Granularity::Weeks => instant.format("Week of %b %-d, %Y").to_string(),
            Granularity::Days => instant.format("%A, %B %-d, %Y").to_string(),
            Granularity::Hours => instant.format("%A, %B %-d, %Y, %I:%M %p").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_bounds() {
        assert_eq!(fixed_start(), Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap());
        assert_eq!(fixed_end(), Utc.with_ymd_and_hms(2025, 8, 7, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_position_to_instant_monotonic_and_bounded() {
        let mut previous = position_to_instant(0.0);
        for step in 0..=1000 {
            let p = f64::from(step) / 10.0;
            let instant = position_to_instant(p);
            assert!(instant >= previous, "not monotonic at {}", p);
            assert!(instant >= fixed_start() && instant <= fixed_end());
            previous = instant;
        }
        assert_eq!(position_to_instant(-3.0), fixed_start());
        assert_eq!(position_to_instant(250.0), fixed_end());
        assert_eq!(position_to_instant(f64::NAN), fixed_start());
    }

    #[test]
    fn test_window_around_bounded() {
        let all = [
            Granularity::Months,
            Granularity::Weeks,
            Granularity::Days,
            Granularity::Hours,
        ];
        for g in all {
            for p in 0..=100 {
                let (start, end) = window_around(position_to_instant(f64::from(p)), g.duration());
                assert!(start <= end);
                assert!(start >= fixed_start() && end <= fixed_end());
            }
        }
    }

    #[test]
    fn test_window_clamps_each_side_independently() {
        let early = Utc.with_ymd_and_hms(2025, 8, 1, 6, 0, 0).unwrap();
        let (start, end) = window_around(early, TimeDelta::days(1));
        assert_eq!(start, fixed_start());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 8, 1, 18, 0, 0).unwrap());

        let mid = position_to_instant(50.0);
        let (start, end) = window_around(mid, Granularity::Months.duration());
        assert_eq!((start, end), (fixed_start(), fixed_end()));
    }

    #[test]
    fn test_start_of_week_with_days() {
        let timeline = Timeline::new();
        assert_eq!(timeline.current_instant(), fixed_start());
        let range = timeline.time_range();
        assert_eq!(range.start, fixed_start());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap());
        assert_eq!(range.granularity, Granularity::Days);
    }

    #[test]
    fn test_end_of_week_with_hours() {
        let mut timeline = Timeline::new();
        timeline.set_granularity(Granularity::Hours);
        timeline.scrub(100);
        assert_eq!(timeline.current_instant(), fixed_end());
        let range = timeline.time_range();
        assert_eq!(range.end, fixed_end());
        assert_eq!(range.start, Utc.with_ymd_and_hms(2025, 8, 7, 23, 29, 59).unwrap());
    }

    #[test]
    fn test_granularity_recenters_on_current_position() {
        let mut timeline = Timeline::new();
        timeline.scrub(50);
        let centre = timeline.current_instant();
        timeline.set_granularity(Granularity::Hours);
        let range = timeline.time_range();
        assert_eq!(range.start, centre - TimeDelta::minutes(30));
        assert_eq!(range.end, centre + TimeDelta::minutes(30));
    }

    #[test]
    fn test_autoplay_single_pass() {
        let mut timeline = Timeline::new();
        timeline.set_playing(true);
        for _ in 0..100 {
            assert_eq!(timeline.advance(), AutoplayStep::Advanced);
        }
        assert_eq!(timeline.position(), 100);
        assert!(timeline.is_playing());
        assert_eq!(timeline.advance(), AutoplayStep::Finished);
        assert_eq!(timeline.position(), 0);
        assert!(!timeline.is_playing());
    }

    #[test]
    fn test_transport_controls_clamp() {
        let mut timeline = Timeline::new();
        timeline.step_back();
        assert_eq!(timeline.position(), 0);
        timeline.scrub(98);
        timeline.step_forward();
        assert_eq!(timeline.position(), 100);
        timeline.scrub(200);
        assert_eq!(timeline.position(), 100);
        timeline.jump_to_start();
        assert_eq!(timeline.position(), 0);
        timeline.jump_to_end();
        assert_eq!(timeline.position(), 100);
    }

    #[test]
    fn test_day_of_week() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.day_of_week(), 1);
        timeline.scrub(15);
        assert_eq!(timeline.day_of_week(), 2);
        timeline.scrub(100);
        assert_eq!(timeline.day_of_week(), 7);
    }

    #[test]
    fn test_labels() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.label(), "Friday, August 1, 2025");
        timeline.set_granularity(Granularity::Months);
        assert_eq!(timeline.label(), "August 2025");
        timeline.set_granularity(Granularity::Weeks);
        assert_eq!(timeline.label(), "Week of Aug 1, 2025");
        timeline.set_granularity(Granularity::Hours);
        assert_eq!(timeline.label(), "Friday, August 1, 2025, 12:00 AM");
    }
}
