//! # Domain Types
//!
//! Records and value types used across the application logic.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points needed per power level before the next level-up.
pub const POINTS_PER_LEVEL: i64 = 100;

/// A per-feature progress table sharing the leveling shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ledger {
    Fitness,
    Time,
}

impl Ledger {
    pub fn table(&self) -> &'static str {
        match self {
            Ledger::Fitness => "leveling",
            Ledger::Time => "time_management",
        }
    }

    /// Name of the point currency in replies.
    pub fn currency(&self) -> &'static str {
        match self {
            Ledger::Fitness => "strength",
            Ledger::Time => "Timex",
        }
    }
}

/// The leveling columns common to every ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRecord {
    pub power_level: i64,
    pub points: i64,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            power_level: 1,
            points: 0,
        }
    }
}

impl ProgressRecord {
    pub fn threshold(&self) -> i64 {
        POINTS_PER_LEVEL * self.power_level
    }

    /// Banks `earned` points, converting every full threshold into a level.
    /// Returns the number of levels gained.
    pub fn bank(&mut self, earned: i64) -> u32 {
        self.points += earned;
        let mut gained = 0;
        while self.points >= self.threshold() {
            self.points -= self.threshold();
            self.power_level += 1;
            gained += 1;
        }
        gained
    }
}

/// Result of a `find_or_create` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Existing(T),
    Created(T),
}

impl<T> Lookup<T> {
    pub fn into_inner(self) -> T {
        match self {
            Lookup::Existing(record) | Lookup::Created(record) => record,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Lookup::Created(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub power_level: i64,
    pub points: i64,
    pub levels_gained: u32,
}

impl LevelOutcome {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitnessRecord {
    pub user_id: String,
    pub progress: ProgressRecord,
    pub pushups: i64,
    pub pullups: i64,
    pub situps: i64,
    pub run_km: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRecord {
    pub user_id: String,
    pub progress: ProgressRecord,
    pub total_minutes: i64,
    pub daily_goal_on: Option<NaiveDate>,
}

/// One logged workout, as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Workout {
    pub pushups: u32,
    pub pullups: u32,
    pub situps: u32,
    pub run_km: u32,
}

impl Workout {
    pub fn points(&self) -> PointsBreakdown {
        PointsBreakdown {
            pushups: i64::from(self.pushups) * 2,
            situps: i64::from(self.situps),
            pullups: i64::from(self.pullups) * 3,
            run: i64::from(self.run_km) * 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsBreakdown {
    pub pushups: i64,
    pub situps: i64,
    pub pullups: i64,
    pub run: i64,
}

impl PointsBreakdown {
    pub fn total(&self) -> i64 {
        self.pushups + self.situps + self.pullups + self.run
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub name: String,
    pub deadline: NaiveDate,
    pub priority: String,
    pub progress: i64,
    pub completed: bool,
}

/// Fields of a goal that `.update_goal` may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalUpdate {
    Progress(i64),
    Deadline(NaiveDate),
    Priority(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTimer {
    pub task_name: String,
    pub started_at: DateTime<Utc>,
}

impl RunningTimer {
    /// Whole minutes elapsed at `now` (never negative).
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_minutes().max(0)
    }
}

/// Timex earned for a timed session of `minutes`.
pub fn timer_points(minutes: i64) -> i64 {
    let mut points = minutes;
    if minutes > 0 {
        points += 10;
    }
    if minutes > 60 {
        points += 5;
    }
    points
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSummary {
    pub task_name: String,
    pub minutes: i64,
    pub points: i64,
    pub outcome: LevelOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTask {
    pub task_name: String,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub task_name: String,
    pub task_time: NaiveTime,
    pub is_weekly: bool,
}

/// Look-back window of the productivity report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "day" | "today" => Some(Period::Day),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        match self {
            Period::Day => chrono::Duration::days(1),
            Period::Week => chrono::Duration::days(7),
            Period::Month => chrono::Duration::days(30),
            Period::Year => chrono::Duration::days(365),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "q")]
    pub text: String,
    #[serde(rename = "a")]
    pub author: String,
}

/// What kind of meme listing to pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemeQuery {
    Hot,
    Search(&'static str),
}

impl MemeQuery {
    pub fn label(&self) -> &'static str {
        match self {
            MemeQuery::Hot => "memes",
            MemeQuery::Search("Jujutsu Kaisen") => "jjk",
            MemeQuery::Search("One Piece") => "onepiece",
            MemeQuery::Search("Demon Slayer") => "demonslayer",
            MemeQuery::Search(_) => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemePost {
    pub url: String,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: String,
}

impl MemePost {
    const IMAGE_EXTENSIONS: [&'static str; 4] = [".png", ".jpg", ".jpeg", ".gif"];

    /// SFW, attributed and pointing straight at an image.
    pub fn is_postable(&self) -> bool {
        let has_author = matches!(self.author.as_deref(), Some(a) if !a.is_empty() && a != "[deleted]");
        let is_image = Self::IMAGE_EXTENSIONS
            .iter()
            .any(|ext| self.url.to_lowercase().ends_with(ext));
        !self.over_18 && has_author && is_image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_below_threshold() {
        let mut record = ProgressRecord::default();
        assert_eq!(record.bank(99), 0);
        assert_eq!(record, ProgressRecord { power_level: 1, points: 99 });
    }

    #[test]
    fn test_bank_exact_threshold_levels_once() {
        let mut record = ProgressRecord { power_level: 3, points: 0 };
        assert_eq!(record.bank(300), 1);
        assert_eq!(record, ProgressRecord { power_level: 4, points: 0 });
    }

    #[test]
    fn test_bank_multi_level_jump() {
        // 100 (lvl1) + 200 (lvl2) + 300 (lvl3) = 600, 50 left over at lvl4
        let mut record = ProgressRecord::default();
        assert_eq!(record.bank(650), 3);
        assert_eq!(record, ProgressRecord { power_level: 4, points: 50 });
    }

    #[test]
    fn test_bank_invariant_holds_for_sequences() {
        let mut record = ProgressRecord::default();
        for earned in [0, 1, 37, 99, 100, 250, 1_000, 7, 4_999, 12] {
            record.bank(earned);
            assert!(record.points >= 0);
            assert!(record.points < record.threshold());
        }
    }

    #[test]
    fn test_workout_points() {
        let workout = Workout { pushups: 5, pullups: 2, situps: 10, run_km: 1 };
        let points = workout.points();
        assert_eq!(points.pushups, 10);
        assert_eq!(points.pullups, 6);
        assert_eq!(points.situps, 10);
        assert_eq!(points.run, 10);
        assert_eq!(points.total(), 36);
    }

    #[test]
    fn test_timer_points() {
        assert_eq!(timer_points(0), 0);
        assert_eq!(timer_points(1), 11);
        assert_eq!(timer_points(60), 70);
        assert_eq!(timer_points(65), 80);
    }

    #[test]
    fn test_elapsed_minutes_truncates() {
        let start = Utc::now();
        let timer = RunningTimer { task_name: "read".into(), started_at: start };
        assert_eq!(timer.elapsed_minutes(start + chrono::Duration::seconds(119)), 1);
        assert_eq!(timer.elapsed_minutes(start - chrono::Duration::seconds(30)), 0);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(Period::parse("Week"), Some(Period::Week));
        assert_eq!(Period::parse("month"), Some(Period::Month));
        assert_eq!(Period::parse("fortnight"), None);
        assert_eq!(Period::Year.duration().num_days(), 365);
    }

    #[test]
    fn test_meme_post_filter() {
        let post = |url: &str, nsfw: bool, author: Option<&str>| MemePost {
            url: url.to_string(),
            over_18: nsfw,
            author: author.map(str::to_string),
            title: String::new(),
        };
        assert!(post("https://i.redd.it/a.png", false, Some("bob")).is_postable());
        assert!(post("https://i.redd.it/a.JPEG", false, Some("bob")).is_postable());
        assert!(!post("https://i.redd.it/a.png", true, Some("bob")).is_postable());
        assert!(!post("https://i.redd.it/a.png", false, None).is_postable());
        assert!(!post("https://i.redd.it/a.png", false, Some("[deleted]")).is_postable());
        assert!(!post("https://v.redd.it/clip", false, Some("bob")).is_postable());
    }

    #[test]
    fn test_quote_deserializes_from_zenquotes_shape() {
        let quotes: Vec<Quote> =
            serde_json::from_str(r#"[{"q":"Stay hungry.","a":"Jobs","h":"<b>"}]"#).unwrap();
        assert_eq!(quotes[0].text, "Stay hungry.");
        assert_eq!(quotes[0].author, "Jobs");
    }
}
