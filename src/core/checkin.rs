//! # Mood Check-ins
//!
//! A small rolling log of daily mood check-ins, newest first, capped at
//! [`MAX_CHECKINS`]. One check-in per calendar day: checking in again on the
//! same day replaces the earlier entry.
//!
//! Stats and streak detection run over whatever the log currently holds.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::mood::Mood;

pub const MAX_CHECKINS: usize = 30;
pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;
/// Runs shorter than this are not reported as streaks.
pub const MIN_STREAK_DAYS: usize = 3;
/// Below this many check-ins a profile sketch says it is provisional.
pub const MIN_CHECKINS_FOR_PROFILE: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    pub mood: Mood,
    pub intensity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInError {
    IntensityOutOfRange(u8),
}

impl fmt::Display for CheckInError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckInError::IntensityOutOfRange(value) => write!(
                f,
                "intensity {value} out of range ({MIN_INTENSITY}-{MAX_INTENSITY})"
            ),
        }
    }
}

impl std::error::Error for CheckInError {}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CheckInLog {
    /// Newest first.
    pub entries: Vec<CheckIn>,
    pub last_check_in: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodStats {
    pub total: usize,
    pub average_intensity: f32,
    /// Percentage per mood, most frequent first.
    pub distribution: Vec<(Mood, f32)>,
    pub dominant: Option<Mood>,
}

impl MoodStats {
    /// Fraction (0.0..=1.0) of check-ins whose mood has the given valence.
    pub fn share(&self, valence: i8) -> f32 {
        self.distribution
            .iter()
            .filter(|(m, _)| m.valence() == valence)
            .map(|(_, pct)| pct / 100.0)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodStreak {
    pub mood: Mood,
    pub days: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MoodStreak {
    pub fn describe(&self) -> String {
        format!("You felt {} for {} days in a row", self.mood, self.days)
    }
}

impl CheckInLog {
    pub fn record(&mut self, check_in: CheckIn) -> Result<(), CheckInError> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&check_in.intensity) {
            return Err(CheckInError::IntensityOutOfRange(check_in.intensity));
        }

        let date = check_in.date;
        self.entries.retain(|e| e.date != date);
        self.entries.push(check_in);
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
        self.entries.truncate(MAX_CHECKINS);

        self.last_check_in = Some(self.last_check_in.map_or(date, |last| last.max(date)));
        Ok(())
    }

    pub fn has_checked_in(&self, today: NaiveDate) -> bool {
        self.last_check_in == Some(today)
    }

    pub fn stats(&self) -> MoodStats {
        let total = self.entries.len();
        if total == 0 {
            return MoodStats {
                total: 0,
                average_intensity: 0.0,
                distribution: Vec::new(),
                dominant: None,
            };
        }

        let intensity_sum: u32 = self.entries.iter().map(|e| u32::from(e.intensity)).sum();

        let mut counts: HashMap<Mood, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.mood).or_default() += 1;
        }

        // Ties resolve in enumeration order so results are stable
        let mut ranked: Vec<(Mood, usize)> = Mood::ALL
            .into_iter()
            .filter_map(|m| counts.get(&m).map(|&c| (m, c)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let distribution = ranked
            .iter()
            .map(|&(mood, count)| (mood, count as f32 / total as f32 * 100.0))
            .collect();

        MoodStats {
            total,
            average_intensity: intensity_sum as f32 / total as f32,
            distribution,
            dominant: ranked.first().map(|&(mood, _)| mood),
        }
    }

    /// Human-readable summary of [`stats`](Self::stats) and [`streaks`](Self::streaks).
    pub fn summary(&self) -> String {
        let stats = self.stats();
        let Some(dominant) = stats.dominant else {
            return "No check-ins yet. Try /checkin happy 7 to log how you feel.".to_string();
        };

        let mut out = format!(
            "Across your last {} check-in{} you mostly felt {} (average intensity {:.1}/10).",
            stats.total,
            if stats.total == 1 { "" } else { "s" },
            dominant,
            stats.average_intensity
        );
        for (mood, pct) in &stats.distribution {
            out.push_str(&format!("\n- {mood}: {pct:.0}%"));
        }
        for streak in self.streaks() {
            out.push_str(&format!("\n{}.", streak.describe()));
        }
        out
    }

    /// Short personality sketch drawn from the check-ins.
    pub fn profile(&self) -> String {
        let stats = self.stats();
        let Some(dominant) = stats.dominant else {
            return "I don't know you well yet. Check in with /checkin a few times and I'll \
                    start to see who you are."
                .to_string();
        };

        let positive = stats.share(1);
        let negative = stats.share(-1);
        let temperament = if positive > negative {
            "mostly upbeat"
        } else if negative > positive {
            "going through a heavier stretch"
        } else {
            "fairly even-keeled"
        };
        let intensity = match stats.average_intensity {
            i if i >= 7.0 => "you feel things strongly",
            i if i <= 4.0 => "your feelings run quiet and steady",
            _ => "your feelings sit in a moderate range",
        };

        let mut out = format!(
            "From your check-ins you come across as {temperament}, and {intensity}. \
             The mood I see most is {dominant}."
        );
        if let Some(streak) = self.streaks().last() {
            out.push_str(&format!(" Lately: {}.", streak.describe().to_lowercase()));
        }
        if stats.total < MIN_CHECKINS_FOR_PROFILE {
            out.push_str(" This is a rough sketch; a few more check-ins will sharpen it.");
        }
        out
    }

    /// Runs of consecutive days with the same mood, oldest first.
    pub fn streaks(&self) -> Vec<MoodStreak> {
        let mut chronological: Vec<&CheckIn> = self.entries.iter().collect();
        chronological.sort_by_key(|e| e.date);

        let mut streaks = Vec::new();
        let mut run: Option<MoodStreak> = None;

        for entry in chronological {
            let extends = run.as_ref().is_some_and(|r| {
                r.mood == entry.mood && r.end.succ_opt() == Some(entry.date)
            });
            if extends {
                if let Some(r) = run.as_mut() {
                    r.days += 1;
                    r.end = entry.date;
                }
                continue;
            }
            if let Some(done) = run.take()
                && done.days >= MIN_STREAK_DAYS
            {
                streaks.push(done);
            }
            run = Some(MoodStreak {
                mood: entry.mood,
                days: 1,
                start: entry.date,
                end: entry.date,
            });
        }
        if let Some(done) = run
            && done.days >= MIN_STREAK_DAYS
        {
            streaks.push(done);
        }
        streaks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    fn check_in(mood: Mood, intensity: u8, date: NaiveDate) -> CheckIn {
        CheckIn {
            mood,
            intensity,
            note: None,
            date,
        }
    }

    #[test]
    fn test_record_keeps_newest_first() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Happy, 5, day(1))).unwrap();
        log.record(check_in(Mood::Sad, 5, day(3))).unwrap();
        log.record(check_in(Mood::Tired, 5, day(2))).unwrap();
        let dates: Vec<_> = log.entries.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
        assert_eq!(log.last_check_in, Some(day(3)));
    }

    #[test]
    fn test_same_day_replaces_entry() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Happy, 5, day(1))).unwrap();
        log.record(check_in(Mood::Anxious, 8, day(1))).unwrap();
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].mood, Mood::Anxious);
    }

    #[test]
    fn test_log_is_capped() {
        let mut log = CheckInLog::default();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        for offset in 0..40 {
            let date = start + chrono::Days::new(offset);
            log.record(check_in(Mood::Neutral, 5, date)).unwrap();
        }
        assert_eq!(log.entries.len(), MAX_CHECKINS);
        // Oldest entries fall off
        assert_eq!(log.entries.last().unwrap().date, start + chrono::Days::new(10));
    }

    #[test]
    fn test_intensity_is_validated() {
        let mut log = CheckInLog::default();
        assert_eq!(
            log.record(check_in(Mood::Happy, 0, day(1))),
            Err(CheckInError::IntensityOutOfRange(0))
        );
        assert_eq!(
            log.record(check_in(Mood::Happy, 11, day(1))),
            Err(CheckInError::IntensityOutOfRange(11))
        );
        assert!(log.entries.is_empty());
        assert!(log.last_check_in.is_none());
    }

    #[test]
    fn test_has_checked_in() {
        let mut log = CheckInLog::default();
        assert!(!log.has_checked_in(day(1)));
        log.record(check_in(Mood::Happy, 5, day(1))).unwrap();
        assert!(log.has_checked_in(day(1)));
        assert!(!log.has_checked_in(day(2)));
    }

    #[test]
    fn test_backdated_entry_keeps_last_date() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Happy, 5, day(5))).unwrap();
        log.record(check_in(Mood::Happy, 5, day(2))).unwrap();
        assert_eq!(log.last_check_in, Some(day(5)));
    }

    #[test]
    fn test_stats_empty() {
        let stats = CheckInLog::default().stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.dominant, None);
        assert!(stats.distribution.is_empty());
    }

    #[test]
    fn test_stats_distribution_and_dominant() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Happy, 8, day(1))).unwrap();
        log.record(check_in(Mood::Happy, 6, day(2))).unwrap();
        log.record(check_in(Mood::Sad, 2, day(3))).unwrap();
        log.record(check_in(Mood::Happy, 8, day(4))).unwrap();

        let stats = log.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.dominant, Some(Mood::Happy));
        assert!((stats.average_intensity - 6.0).abs() < f32::EPSILON);
        assert_eq!(stats.distribution[0], (Mood::Happy, 75.0));
        assert_eq!(stats.distribution[1], (Mood::Sad, 25.0));
    }

    #[test]
    fn test_dominant_tie_uses_enumeration_order() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Tired, 5, day(1))).unwrap();
        log.record(check_in(Mood::Sad, 5, day(2))).unwrap();
        assert_eq!(log.stats().dominant, Some(Mood::Sad));
    }

    #[test]
    fn test_streaks_need_three_consecutive_days() {
        let mut log = CheckInLog::default();
        for n in 1..=3 {
            log.record(check_in(Mood::Anxious, 5, day(n))).unwrap();
        }
        log.record(check_in(Mood::Happy, 5, day(4))).unwrap();
        log.record(check_in(Mood::Happy, 5, day(5))).unwrap();

        let streaks = log.streaks();
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].mood, Mood::Anxious);
        assert_eq!(streaks[0].days, 3);
        assert_eq!(streaks[0].start, day(1));
        assert_eq!(streaks[0].end, day(3));
        assert_eq!(streaks[0].describe(), "You felt anxious for 3 days in a row");
    }

    #[test]
    fn test_gap_breaks_streak() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Tired, 5, day(1))).unwrap();
        log.record(check_in(Mood::Tired, 5, day(2))).unwrap();
        log.record(check_in(Mood::Tired, 5, day(4))).unwrap();
        log.record(check_in(Mood::Tired, 5, day(5))).unwrap();
        assert!(log.streaks().is_empty());
    }

    #[test]
    fn test_trailing_streak_is_reported() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Sad, 5, day(1))).unwrap();
        for n in 2..=6 {
            log.record(check_in(Mood::Relaxed, 5, day(n))).unwrap();
        }
        let streaks = log.streaks();
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].days, 5);
        assert_eq!(streaks[0].end, day(6));
    }

    #[test]
    fn test_summary() {
        assert!(CheckInLog::default().summary().starts_with("No check-ins yet"));

        let mut log = CheckInLog::default();
        for n in 1..=3 {
            log.record(check_in(Mood::Relaxed, 6, day(n))).unwrap();
        }
        log.record(check_in(Mood::Sad, 2, day(4))).unwrap();
        let summary = log.summary();
        assert!(summary.starts_with("Across your last 4 check-ins you mostly felt relaxed"));
        assert!(summary.contains("- relaxed: 75%"));
        assert!(summary.contains("- sad: 25%"));
        assert!(summary.contains("You felt relaxed for 3 days in a row."));
    }

    #[test]
    fn test_profile_reflects_check_ins() {
        assert!(CheckInLog::default().profile().starts_with("I don't know you well yet"));

        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Anxious, 8, day(1))).unwrap();
        let sketch = log.profile();
        assert!(sketch.contains("going through a heavier stretch"));
        assert!(sketch.contains("you feel things strongly"));
        assert!(sketch.contains("The mood I see most is anxious."));
        assert!(sketch.contains("rough sketch"));

        let mut log = CheckInLog::default();
        for n in 1..=4 {
            log.record(check_in(Mood::Happy, 3, day(n))).unwrap();
        }
        let sketch = log.profile();
        assert!(sketch.contains("mostly upbeat"));
        assert!(sketch.contains("quiet and steady"));
        assert!(sketch.contains("Lately: you felt happy for 4 days in a row."));
        assert!(!sketch.contains("rough sketch"));
    }

    #[test]
    fn test_share_by_valence() {
        let mut log = CheckInLog::default();
        log.record(check_in(Mood::Happy, 5, day(1))).unwrap();
        log.record(check_in(Mood::Sad, 5, day(2))).unwrap();
        log.record(check_in(Mood::Tired, 5, day(3))).unwrap();
        log.record(check_in(Mood::Excited, 5, day(4))).unwrap();
        let stats = log.stats();
        assert!((stats.share(1) - 0.5).abs() < 1e-4);
        assert!((stats.share(-1) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_serde_skips_empty_note() {
        let json = serde_json::to_string(&check_in(Mood::Happy, 5, day(1))).unwrap();
        assert!(!json.contains("note"));
        assert!(json.contains("\"date\":\"2026-03-01\""));
    }
}
