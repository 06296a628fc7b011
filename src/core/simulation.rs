//! # "What if" Simulation
//!
//! A rule-based forecast for a scenario the user asked about. The area of
//! life is detected from keywords; the likelihood starts at 50% and moves
//! with the balance of pleasant and unpleasant moods in recent check-ins.

use std::fmt::Write;

use crate::core::checkin::MoodStats;
use crate::core::keywords;
use crate::core::mood::Mood;

/// Check-ins needed before the forecast is treated as more than a sketch.
const MIN_CHECKINS_FOR_CONFIDENCE: usize = 3;
/// Swing applied by a fully positive (or fully negative) mood history.
const MOOD_SWING: f32 = 30.0;
const TIRED_PENALTY: f32 = 5.0;
const MIN_LIKELIHOOD: f32 = 5.0;
const MAX_LIKELIHOOD: f32 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Career,
    Education,
    Relationships,
    Health,
    Other,
}

impl Area {
    pub fn detect(scenario: &str) -> Area {
        let lower = scenario.to_lowercase();
        let table: [(Area, &[&str]); 4] = [
            (
                Area::Career,
                &["job", "jobs", "career", "work", "profession", "business", "salary", "income", "promotion"],
            ),
            (
                Area::Education,
                &["study", "education", "school", "college", "university", "degree", "course", "learn"],
            ),
            (
                Area::Relationships,
                &["relationship", "partner", "marriage", "girlfriend", "boyfriend", "spouse", "friend", "friends", "family"],
            ),
            (
                Area::Health,
                &["health", "exercise", "diet", "weight", "fitness", "doctor", "sleep", "run", "running"],
            ),
        ];
        table
            .iter()
            .find(|(_, words)| keywords::any(&lower, words))
            .map_or(Area::Other, |(area, _)| *area)
    }

    pub fn label(self) -> &'static str {
        match self {
            Area::Career => "career",
            Area::Education => "education",
            Area::Relationships => "relationships",
            Area::Health => "health",
            Area::Other => "general",
        }
    }

    fn advice(self) -> &'static str {
        match self {
            Area::Career => "Break the change into milestones and give each one a date.",
            Area::Education => "Tie the new material to something you already use every week.",
            Area::Relationships => "Talk it through early, before small worries grow.",
            Area::Health => "Start smaller than feels necessary and track it daily.",
            Area::Other => "Pick one concrete first step you can take this week.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub scenario: String,
    pub area: Area,
    pub likelihood: u8,
    pub outcome: String,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
    pub advice: String,
}

pub fn simulate(scenario: &str, stats: &MoodStats) -> Simulation {
    let area = Area::detect(scenario);

    let positive = stats.share(1);
    let negative = stats.share(-1);

    let mut likelihood = 50.0 + (positive - negative) * MOOD_SWING;
    if stats.dominant == Some(Mood::Tired) {
        likelihood -= TIRED_PENALTY;
    }
    let likelihood = likelihood.clamp(MIN_LIKELIHOOD, MAX_LIKELIHOOD).round() as u8;

    let mut strengths = Vec::new();
    let mut challenges = Vec::new();
    if positive > 0.5 {
        strengths.push("You've been in a positive headspace lately".to_string());
    }
    if stats.average_intensity >= 7.0 {
        strengths.push("Your feelings run strong, which brings energy to new things".to_string());
    }
    if negative > 0.5 {
        challenges.push("Recent check-ins show a lot of strain; plan some recovery time".to_string());
    }
    if stats.dominant == Some(Mood::Tired) {
        challenges.push("Low energy could slow the first few weeks".to_string());
    }
    if stats.total < MIN_CHECKINS_FOR_CONFIDENCE {
        challenges.push("I only have a few check-ins to go on, so treat this as a rough sketch".to_string());
    }

    Simulation {
        scenario: scenario.trim().to_string(),
        area,
        likelihood,
        outcome: describe_outcome(likelihood),
        strengths,
        challenges,
        advice: area.advice().to_string(),
    }
}

fn describe_outcome(likelihood: u8) -> String {
    match likelihood {
        76.. => format!("There is a strong likelihood ({likelihood}%) this works out well for you."),
        51..=75 => format!("There is a moderate likelihood ({likelihood}%) this works out well for you."),
        26..=50 => format!("There is some uncertainty, with a {likelihood}% chance of success."),
        _ => format!("This looks hard right now, with only a {likelihood}% chance of success."),
    }
}

impl Simulation {
    pub fn render(&self) -> String {
        let mut out = format!(
            "Simulation ({}): {}\n\n{}\n",
            self.area.label(),
            self.scenario,
            self.outcome
        );
        if !self.strengths.is_empty() {
            out.push_str("\nStrengths:\n");
            for s in &self.strengths {
                let _ = writeln!(out, "- {s}");
            }
        }
        if !self.challenges.is_empty() {
            out.push_str("\nChallenges:\n");
            for c in &self.challenges {
                let _ = writeln!(out, "- {c}");
            }
        }
        let _ = write!(out, "\nAdvice: {}", self.advice);
        out
    }
}
