//! # Mood
//!
//! The twin's coarse emotional state and the classifier that derives it
//! from free text.
//!
//! The classifier is an ordered list of `(Mood, keywords)` rules. Text is
//! lowercased once, rules are scanned in order and the first rule with a
//! keyword occurring anywhere in the text wins, so "sadness" reads as sad.
//! No match yields the caller's default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::keywords;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    #[default]
    Neutral,
    Excited,
    Relaxed,
    Anxious,
    Tired,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Neutral,
        Mood::Excited,
        Mood::Relaxed,
        Mood::Anxious,
        Mood::Tired,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Neutral => "neutral",
            Mood::Excited => "excited",
            Mood::Relaxed => "relaxed",
            Mood::Anxious => "anxious",
            Mood::Tired => "tired",
        }
    }

    /// +1 for pleasant moods, -1 for unpleasant ones, 0 otherwise.
    pub fn valence(self) -> i8 {
        match self {
            Mood::Happy | Mood::Excited | Mood::Relaxed => 1,
            Mood::Sad | Mood::Angry | Mood::Anxious => -1,
            Mood::Neutral | Mood::Tired => 0,
        }
    }

    /// Face shown next to the twin's name.
    pub fn face(self) -> &'static str {
        match self {
            Mood::Happy => "(^_^)",
            Mood::Sad => "(;_;)",
            Mood::Angry => "(>_<)",
            Mood::Neutral => "(-_-)",
            Mood::Excited => "(*o*)",
            Mood::Relaxed => "(~_~)",
            Mood::Anxious => "(°_°)",
            Mood::Tired => "(=_=)",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood: {}", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.label() == wanted)
            .ok_or(UnknownMood(s.to_string()))
    }
}

/// One keyword set mapped to exactly one mood.
#[derive(Debug, Clone)]
pub struct MoodRule {
    pub mood: Mood,
    pub keywords: Vec<&'static str>,
}

impl MoodRule {
    pub fn new(mood: Mood, keywords: &[&'static str]) -> Self {
        Self {
            mood,
            keywords: keywords.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoodClassifier {
    rules: Vec<MoodRule>,
}

impl Default for MoodClassifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl MoodClassifier {
    pub fn new(rules: Vec<MoodRule>) -> Self {
        Self { rules }
    }

    /// Classifies `text`, returning `default` when no rule matches.
    pub fn classify(&self, text: &str, default: Mood) -> Mood {
        self.detect(text).unwrap_or(default)
    }

    /// The mood of the first matching rule, if any.
    pub fn detect(&self, text: &str) -> Option<Mood> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| keywords::contains_any(&lower, &rule.keywords))
            .map(|rule| rule.mood)
    }
}

/// Priority order matters: "excited" beats "happy" only if listed first.
/// Keywords match inside words, so sad comes before happy ("unhappy") and
/// short keywords that hide in common words ("mad" in "made") are phrases.
pub fn default_rules() -> Vec<MoodRule> {
    vec![
        MoodRule::new(
            Mood::Sad,
            &["sad", "feeling down", "depressed", "unhappy", "lonely", "crying", "miserable"],
        ),
        MoodRule::new(
            Mood::Happy,
            &["happy", "great", "awesome", "wonderful", "glad", "joy", "good day"],
        ),
        MoodRule::new(
            Mood::Angry,
            &["angry", "mad at", "so mad", "furious", "annoyed", "frustrated", "frustrating", "i hate"],
        ),
        MoodRule::new(
            Mood::Excited,
            &["excited", "thrilled", "can't wait", "pumped", "amazing"],
        ),
        MoodRule::new(
            Mood::Relaxed,
            &["relaxed", "calm", "peaceful", "chill", "well rested"],
        ),
        MoodRule::new(
            Mood::Anxious,
            &["anxious", "anxiety", "worried", "nervous", "stress", "afraid", "scared"],
        ),
        MoodRule::new(
            Mood::Tired,
            &["tired", "exhausted", "sleepy", "drained", "worn out"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_classify {
        ( $($name:ident: $input:expr => $expected:expr,)+ ) => {
            $(
                #[test]
                fn $name() {
                    let classifier = MoodClassifier::default();
                    assert_eq!(classifier.classify($input, Mood::Neutral), $expected);
                }
            )+
        };
    }

    test_classify! {
        test_classify_happy: "I'm so happy today" => Mood::Happy,
        test_classify_sad: "feeling lonely lately" => Mood::Sad,
        test_classify_angry: "I'm FURIOUS about this" => Mood::Angry,
        test_classify_excited: "I can't wait for the weekend" => Mood::Excited,
        test_classify_relaxed: "such a calm evening" => Mood::Relaxed,
        test_classify_anxious: "worried about the exam" => Mood::Anxious,
        test_classify_tired: "completely worn out" => Mood::Tired,
        test_classify_no_match: "the sky is blue" => Mood::Neutral,
        test_classify_inside_longer_word: "such sadness today" => Mood::Sad,
        test_classify_joyful: "a joyful morning" => Mood::Happy,
        test_classify_stressful: "feeling stressful" => Mood::Anxious,
        test_classify_stretched_word: "sooo tiredddd" => Mood::Tired,
        test_classify_unhappy_is_sad: "so unhappy lately" => Mood::Sad,
        test_classify_made_is_not_mad: "I made dinner" => Mood::Neutral,
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let classifier = MoodClassifier::default();
        // Both happy and tired keywords; happy is listed first
        assert_eq!(
            classifier.classify("happy but tired", Mood::Neutral),
            Mood::Happy
        );
    }

    #[test]
    fn test_no_match_returns_caller_default() {
        let classifier = MoodClassifier::default();
        assert_eq!(classifier.classify("hello", Mood::Excited), Mood::Excited);
    }

    #[test]
    fn test_custom_rule_order() {
        let classifier = MoodClassifier::new(vec![
            MoodRule::new(Mood::Tired, &["tired"]),
            MoodRule::new(Mood::Happy, &["happy"]),
        ]);
        assert_eq!(classifier.classify("happy but tired", Mood::Neutral), Mood::Tired);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = MoodClassifier::default();
        let inputs = ["", "so stressed", "great news!", "meh"];
        for input in inputs {
            let first = classifier.classify(input, Mood::Neutral);
            for _ in 0..5 {
                assert_eq!(classifier.classify(input, Mood::Neutral), first);
            }
            assert!(Mood::ALL.contains(&first));
        }
    }

    #[test]
    fn test_default_mood_is_neutral() {
        assert_eq!(Mood::default(), Mood::Neutral);
    }

    #[test]
    fn test_valence() {
        assert_eq!(Mood::Happy.valence(), 1);
        assert_eq!(Mood::Anxious.valence(), -1);
        assert_eq!(Mood::Tired.valence(), 0);
    }

    #[test]
    fn test_parse_mood() {
        assert_eq!("Happy".parse::<Mood>(), Ok(Mood::Happy));
        assert_eq!(" tired ".parse::<Mood>(), Ok(Mood::Tired));
        assert!("ecstatic".parse::<Mood>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Mood::Anxious).unwrap();
        assert_eq!(json, "\"anxious\"");
        let mood: Mood = serde_json::from_str("\"relaxed\"").unwrap();
        assert_eq!(mood, Mood::Relaxed);
    }
}
