//! The counseling question table.
//!
//! Every question the counselor asks, in the order it asks them. The stepper
//! walks this table front to back; the edit sub-mode jumps back into it by
//! index. Keys match the feature names the prediction ensemble was trained
//! on, so a completed answer map feeds the predictor directly.

use serde::{Deserialize, Serialize};

/// The three collection phases of a counseling conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Personality,
    Aptitude,
    WorkStyle,
}

impl Phase {
    /// Message emitted when the conversation crosses into this phase.
    pub fn intro(&self) -> &'static str {
        match self {
            Phase::Personality => {
                "Let's start with a few questions about how you approach the world."
            }
            Phase::Aptitude => {
                "Great, that covers personality. Next, let's look at your aptitudes."
            }
            Phase::WorkStyle => {
                "Almost done! A final few questions about how you like to work."
            }
        }
    }
}

/// One row of the question table.
pub struct FieldSpec {
    /// Feature key, as used by the ensemble and stored in survey responses.
    pub key: &'static str,
    /// Human-readable name, used in edit options and report tables.
    pub label: &'static str,
    pub phase: Phase,
    pub prompt: &'static str,
}

/// Fixed question ordering: 5 personality traits, 5 aptitudes, 3 work-style
/// preferences. All answers are scores from 1 to 10.
pub const FIELD_ORDER: &[FieldSpec] = &[
    FieldSpec {
        key: "O_score",
        label: "Openness",
        phase: Phase::Personality,
        prompt: "On a scale of 1 to 10, how much do you enjoy exploring new ideas, art, or unfamiliar experiences?",
    },
    FieldSpec {
        key: "C_score",
        label: "Conscientiousness",
        phase: Phase::Personality,
        prompt: "From 1 to 10, how organized and planful are you in your day-to-day life?",
    },
    FieldSpec {
        key: "E_score",
        label: "Extraversion",
        phase: Phase::Personality,
        prompt: "From 1 to 10, how energized do you feel when spending time with groups of people?",
    },
    FieldSpec {
        key: "A_score",
        label: "Agreeableness",
        phase: Phase::Personality,
        prompt: "From 1 to 10, how much do you prioritize cooperation and keeping harmony with others?",
    },
    FieldSpec {
        key: "N_score",
        label: "Emotional sensitivity",
        phase: Phase::Personality,
        prompt: "From 1 to 10, how strongly do stressful situations tend to affect you?",
    },
    FieldSpec {
        key: "Numerical_Aptitude",
        label: "Numerical aptitude",
        phase: Phase::Aptitude,
        prompt: "From 1 to 10, how comfortable are you working with numbers, data, and calculations?",
    },
    FieldSpec {
        key: "Verbal_Aptitude",
        label: "Verbal aptitude",
        phase: Phase::Aptitude,
        prompt: "From 1 to 10, how strong are your reading, writing, and verbal communication skills?",
    },
    FieldSpec {
        key: "Abstract_Reasoning",
        label: "Abstract reasoning",
        phase: Phase::Aptitude,
        prompt: "From 1 to 10, how good are you at spotting patterns and solving puzzles with no obvious rules?",
    },
    FieldSpec {
        key: "Logical_Reasoning",
        label: "Logical reasoning",
        phase: Phase::Aptitude,
        prompt: "From 1 to 10, how confident are you following a chain of logic to its conclusion?",
    },
    FieldSpec {
        key: "Spatial_Aptitude",
        label: "Spatial aptitude",
        phase: Phase::Aptitude,
        prompt: "From 1 to 10, how easily can you visualize and mentally rotate shapes or spaces?",
    },
    FieldSpec {
        key: "Enjoy_Teamwork",
        label: "Teamwork",
        phase: Phase::WorkStyle,
        prompt: "From 1 to 10, how much do you enjoy working as part of a team?",
    },
    FieldSpec {
        key: "Creative_Thinking",
        label: "Creative thinking",
        phase: Phase::WorkStyle,
        prompt: "From 1 to 10, how often do you look for creative or unconventional solutions?",
    },
    FieldSpec {
        key: "Attention_to_Detail",
        label: "Attention to detail",
        phase: Phase::WorkStyle,
        prompt: "And finally, from 1 to 10, how much attention do you pay to small details?",
    },
];

/// Looks up a field's position in the ordering by key or label
/// (case-insensitive).
pub fn field_index(name: &str) -> Option<usize> {
    let needle = name.trim().to_lowercase();
    FIELD_ORDER
        .iter()
        .position(|f| f.key.to_lowercase() == needle || f.label.to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_count_matches_feature_vector() {
        assert_eq!(FIELD_ORDER.len(), 13);
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = FIELD_ORDER.iter().map(|f| f.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), FIELD_ORDER.len());
    }

    #[test]
    fn test_phases_are_contiguous() {
        // Personality, then aptitude, then work style — no interleaving.
        let phases: Vec<_> = FIELD_ORDER.iter().map(|f| f.phase).collect();
        let mut seen = vec![phases[0]];
        for p in &phases[1..] {
            if *p != *seen.last().unwrap() {
                assert!(!seen.contains(p), "phase {:?} appears twice", p);
                seen.push(*p);
            }
        }
        assert_eq!(
            seen,
            vec![Phase::Personality, Phase::Aptitude, Phase::WorkStyle]
        );
    }

    #[test]
    fn test_field_index_by_key_and_label() {
        assert_eq!(field_index("O_score"), Some(0));
        assert_eq!(field_index("openness"), Some(0));
        assert_eq!(field_index("Attention_to_Detail"), Some(12));
        assert_eq!(field_index("  teamwork "), Some(10));
        assert_eq!(field_index("no_such_field"), None);
    }
}
