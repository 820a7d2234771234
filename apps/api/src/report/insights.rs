//! Report content rules: score interpretations, proficiency levels, strength
//! rankings, and work-style text used by the PDF renderer.

use std::collections::HashMap;

use crate::prediction::ensemble::NEUTRAL_MIDPOINT;

/// Display names used when ranking a user's strengths in the report.
const STRENGTH_NAMES: &[(&str, &str)] = &[
    ("C_score", "Organization & Detail-Oriented"),
    ("O_score", "Openness to Innovation"),
    ("E_score", "Social & Communication Skills"),
    ("A_score", "Team Collaboration"),
    ("N_score", "Stress Resilience"),
    ("Numerical_Aptitude", "Analytical Thinking"),
    ("Verbal_Aptitude", "Communication Excellence"),
    ("Abstract_Reasoning", "Problem-Solving"),
    ("Logical_Reasoning", "Logical Analysis"),
    ("Spatial_Aptitude", "Spatial Intelligence"),
    ("Enjoy_Teamwork", "Collaborative Spirit"),
    ("Creative_Thinking", "Creative Innovation"),
    ("Attention_to_Detail", "Precision Focus"),
];

/// Interpretation text for a personality trait score.
/// Thresholds: ≤ 4 low, ≤ 7 medium, else high.
pub fn trait_interpretation(trait_key: &str, score: Option<f64>) -> &'static str {
    let Some(score) = score else {
        return "Not assessed";
    };
    let level = if score <= 4.0 {
        0
    } else if score <= 7.0 {
        1
    } else {
        2
    };

    let texts: [&str; 3] = match trait_key {
        "C_score" => [
            "Flexible and adaptable approach",
            "Balanced organization skills",
            "Highly structured and systematic",
        ],
        "O_score" => [
            "Prefer routine and consistency",
            "Open to new experiences",
            "Highly innovative and curious",
        ],
        "E_score" => [
            "Reflective and reserved",
            "Socially balanced",
            "Outgoing and energetic",
        ],
        "A_score" => [
            "Independent and direct",
            "Cooperative and considerate",
            "Highly empathetic and supportive",
        ],
        "N_score" => [
            "Emotionally resilient",
            "Generally stable",
            "Sensitive and emotionally aware",
        ],
        _ => return "Average",
    };
    texts[level]
}

/// Proficiency level for an aptitude score.
/// Thresholds: ≤ 3 Basic, ≤ 6 Intermediate, ≤ 8 Advanced, else Expert.
pub fn aptitude_level(score: Option<f64>) -> &'static str {
    let Some(score) = score else {
        return "Not assessed";
    };
    if score <= 3.0 {
        "Basic"
    } else if score <= 6.0 {
        "Intermediate"
    } else if score <= 8.0 {
        "Advanced"
    } else {
        "Expert"
    }
}

/// The user's top strengths: answered fields ranked by score, mapped to
/// display names, highest first. Ties break on field name for determinism.
pub fn top_strengths(scores: &HashMap<String, f64>, limit: usize) -> Vec<&'static str> {
    let mut ranked: Vec<(&str, &str, f64)> = STRENGTH_NAMES
        .iter()
        .filter_map(|(key, name)| scores.get(*key).map(|s| (*key, *name, *s)))
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(b.0)));
    ranked.into_iter().take(limit).map(|(_, name, _)| name).collect()
}

/// Dominant work-style preference, from the work-style answers.
pub fn work_style_preference(scores: &HashMap<String, f64>) -> &'static str {
    let get = |key: &str| scores.get(key).copied().unwrap_or(NEUTRAL_MIDPOINT);

    if get("Enjoy_Teamwork") >= 8.0 {
        "collaborative team environments"
    } else if get("Creative_Thinking") >= 8.0 {
        "innovative and creative work"
    } else if get("Attention_to_Detail") >= 8.0 {
        "detailed and precise tasks"
    } else {
        "balanced and varied work"
    }
}

/// Preferred work environment, from extraversion and openness.
pub fn environment_preference(scores: &HashMap<String, f64>) -> &'static str {
    let get = |key: &str| scores.get(key).copied().unwrap_or(NEUTRAL_MIDPOINT);
    let extraversion = get("E_score");
    let openness = get("O_score");

    if extraversion >= 7.0 && openness >= 7.0 {
        "dynamic, social, and innovative settings"
    } else if extraversion >= 7.0 {
        "social and interactive environments"
    } else if openness >= 7.0 {
        "creative and changing circumstances"
    } else {
        "stable and predictable settings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_trait_interpretation_thresholds() {
        assert_eq!(
            trait_interpretation("O_score", Some(4.0)),
            "Prefer routine and consistency"
        );
        assert_eq!(
            trait_interpretation("O_score", Some(7.0)),
            "Open to new experiences"
        );
        assert_eq!(
            trait_interpretation("O_score", Some(7.1)),
            "Highly innovative and curious"
        );
    }

    #[test]
    fn test_trait_interpretation_unassessed_and_unknown() {
        assert_eq!(trait_interpretation("O_score", None), "Not assessed");
        assert_eq!(trait_interpretation("X_score", Some(9.0)), "Average");
    }

    #[test]
    fn test_aptitude_level_bands() {
        assert_eq!(aptitude_level(Some(3.0)), "Basic");
        assert_eq!(aptitude_level(Some(6.0)), "Intermediate");
        assert_eq!(aptitude_level(Some(8.0)), "Advanced");
        assert_eq!(aptitude_level(Some(8.5)), "Expert");
        assert_eq!(aptitude_level(None), "Not assessed");
    }

    #[test]
    fn test_top_strengths_ranked_and_limited() {
        let s = scores(&[
            ("O_score", 9.0),
            ("C_score", 3.0),
            ("Numerical_Aptitude", 8.0),
            ("Verbal_Aptitude", 7.0),
        ]);
        let strengths = top_strengths(&s, 3);
        assert_eq!(
            strengths,
            vec![
                "Openness to Innovation",
                "Analytical Thinking",
                "Communication Excellence"
            ]
        );
    }

    #[test]
    fn test_top_strengths_empty_scores() {
        assert!(top_strengths(&HashMap::new(), 5).is_empty());
    }

    #[test]
    fn test_work_style_priority_order() {
        // Teamwork wins even when creativity is also high.
        let s = scores(&[("Enjoy_Teamwork", 9.0), ("Creative_Thinking", 9.0)]);
        assert_eq!(work_style_preference(&s), "collaborative team environments");

        let s = scores(&[("Creative_Thinking", 8.0)]);
        assert_eq!(work_style_preference(&s), "innovative and creative work");

        assert_eq!(
            work_style_preference(&HashMap::new()),
            "balanced and varied work"
        );
    }

    #[test]
    fn test_environment_preference_branches() {
        let s = scores(&[("E_score", 8.0), ("O_score", 8.0)]);
        assert_eq!(
            environment_preference(&s),
            "dynamic, social, and innovative settings"
        );

        let s = scores(&[("E_score", 8.0)]);
        assert_eq!(
            environment_preference(&s),
            "social and interactive environments"
        );

        let s = scores(&[("O_score", 8.0)]);
        assert_eq!(
            environment_preference(&s),
            "creative and changing circumstances"
        );

        assert_eq!(
            environment_preference(&HashMap::new()),
            "stable and predictable settings"
        );
    }
}
