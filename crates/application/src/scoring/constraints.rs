//! Checking predictions against natural-language formatting constraints.
//!
//! Three constraint shapes are recognized:
//!
//! - `Use exactly N bullet ...` - the prediction must contain exactly N bullet lines
//! - `Mention the keyword '<kw>' ...` - the prediction must contain `<kw>`
//! - `Avoid the word '<w>' ...` - the prediction must not contain `<w>` verbatim
//!
//! Anything else is unrecognized. Unrecognized constraints are never satisfied but still
//! count toward the adherence denominator.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Use exactly (\d+) bullet").expect("valid bullet count pattern"));

static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s+").expect("valid bullet line pattern"));

/// A single parsed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Exactly this many bullet lines
    BulletCount(usize),
    /// The keyword must appear verbatim
    MentionKeyword(String),
    /// The word must not appear verbatim
    AvoidWord(String),
    /// Text that matches none of the known shapes
    Unrecognized(String),
}

impl Constraint {
    pub fn parse(text: &str) -> Self {
        if text.starts_with("Use exactly") {
            return BULLET_COUNT
                .captures(text)
                .and_then(|caps| caps[1].parse::<usize>().ok())
                .map(Constraint::BulletCount)
                .unwrap_or_else(|| Constraint::Unrecognized(text.to_string()));
        }

        if text.starts_with("Mention the keyword") {
            return match quoted(text) {
                Some(keyword) => Constraint::MentionKeyword(keyword.to_string()),
                None => Constraint::Unrecognized(text.to_string()),
            };
        }

        if text.starts_with("Avoid the word") {
            return match quoted(text) {
                Some(word) => Constraint::AvoidWord(word.to_string()),
                None => Constraint::Unrecognized(text.to_string()),
            };
        }

        Constraint::Unrecognized(text.to_string())
    }

    pub fn is_satisfied_by(&self, prediction: &str) -> bool {
        match self {
            Constraint::BulletCount(expected) => bullet_count(prediction) == *expected,
            Constraint::MentionKeyword(keyword) => prediction.contains(keyword.as_str()),
            Constraint::AvoidWord(word) => !prediction.contains(word.as_str()),
            Constraint::Unrecognized(_) => false,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Constraint::Unrecognized(_))
    }
}

/// Text after the first single quote, up to the next one (or the end of the text).
fn quoted(text: &str) -> Option<&str> {
    text.split('\'').nth(1)
}

/// Number of lines that open with a `-` or `*` bullet marker.
pub fn bullet_count(prediction: &str) -> usize {
    BULLET_LINE.find_iter(prediction).count()
}

/// Fraction of constraints the prediction satisfies.
///
/// Returns 0.0 for an empty constraint list.
pub fn constraint_adherence<S: AsRef<str>>(prediction: &str, constraints: &[S]) -> f64 {
    if constraints.is_empty() {
        return 0.0;
    }

    let satisfied = constraints
        .iter()
        .map(|text| Constraint::parse(text.as_ref()))
        .filter(|constraint| constraint.is_satisfied_by(prediction))
        .count();

    satisfied as f64 / constraints.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_shapes() {
        assert_eq!(
            Constraint::parse("Use exactly 3 bullet points."),
            Constraint::BulletCount(3)
        );
        assert_eq!(
            Constraint::parse("Mention the keyword 'latency' at least once."),
            Constraint::MentionKeyword("latency".to_string())
        );
        assert_eq!(
            Constraint::parse("Avoid the word 'very'."),
            Constraint::AvoidWord("very".to_string())
        );
    }

    #[test]
    fn test_parse_falls_back_to_unrecognized() {
        assert!(!Constraint::parse("Write in French.").is_recognized());
        assert!(!Constraint::parse("Use exactly three bullet points.").is_recognized());
        assert!(!Constraint::parse("Mention the keyword latency").is_recognized());
    }

    #[test]
    fn test_bullet_count() {
        assert_eq!(bullet_count("- a\n- b\n* c"), 3);
        assert_eq!(bullet_count("  - indented\ntext - not a bullet"), 1);
        assert_eq!(bullet_count("-no space"), 0);
    }

    #[test]
    fn test_keyword_and_avoid_are_case_sensitive() {
        let mention = Constraint::MentionKeyword("Rust".to_string());
        assert!(mention.is_satisfied_by("I like Rust"));
        assert!(!mention.is_satisfied_by("I like rust"));

        let avoid = Constraint::AvoidWord("very".to_string());
        assert!(avoid.is_satisfied_by("quite good"));
        assert!(avoid.is_satisfied_by("VERY good"));
        assert!(!avoid.is_satisfied_by("very good"));
    }

    #[test]
    fn test_avoided_word_in_other_casing_is_allowed() {
        let score = constraint_adherence("Maybe later", &["Avoid the word 'maybe'."]);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_adherence_mixed() {
        let constraints = [
            "Use exactly 2 bullet points.",
            "Mention the keyword 'alpha'.",
            "Avoid the word 'beta'.",
        ];

        assert_eq!(constraint_adherence("- alpha\n- gamma", &constraints), 1.0);

        let score = constraint_adherence("- alpha\n- beta\n- gamma", &constraints);
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrecognized_counts_in_denominator() {
        let constraints = ["Mention the keyword 'alpha'.", "Rhyme every line."];
        assert_eq!(constraint_adherence("alpha", &constraints), 0.5);
    }

    #[test]
    fn test_empty_constraints() {
        assert_eq!(constraint_adherence::<&str>("anything", &[]), 0.0);
    }
}
