use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::models::PostSet;

pub const EM_DASH: char = '\u{2014}';
pub const EM_DASH_ISSUE: &str = "Em dash detected";
pub const WALL_OF_TEXT_ISSUE: &str = "Wall of text detected (missing line breaks)";

/// Posts longer than this (in characters) need at least one line break.
pub const WALL_OF_TEXT_THRESHOLD: usize = 200;

/// Forbidden patterns and the issue each one reports. Matching is case-insensitive.
pub const FORBIDDEN_PATTERNS: &[(&str, &str)] = &[
    ("\u{2014}", EM_DASH_ISSUE),
    (r"\bdelve\b", r#"AI phrase "delve" detected"#),
    (r"\bgame-?changer\b", r#"AI phrase "game-changer" detected"#),
    (r"in today['’]?s world", r#"AI phrase "In today's world" detected"#),
    (r"here['’]?s the thing", r#"AI phrase "Here's the thing" detected"#),
    (r"\bleveraging\b", r#"AI phrase "leveraging" detected"#),
    (r"\bunlock\b", r#"AI phrase "unlock" detected"#),
    (r"\btransformative\b", r#"AI phrase "transformative" detected"#),
];

static COMPILED_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    FORBIDDEN_PATTERNS
        .iter()
        .map(|(pattern, label)| {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap();
            (re, *label)
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<String>,
    /// Auto-fixed text, present only when the fix changed something.
    pub cleaned_content: Option<String>,
}

impl ValidationResult {
    pub fn has_critical_issue(&self) -> bool {
        self.issues.iter().any(|issue| issue == EM_DASH_ISSUE)
    }
}

/// Check a single post against the forbidden pattern table.
pub fn validate(content: &str) -> ValidationResult {
    let mut issues = Vec::new();
    let mut cleaned = None;

    for (re, label) in COMPILED_PATTERNS.iter() {
        if !re.is_match(content) {
            continue;
        }
        issues.push(label.to_string());

        if *label == EM_DASH_ISSUE {
            cleaned = Some(content.replace(EM_DASH, "."));
        }
    }

    if content.chars().count() > WALL_OF_TEXT_THRESHOLD && !content.contains('\n') {
        issues.push(WALL_OF_TEXT_ISSUE.to_string());
    }

    ValidationResult {
        is_valid: issues.is_empty(),
        issues,
        cleaned_content: cleaned.filter(|c| c != content),
    }
}

pub fn validate_all(posts: &PostSet) -> BTreeMap<String, ValidationResult> {
    posts
        .iter()
        .map(|(key, content)| (key.clone(), validate(content)))
        .collect()
}

/// True if any post still contains an em dash. This alone decides whether to regenerate.
pub fn has_critical_issues(results: &BTreeMap<String, ValidationResult>) -> bool {
    results.values().any(ValidationResult::has_critical_issue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts(entries: &[(&str, &str)]) -> PostSet {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_em_dash_is_reported_and_cleaned() {
        let result = validate("a\u{2014}b");
        assert!(!result.is_valid);
        assert_eq!(result.issues, vec![EM_DASH_ISSUE.to_string()]);
        assert_eq!(result.cleaned_content.as_deref(), Some("a.b"));
    }

    #[test]
    fn test_every_em_dash_is_replaced() {
        let result = validate("one\u{2014}two\u{2014}three");
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.cleaned_content.as_deref(), Some("one.two.three"));
    }

    #[test]
    fn test_normal_short_sentence_is_valid() {
        let result = validate("normal short sentence");
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
        assert!(result.cleaned_content.is_none());
    }

    #[test]
    fn test_wall_of_text() {
        let content = "x".repeat(300);
        let result = validate(&content);
        assert!(!result.is_valid);
        assert_eq!(result.issues, vec![WALL_OF_TEXT_ISSUE.to_string()]);
        assert!(result.cleaned_content.is_none());
    }

    #[test]
    fn test_long_text_with_line_break_is_not_a_wall() {
        let content = format!("{}\n{}", "x".repeat(150), "y".repeat(150));
        assert!(validate(&content).is_valid);
    }

    #[test]
    fn test_wall_threshold_counts_characters() {
        // 200 multi-byte characters are over 200 bytes but not over the limit
        let content = "é".repeat(200);
        assert!(validate(&content).is_valid);
    }

    #[test]
    fn test_phrases_are_case_insensitive() {
        let result = validate("Let's DELVE into it. Here's The Thing.");
        assert_eq!(
            result.issues,
            vec![
                r#"AI phrase "delve" detected"#.to_string(),
                r#"AI phrase "Here's the thing" detected"#.to_string(),
            ]
        );
        assert!(result.cleaned_content.is_none());
    }

    #[test]
    fn test_each_pattern_reported_once() {
        let result = validate("unlock, unlock, unlock");
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_word_boundaries() {
        assert!(validate("unlocked doors").is_valid);
        assert!(validate("delves deeper").is_valid);
        assert!(!validate("a real gamechanger").is_valid);
        assert!(!validate("in todays world").is_valid);
    }

    #[test]
    fn test_every_table_entry_matches_its_example() {
        let samples = [
            "\u{2014}",
            "delve",
            "game-changer",
            "in today's world",
            "here's the thing",
            "leveraging",
            "unlock",
            "transformative",
        ];
        assert_eq!(samples.len(), FORBIDDEN_PATTERNS.len());
        for (sample, (_, label)) in samples.iter().zip(FORBIDDEN_PATTERNS) {
            assert_eq!(validate(sample).issues, vec![label.to_string()]);
        }
    }

    #[test]
    fn test_validate_all_preserves_keys() {
        let set = posts(&[("hook", "fine"), ("listicle", "so transformative")]);
        let results = validate_all(&set);
        assert_eq!(results.len(), 2);
        assert!(results["hook"].is_valid);
        assert!(!results["listicle"].is_valid);
    }

    #[test]
    fn test_has_critical_issues() {
        assert!(!has_critical_issues(&BTreeMap::new()));

        let clean = validate_all(&posts(&[("hook", "fine"), ("question", "why?")]));
        assert!(!has_critical_issues(&clean));

        let phrases_only = validate_all(&posts(&[("hook", "unlock it"), ("question", "delve")]));
        assert!(!has_critical_issues(&phrases_only));

        let dashed = validate_all(&posts(&[("hook", "fine"), ("question", "a\u{2014}b")]));
        assert!(has_critical_issues(&dashed));
    }
}
