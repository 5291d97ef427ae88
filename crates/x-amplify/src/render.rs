use shared::formats::{self, FORMATS};
use shared::models::POST_CHAR_LIMIT;
use shared::{Generation, LengthStatus, ValidationResult};

const CARD_WIDTH: usize = 60;

/// Character count badge, e.g. "✓ 143/280".
pub fn char_count_badge(content: &str) -> String {
    format!(
        "{} {}/{}",
        LengthStatus::of(content).symbol(),
        content.chars().count(),
        POST_CHAR_LIMIT
    )
}

pub fn thesis_box(thesis: &str) -> String {
    format!("THE CORE THESIS\n  \"{}\"\n", thesis)
}

pub fn post_card(key: &str, content: &str, validation: Option<&ValidationResult>) -> String {
    let title = formats::display_name(key);
    let badge = char_count_badge(content);
    let padding = CARD_WIDTH.saturating_sub(title.chars().count() + badge.chars().count());

    let mut card = format!("{}{}{}\n", title, " ".repeat(padding.max(1)), badge);
    card.push_str(&"─".repeat(CARD_WIDTH));
    card.push('\n');
    card.push_str(content);
    card.push('\n');

    if let Some(result) = validation {
        for issue in &result.issues {
            card.push_str(&format!("  ⚠ {}\n", issue));
        }
    }

    card
}

/// All cards in registry order. Formats the model left out are skipped.
pub fn post_cards(generation: &Generation) -> String {
    let validations = generation.validations();

    FORMATS
        .iter()
        .filter_map(|format| {
            generation
                .posts
                .get(format.key)
                .map(|content| post_card(format.key, content, validations.get(format.key)))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{validate, PostSet};

    #[test]
    fn test_badges() {
        assert_eq!(char_count_badge("hello"), "✓ 5/280");
        assert_eq!(char_count_badge(&"a".repeat(300)), "⚠ 300/280");
        assert_eq!(char_count_badge(&"a".repeat(351)), "✗ 351/280");
    }

    #[test]
    fn test_card_lists_issues() {
        let content = "Unlock your mornings.";
        let card = post_card("hook", content, Some(&validate(content)));
        assert!(card.starts_with("🎣 The Hook"));
        assert!(card.contains("✓ 21/280"));
        assert!(card.contains("  ⚠ AI phrase \"unlock\" detected\n"));
    }

    #[test]
    fn test_cards_follow_registry_order_and_skip_missing() {
        let posts: PostSet = [("question", "Why?"), ("hook", "Look.")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let generation = Generation {
            thesis: "t".to_string(),
            posts,
        };

        let cards = post_cards(&generation);
        let hook = cards.find("The Hook").unwrap();
        let question = cards.find("The Question").unwrap();
        assert!(hook < question);
        assert!(!cards.contains("The Listicle"));
    }
}
