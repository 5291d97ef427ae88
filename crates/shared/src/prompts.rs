use crate::formats::FORMATS;

const THESIS_EXTRACTION_TEMPLATE: &str = r#"You are an expert content strategist. Read the content below and distill it into its Core Value Proposition: the single idea that matters most to the reader.

RULES:
1. Respond with exactly ONE sentence, under 20 words
2. Make it a claim someone could agree or disagree with, not a topic label
3. Use plain language, no jargon, no hashtags, no emojis
4. Do not use em dashes
5. Respond with the sentence only, no preamble and no quotation marks

Content:
{input_content}"#;

const POSTS_TEMPLATE: &str = r#"You are a ghostwriter for X (formerly Twitter). Write ten posts that each express the thesis below in a different format.

THESIS: {thesis}

FORMATS:
{formats}

RULES:
1. Every post must be 280 characters or fewer
2. Use line breaks generously; never write a wall of text
3. NEVER use em dashes. Use periods, commas or line breaks instead
4. Avoid AI-sounding phrases: "delve", "game-changer", "in today's world", "here's the thing", "leveraging", "unlock", "transformative"
5. No hashtags
6. Write like a person talking, not a brand

Respond with a JSON object containing one field per format key above."#;

/// Added to the prompt when a previous attempt contained em dashes.
pub const EM_DASH_CORRECTION: &str =
    "IMPORTANT: Previous attempt contained em dashes. DO NOT use \u{2014} anywhere.";

pub fn thesis_prompt(content: &str) -> String {
    THESIS_EXTRACTION_TEMPLATE.replace("{input_content}", content)
}

/// Post generation prompt: a fixed base plus correction fragments added by retries.
///
/// Each attempt renders a fresh prompt from the same parts, so any attempt can be
/// reproduced from the thesis and its list of corrections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPrompt {
    thesis: String,
    corrections: Vec<&'static str>,
}

impl PostPrompt {
    pub fn new(thesis: impl Into<String>) -> Self {
        Self {
            thesis: thesis.into(),
            corrections: Vec::new(),
        }
    }

    pub fn with_correction(mut self, fragment: &'static str) -> Self {
        self.corrections.push(fragment);
        self
    }

    pub fn render(&self) -> String {
        let formats = FORMATS
            .iter()
            .map(|f| format!("- {}: {}", f.key, f.guidance))
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = POSTS_TEMPLATE
            .replace("{formats}", &formats)
            .replace("{thesis}", &self.thesis);

        for fragment in &self.corrections {
            prompt.push_str("\n\n");
            prompt.push_str(fragment);
        }

        prompt
    }
}
