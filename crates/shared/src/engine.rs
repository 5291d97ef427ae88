use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AmplifyError, Result};
use crate::formats::{self, posts_schema};
use crate::gemini::{GenerationRequest, LanguageModel};
use crate::models::{Generation, InputKind, PostSet};
use crate::prompts::{thesis_prompt, PostPrompt, EM_DASH_CORRECTION};
use crate::validator::{has_critical_issues, validate_all};

const THESIS_TEMPERATURE: f32 = 0.7;
const THESIS_MAX_TOKENS: u32 = 100;
const POSTS_TEMPERATURE: f32 = 0.8;
const POSTS_MAX_TOKENS: u32 = 4000;

/// Turns content into a thesis, and a thesis into ten posts.
pub struct PostGenerator<M> {
    model: M,
    max_retries: u32,
}

impl<M: LanguageModel> PostGenerator<M> {
    pub fn new(model: M, config: &Config) -> Self {
        Self::with_max_retries(model, config.max_retries)
    }

    pub fn with_max_retries(model: M, max_retries: u32) -> Self {
        Self { model, max_retries }
    }

    #[cfg(test)]
    fn model(&self) -> &M {
        &self.model
    }

    /// Step 1: distill the content into a single-sentence thesis.
    pub async fn extract_thesis(&self, content: &str) -> Result<String> {
        if content.trim().is_empty() {
            return Err(AmplifyError::Generation(
                "No content to extract a thesis from".to_string(),
            ));
        }

        let request =
            GenerationRequest::text(thesis_prompt(content), THESIS_TEMPERATURE, THESIS_MAX_TOKENS);
        let thesis = self.model.generate(&request).await?.trim().to_string();

        if thesis.is_empty() {
            return Err(AmplifyError::Generation(
                "Model returned an empty thesis".to_string(),
            ));
        }

        info!("Extracted thesis: {}", thesis);
        Ok(thesis)
    }

    /// Step 2: expand the thesis into every registered format.
    ///
    /// Em dashes trigger a fresh attempt with a corrective instruction, up to
    /// `max_retries` times. Other validation issues are tolerated. After the last
    /// attempt the locally cleaned posts are returned.
    pub async fn generate_all_formats(&self, thesis: &str) -> Result<PostSet> {
        let mut prompt = PostPrompt::new(thesis);
        let mut previous: Option<PostSet> = None;
        let mut attempt = 0;

        loop {
            let mut posts = match self.attempt(&prompt).await {
                Ok(posts) => posts,
                Err(e) => match previous {
                    Some(posts) => {
                        warn!(
                            "Attempt {} failed ({}), keeping posts from the previous attempt",
                            attempt + 1,
                            e
                        );
                        return Ok(finalize(posts));
                    }
                    None => return Err(e),
                },
            };

            let validations = validate_all(&posts);
            for (key, result) in &validations {
                if let Some(cleaned) = &result.cleaned_content {
                    posts.insert(key.clone(), cleaned.clone());
                }
            }

            if !has_critical_issues(&validations) || attempt == self.max_retries {
                info!("Generated {} posts in {} attempt(s)", posts.len(), attempt + 1);
                return Ok(finalize(posts));
            }

            debug!("Attempt {} contained em dashes, retrying", attempt + 1);
            prompt = prompt.with_correction(EM_DASH_CORRECTION);
            previous = Some(posts);
            attempt += 1;
        }
    }

    /// Full pipeline: thesis, then posts.
    pub async fn generate_content(
        &self,
        raw_input: &str,
        kind: InputKind,
        content: &str,
    ) -> Result<Generation> {
        debug!(
            "Generating from {} input ({} chars raw, {} chars content)",
            kind.as_str(),
            raw_input.chars().count(),
            content.chars().count()
        );

        let thesis = self.extract_thesis(content).await?;
        let posts = self.generate_all_formats(&thesis).await?;

        let generation = Generation { thesis, posts };
        let missing = generation.missing_formats();
        if !missing.is_empty() {
            warn!("Model omitted formats: {}", missing.join(", "));
        }

        Ok(generation)
    }

    async fn attempt(&self, prompt: &PostPrompt) -> Result<PostSet> {
        let request = GenerationRequest::structured(
            prompt.render(),
            POSTS_TEMPERATURE,
            POSTS_MAX_TOKENS,
            posts_schema(),
        );
        let raw = self.model.generate(&request).await?;
        parse_posts(&raw)
    }
}

/// Parse the model's JSON object, falling back to the first balanced `{...}` block.
pub fn parse_posts(raw: &str) -> Result<PostSet> {
    let parsed: BTreeMap<String, String> = match serde_json::from_str(raw) {
        Ok(map) => map,
        Err(direct) => {
            let block = first_json_object(raw).ok_or_else(|| {
                AmplifyError::Parse(format!("no JSON object in response ({})", direct))
            })?;
            serde_json::from_str(block).map_err(|e| AmplifyError::Parse(e.to_string()))?
        }
    };

    Ok(parsed
        .into_iter()
        .filter(|(key, _)| {
            let known = formats::is_known(key);
            if !known {
                debug!("Dropping unknown format '{}'", key);
            }
            known
        })
        .collect())
}

/// First balanced `{...}` block in `text`, ignoring braces inside JSON strings.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Turn literal `\n` sequences the model sometimes emits into real line breaks.
fn finalize(mut posts: PostSet) -> PostSet {
    for text in posts.values_mut() {
        *text = text.replace("\\n", "\n");
    }
    posts
}
