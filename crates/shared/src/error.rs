use thiserror::Error;

pub type Result<T> = std::result::Result<T, AmplifyError>;

#[derive(Debug, Error)]
pub enum AmplifyError {
    /// A required setting (usually the API key) is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The URL could not be fetched: network failure, timeout or non-success status.
    #[error("Failed to fetch URL: {0}")]
    Fetch(String),

    /// The model's structured output was not JSON, even after recovery.
    #[error("Generation failed: could not parse model response: {0}")]
    Parse(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl AmplifyError {
    /// Remediation hint shown next to the error message, if there is one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AmplifyError::Config(_) => Some(
                "Set GEMINI_API_KEY in your environment or in ~/.config/x-amplify/.env. \
                Get a key from https://aistudio.google.com/app/apikey",
            ),
            AmplifyError::Fetch(_) => {
                Some("Check the URL, or paste the article text directly instead.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_has_hint() {
        let err = AmplifyError::Config("GEMINI_API_KEY not found".to_string());
        assert!(err.hint().unwrap().contains("GEMINI_API_KEY"));
        assert_eq!(
            err.to_string(),
            "Configuration error: GEMINI_API_KEY not found"
        );
    }

    #[test]
    fn test_parse_error_reads_as_generation_failure() {
        let err = AmplifyError::Parse("no JSON object found".to_string());
        assert!(err.to_string().starts_with("Generation failed"));
        assert!(err.hint().is_none());
    }
}
