// Public modules
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod gemini;
pub mod io;
pub mod models;
pub mod prompts;
pub mod validator;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use engine::PostGenerator;
pub use error::{AmplifyError, Result};
pub use extractor::ContentExtractor;
pub use formats::{PostFormat, FORMATS};
pub use gemini::{GeminiClient, GenerationRequest, LanguageModel};
pub use io::{export_posts, get_default_export_dir, load_posts};
pub use models::{Generation, InputKind, LengthStatus, PostSet};
pub use validator::{has_critical_issues, validate, validate_all, ValidationResult};
