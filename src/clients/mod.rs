pub mod gemini;
pub mod jira;

pub use gemini::GeminiClient;
pub use jira::JiraClient;

use crate::error::Result;

/// Modelo generativo: recibe un prompt y devuelve texto
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}
