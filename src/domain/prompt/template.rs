//! Prompt template parsing and rendering
//!
//! Templates are plain text with two literal placeholders, `{context}`
//! and `{query}`, both of which must be present.

use once_cell::sync::Lazy;
use thiserror::Error;

pub const CONTEXT_PLACEHOLDER: &str = "{context}";
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Built-in template used when no file-backed template is available.
static DEFAULT_TEMPLATE: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::parse(
        "You are a kind, playful Minecraft helper for kids.\n\
         You should sound like a friendly guide, not a computer or a teacher.\n\
         \n\
         MINECRAFT INFO:\n\
         {context}\n\
         \n\
         KID'S QUESTION:\n\
         {query}\n\
         \n\
         YOUR JOB:\n\
         - Speak like you're talking to a 10-year-old.\n\
         - Use simple, cheerful words and short sentences.\n\
         - Only use information from the Minecraft game.\n\
         - Show the crafting recipe in a fun text grid (3x3 if needed).\n\
         - Use bullet points for steps.\n\
         - Keep answers short, fun, and clear.\n\
         - If you don't know, say \"I don't know that yet!\"\n\
         \n\
         ANSWER:\n",
    )
    .expect("default template is valid")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required placeholder: {name}")]
    MissingPlaceholder { name: &'static str },
}

/// A validated prompt template.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    content: String,
}

impl PromptTemplate {
    /// Parse a template, verifying both placeholders are present.
    pub fn parse(content: impl Into<String>) -> Result<Self, TemplateError> {
        let content = content.into();

        for name in [CONTEXT_PLACEHOLDER, QUERY_PLACEHOLDER] {
            if !content.contains(name) {
                return Err(TemplateError::MissingPlaceholder { name });
            }
        }

        Ok(Self { content })
    }

    /// The built-in fallback template.
    pub fn fallback() -> Self {
        DEFAULT_TEMPLATE.clone()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Substitute the context and query into the template.
    pub fn render(&self, context: &str, query: &str) -> String {
        self.content
            .replace(CONTEXT_PLACEHOLDER, context)
            .replace(QUERY_PLACEHOLDER, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requires_both_placeholders() {
        assert!(PromptTemplate::parse("CONTEXT: {context}\nQ: {query}").is_ok());

        let err = PromptTemplate::parse("Q: {query}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholder {
                name: CONTEXT_PLACEHOLDER
            }
        );

        let err = PromptTemplate::parse("CONTEXT: {context}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholder {
                name: QUERY_PLACEHOLDER
            }
        );
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let template = PromptTemplate::parse("CONTEXT: {context}\nQ: {query}\nA:").unwrap();

        let prompt = template.render("sword facts", "how to craft a sword?");
        assert_eq!(prompt, "CONTEXT: sword facts\nQ: how to craft a sword?\nA:");
    }

    #[test]
    fn test_fallback_template_is_valid() {
        let template = PromptTemplate::fallback();
        let prompt = template.render("ctx", "q");
        assert!(prompt.contains("ctx"));
        assert!(prompt.contains("q"));
        assert!(!prompt.contains(CONTEXT_PLACEHOLDER));
    }
}
