//! Knowledge preamble placed ahead of every model invocation.
//!
//! The text is opaque to the rest of the crate: it is loaded once, then
//! passed verbatim as the system-level message.

use std::path::Path;
use std::sync::Arc;

const BUILTIN_KNOWLEDGE: &str = include_str!("../../../prompts/store_knowledge.md");

/// Fixed persona/knowledge text for the support assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgePreamble(Arc<str>);

impl KnowledgePreamble {
    /// Wraps arbitrary preamble text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(Arc::from(text.into().trim()))
    }

    /// The preamble compiled into the binary.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_KNOWLEDGE)
    }

    /// Reads the preamble from a file, e.g. a deployment-specific knowledge base.
    pub async fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self::new(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KnowledgePreamble {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_preamble_is_not_empty() {
        let preamble = KnowledgePreamble::builtin();
        assert!(!preamble.as_str().is_empty());
        assert!(preamble.as_str().starts_with("You are"));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let preamble = KnowledgePreamble::new("\n  Be kind.  \n");
        assert_eq!(preamble.as_str(), "Be kind.");
    }

    #[tokio::test]
    async fn from_file_reads_contents() {
        let path = std::env::temp_dir().join(format!("knowledge-{}.md", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "Only answer about teapots.").await.unwrap();

        let preamble = KnowledgePreamble::from_file(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(preamble.as_str(), "Only answer about teapots.");
    }

    #[tokio::test]
    async fn from_file_reports_missing_file() {
        let result = KnowledgePreamble::from_file("/definitely/not/here.md").await;
        assert!(result.is_err());
    }
}
