//! Multi-line doc string step arguments.

use std::fmt;

/// A Gherkin doc string attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocString {
    /// Optional media type annotation on the opening delimiter.
    pub content_type: Option<String>,
    /// The literal text between the delimiters.
    pub content: String,
}

impl DocString {
    /// Create a doc string with no content type.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content_type: None,
            content: content.into(),
        }
    }
}

impl fmt::Display for DocString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content_type = self.content_type.as_deref().unwrap_or("");
        write!(f, "\"\"\"{content_type}\n{}\n\"\"\"", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_delimiters_and_content() {
        let doc = DocString::new("payload");
        assert_eq!(doc.to_string(), "\"\"\"\npayload\n\"\"\"");
    }

    #[test]
    fn renders_content_type_on_opening_line() {
        let doc = DocString {
            content_type: Some("json".into()),
            content: "{}".into(),
        };
        assert_eq!(doc.to_string(), "\"\"\"json\n{}\n\"\"\"");
    }
}
