//! Text extraction from various file formats

use crate::error::{AtsError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AtsError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown))
    }
}

/// Flatten markdown to plain text, one line per heading, paragraph or list item.
///
/// Headings stay on their own line so section detection still finds them.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_) | Tag::TableRow) => {
                text.push('\n')
            }
            Event::End(Tag::TableCell) => text.push(' '),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text_keeps_headings_on_own_lines() {
        let text = markdown_to_text("# Jane Roe\n\n## Skills\n\n- **Rust**\n- `SQL`\n\nBuilt things\nat scale.\n");

        assert_eq!(text, "Jane Roe\nSkills\nRust\nSQL\nBuilt things at scale.");
    }
}
