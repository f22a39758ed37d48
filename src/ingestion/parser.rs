//! Per-format text extraction

use crate::error::{Error, Result};
use crate::types::FileFormat;

/// Extracted text plus the structural metadata the format exposes
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Source file name
    pub filename: String,
    /// Resolved format
    pub format: FileFormat,
    /// Full textual content
    pub content: String,
    /// Total pages, when the format counts them
    pub page_count: Option<u32>,
}

/// Multi-format extraction dispatcher
pub struct FileParser;

impl FileParser {
    /// Extract text from raw file bytes, dispatching by extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<ExtractedDocument> {
        let extension = filename
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_lowercase();

        let format = FileFormat::from_extension(&extension)
            .ok_or_else(|| Error::UnsupportedType(format!(".{}", extension)))?;

        let (content, page_count) = match format {
            FileFormat::Pdf => Self::extract_pdf(filename, data)?,
            FileFormat::Text => (Self::extract_text(filename, data)?, None),
            FileFormat::Docx => (Self::extract_docx(filename, data)?, None),
            FileFormat::Markdown => (Self::extract_markdown(filename, data)?, None),
        };

        if content.trim().is_empty() {
            return Err(Error::extraction(filename, "no text content extracted"));
        }

        Ok(ExtractedDocument {
            filename: filename.to_string(),
            format,
            content,
            page_count,
        })
    }

    /// Extract PDF text and count pages
    fn extract_pdf(filename: &str, data: &[u8]) -> Result<(String, Option<u32>)> {
        let raw = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        // Collapse the extractor's uneven whitespace and drop null bytes
        let content = raw
            .replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let page_count = match lopdf::Document::load_mem(data) {
            Ok(doc) => Some(doc.get_pages().len() as u32),
            Err(_) => None,
        };

        Ok((content, page_count))
    }

    /// Extract plain text
    fn extract_text(filename: &str, data: &[u8]) -> Result<String> {
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::extraction(filename, format!("invalid UTF-8: {}", e)))
    }

    /// Extract DOCX text by walking paragraph runs
    fn extract_docx(filename: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(content)
    }

    /// Extract markdown as plain text, stripping the markup
    fn extract_markdown(filename: &str, data: &[u8]) -> Result<String> {
        use pulldown_cmark::{Event, Parser, TagEnd};

        let raw = Self::extract_text(filename, data)?;
        let mut content = String::new();

        for event in Parser::new(&raw) {
            match event {
                Event::Text(text) => content.push_str(&text),
                Event::Code(code) => content.push_str(&code),
                Event::SoftBreak => content.push(' '),
                Event::HardBreak => content.push('\n'),
                Event::End(end) => match end {
                    TagEnd::Paragraph | TagEnd::Item | TagEnd::CodeBlock => content.push('\n'),
                    TagEnd::Heading(_) => content.push('\n'),
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(content)
    }
}
