//! Text extraction from document payloads

use crate::error::{Result, TalentMatchError};
use anyhow::Context;
use regex::Regex;
use std::borrow::Cow;
use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // The PDF parser panics on some malformed inputs instead of erroring.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

        let text = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(TalentMatchError::PdfExtraction(e.to_string())),
            Err(payload) => {
                return Err(TalentMatchError::PdfExtraction(format!(
                    "parser panicked: {}",
                    panic_message(payload.as_ref())
                )))
            }
        };

        // Page breaks come through as form feeds
        let pages: Vec<&str> = text.split('\u{c}').map(|page| page.trim_end()).collect();
        Ok(pages.join("\n"))
    }
}

pub struct DocxExtractor {
    paragraph_regex: Regex,
    run_regex: Regex,
    entity_regex: Regex,
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxExtractor {
    pub fn new() -> Self {
        let paragraph_regex = Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>(.*?)</w:p>")
            .expect("Invalid paragraph regex");
        let run_regex = Regex::new(r"(?s)<w:t(?:\s[^>]*)?>([^<]*)</w:t>|(<w:tab\s*/>)|<w:(?:br|cr)(?:\s[^>]*)?/>")
            .expect("Invalid run regex");
        let entity_regex = Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);")
            .expect("Invalid entity regex");

        Self {
            paragraph_regex,
            run_regex,
            entity_regex,
        }
    }

    fn read_document_xml(bytes: &[u8]) -> anyhow::Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("not a DOCX (zip) container")?;
        let mut entry = archive
            .by_name("word/document.xml")
            .context("word/document.xml missing from archive")?;

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .context("word/document.xml is not valid UTF-8")?;
        Ok(xml)
    }

    fn paragraph_text(&self, paragraph_xml: &str) -> String {
        let mut text = String::new();
        for run in self.run_regex.captures_iter(paragraph_xml) {
            if let Some(content) = run.get(1) {
                text.push_str(&self.unescape(content.as_str()));
            } else if run.get(2).is_some() {
                text.push('\t');
            } else {
                text.push('\n');
            }
        }
        text
    }

    /// Decode the predefined XML entities and numeric character references
    /// in one pass; unknown or invalid references are left as written.
    fn unescape(&self, text: &str) -> String {
        self.entity_regex
            .replace_all(text, |caps: &regex::Captures| {
                let entity = &caps[1];
                let decoded = match entity {
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "amp" => Some('&'),
                    _ => {
                        let reference = &entity[1..];
                        let code = match reference.strip_prefix(&['x', 'X'][..]) {
                            Some(hex) => u32::from_str_radix(hex, 16).ok(),
                            None => reference.parse::<u32>().ok(),
                        };
                        code.and_then(char::from_u32)
                    }
                };
                match decoded {
                    Some(c) => c.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let xml = Self::read_document_xml(bytes)
            .map_err(|e| TalentMatchError::DocxExtraction(format!("{:#}", e)))?;

        let paragraphs: Vec<String> = self
            .paragraph_regex
            .captures_iter(&xml)
            .map(|paragraph| {
                paragraph
                    .get(1)
                    .map(|body| self.paragraph_text(body.as_str()))
                    .unwrap_or_default()
            })
            .collect();

        Ok(paragraphs.join("\n"))
    }
}

/// Best-effort UTF-8 decoding; invalid byte sequences are dropped.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = match String::from_utf8_lossy(bytes) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => text.replace(char::REPLACEMENT_CHARACTER, ""),
        };
        Ok(text)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs() {
        let bytes = docx_with_body(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Jane </w:t></w:r><w:r><w:t xml:space="preserve">Roe</w:t></w:r></w:p><w:p/><w:p w:rsidR="00AB"><w:r><w:t>Python &amp; Django</w:t></w:r></w:p>"#,
        );
        let text = DocxExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text, "Jane Roe\n\nPython & Django");
    }

    #[test]
    fn test_docx_tabs() {
        let bytes = docx_with_body(r#"<w:p><w:r><w:t>Skills:</w:t><w:tab/><w:t>Rust</w:t></w:r></w:p>"#);
        let text = DocxExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text, "Skills:\tRust");
    }

    #[test]
    fn test_docx_line_breaks() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Jane Roe</w:t><w:br/><w:t>Berlin</w:t><w:br w:type="textWrapping"/><w:t>Rust</w:t></w:r></w:p>"#,
        );
        let text = DocxExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text, "Jane Roe\nBerlin\nRust");
    }

    #[test]
    fn test_docx_character_references() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>O&#8217;Neil &#x2013; R&amp;D, &lt;lead&gt; &#39;ops&#39; &amp;#169; &#xZZ;</w:t></w:r></w:p>"#,
        );
        let text = DocxExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text, "O\u{2019}Neil \u{2013} R&D, <lead> 'ops' &#169; &#xZZ;");
    }

    #[test]
    fn test_docx_rejects_non_zip() {
        let result = DocxExtractor::new().extract(b"definitely not a zip");
        assert!(matches!(result, Err(TalentMatchError::DocxExtraction(_))));
    }

    #[test]
    fn test_pdf_rejects_garbage() {
        let result = PdfExtractor.extract(b"%PDF-1.4\n%%garbage without xref\n");
        assert!(matches!(result, Err(TalentMatchError::PdfExtraction(_))));
    }

    #[test]
    fn test_plain_text_drops_invalid_bytes() {
        let text = PlainTextExtractor.extract(b"Rust \xff\xfedeveloper").unwrap();
        assert_eq!(text, "Rust developer");
    }
}
