//! Plain-text extraction from indexed documents (txt, PDF, DOCX).

use std::io::Read;
use std::path::Path;

use crate::error::{DlpError, Result};

/// Maximum decompressed bytes read from `word/document.xml` (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Text extraction collaborator.
pub trait TextExtractor: Send + Sync {
    /// Extract text from a file. Unsupported formats yield an empty string.
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Extension-dispatching extractor for `.txt`, `.pdf` and `.docx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => std::fs::read_to_string(path).map_err(|e| extraction_error(path, e)),
            "pdf" => {
                let bytes = std::fs::read(path).map_err(|e| extraction_error(path, e))?;
                pdf_extract::extract_text_from_mem(&bytes).map_err(|e| extraction_error(path, e))
            }
            "docx" => {
                let bytes = std::fs::read(path).map_err(|e| extraction_error(path, e))?;
                extract_docx(&bytes).map_err(|reason| DlpError::Extraction {
                    path: path.to_path_buf(),
                    reason,
                })
            }
            _ => Ok(String::new()),
        }
    }
}

fn extraction_error(path: &Path, e: impl std::fmt::Display) -> DlpError {
    DlpError::Extraction {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn extract_docx(bytes: &[u8]) -> std::result::Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("word/document.xml: {e}"))?;
    let mut xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| e.to_string())?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err("word/document.xml exceeds size limit".to_string());
    }
    paragraphs_text(&xml)
}

/// Concatenate `w:t` runs, one line per `w:p` paragraph.
fn paragraphs_text(xml: &[u8]) -> std::result::Result<String, String> {
    use quick_xml::events::Event;

    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(te)) if in_text => {
                out.push_str(te.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

/// Short preview of a file's text, or the extraction error.
pub fn preview(extractor: &dyn TextExtractor, path: &Path, max_chars: usize) -> String {
    match extractor.extract(path) {
        Ok(text) => {
            let mut chars = text.chars();
            let head: String = chars.by_ref().take(max_chars).collect();
            if chars.next().is_some() {
                format!("{head}...")
            } else {
                head
            }
        }
        Err(e) => format!("Error: {e}"),
    }
}
