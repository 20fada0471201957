//! Text extraction for supported document formats.
//!
//! Every converter produces the same flat title/author/text triple; the rest
//! of the reader never sees the source format.

use crate::error::IngestError;
use epub::doc::EpubDoc;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

/// Output of a format converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: String,
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    PlainText,
    Markdown,
    Epub,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "txt" | "text" => Ok(SourceFormat::PlainText),
            "md" | "markdown" => Ok(SourceFormat::Markdown),
            "epub" => Ok(SourceFormat::Epub),
            _ => Err(IngestError::UnsupportedFormat { extension }),
        }
    }
}

/// Extract title, author and plain text from the document at `path`.
pub fn extract(path: &Path) -> Result<ExtractedText, IngestError> {
    let format = SourceFormat::from_path(path)?;
    info!(path = %path.display(), ?format, "Extracting document text");
    let extracted = match format {
        SourceFormat::PlainText => extract_plain_text(path)?,
        SourceFormat::Markdown => extract_markdown(path)?,
        SourceFormat::Epub => extract_epub(path)?,
    };
    let extracted = ExtractedText {
        title: normalize(&extracted.title),
        author: normalize(&extracted.author),
        text: normalize(&extracted.text),
    };
    info!(
        title = %extracted.title,
        total_chars = extracted.text.len(),
        "Finished extracting document text"
    );
    Ok(extracted)
}

/// Canonical composition so repeated extractions tokenize identically.
fn normalize(value: &str) -> String {
    value.nfc().collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Untitled")
        .to_string()
}

fn read_text(path: &Path) -> Result<String, IngestError> {
    fs::read_to_string(path).map_err(|source| IngestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

fn extract_plain_text(path: &Path) -> Result<ExtractedText, IngestError> {
    Ok(ExtractedText {
        title: file_stem(path),
        author: String::new(),
        text: read_text(path)?,
    })
}

fn extract_markdown(path: &Path) -> Result<ExtractedText, IngestError> {
    let raw = read_text(path)?;
    let title = markdown_title(&raw).unwrap_or_else(|| file_stem(path));
    let text = match convert_with_pandoc(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                path = %path.display(),
                "Pandoc markdown conversion failed, falling back to raw markdown: {err}"
            );
            raw
        }
    };
    Ok(ExtractedText {
        title,
        author: String::new(),
        text,
    })
}

fn markdown_title(raw: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

fn convert_with_pandoc(path: &Path) -> anyhow::Result<String> {
    let output = Command::new("pandoc")
        .arg(path)
        .arg("--to")
        .arg("plain")
        .arg("--wrap=none")
        .arg("--strip-comments")
        .arg("--eol=lf")
        .output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("pandoc exited with {}: {}", output.status, stderr.trim());
    }
    Ok(String::from_utf8(output.stdout)?)
}

fn extract_epub(path: &Path) -> Result<ExtractedText, IngestError> {
    let mut doc = EpubDoc::new(path).map_err(|err| IngestError::Malformed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    let title = metadata_or_stem(doc.mdata("title").map(|item| item.value.clone()), path);
    let author = metadata_or_empty(doc.mdata("creator").map(|item| item.value.clone()));

    let mut combined = String::new();
    let mut chapters = 0usize;
    loop {
        if let Some((chapter, _mime)) = doc.get_current_str() {
            chapters += 1;
            if !combined.is_empty() {
                combined.push_str("\n\n");
            }
            // Wide wrap width so no hard line breaks are baked in.
            let plain = match html2text::from_read(chapter.as_bytes(), 10_000) {
                Ok(clean) => clean,
                Err(err) => {
                    warn!(chapter = chapters, "html2text failed: {err}");
                    chapter
                }
            };
            debug!(chapter = chapters, added_chars = plain.len(), "Parsed chapter");
            combined.push_str(&plain);
        }
        if !doc.go_next() {
            break;
        }
    }

    Ok(ExtractedText {
        title,
        author,
        text: combined,
    })
}

fn metadata_or_empty(value: Option<String>) -> String {
    value
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn metadata_or_stem(value: Option<String>, path: &Path) -> String {
    let value = metadata_or_empty(value);
    if value.is_empty() {
        file_stem(path)
    } else {
        value
    }
}
