use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Extensions sent as plain text; everything else goes as base64.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "json", "js", "ts", "tsx", "py", "md", "csv", "html", "css", "txt",
];

/// Upper bound on a single attachment.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Text,
    Base64,
}

/// A local file inlined into a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub mime: String,
    pub content: String,
    pub encoding: Encoding,
}

impl Attachment {
    /// Read `path` and inline it. Text extensions are read as UTF-8,
    /// other files are base64 encoded.
    pub fn load(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path)?;
        if !meta.is_file() {
            return Err(ClientError::Attachment(format!("{} is not a file", path.display())));
        }
        if meta.len() > MAX_ATTACHMENT_BYTES {
            return Err(ClientError::Attachment(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                meta.len(),
                MAX_ATTACHMENT_BYTES
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = fs::read(path)?;
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn from_bytes(name: String, bytes: Vec<u8>) -> Self {
        let mime = mime_for(&name).to_string();
        if is_text_name(&name) {
            match String::from_utf8(bytes) {
                Ok(content) => {
                    return Self { name, mime, content, encoding: Encoding::Text };
                }
                Err(e) => {
                    tracing::debug!(name = %name, "text attachment is not UTF-8, sending base64");
                    let content = STANDARD.encode(e.into_bytes());
                    return Self { name, mime, content, encoding: Encoding::Base64 };
                }
            }
        }
        let content = STANDARD.encode(bytes);
        Self { name, mime, content, encoding: Encoding::Base64 }
    }

    /// The line appended to the user's transcript entry.
    pub fn transcript_line(&self) -> String {
        match self.encoding {
            Encoding::Text => format!("[Attached file: {}]\n{}", self.name, self.content),
            Encoding::Base64 => format!(
                "[Attached file: {} ({}, base64, {} chars)]",
                self.name,
                self.mime,
                self.content.len()
            ),
        }
    }
}

pub fn is_text_name(name: &str) -> bool {
    extension(name)
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Best-effort MIME type from the file name.
pub fn mime_for(name: &str) -> &'static str {
    match extension(name).as_deref() {
        Some("json") => "application/json",
        Some("js") => "text/javascript",
        Some("ts") | Some("tsx") => "text/typescript",
        Some("py") => "text/x-python",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        Some("wav") => "audio/wav",
        Some("webm") => "audio/webm",
        Some("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    }
}
