//! Word source backed by poppler's `pdftotext`.

use crate::parser::parse_bbox_xml;
use slidetree_core::{Error, PageWords, Result, WordSource};
use std::path::Path;
use std::process::Command;

/// Reads word boxes with `pdftotext -bbox`.
#[derive(Debug, Clone)]
pub struct PdftotextSource {
    /// Program to run.
    binary: String,
}

impl PdftotextSource {
    pub fn new() -> Self {
        Self {
            binary: "pdftotext".to_string(),
        }
    }

    /// Use a specific `pdftotext` executable.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Check if the executable can be run.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSource for PdftotextSource {
    fn load(&self, path: &Path) -> Result<Vec<PageWords>> {
        let output = Command::new(&self.binary)
            .arg("-bbox")
            .arg(path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ToolNotFound(self.binary.clone())
                } else {
                    Error::ExtractionError(format!("{} failed to start: {}", self.binary, e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::ToolFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_bbox_xml(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}
