//! Multipart payload construction for the remote service.
//!
//! Buffer text is transmitted byte-for-byte as a single `file` part; the
//! UML endpoint additionally receives a `vendor` field selecting the
//! diagram format. No validation of the source content happens here.

use reqwest::multipart::{Form, Part};
use tower_lsp::lsp_types::Url;

use crate::config::DEFAULT_FILE_NAME;
use crate::remote::types::DiagramFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePayload {
    content: String,
    file_name: String,
}

impl SourcePayload {
    pub fn new(content: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_document(uri: &Url, content: &str) -> Self {
        Self::new(content, file_name_for(uri))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Form with the single `file` part, as the compile and pretty-print
    /// endpoints expect it.
    pub fn into_form(self) -> Form {
        Form::new().part("file", Part::text(self.content).file_name(self.file_name))
    }

    /// Form for the UML endpoint, with the extra `vendor` field.
    pub fn into_diagram_form(self, format: DiagramFormat) -> Form {
        self.into_form().text("vendor", format.vendor())
    }
}

/// Display file name for a document: the final path segment of its URI,
/// or a fixed placeholder when the URI yields none.
pub fn file_name_for(uri: &Url) -> String {
    uri.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
}
