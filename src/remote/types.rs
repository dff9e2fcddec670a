//! Common types for the remote service boundary

use serde::Deserialize;

/// One of the three remote actions this server can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Compile,
    PrettyPrint,
    RenderDiagram,
}

impl Operation {
    /// Short name used in log records.
    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::Compile => "compile",
            Operation::PrettyPrint => "pretty-print",
            Operation::RenderDiagram => "render-diagram",
        }
    }

    /// Prefix for user-facing failure notifications.
    pub fn error_label(&self) -> &'static str {
        match self {
            Operation::Compile => "Compilation",
            Operation::PrettyPrint => "Pretty-print",
            Operation::RenderDiagram => "Diagram render",
        }
    }
}

/// Which diagram rendering the UML endpoint is asked for. Doubles as the
/// `vendor` field of the request and as the response dispatch branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    /// Raster image bytes, shown in a static image panel.
    #[default]
    Png,
    /// Mermaid diagram text, shown in an interactive panel.
    Mermaid,
}

impl DiagramFormat {
    /// Wire value sent as the `vendor` form field.
    pub fn vendor(&self) -> &'static str {
        match self {
            DiagramFormat::Png => "png",
            DiagramFormat::Mermaid => "mermaid",
        }
    }
}

/// A completed HTTP exchange with the remote service. A non-2xx status is
/// still a `ServiceResponse`; only transport failures surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response body decoded as text, for log and diagnostic payloads.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
