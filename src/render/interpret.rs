//! Response interpretation.
//!
//! A closed set of strategies selected by operation and diagram format.
//! Interpretation is pure: the caller applies the resulting outcome to the
//! editor surfaces.

use crate::remote::types::{DiagramFormat, Operation, ServiceResponse};

/// What a completed exchange means for the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Compiler log text for the log surface; produced for both success and
    /// failure, the body being the diagnostic record either way.
    CompileLog { text: String, succeeded: bool },
    /// Formatted source that replaces the whole buffer.
    ReplaceSource { text: String },
    /// Raster image bytes for the static image panel.
    RasterDiagram { bytes: Vec<u8> },
    /// Mermaid diagram text for the interactive panel.
    DiagramSource { text: String },
    /// Remote-side failure; status text and diagnostic body for the user.
    RemoteFailure { status: String, detail: String },
}

pub fn interpret(
    operation: Operation,
    format: DiagramFormat,
    response: &ServiceResponse,
) -> Outcome {
    match operation {
        Operation::Compile => Outcome::CompileLog {
            text: response.body_text(),
            succeeded: response.is_success(),
        },
        Operation::PrettyPrint => {
            if response.is_success() {
                Outcome::ReplaceSource {
                    text: response.body_text(),
                }
            } else {
                failure(response)
            }
        }
        Operation::RenderDiagram => {
            if !response.is_success() {
                return failure(response);
            }
            match format {
                DiagramFormat::Png => Outcome::RasterDiagram {
                    bytes: response.body.clone(),
                },
                DiagramFormat::Mermaid => Outcome::DiagramSource {
                    text: response.body_text(),
                },
            }
        }
    }
}

fn failure(response: &ServiceResponse) -> Outcome {
    Outcome::RemoteFailure {
        status: response.status_text.clone(),
        detail: response.body_text(),
    }
}
