//! Custom protocol extensions between interlis-ls and its editor client.
//!
//! The client side owns the actual surfaces (output log, webview panels);
//! these notifications carry the content and lifecycle decisions.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::Url;
use tower_lsp::lsp_types::notification::Notification;

use crate::panel::Modality;

/// Server -> client: open or refresh a diagram panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowPanelParams {
    pub id: u64,
    pub modality: Modality,
    pub title: String,
    pub html: String,
    /// True when the client should refresh the existing surface (bringing it
    /// to the front without stealing focus) instead of opening a new one.
    pub reuse: bool,
}

pub enum ShowPanel {}

impl Notification for ShowPanel {
    type Params = ShowPanelParams;
    const METHOD: &'static str = "interlis/showPanel";
}

/// Server -> client: replace the compiler log surface content. The client
/// clears the log, appends `text`, and foregrounds the surface when
/// `reveal` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerLogParams {
    pub text: String,
    pub reveal: bool,
}

pub enum CompilerLog {}

impl Notification for CompilerLog {
    type Params = CompilerLogParams;
    const METHOD: &'static str = "interlis/compilerLog";
}

/// Client -> server: the user closed a panel surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelClosedParams {
    pub id: u64,
}

pub const PANEL_CLOSED_METHOD: &str = "interlis/panelClosed";

/// Client -> server: editor focus moved to another document (or none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDocumentParams {
    pub uri: Option<Url>,
}

pub const ACTIVE_DOCUMENT_METHOD: &str = "interlis/didChangeActiveDocument";
