use std::path::PathBuf;

use serde::Deserialize;

use crate::remote::types::{DiagramFormat, Operation};

/// File extension all triggers gate on.
pub const SOURCE_EXTENSION: &str = ".ili";

/// Placeholder file name when the document URI has no final path segment.
pub const DEFAULT_FILE_NAME: &str = "model.ili";

pub const DEFAULT_COMPILE_URL: &str = "https://ili2.sogeo.services/api/compile";
pub const DEFAULT_PRETTY_PRINT_URL: &str = "https://ili2.sogeo.services/api/prettyprint";
pub const DEFAULT_DIAGRAM_URL: &str = "https://ili2.sogeo.services/api/uml";

/// When the compiler log surface is brought to the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealLog {
    /// Foreground the log after every compile.
    Always,
    /// Foreground the log only when the compile failed.
    #[default]
    OnFailure,
}

/// Client-supplied settings, received via `workspace/didChangeConfiguration`.
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub compile_url: String,
    pub pretty_print_url: String,
    pub diagram_url: String,
    pub diagram_format: DiagramFormat,
    pub reveal_log: RevealLog,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compile_url: DEFAULT_COMPILE_URL.to_string(),
            pretty_print_url: DEFAULT_PRETTY_PRINT_URL.to_string(),
            diagram_url: DEFAULT_DIAGRAM_URL.to_string(),
            diagram_format: DiagramFormat::default(),
            reveal_log: RevealLog::default(),
        }
    }
}

impl Settings {
    /// Endpoint URL for an operation.
    pub fn endpoint(&self, operation: Operation) -> &str {
        match operation {
            Operation::Compile => &self.compile_url,
            Operation::PrettyPrint => &self.pretty_print_url,
            Operation::RenderDiagram => &self.diagram_url,
        }
    }
}

/// Returns true when the document path ends in the INTERLIS source extension.
pub fn is_interlis_path(path: &str) -> bool {
    path.ends_with(SOURCE_EXTENSION)
}

/// Returns the path to the data directory for interlis-ls.
/// Uses $XDG_DATA_HOME/interlis-ls if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/interlis-ls,
/// or ./interlis-ls if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("interlis-ls.log")
}

/// Fixed path the latest rendered raster diagram is written to.
/// A second render overwrites the previous image.
pub fn diagram_path() -> PathBuf {
    std::env::temp_dir().join("interlis-diagram.png")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("interlis-ls")
}
