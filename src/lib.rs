pub mod config;
pub mod log;
pub mod lsp;
pub mod panel;
pub mod remote;
pub mod render;
