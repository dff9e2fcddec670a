use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error, info, warn};

use crate::config::{self, RevealLog, Settings};
use crate::lsp::protocol::{
    ActiveDocumentParams, CompilerLog, CompilerLogParams, PanelClosedParams, ShowPanel,
    ShowPanelParams,
};
use crate::panel::generation::{GenerationCounter, SharedGate};
use crate::panel::{Modality, PanelDirective, SharedPanels};
use crate::remote::client::ServiceClient;
use crate::remote::payload::SourcePayload;
use crate::remote::types::Operation;
use crate::render::html;
use crate::render::interpret::{Outcome, interpret};

pub const COMMAND_COMPILE: &str = "interlis.compile";
pub const COMMAND_PRETTY_PRINT: &str = "interlis.prettyPrint";
pub const COMMAND_RENDER_DIAGRAM: &str = "interlis.renderDiagram";

pub struct Backend {
    client: Client,
    service: ServiceClient,
    settings: Mutex<Settings>,
    documents: Mutex<HashMap<Url, String>>,
    active: Mutex<Option<Url>>,
    panels: SharedPanels,
    generations: GenerationCounter,
    log_gate: SharedGate,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            service: ServiceClient::new(),
            settings: Mutex::new(Settings::default()),
            documents: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            panels: SharedPanels::new(),
            generations: GenerationCounter::default(),
            log_gate: SharedGate::default(),
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                },
            )),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![
                    COMMAND_COMPILE.to_string(),
                    COMMAND_PRETTY_PRINT.to_string(),
                    COMMAND_RENDER_DIAGRAM.to_string(),
                ],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Client -> server notification handler for `interlis/panelClosed`.
    pub async fn panel_closed(&self, params: PanelClosedParams) {
        debug!(id = params.id, "panel closed by the user");
        self.panels.on_closed(params.id).await;
    }

    /// Client -> server notification handler for
    /// `interlis/didChangeActiveDocument`.
    pub async fn active_document_changed(&self, params: ActiveDocumentParams) {
        *self.active.lock().unwrap() = params.uri;
    }

    fn active_document(&self) -> Option<(Url, String)> {
        let uri = self.active.lock().unwrap().clone()?;
        let text = self.documents.lock().unwrap().get(&uri).cloned()?;
        Some((uri, text))
    }

    /// Runs one operation against the active document: gate, encode, post,
    /// interpret, apply. Every failure ends in a user notification here;
    /// nothing propagates to the dispatcher.
    async fn invoke(&self, operation: Operation) {
        let Some((uri, text)) = self.active_document() else {
            self.client
                .show_message(MessageType::ERROR, "No active editor found.")
                .await;
            return;
        };

        if !config::is_interlis_path(uri.path()) {
            debug!(uri = %uri, "skipping non-INTERLIS document");
            return;
        }

        let settings = self.settings.lock().unwrap().clone();
        let generation = self.generations.next();

        let payload = SourcePayload::from_document(&uri, &text);
        info!(
            operation = operation.display_name(),
            file = payload.file_name(),
            generation,
            "invoking remote operation"
        );

        let form = match operation {
            Operation::RenderDiagram => payload.into_diagram_form(settings.diagram_format),
            _ => payload.into_form(),
        };

        match self.service.post(settings.endpoint(operation), form).await {
            Ok(response) => {
                let outcome = interpret(operation, settings.diagram_format, &response);
                self.apply(operation, &settings, generation, &uri, outcome)
                    .await;
            }
            Err(e) => {
                error!(operation = operation.display_name(), error = %e, "remote exchange failed");
                self.client
                    .show_message(
                        MessageType::ERROR,
                        format!("{} error: {}", operation.error_label(), e),
                    )
                    .await;
            }
        }
    }

    async fn apply(
        &self,
        operation: Operation,
        settings: &Settings,
        generation: u64,
        uri: &Url,
        outcome: Outcome,
    ) {
        match outcome {
            Outcome::CompileLog { text, succeeded } => {
                let reveal = !succeeded || settings.reveal_log == RevealLog::Always;
                let applied = self
                    .log_gate
                    .apply(generation, || async move {
                        self.client
                            .send_notification::<CompilerLog>(CompilerLogParams { text, reveal })
                            .await;
                    })
                    .await;
                if !applied {
                    debug!(generation, "dropping stale compile log");
                    return;
                }

                if succeeded {
                    self.client
                        .show_message(MessageType::INFO, "Compilation successful!")
                        .await;
                } else {
                    self.client
                        .show_message(
                            MessageType::ERROR,
                            "Compilation failed. Check the INTERLIS compiler log.",
                        )
                        .await;
                }
            }
            Outcome::ReplaceSource { text } => match self.replace_document(uri, text).await {
                Ok(true) => {
                    self.client
                        .show_message(MessageType::INFO, "Pretty-print successful!")
                        .await;
                }
                Ok(false) => warn!(uri = %uri, "client rejected the pretty-print edit"),
                Err(e) => {
                    error!(uri = %uri, error = %e, "failed to apply pretty-print edit");
                    self.client
                        .show_message(MessageType::ERROR, format!("Pretty-print error: {e}"))
                        .await;
                }
            },
            Outcome::RasterDiagram { bytes } => {
                let path = config::diagram_path();
                let applied = self
                    .panels
                    .apply(Modality::RasterImage, generation, |directive| async move {
                        if let Err(e) = persist_diagram(&path, &bytes).await {
                            warn!(error = %e, path = %path.display(), "failed to write diagram image file");
                            self.client
                                .show_message(
                                    MessageType::WARNING,
                                    format!(
                                        "Could not save the diagram image to {}: {}",
                                        path.display(),
                                        e
                                    ),
                                )
                                .await;
                        }
                        self.send_panel(directive, Modality::RasterImage, html::raster_page(&bytes))
                            .await;
                    })
                    .await;
                if !applied {
                    debug!(generation, "dropping stale raster diagram");
                }
            }
            Outcome::DiagramSource { text } => {
                let applied = self
                    .panels
                    .apply(
                        Modality::InteractiveDiagram,
                        generation,
                        |directive| async move {
                            self.send_panel(
                                directive,
                                Modality::InteractiveDiagram,
                                html::mermaid_page(&text),
                            )
                            .await;
                        },
                    )
                    .await;
                if !applied {
                    debug!(generation, "dropping stale diagram source");
                }
            }
            Outcome::RemoteFailure { status, detail } => {
                self.client
                    .show_message(
                        MessageType::ERROR,
                        format!("{} failed ({}): {}", operation.error_label(), status, detail),
                    )
                    .await;
            }
        }
    }

    async fn send_panel(&self, directive: PanelDirective, modality: Modality, html: String) {
        let reuse = matches!(directive, PanelDirective::Update { .. });
        self.client
            .send_notification::<ShowPanel>(ShowPanelParams {
                id: directive.id(),
                modality,
                title: modality.title().to_string(),
                html,
                reuse,
            })
            .await;
    }

    /// Replaces the whole buffer with `text` via `workspace/applyEdit`.
    /// Returns whether the client applied the edit.
    async fn replace_document(&self, uri: &Url, text: String) -> anyhow::Result<bool> {
        let current = self
            .documents
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("document is no longer open"))?;

        let edit = TextEdit {
            range: full_range(&current),
            new_text: text,
        };
        let changes = HashMap::from([(uri.clone(), vec![edit])]);

        let response = self.client.apply_edit(WorkspaceEdit::new(changes)).await?;
        Ok(response.applied)
    }
}

/// Range spanning the whole document, end position in UTF-16 code units as
/// the protocol requires.
fn full_range(text: &str) -> Range {
    let mut line = 0u32;
    let mut character = 0u32;
    for c in text.chars() {
        if c == '\n' {
            line += 1;
            character = 0;
        } else {
            character += c.len_utf16() as u32;
        }
    }
    Range::new(Position::new(0, 0), Position::new(line, character))
}

async fn persist_diagram(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "interlis-ls initializing")
            .await;
        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "interlis-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "interlis-ls initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "interlis-ls shutting down")
            .await;
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let section = params
            .settings
            .get("interlis-ls")
            .unwrap_or(&params.settings);

        match serde_json::from_value::<Settings>(section.clone()) {
            Ok(settings) => {
                info!(?settings, "configuration updated");
                *self.settings.lock().unwrap() = settings;
            }
            Err(e) => warn!(error = %e, "ignoring malformed configuration"),
        }
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(uri = %uri, "document opened");

        self.documents
            .lock()
            .unwrap()
            .insert(uri.clone(), params.text_document.text);
        // Opening a document focuses it until the client reports otherwise.
        *self.active.lock().unwrap() = Some(uri);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // Full sync: the last change carries the complete buffer.
        let Some(change) = params.content_changes.into_iter().next_back() else {
            return;
        };
        self.documents
            .lock()
            .unwrap()
            .insert(params.text_document.uri, change.text);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.lock().unwrap().remove(&uri);

        let mut active = self.active.lock().unwrap();
        if active.as_ref() == Some(&uri) {
            *active = None;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let is_active = self.active.lock().unwrap().as_ref() == Some(&uri);
        if !is_active {
            debug!(uri = %uri, "ignoring save of unfocused document");
            return;
        }
        self.invoke(Operation::Compile).await;
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        let operation = match params.command.as_str() {
            COMMAND_COMPILE => Operation::Compile,
            COMMAND_PRETTY_PRINT => Operation::PrettyPrint,
            COMMAND_RENDER_DIAGRAM => Operation::RenderDiagram,
            other => {
                warn!(command = other, "unknown command");
                return Ok(None);
            }
        };

        self.invoke(operation).await;
        Ok(None)
    }
}
