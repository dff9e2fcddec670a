use tower_lsp::{LspService, Server};
use tracing::info;

use crate::log::init;
use crate::lsp::backend::Backend;
use crate::lsp::protocol::{ACTIVE_DOCUMENT_METHOD, PANEL_CLOSED_METHOD};

pub async fn run_server() -> anyhow::Result<()> {
    let log_path = init()?;

    info!(log = %log_path.display(), "Starting interlis-ls server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(Backend::new)
        .custom_method(PANEL_CLOSED_METHOD, Backend::panel_closed)
        .custom_method(ACTIVE_DOCUMENT_METHOD, Backend::active_document_changed)
        .finish();
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("interlis-ls server stopped");
    Ok(())
}
