use clap::Parser;

use interlis_ls::lsp::server::run_server;

/// Language server bridging INTERLIS documents to a remote ili2c service.
#[derive(Parser)]
#[command(name = "interlis-ls", version, about)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    run_server().await
}
