#![allow(dead_code)]

//! Shared harness for the e2e suites: jsonrpc request builders plus a
//! message collector that records everything the server sends and answers
//! server-initiated requests (workspace/applyEdit) so handlers can finish.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower_lsp::jsonrpc::{Request, Response};
use tower_lsp::{ClientSocket, LspService};

use interlis_ls::lsp::backend::Backend;
use interlis_ls::lsp::protocol::{ACTIVE_DOCUMENT_METHOD, PANEL_CLOSED_METHOD};

/// Builds the service exactly as `run_server` wires it, custom methods
/// included.
pub fn create_service() -> (LspService<Backend>, ClientSocket) {
    LspService::build(Backend::new)
        .custom_method(PANEL_CLOSED_METHOD, Backend::panel_closed)
        .custom_method(ACTIVE_DOCUMENT_METHOD, Backend::active_document_changed)
        .finish()
}

pub fn initialize_request(id: i64) -> Request {
    Request::build("initialize")
        .id(id)
        .params(json!({ "capabilities": {} }))
        .finish()
}

pub fn initialized_notification() -> Request {
    Request::build("initialized").params(json!({})).finish()
}

pub fn did_open_notification(uri: &str, text: &str) -> Request {
    Request::build("textDocument/didOpen")
        .params(json!({
            "textDocument": {
                "uri": uri,
                "languageId": "interlis",
                "version": 1,
                "text": text,
            }
        }))
        .finish()
}

pub fn did_save_notification(uri: &str) -> Request {
    Request::build("textDocument/didSave")
        .params(json!({ "textDocument": { "uri": uri } }))
        .finish()
}

pub fn did_change_configuration(settings: Value) -> Request {
    Request::build("workspace/didChangeConfiguration")
        .params(json!({ "settings": settings }))
        .finish()
}

pub fn execute_command_request(id: i64, command: &str) -> Request {
    Request::build("workspace/executeCommand")
        .id(id)
        .params(json!({ "command": command, "arguments": [] }))
        .finish()
}

pub fn panel_closed_notification(panel_id: u64) -> Request {
    Request::build(PANEL_CLOSED_METHOD)
        .params(json!({ "id": panel_id }))
        .finish()
}

pub fn active_document_notification(uri: Option<&str>) -> Request {
    Request::build(ACTIVE_DOCUMENT_METHOD)
        .params(json!({ "uri": uri }))
        .finish()
}

/// Forwards every server-to-client message into a channel. Server-initiated
/// requests are answered inline: `workspace/applyEdit` as applied, anything
/// else with a null result.
pub fn spawn_message_collector(socket: ClientSocket) -> mpsc::UnboundedReceiver<Request> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let (mut stream, mut sink) = socket.split();
        while let Some(message) = stream.next().await {
            if let Some(id) = message.id().cloned() {
                let result = match message.method() {
                    "workspace/applyEdit" => json!({ "applied": true }),
                    _ => Value::Null,
                };
                let _ = sink.send(Response::from_ok(id, result)).await;
            }
            if tx.send(message).is_err() {
                break;
            }
        }
    });
    rx
}

/// Waits for the next message with the given method, skipping others.
pub async fn wait_for_method(rx: &mut mpsc::UnboundedReceiver<Request>, method: &str) -> Request {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let message = rx.recv().await.expect("socket closed");
            if message.method() == method {
                return message;
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {method}"))
}

/// Like `wait_for_method`, but returns `None` when nothing arrives in time.
/// Used to assert the absence of an effect.
pub async fn try_wait_for_method(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    method: &str,
    wait: Duration,
) -> Option<Request> {
    tokio::time::timeout(wait, async {
        loop {
            let message = rx.recv().await?;
            if message.method() == method {
                return Some(message);
            }
        }
    })
    .await
    .ok()
    .flatten()
}
