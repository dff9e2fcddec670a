//! Diagram render E2E tests: panel lifecycle across both formats

mod helper;

use std::time::Duration;

use mockito::Server;
use serde_json::json;
use tower::Service;

use helper::{
    create_service, did_change_configuration, did_open_notification, execute_command_request,
    initialize_request, initialized_notification, panel_closed_notification,
    spawn_message_collector, try_wait_for_method, wait_for_method,
};
use interlis_ls::render::html::data_uri;

const MODEL: &str = "MODEL Roads END.";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x42];

#[tokio::test(flavor = "multi_thread")]
async fn png_render_opens_one_panel_with_embedded_image() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/uml")
        .with_status(200)
        .with_body(PNG_BYTES)
        .create_async()
        .await;

    let (mut service, socket) = create_service();
    let mut messages = spawn_message_collector(socket);

    service.call(initialize_request(1)).await.unwrap();
    service.call(initialized_notification()).await.unwrap();
    service
        .call(did_change_configuration(json!({
            "interlis-ls": {
                "diagramUrl": format!("{}/api/uml", server.url()),
                "diagramFormat": "png",
            }
        })))
        .await
        .unwrap();
    service
        .call(did_open_notification("file:///models/roads.ili", MODEL))
        .await
        .unwrap();

    service
        .call(execute_command_request(2, "interlis.renderDiagram"))
        .await
        .unwrap();

    let panel = wait_for_method(&mut messages, "interlis/showPanel").await;
    let params = panel.params().unwrap();
    assert_eq!(params["modality"], "raster-image");
    assert_eq!(params["reuse"], false);
    // Lossless embedding: the page carries the exact bytes, base64-encoded.
    let html = params["html"].as_str().unwrap();
    assert!(html.contains(&data_uri(PNG_BYTES)));

    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn second_png_render_reuses_the_live_panel() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/uml")
        .with_status(200)
        .with_body(PNG_BYTES)
        .expect(2)
        .create_async()
        .await;

    let (mut service, socket) = create_service();
    let mut messages = spawn_message_collector(socket);

    service.call(initialize_request(1)).await.unwrap();
    service.call(initialized_notification()).await.unwrap();
    service
        .call(did_change_configuration(json!({
            "interlis-ls": {
                "diagramUrl": format!("{}/api/uml", server.url()),
                "diagramFormat": "png",
            }
        })))
        .await
        .unwrap();
    service
        .call(did_open_notification("file:///models/roads.ili", MODEL))
        .await
        .unwrap();

    service
        .call(execute_command_request(2, "interlis.renderDiagram"))
        .await
        .unwrap();
    let first = wait_for_method(&mut messages, "interlis/showPanel").await;
    let first_id = first.params().unwrap()["id"].as_u64().unwrap();

    service
        .call(execute_command_request(3, "interlis.renderDiagram"))
        .await
        .unwrap();
    let second = wait_for_method(&mut messages, "interlis/showPanel").await;
    let params = second.params().unwrap();
    assert_eq!(params["id"].as_u64().unwrap(), first_id);
    assert_eq!(params["reuse"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn mermaid_render_embeds_source_and_recreates_after_close() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/uml")
        .with_status(200)
        .with_body("classDiagram\n  class Road")
        .expect(2)
        .create_async()
        .await;

    let (mut service, socket) = create_service();
    let mut messages = spawn_message_collector(socket);

    service.call(initialize_request(1)).await.unwrap();
    service.call(initialized_notification()).await.unwrap();
    service
        .call(did_change_configuration(json!({
            "interlis-ls": {
                "diagramUrl": format!("{}/api/uml", server.url()),
                "diagramFormat": "mermaid",
            }
        })))
        .await
        .unwrap();
    service
        .call(did_open_notification("file:///models/roads.ili", MODEL))
        .await
        .unwrap();

    service
        .call(execute_command_request(2, "interlis.renderDiagram"))
        .await
        .unwrap();
    let first = wait_for_method(&mut messages, "interlis/showPanel").await;
    let params = first.params().unwrap();
    assert_eq!(params["modality"], "interactive-diagram");
    assert!(
        params["html"]
            .as_str()
            .unwrap()
            .contains("classDiagram\n  class Road")
    );
    let first_id = params["id"].as_u64().unwrap();

    // User closes the panel; the next render must open a fresh one.
    service
        .call(panel_closed_notification(first_id))
        .await
        .unwrap();

    service
        .call(execute_command_request(3, "interlis.renderDiagram"))
        .await
        .unwrap();
    let second = wait_for_method(&mut messages, "interlis/showPanel").await;
    let params = second.params().unwrap();
    assert_eq!(params["reuse"], false);
    assert_ne!(params["id"].as_u64().unwrap(), first_id);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_render_reports_error_and_touches_no_panel() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/uml")
        .with_status(500)
        .with_body("renderer crashed")
        .create_async()
        .await;

    let (mut service, socket) = create_service();
    let mut messages = spawn_message_collector(socket);

    service.call(initialize_request(1)).await.unwrap();
    service.call(initialized_notification()).await.unwrap();
    service
        .call(did_change_configuration(json!({
            "interlis-ls": {
                "diagramUrl": format!("{}/api/uml", server.url()),
                "diagramFormat": "png",
            }
        })))
        .await
        .unwrap();
    service
        .call(did_open_notification("file:///models/roads.ili", MODEL))
        .await
        .unwrap();

    service
        .call(execute_command_request(2, "interlis.renderDiagram"))
        .await
        .unwrap();

    let message = wait_for_method(&mut messages, "window/showMessage").await;
    let params = message.params().unwrap();
    assert_eq!(params["type"], 1);
    assert_eq!(
        params["message"],
        "Diagram render failed (Internal Server Error): renderer crashed"
    );

    assert!(
        try_wait_for_method(
            &mut messages,
            "interlis/showPanel",
            Duration::from_millis(300)
        )
        .await
        .is_none()
    );
    mock.assert_async().await;
}
