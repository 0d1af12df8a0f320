//! CLI Integration Tests
//!
//! Runs the full fetch, resolve and write pipeline against a mock Figma API.

use forge_cli::{run, ForgeConfig, OUTPUT_FILE};
use forge_source::RetryConfig;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn document() -> Value {
    json!({
        "name": "Checkout",
        "document": { "children": [ { "children": [
            {
                "id": "1:0",
                "type": "FRAME",
                "absoluteBoundingBox": { "x": 0, "y": 0, "width": 390, "height": 844 },
                "backgroundColor": { "r": 0.95, "g": 0.95, "b": 0.95, "a": 1 },
                "children": [
                    { "id": "1:1", "name": "image product",
                      "absoluteBoundingBox": { "x": 0, "y": 0, "width": 390, "height": 300 } },
                    { "id": "1:2", "name": "button pay",
                      "absoluteBoundingBox": { "x": 16, "y": 780, "width": 358, "height": 48 },
                      "fills": [{ "type": "SOLID", "color": { "r": 0, "g": 0, "b": 0 } }] }
                ]
            }
        ] } ] }
    })
}

fn config(server: &MockServer, output: &std::path::Path, download_assets: bool) -> ForgeConfig {
    ForgeConfig {
        file: "https://www.figma.com/design/Chk42/Checkout".into(),
        token: "secret".into(),
        output: output.to_path_buf(),
        download_assets,
        api_url: server.uri(),
        retry: RetryConfig::new(2, 1, 5, 2.0),
    }
}

async fn mount_document(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/files/Chk42"))
        .and(header("X-FIGMA-TOKEN", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document()))
        .mount(server)
        .await;
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_run_writes_resolved_frames() {
    let server = MockServer::start().await;
    mount_document(&server).await;
    let output = tempfile::tempdir().expect("tempdir");

    let frames = run(&config(&server, output.path(), false))
        .await
        .expect("run");
    assert_eq!(frames.len(), 1);

    let written: Value = serde_json::from_str(
        &std::fs::read_to_string(output.path().join(OUTPUT_FILE)).expect("output file"),
    )
    .expect("json");

    assert_eq!(written[0]["frame"]["name"], "Checkout");
    assert_eq!(written[0]["frame"]["frameIndex"], 0);
    assert_eq!(written[0]["frame"]["backgroundColor"], "#f2f2f2");
    assert_eq!(written[0]["components"][1]["role"], "button");
    assert_eq!(written[0]["components"][1]["type"], "pay");
    assert_eq!(written[0]["components"][1]["style"]["color"], "#ffffff");
    assert!(written[0]["components"][0].get("asset").is_none());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_run_downloads_assets() {
    let server = MockServer::start().await;
    mount_document(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/images/Chk42"))
        .and(query_param("ids", "1:1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": { "1:1": format!("{}/img/product.png", server.uri()) }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/product.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    let output = tempfile::tempdir().expect("tempdir");

    let frames = run(&config(&server, output.path(), true))
        .await
        .expect("run");

    assert_eq!(frames[0].components[0].asset.as_deref(), Some("product.png"));
    let stored = output.path().join("ReactApp/src/assets/product.png");
    assert_eq!(std::fs::read(stored).expect("asset"), vec![1u8, 2, 3]);
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_unavailable_document_writes_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/files/Chk42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let output = tempfile::tempdir().expect("tempdir");

    let frames = run(&config(&server, output.path(), true))
        .await
        .expect("run");
    assert!(frames.is_empty());

    let written = std::fs::read_to_string(output.path().join(OUTPUT_FILE)).expect("output");
    assert_eq!(written.trim(), "[]");
}
