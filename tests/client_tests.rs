use serde_json::json;
use std::io::Read;
use std::sync::mpsc;
use std::thread;
use tiny_http::{Header, Response, Server};
use vault_provider_codegen::config::ClientConfig;
use vault_provider_codegen::provider::{ClientError, Data, HttpVaultClient, VaultClient};

/// A request as seen by the mock Vault server.
#[derive(Debug)]
struct Seen {
    method: String,
    url: String,
    token: Option<String>,
    namespace: Option<String>,
    body: String,
}

/// Serve `responses` in order, one per request, then stop.
fn mock_vault(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Seen>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = format!("http://{}", server.server_addr().to_ip().unwrap());
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let mut request = match server.recv() {
                Ok(r) => r,
                Err(_) => return,
            };
            let header = |name: &str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
                    .map(|h| h.value.as_str().to_string())
            };
            let token = header("X-Vault-Token");
            let namespace = header("X-Vault-Namespace");
            let mut content = String::new();
            request.as_reader().read_to_string(&mut content).unwrap();
            tx.send(Seen {
                method: request.method().to_string(),
                url: request.url().to_string(),
                token,
                namespace,
                body: content,
            })
            .unwrap();
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                );
            request.respond(response).unwrap();
        }
    });
    (addr, rx)
}

fn client(addr: &str) -> HttpVaultClient {
    let config = ClientConfig::new(addr)
        .unwrap()
        .with_token("s.test-token")
        .with_namespace("team-a");
    HttpVaultClient::new(config).unwrap()
}

#[test]
fn test_read_returns_data_and_sends_headers() {
    let (addr, seen) = mock_vault(vec![(
        200,
        r#"{"request_id":"1","data":{"transformations":["ccn"]}}"#,
    )]);
    let data = client(&addr).read("/tf/role/payments").unwrap().unwrap();
    assert_eq!(data["transformations"], json!(["ccn"]));

    let request = seen.recv().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/v1/tf/role/payments");
    assert_eq!(request.token.as_deref(), Some("s.test-token"));
    assert_eq!(request.namespace.as_deref(), Some("team-a"));
}

#[test]
fn test_read_not_found_is_none() {
    let (addr, _seen) = mock_vault(vec![(404, r#"{"errors":[]}"#)]);
    assert!(client(&addr).read("/tf/role/missing").unwrap().is_none());
}

#[test]
fn test_write_sends_json_body() {
    let (addr, seen) = mock_vault(vec![(204, "")]);
    let mut body = Data::new();
    body.insert("alphabet".to_string(), json!("0123456789"));
    let response = client(&addr).write("/tf/alphabet/digits", &body).unwrap();
    assert!(response.is_none());

    let request = seen.recv().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.url, "/v1/tf/alphabet/digits");
    let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent, json!({"alphabet": "0123456789"}));
}

#[test]
fn test_error_status_carries_vault_errors() {
    let (addr, _seen) = mock_vault(vec![(403, r#"{"errors":["permission denied"]}"#)]);
    let err = client(&addr).delete("/tf/role/payments").unwrap_err();
    assert_eq!(
        err,
        ClientError::Status {
            status: 403,
            path: "/tf/role/payments".to_string(),
            errors: vec!["permission denied".to_string()],
        }
    );
}

#[test]
fn test_invalid_json_response() {
    let (addr, _seen) = mock_vault(vec![(200, "not json")]);
    assert!(matches!(
        client(&addr).read("/tf/role/payments"),
        Err(ClientError::InvalidResponse(_))
    ));
}

#[test]
fn test_address_path_prefix_is_kept_and_segments_encoded() {
    let (addr, seen) = mock_vault(vec![(204, "")]);
    let client = client(&format!("{addr}/vault"));
    client.delete("/tf/role/a?b#c").unwrap();

    let request = seen.recv().unwrap();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.url, "/vault/v1/tf/role/a%3Fb%23c");
}
