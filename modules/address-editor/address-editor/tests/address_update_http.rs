//! End-to-end tests: editor -> HTTP adapter -> mock storefront backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use address_editor::{
    AddressEditor, AddressEditorConfig, AddressEditorModule, AddressField, AddressUpdateError,
    CustomerId, SubmitOutcome,
};
use httpmock::prelude::*;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const ENDPOINT_PREFIX: &str = "/backend/api/carrinho/alterar_endere";
const CPF: &str = "529.982.247-25";

fn config_for(server: &MockServer) -> AddressEditorConfig {
    AddressEditorConfig {
        base_url: server.base_url(),
        allow_insecure_http: true,
        request_timeout_ms: 2_000,
        ..AddressEditorConfig::default()
    }
}

fn open_filled_editor(config: &AddressEditorConfig) -> (AddressEditor, Arc<AtomicUsize>) {
    let module = AddressEditorModule::init(config).unwrap();
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    let editor = module.editor(CustomerId::new(CPF), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    editor.open();
    editor.update_field(AddressField::Street, "Rua da Aurora");
    editor.update_field(AddressField::Number, "325");
    editor.update_field(AddressField::Neighborhood, "Boa Vista");
    editor.update_field(AddressField::City, "Recife");
    editor.update_field(AddressField::State, "PE");
    editor.update_field(AddressField::PostalCode, "50050-000");
    editor.update_field(AddressField::Country, "Brasil");
    (editor, notified)
}

#[tokio::test]
async fn success_sends_one_put_with_backend_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path_includes(ENDPOINT_PREFIX)
            .query_param("CPF", CPF)
            .header("content-type", "application/json")
            .json_body(json!({
                "rua": "Rua da Aurora",
                "numero": 325,
                "bairro": "Boa Vista",
                "cidade": "Recife",
                "estado": "PE",
                "cep": "50050-000",
                "pais": "Brasil",
                "complemento": ""
            }));
        then.status(200).json_body(json!({"ok": true}));
    });

    let (editor, notified) = open_filled_editor(&config_for(&server));
    let outcome = editor.submit().await;

    assert_eq!(outcome, SubmitOutcome::Saved);
    mock.assert_calls(1);
    let view = editor.view();
    assert!(!view.is_open);
    assert!(view.error_message.is_empty());
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejection_shows_server_detail() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT).path_includes(ENDPOINT_PREFIX);
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"detail": "CEP inv\u{e1}lido"}));
    });

    let (editor, notified) = open_filled_editor(&config_for(&server));
    let before = editor.view().address;
    let outcome = editor.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(AddressUpdateError::server_rejected(400, "CEP inv\u{e1}lido"))
    );
    mock.assert_calls(1);
    let view = editor.view();
    assert!(view.is_open);
    assert_eq!(view.error_message, "CEP inv\u{e1}lido");
    assert_eq!(view.address, before);
    assert_eq!(notified.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn validation_list_detail_is_joined() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path_includes(ENDPOINT_PREFIX);
        then.status(422).json_body(json!({
            "detail": [
                {"loc": ["body", "estado"], "msg": "state must have 2 letters", "type": "value_error"},
                {"loc": ["body", "cep"], "msg": "invalid postal code", "type": "value_error"}
            ]
        }));
    });

    let (editor, _) = open_filled_editor(&config_for(&server));
    editor.submit().await;

    assert_eq!(
        editor.view().error_message,
        "state must have 2 letters; invalid postal code"
    );
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_text() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path_includes(ENDPOINT_PREFIX);
        then.status(502)
            .header("content-type", "text/html")
            .body("<html><body>Bad Gateway</body></html>");
    });

    let (editor, _) = open_filled_editor(&config_for(&server));
    let outcome = editor.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(AddressUpdateError::server_rejected(502, "Bad Gateway"))
    );
    assert_eq!(editor.view().error_message, "Bad Gateway");
}

#[tokio::test]
async fn non_200_success_status_is_a_rejection() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path_includes(ENDPOINT_PREFIX);
        then.status(204);
    });

    let (editor, notified) = open_filled_editor(&config_for(&server));
    editor.submit().await;

    let view = editor.view();
    assert!(view.is_open);
    assert_eq!(view.error_message, "No Content");
    assert_eq!(notified.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn connection_refused_is_no_response() {
    let config = AddressEditorConfig {
        base_url: "http://127.0.0.1:1".to_owned(),
        allow_insecure_http: true,
        ..AddressEditorConfig::default()
    };

    let (editor, notified) = open_filled_editor(&config);
    let outcome = editor.submit().await;

    assert!(
        matches!(
            outcome,
            SubmitOutcome::Rejected(AddressUpdateError::NoResponse { .. })
        ),
        "got {outcome:?}"
    );
    let view = editor.view();
    assert!(view.is_open);
    assert_eq!(view.error_message, "No response received from the server.");
    assert_eq!(notified.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn timeout_is_no_response() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path_includes(ENDPOINT_PREFIX);
        then.status(200).delay(Duration::from_millis(500));
    });
    let config = AddressEditorConfig {
        request_timeout_ms: 50,
        ..config_for(&server)
    };

    let (editor, _) = open_filled_editor(&config);
    let outcome = editor.submit().await;

    assert!(
        matches!(
            outcome,
            SubmitOutcome::Rejected(AddressUpdateError::NoResponse { .. })
        ),
        "got {outcome:?}"
    );
    assert!(editor.view().is_open);
}

#[tokio::test]
async fn stalled_error_body_falls_back_to_status_text() {
    // Sends the status line and part of the body, then goes quiet
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let backend = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0_u8; 8 * 1024];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(
                b"HTTP/1.1 400 Bad Request\r\n\
                  content-type: application/json\r\n\
                  content-length: 100\r\n\r\n\
                  {\"det",
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(socket);
    });
    let config = AddressEditorConfig {
        base_url: format!("http://{addr}"),
        allow_insecure_http: true,
        request_timeout_ms: 300,
        ..AddressEditorConfig::default()
    };

    let (editor, notified) = open_filled_editor(&config);
    let outcome = tokio::time::timeout(Duration::from_secs(5), editor.submit())
        .await
        .expect("submit should resolve once the body read times out");

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(AddressUpdateError::server_rejected(400, "Bad Request"))
    );
    let view = editor.view();
    assert!(view.is_open);
    assert!(!view.pending);
    assert_eq!(view.error_message, "Bad Request");
    assert_eq!(notified.load(Ordering::SeqCst), 0);
    backend.abort();
}

#[tokio::test]
async fn plain_http_without_opt_in_is_a_construction_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT);
        then.status(200);
    });
    let config = AddressEditorConfig {
        allow_insecure_http: false,
        ..config_for(&server)
    };

    let (editor, _) = open_filled_editor(&config);
    let outcome = editor.submit().await;

    let SubmitOutcome::Rejected(AddressUpdateError::RequestConstruction { message }) = outcome
    else {
        panic!("expected a construction error, got {outcome:?}");
    };
    assert_eq!(editor.view().error_message, message);
    assert!(message.contains("http"), "message: {message}");
    mock.assert_calls(0);
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_backend() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT);
        then.status(200);
    });

    let (editor, _) = open_filled_editor(&config_for(&server));
    editor.update_field(AddressField::State, "   ");
    let outcome = editor.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(
        editor.view().error_message,
        "Please fill in all required fields."
    );
    mock.assert_calls(0);
}

#[tokio::test]
async fn close_during_slow_request_discards_response() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path_includes(ENDPOINT_PREFIX);
        then.status(200).delay(Duration::from_millis(300));
    });

    let (editor, notified) = open_filled_editor(&config_for(&server));
    let submission = tokio::spawn({
        let editor = editor.clone();
        async move { editor.submit().await }
    });

    // Wait until the request is in flight
    while !editor.view().pending {
        tokio::task::yield_now().await;
    }
    editor.close();

    assert_eq!(submission.await.unwrap(), SubmitOutcome::Cancelled);
    tokio::time::sleep(Duration::from_millis(400)).await;
    let view = editor.view();
    assert!(!view.is_open);
    assert!(view.error_message.is_empty());
    assert_eq!(notified.load(Ordering::SeqCst), 0);
}
