//! Shared fixtures for the integration tests: an in-memory PDF builder and
//! an in-process mock of the chat-completions endpoint.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, encryption, Document, Object, ObjectId, Stream, StringFormat};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Route library logs to the test harness; `RUST_LOG=debug` shows them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ── PDF fixtures ─────────────────────────────────────────────────────────────

/// Build a PDF with one page per entry. `Some(text)` draws `text` in
/// Courier; `None` leaves the page without a text layer, like a scan.
pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
    let (doc, _) = document_with_pages(pages);
    save(doc)
}

/// Like [`pdf_with_pages`], but encrypted with 40-bit RC4 (revision 2) under
/// `user_password`. Permission-only PDFs use an empty user password.
pub fn encrypted_pdf_with_pages(pages: &[Option<&str>], user_password: &str) -> Vec<u8> {
    let (mut doc, content_ids) = document_with_pages(pages);

    let file_id = Object::String(b"kontrak-fixture!".to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "P" => -44,
        "O" => Object::String(vec![0x5a; 32], StringFormat::Hexadecimal),
    });
    doc.trailer.set("Encrypt", encrypt_id);

    let key = encryption::get_encryption_key(&doc, user_password, false).expect("derive key");
    let check = rc4(&key, &PASSWORD_PAD);
    doc.get_object_mut(encrypt_id)
        .and_then(Object::as_dict_mut)
        .expect("encrypt dictionary")
        .set("U", Object::String(check, StringFormat::Hexadecimal));

    // RC4 is symmetric: "decrypting" plaintext with the object key encrypts it.
    for id in content_ids {
        let object = doc.get_object(id).expect("content stream");
        let cipher = encryption::decrypt_object(&key, id, object).expect("encrypt stream");
        doc.get_object_mut(id)
            .and_then(Object::as_stream_mut)
            .expect("content stream")
            .set_content(cipher);
    }
    save(doc)
}

const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Plain RC4, only needed for the `/U` check value of the fixture.
fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }
    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|b| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(s[i as usize]);
            s.swap(i as usize, j as usize);
            b ^ s[s[i as usize].wrapping_add(s[j as usize]) as usize]
        })
        .collect()
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialise PDF");
    buf
}

fn document_with_pages(pages: &[Option<&str>]) -> (Document, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    let mut content_ids = Vec::with_capacity(pages.len());
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        content_ids.push(content_id);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    (doc, content_ids)
}

// ── Mock completion endpoint ─────────────────────────────────────────────────

/// One request received by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: String,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

/// A running mock; `base` is suitable for `AssistantConfig::api_base`.
pub struct MockApi {
    pub base: String,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

impl MockApi {
    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }
}

/// Start a mock that answers every request with `status` and `reply`.
pub async fn spawn_mock(status: u16, reply: impl Into<String>) -> MockApi {
    init_tracing();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status: StatusCode::from_u16(status).expect("valid status"),
        reply: reply.into(),
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
    let addr = listener.local_addr().expect("mock addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    MockApi {
        base: format!("http://{addr}/v1"),
        seen,
    }
}

async fn completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.seen.lock().unwrap().push(Recorded {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.reply,
    )
}

/// A success body whose first choice says `content`.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
    .to_string()
}

/// An OpenAI-style error envelope.
pub fn error_body(message: &str, kind: &str) -> String {
    serde_json::json!({
        "error": { "message": message, "type": kind, "param": null, "code": kind }
    })
    .to_string()
}
