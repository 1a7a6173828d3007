#![allow(dead_code)]

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use formrelay::config::{CloudinaryConfig, Config, SignatureAlgorithm, SmtpConfig, TlsMode};
use formrelay::email::{MailError, Mailer, OutgoingEmail};
use formrelay::models::Document;
use formrelay::storage::{DocumentStore, StoredDocument, UploadError, UploadOptions};

pub const RECIPIENT: &str = "reviewer@example.com";
pub const SENDER: &str = "forms@example.com";
pub const DOCUMENT_URL: &str =
    "https://res.cloudinary.com/demo/image/upload/v1/form-uploads/jane.pdf";

/// Store fake that records every upload and answers with a fixed outcome.
pub struct RecordingStore {
    pub uploads: Mutex<Vec<(Document, UploadOptions)>>,
    outcome: StoreOutcome,
}

#[derive(Clone)]
pub enum StoreOutcome {
    Url(String),
    Fail(String),
    Panic,
}

impl RecordingStore {
    pub fn new(outcome: StoreOutcome) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            outcome,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn upload(
        &self,
        document: &Document,
        options: &UploadOptions,
    ) -> Result<StoredDocument, UploadError> {
        self.uploads
            .lock()
            .unwrap()
            .push((document.clone(), options.clone()));

        match &self.outcome {
            StoreOutcome::Url(url) => Ok(StoredDocument {
                secure_url: url.clone(),
                public_id: Some("form-uploads/jane".to_string()),
            }),
            StoreOutcome::Fail(message) => Err(UploadError::Rejected {
                status: 401,
                message: message.clone(),
            }),
            StoreOutcome::Panic => panic!("store blew up"),
        }
    }
}

/// Mailer fake that records every message.
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new(fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        if self.fail {
            return Err(MailError::Transport("535 authentication rejected".to_string()));
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        log_level: "warn".to_string(),
        max_upload_size: 1_048_576,
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
        upload_folder: "form-uploads".to_string(),
        timestamp_offset: formrelay::config::parse_offset("+05:30").unwrap(),
        cloudinary: CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "123456".to_string(),
            api_secret: "shhh".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            user: SENDER.to_string(),
            pass: "app-password".to_string(),
            from: SENDER.parse().unwrap(),
            tls: TlsMode::None,
        },
        recipient: RECIPIENT.parse().unwrap(),
    }
}

/// A running test server wired to recording fakes.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<RecordingStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a multipart form to `/submit`. `document` is (field, file name, bytes).
    pub async fn submit(
        &self,
        fields: &[(&str, &str)],
        document: Option<(&str, &str, Vec<u8>)>,
    ) -> Reply {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }
        if let Some((field, file_name, bytes)) = document {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str("application/pdf")
                .unwrap();
            form = form.part(field.to_string(), part);
        }

        let resp = self
            .client
            .post(self.url("/submit"))
            .multipart(form)
            .send()
            .await
            .expect("submit request failed");
        Reply::from_response(resp).await
    }

    pub async fn get(&self, path: &str) -> Reply {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        Reply::from_response(resp).await
    }
}

impl Reply {
    async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await.unwrap_or_default();
        Reply {
            status,
            content_type,
            body,
        }
    }
}

pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jane Doe"),
        ("dob", "1990-01-01"),
        ("phone", "9876543210"),
        ("ssn", "AB1234567"),
    ]
}

/// Fields with `key` replaced by `value`, or removed when `value` is `None`.
pub fn fields_with(key: &str, value: Option<&'static str>) -> Vec<(&'static str, &'static str)> {
    valid_fields()
        .into_iter()
        .filter_map(|(k, v)| {
            if k == key {
                value.map(|new| (k, new))
            } else {
                Some((k, v))
            }
        })
        .collect()
}

/// A 10KB payload that starts like a PDF.
pub fn sample_pdf() -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(10 * 1024, b'.');
    bytes
}

pub fn pdf_document() -> Option<(&'static str, &'static str, Vec<u8>)> {
    Some(("document", "jane.pdf", sample_pdf()))
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), StoreOutcome::Url(DOCUMENT_URL.to_string()), false).await
}

pub async fn spawn_app_with(config: Config, outcome: StoreOutcome, mail_fails: bool) -> TestApp {
    let store = Arc::new(RecordingStore::new(outcome));
    let mailer = Arc::new(RecordingMailer::new(mail_fails));

    let app = formrelay::build_app(config, store.clone(), mailer.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        store,
        mailer,
    }
}

/// Read one file out of an XLSX (zip) buffer as text.
pub fn xlsx_entry(xlsx: &[u8], name: &str) -> String {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(xlsx)).expect("attachment is not a zip");
    let mut entry = archive.by_name(name).expect("missing xlsx entry");
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}
