//! In-process stand-in for the submission backend, used by the async tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Response,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const OK_JSON: &str = r#"{ "message": "OK" }"#;

pub const TEACHER_EMAIL: &str = "teacher@college.edu";
pub const TEACHER_PASSWORD: &str = "hunter2";
pub const TOKEN: &str = "tok-123";

/// What the backend received in a multipart submission.
#[derive(Debug, Default, Clone)]
pub struct Received {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, (String, Vec<u8>)>,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    /// When set, `/api/submit` answers 400 with this as the `error` field.
    pub reject_submit: Option<String>,
    /// When set, `/api/submissions` answers 500.
    pub fail_listing: bool,
    pub submissions: Vec<Value>,
    pub files: HashMap<String, Vec<u8>>,
    pub received: Mutex<Vec<Received>>,
}

impl MockBackend {
    /// Serves this backend on an ephemeral port and returns its base URL.
    pub async fn spawn(self) -> (String, Arc<MockBackend>) {
        let state = Arc::new(self);

        let app = Router::new()
            .route("/api/submit", post(handle_submit))
            .route("/api/teacher/login", post(handle_login))
            .route("/api/submissions", get(handle_list))
            .route("/uploads/{file}", get(handle_file))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), state)
    }
}

pub fn record(id: &str, batch_info: &str, branch: &str, course: &str, member: &str, created_at: &str) -> Value {
    json!({
        "_id": id,
        "branch": branch,
        "course": course,
        "rollNumber": "R-1",
        "section": "A",
        "name": "Lead",
        "batchInfo": batch_info,
        "pptFile": { "filename": format!("{id}.pptx"), "path": format!("/uploads/{id}.pptx") },
        "ieeeFile": { "filename": format!("{id}.pdf"), "path": format!("/uploads/{id}.pdf") },
        "batchMembers": [{ "name": member, "registrationNumber": format!("REG-{id}") }],
        "remarks": "",
        "createdAt": created_at,
    })
}

async fn handle_submit(State(state): State<Arc<MockBackend>>, mut multipart: Multipart) -> Response<Body> {
    let mut received = Received::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        match field.file_name().map(str::to_owned) {
            Some(filename) => {
                let data = field.bytes().await.unwrap_or_default().to_vec();
                received.files.insert(name, (filename, data));
            }
            None => {
                let text = field.text().await.unwrap_or_default();
                received.fields.insert(name, text);
            }
        }
    }

    state.received.lock().unwrap().push(received);

    if let Some(error) = &state.reject_submit {
        return Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(json!({ "error": error }).to_string().into())
            .unwrap();
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .body(OK_JSON.into())
        .unwrap()
}

async fn handle_login(Json(login): Json<Value>) -> Response<Body> {
    if login["email"] == TEACHER_EMAIL && login["password"] == TEACHER_PASSWORD {
        let body = json!({ "token": TOKEN, "teacher": { "name": "Dr. Rao", "email": TEACHER_EMAIL } });
        return Response::builder()
            .status(StatusCode::OK)
            .body(body.to_string().into())
            .unwrap();
    }

    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .body(json!({ "message": "Invalid email or password" }).to_string().into())
        .unwrap()
}

async fn handle_list(State(state): State<Arc<MockBackend>>, headers: HeaderMap) -> Response<Body> {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == format!("Bearer {TOKEN}"));

    if !authorized {
        return Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .body("Not Authorized".into())
            .unwrap();
    }

    if state.fail_listing {
        return Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body("Internal Server Error.".into())
            .unwrap();
    }

    Response::builder()
        .status(StatusCode::OK)
        .body(Value::from(state.submissions.clone()).to_string().into())
        .unwrap()
}

async fn handle_file(State(state): State<Arc<MockBackend>>, Path(file): Path<String>) -> Response<Body> {
    match state.files.get(&file) {
        Some(data) => Response::builder()
            .status(StatusCode::OK)
            .body(data.clone().into())
            .unwrap(),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body("Not Found.".into())
            .unwrap(),
    }
}
