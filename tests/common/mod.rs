//! Fake Censys API shared by the client and binary tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};

pub const CERTIFICATES_PATH: &str = "/api/v2/certificates/search";
pub const HOSTS_PATH: &str = "/api/v2/hosts/search";

type Script = Box<dyn Fn(usize) -> (u16, String) + Send + Sync>;

/// A request as seen by the fake server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Fake Censys API answering the n-th request (0-based) from a script
pub struct FakeCensys {
    script: Script,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeCensys {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

async fn handle(
    State(fake): State<Arc<FakeCensys>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let n = {
        let mut requests = fake.requests.lock().unwrap();
        requests.push(Recorded {
            path: uri.path().to_string(),
            headers,
            body,
        });
        requests.len() - 1
    };
    let (status, body) = (fake.script)(n);
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// Start a fake server on a free local port, returning its API root
pub async fn spawn_fake<F>(script: F) -> (String, Arc<FakeCensys>)
where
    F: Fn(usize) -> (u16, String) + Send + Sync + 'static,
{
    let fake = Arc::new(FakeCensys {
        script: Box::new(script),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route(CERTIFICATES_PATH, post(handle))
        .route(HOSTS_PATH, post(handle))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/v2", addr), fake)
}

/// A successful search page with `hits` and an optional next cursor
pub fn page(hits: Value, next: Option<&str>) -> (u16, String) {
    let links = match next {
        Some(cursor) => json!({"next": cursor}),
        None => json!({}),
    };
    (200, json!({"result": {"hits": hits, "links": links}}).to_string())
}
