//! In-process back-office API used by the client tests
//!
//! Accounts: `ana` (ventas) and `luis` (cajero), password `secreto`.
//! A successful login sets the `sid` cookie; `/api/session` requires it.
//! `/api/cajas` always answers 401 as if the session had expired.

#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use mostrador_core::config::MostradorConfig;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Default)]
pub struct Hits {
    pub login: AtomicUsize,
    pub session: AtomicUsize,
    pub expired: AtomicUsize,
    pub logout: AtomicUsize,
}

pub struct TestApi {
    pub base_url: String,
    pub hits: Arc<Hits>,
}

impl TestApi {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test api");
        let addr = listener.local_addr().expect("local addr");
        let hits = Arc::new(Hits::default());

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else { break };
                let io = TokioIo::new(stream);
                let hits = server_hits.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, hits.clone()));
                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        eprintln!("Error serving connection: {:?}", err);
                    }
                });
            }
        });

        Self { base_url: format!("http://{}", addr), hits }
    }

    /// Configuration pointing at this server, persisting nothing on disk
    pub fn config(&self) -> MostradorConfig {
        let mut config = MostradorConfig::default();
        config.api.base_url = self.base_url.clone();
        config.api.timeout_secs = 5;
        config.sessions.persist = false;
        config
    }
}

fn identity(username: &str) -> Option<Value> {
    match username {
        "ana" => Some(json!({"id": 7, "persona_id": 70, "username": "ana", "email": "ana@mostrador.test", "roles": ["ventas"]})),
        "luis" => Some(json!({"id": 8, "username": "luis", "parent_id": 7, "roles": ["cajero"]})),
        _ => None,
    }
}

fn session_user(req: &Request<Incoming>) -> Option<String> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| pair.trim().strip_prefix("sid=").map(str::to_string))
}

fn json_response(status: StatusCode, body: Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("valid response")
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .expect("valid response")
}

async fn handle(req: Request<Incoming>, hits: Arc<Hits>) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user = session_user(&req);

    let response = match (method, path.as_str()) {
        (Method::POST, "/api/login") => {
            hits.login.fetch_add(1, Ordering::SeqCst);
            let body = req.into_body().collect().await.map(|b| b.to_bytes()).unwrap_or_default();
            let credentials: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            let username = credentials["username"].as_str().unwrap_or_default();
            match identity(username) {
                Some(user) if credentials["password"] == "secreto" => {
                    let mut response = json_response(StatusCode::OK, json!({ "user": user }));
                    response.headers_mut().insert(
                        header::SET_COOKIE,
                        format!("sid={}; Path=/; HttpOnly", username).parse().expect("cookie"),
                    );
                    response
                }
                _ => json_response(
                    StatusCode::UNAUTHORIZED,
                    json!({"message": "Usuario o contraseña incorrectos"}),
                ),
            }
        }
        (Method::GET, "/api/session") => {
            hits.session.fetch_add(1, Ordering::SeqCst);
            match user.as_deref().and_then(identity) {
                Some(user) => json_response(StatusCode::OK, user),
                None => json_response(StatusCode::UNAUTHORIZED, json!({"message": "Sesión expirada"})),
            }
        }
        (Method::POST, "/api/logout") => {
            hits.logout.fetch_add(1, Ordering::SeqCst);
            Response::builder()
                .status(StatusCode::NO_CONTENT)
                .body(Full::new(Bytes::new()))
                .expect("valid response")
        }
        (Method::GET, "/api/cajas") => {
            hits.expired.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(150)).await;
            json_response(StatusCode::UNAUTHORIZED, json!({"message": "Sesión expirada"}))
        }
        (Method::GET, "/api/ventas") => {
            json_response(StatusCode::OK, json!([{"id": 1, "total": 1250.5}, {"id": 2, "total": 80.0}]))
        }
        (Method::POST, "/api/ventas") => json_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "Venta inválida", "errors": {"total": "debe ser positivo"}}),
        ),
        (Method::DELETE, "/api/ventas/1") => json_response(StatusCode::FORBIDDEN, json!({"error": "Sin permiso"})),
        (Method::GET, "/api/reportes") => text_response(StatusCode::BAD_GATEWAY, "Bad Gateway"),
        _ => json_response(StatusCode::NOT_FOUND, json!({"message": "No encontrado"})),
    };
    Ok(response)
}
