//! Stub back-office API for end-to-end scenarios
//!
//! - `POST /api/login`: `ana` (ventas) and `luis` (cajero), password `secreto`
//! - `GET /api/session`: identity behind the `sid` cookie
//! - `POST /api/logout`: always succeeds
//! - `GET /api/cajas`: always 401, answered after a short delay
//! - `POST /api/ventas`: always 422 with a validation payload

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct TestApp {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestApp {
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let io = TokioIo::new(stream);
                tokio::spawn(async move {
                    if let Err(err) = http1::Builder::new().serve_connection(io, service_fn(route)).await {
                        eprintln!("Error serving connection: {:?}", err);
                    }
                });
            }
        });

        Ok(Self { addr, handle })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn account(username: &str) -> Option<Value> {
    match username {
        "ana" => Some(json!({"id": 7, "username": "ana", "roles": ["ventas"]})),
        "luis" => Some(json!({"id": 8, "username": "luis", "parent_id": 7, "roles": ["cajero"]})),
        _ => None,
    }
}

fn respond(status: StatusCode, body: Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
    response
}

fn cookie_user(req: &Request<Incoming>) -> Option<String> {
    let cookies = req.headers().get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| pair.trim().strip_prefix("sid=").map(str::to_string))
}

async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (method, path.as_str()) {
        (Method::POST, "/api/login") => {
            let body = req.into_body().collect().await.map(|b| b.to_bytes()).unwrap_or_default();
            let credentials: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            let username = credentials["username"].as_str().unwrap_or_default().to_string();
            match account(&username) {
                Some(user) if credentials["password"] == "secreto" => {
                    let mut response = respond(StatusCode::OK, json!({ "user": user }));
                    if let Ok(cookie) = header::HeaderValue::from_str(&format!("sid={}; Path=/", username)) {
                        response.headers_mut().insert(header::SET_COOKIE, cookie);
                    }
                    response
                }
                _ => respond(StatusCode::UNAUTHORIZED, json!({"message": "Usuario o contraseña incorrectos"})),
            }
        }
        (Method::GET, "/api/session") => match cookie_user(&req).as_deref().and_then(account) {
            Some(user) => respond(StatusCode::OK, user),
            None => respond(StatusCode::UNAUTHORIZED, json!({"message": "Sesión expirada"})),
        },
        (Method::POST, "/api/logout") => respond(StatusCode::OK, json!({"ok": true})),
        (Method::GET, "/api/cajas") => {
            tokio::time::sleep(Duration::from_millis(50)).await;
            respond(StatusCode::UNAUTHORIZED, json!({"message": "Sesión expirada"}))
        }
        (Method::POST, "/api/ventas") => respond(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "Venta inválida", "errors": {"total": "debe ser positivo"}}),
        ),
        _ => respond(StatusCode::NOT_FOUND, json!({"message": "No encontrado"})),
    };
    Ok(response)
}
