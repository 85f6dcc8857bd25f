//! Authenticated HTTP client for the back-office API
//!
//! Every request carries the session cookies (kept in a [`CookieJar`]) and
//! `Content-Type: application/json`. Responses are mapped as follows:
//!
//! - 401 from any endpoint but login: the session and its cookies are
//!   force-cleared and a hard redirect to the login page is issued, at
//!   most once per session.
//!   The caller receives [`Error::SessionExpired`].
//! - transport failures: [`Error::NetworkFailure`]
//! - any other non-success status: [`Error::ApplicationError`] with the
//!   server payload untouched

use super::cookies::CookieJar;
use crate::config::{ApiConfig, SessionsConfig};
use crate::navigator::Navigator;
use crate::session::SessionStore;
use crate::{Error, Result};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client bound to one session store
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    cookies: Arc<CookieJar>,
    base_url: String,
    login_path: String,
    login_route: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Client with an in-memory cookie jar
    pub fn new(
        api: &ApiConfig,
        sessions: &SessionsConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        Self::with_cookie_jar(api, sessions, session, navigator, Arc::new(CookieJar::in_memory()))
    }

    pub fn with_cookie_jar(
        api: &ApiConfig,
        sessions: &SessionsConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        cookies: Arc<CookieJar>,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            cookies,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            login_path: api.login_path.clone(),
            login_route: sessions.login_route.clone(),
            session,
            navigator,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn cookies(&self) -> &Arc<CookieJar> {
        &self.cookies
    }

    /// Forget the session cookies, in memory and on disk
    pub async fn clear_cookies(&self) {
        if let Err(e) = self.cookies.clear().await {
            log::warn!("Failed to clear session cookies: {:#}", e);
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        decode(self.request(Method::GET, path, None).await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.request(Method::POST, path, Some(encode(body)?)).await?)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.request(Method::PUT, path, Some(encode(body)?)).await?)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        decode(self.request(Method::DELETE, path, None).await?)
    }

    /// Send a request and return the raw JSON payload
    ///
    /// Empty bodies come back as `Value::Null`, non-JSON bodies as
    /// `Value::String`.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        // Captured before sending: a rejection only clears the session it was sent under.
        let epoch = self.session.epoch();

        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            log::warn!("{} {} failed: {}", method, path, e);
            Error::NetworkFailure(e.to_string())
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| Error::NetworkFailure(e.to_string()))?;
        let payload = parse_payload(&bytes);
        log::debug!("{} {} -> {}", method, path, status);

        if let Err(e) = self.cookies.flush().await {
            log::warn!("Failed to save session cookies: {:#}", e);
        }

        if status == StatusCode::UNAUTHORIZED && !self.is_login_endpoint(path) {
            self.expire_session(epoch).await;
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            return Err(Error::ApplicationError { status: status.as_u16(), payload });
        }
        Ok(payload)
    }

    fn is_login_endpoint(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let normalize = |p: &str| format!("/{}", p.trim_matches('/'));
        normalize(path) == normalize(&self.login_path)
    }

    async fn expire_session(&self, epoch: u64) {
        if self.session.force_clear(epoch).await {
            self.clear_cookies().await;
            self.navigator.hard_redirect(&self.login_route);
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .finish()
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| Error::InvalidResponse(e.to_string()))
}

fn parse_payload(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::RecordingNavigator;

    fn client(base_url: &str) -> ApiClient {
        let api = ApiConfig { base_url: base_url.to_string(), ..Default::default() };
        ApiClient::new(
            &api,
            &SessionsConfig::default(),
            SessionStore::in_memory(),
            Arc::new(RecordingNavigator::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_url_join() {
        let client = client("http://pos.local:8080/");
        assert_eq!(client.url("/api/cajas"), "http://pos.local:8080/api/cajas");
        assert_eq!(client.url("api/cajas"), "http://pos.local:8080/api/cajas");
    }

    #[test]
    fn test_login_endpoint_detection() {
        let client = client("http://pos.local");
        assert!(client.is_login_endpoint("/api/login"));
        assert!(client.is_login_endpoint("api/login/"));
        assert!(client.is_login_endpoint("/api/login?next=1"));
        assert!(!client.is_login_endpoint("/api/login2"));
        assert!(!client.is_login_endpoint("/api/cajas"));
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(b""), Value::Null);
        assert_eq!(parse_payload(b"  \n"), Value::Null);
        assert_eq!(parse_payload(br#"{"message":"x"}"#)["message"], "x");
        assert_eq!(parse_payload(b"Bad Gateway"), Value::String("Bad Gateway".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_failure() {
        let client = client("http://127.0.0.1:9");
        let err = client.get::<Value>("/api/cajas").await.unwrap_err();
        assert!(matches!(err, Error::NetworkFailure(_)));
    }
}
