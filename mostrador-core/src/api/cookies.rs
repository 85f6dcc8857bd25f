//! Session cookie jar
//!
//! The back-office API authenticates with a session cookie. When sessions
//! persist, the jar is kept next to the session entry
//! (`<state_dir>/<storage_key>.cookies.json`) so a restarted process still
//! sends the cookie that matches the persisted identity.
//!
//! Session cookies carry no expiry, so every cookie is written, including
//! non-persistent ones. An empty jar removes the file.

use anyhow::{anyhow, Context, Result};
use cookie_store::RawCookie;
use reqwest::header::HeaderValue;
use reqwest::Url;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tokio::sync::Mutex;

/// Cookie store shared with the HTTP client, optionally backed by a file
#[derive(Debug, Default)]
pub struct CookieJar {
    store: RwLock<cookie_store::CookieStore>,
    path: Option<PathBuf>,
    dirty: AtomicBool,
    writes: Mutex<()>,
}

impl CookieJar {
    /// Jar that lives in process memory only
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Jar backed by `path`, loading any cookies already stored there
    ///
    /// A missing file gives an empty jar; an unreadable one is ignored.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = match std::fs::read(&path) {
            Ok(content) => cookie_store::serde::json::load(content.as_slice()).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable cookie jar {}: {}", path.display(), e);
                cookie_store::CookieStore::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => cookie_store::CookieStore::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read cookie jar {}", path.display()))
            }
        };
        Ok(Self { store: RwLock::new(store), path: Some(path), ..Default::default() })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().expect("cookie jar lock poisoned").iter_any().next().is_none()
    }

    /// Write pending changes to the backing file
    ///
    /// Writes are serialized and always reflect the jar at the time of
    /// writing, so the last flush wins.
    pub async fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            self.dirty.store(false, Ordering::SeqCst);
            return Ok(());
        };
        let _guard = self.writes.lock().await;
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let content = {
            let store = self.store.read().expect("cookie jar lock poisoned");
            if store.iter_any().next().is_none() {
                None
            } else {
                let mut buf = Vec::new();
                cookie_store::serde::json::save_incl_expired_and_nonpersistent(&store, &mut buf)
                    .map_err(|e| anyhow!("Failed to serialize cookie jar: {}", e))?;
                Some(buf)
            }
        };

        match content {
            Some(buf) => write_file(path, buf).await,
            None => match tokio::fs::remove_file(path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e)
                    .with_context(|| format!("Failed to erase cookie jar {}", path.display())),
            },
        }
    }

    /// Drop every cookie and erase the backing file
    pub async fn clear(&self) -> Result<()> {
        self.store.write().expect("cookie jar lock poisoned").clear();
        self.dirty.store(true, Ordering::SeqCst);
        self.flush().await
    }
}

async fn write_file(path: &Path, content: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create state directory {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, content)
        .await
        .with_context(|| format!("Failed to write cookie jar {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace cookie jar {}", path.display()))
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| RawCookie::parse(raw.to_string()).ok())
            .collect::<Vec<_>>();
        if cookies.is_empty() {
            return;
        }
        self.store
            .write()
            .expect("cookie jar lock poisoned")
            .store_response_cookies(cookies.into_iter(), url);
        self.dirty.store(true, Ordering::SeqCst);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self
            .store
            .read()
            .expect("cookie jar lock poisoned")
            .get_request_values(url)
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        if header.is_empty() {
            return None;
        }
        HeaderValue::from_str(&header).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;
    use tempfile::TempDir;

    fn api_url() -> Url {
        Url::parse("http://127.0.0.1:8080/api/login").unwrap()
    }

    fn receive(jar: &CookieJar, set_cookie: &'static str) {
        let value = HeaderValue::from_static(set_cookie);
        jar.set_cookies(&mut std::iter::once(&value), &api_url());
    }

    #[tokio::test]
    async fn test_session_cookie_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("mostrador-session.cookies.json");

        let jar = CookieJar::open(&path).unwrap();
        receive(&jar, "sid=ana; Path=/; HttpOnly");
        jar.flush().await.unwrap();
        assert!(path.exists());

        let reopened = CookieJar::open(&path).unwrap();
        let url = Url::parse("http://127.0.0.1:8080/api/session").unwrap();
        assert_eq!(reopened.cookies(&url), Some(HeaderValue::from_static("sid=ana")));
    }

    #[tokio::test]
    async fn test_clear_erases_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mostrador-session.cookies.json");

        let jar = CookieJar::open(&path).unwrap();
        receive(&jar, "sid=ana; Path=/");
        jar.flush().await.unwrap();

        jar.clear().await.unwrap();
        assert!(jar.is_empty());
        assert!(!path.exists());
        assert!(CookieJar::open(&path).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_jar_writes_nothing() {
        let jar = CookieJar::in_memory();
        receive(&jar, "sid=ana; Path=/");
        jar.flush().await.unwrap();

        assert!(jar.path().is_none());
        assert!(jar.cookies(&api_url()).is_some());
    }

    #[test]
    fn test_unreadable_jar_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mostrador-session.cookies.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(CookieJar::open(&path).unwrap().is_empty());
    }
}
