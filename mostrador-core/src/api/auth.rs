//! Login, logout and session restore against the back-office API

use super::client::ApiClient;
use crate::config::ApiConfig;
use crate::session::Identity;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Username/password pair posted to the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

/// Login and session-check responses come either wrapped or bare
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdentityResponse {
    Wrapped { user: Identity },
    Bare(Identity),
}

impl From<IdentityResponse> for Identity {
    fn from(response: IdentityResponse) -> Self {
        match response {
            IdentityResponse::Wrapped { user } => user,
            IdentityResponse::Bare(identity) => identity,
        }
    }
}

/// Authentication flows driving the session store
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
    login_path: String,
    logout_path: String,
    session_path: String,
    login_route: String,
}

impl AuthService {
    pub fn new(client: ApiClient, api: &ApiConfig, login_route: impl Into<String>) -> Self {
        Self {
            client,
            login_path: api.login_path.clone(),
            logout_path: api.logout_path.clone(),
            session_path: api.session_path.clone(),
            login_route: login_route.into(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Authenticate and install the returned identity
    ///
    /// A rejected login never clears an existing session; the server
    /// payload is handed back as [`Error::ApplicationError`].
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity> {
        let session = self.client.session();
        session.begin_authentication();

        let result = self
            .client
            .post::<_, IdentityResponse>(&self.login_path, credentials)
            .await
            .map(Identity::from);

        match result {
            Ok(identity) => {
                session.complete_login(identity.clone()).await;
                Ok(identity)
            }
            Err(e) => {
                session.fail_authentication(e.user_message());
                Err(e)
            }
        }
    }

    /// End the session locally and on the server
    ///
    /// The server call is best effort. When it reports the session as
    /// already expired the client has cleared it and redirected.
    pub async fn logout(&self) -> Result<()> {
        match self.client.post::<_, Value>(&self.logout_path, &Value::Null).await {
            Ok(_) => {}
            Err(Error::SessionExpired) => return Ok(()),
            Err(e) => log::warn!("Server logout failed, clearing local session anyway: {}", e),
        }

        self.client.session().logout().await;
        self.client.clear_cookies().await;
        self.client.navigator().navigate(&self.login_route);
        Ok(())
    }

    /// Confirm the current session with the server, rehydrating first if
    /// the store has not been initialized
    ///
    /// An unreachable server keeps the restored identity. A rejected
    /// session is cleared by the client on the 401.
    pub async fn restore(&self) -> Result<Option<Identity>> {
        let session = self.client.session();
        if !session.snapshot().initialized {
            session.rehydrate().await.map_err(|e| Error::Storage(format!("{:#}", e)))?;
        }

        if session.snapshot().identity.is_none() {
            return Ok(None);
        }

        match self.client.get::<IdentityResponse>(&self.session_path).await {
            Ok(response) => {
                let identity = Identity::from(response);
                session.refresh_identity(identity.clone()).await;
                Ok(Some(identity))
            }
            Err(Error::NetworkFailure(message)) => {
                log::warn!("Session check unavailable, keeping restored session: {}", message);
                Ok(session.snapshot().identity)
            }
            Err(Error::SessionExpired) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
