//! Back-office context
//!
//! Wires the permission map, the navigation tree, the session store, the
//! API client and the route table from one [`MostradorConfig`].
//!
//! # Example
//!
//! ```no_run
//! use mostrador_core::config::MostradorConfig;
//! use mostrador_core::navigator::LogNavigator;
//! use mostrador_core::BackOffice;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backoffice = BackOffice::from_config(MostradorConfig::load()?, Arc::new(LogNavigator))?;
//! backoffice.init().await?;
//!
//! let decision = backoffice.guard("/dashboards/ventas");
//! println!("{:?}", decision);
//! # Ok(())
//! # }
//! ```

use crate::api::{ApiClient, AuthService, CookieJar};
use crate::config::MostradorConfig;
use crate::guard::{GuardDecision, Location, RouteTable};
use crate::navigation::{filter_navigation, NavigationTree};
use crate::navigator::Navigator;
use crate::rbac::{ModulePath, PermissionChecker};
use crate::session::{FileSessionPersistence, MemorySessionPersistence, SessionPersistence, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Shared back-office services
#[derive(Clone)]
pub struct BackOffice {
    config: Arc<MostradorConfig>,
    checker: Arc<dyn PermissionChecker>,
    navigation: Arc<NavigationTree>,
    routes: Arc<RouteTable>,
    session: SessionStore,
    auth: AuthService,
    navigator: Arc<dyn Navigator>,
}

impl BackOffice {
    /// Build every service from `config`
    ///
    /// Persistence follows `sessions.persist`: the session entry and its
    /// cookie jar as JSON files under `sessions.state_dir`, or process
    /// memory only.
    pub fn from_config(config: MostradorConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        if !config.sessions.persist {
            return Self::with_persistence(config, Arc::new(MemorySessionPersistence::new()), navigator);
        }
        let persistence =
            Arc::new(FileSessionPersistence::new(&config.sessions.state_dir, &config.sessions.storage_key));
        let cookies = Arc::new(CookieJar::open(config.sessions.cookie_file())?);
        Self::with_stores(config, persistence, cookies, navigator)
    }

    /// Build with a custom session persistence and an in-memory cookie jar
    pub fn with_persistence(
        config: MostradorConfig,
        persistence: Arc<dyn SessionPersistence>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::with_stores(config, persistence, Arc::new(CookieJar::in_memory()), navigator)
    }

    pub fn with_stores(
        config: MostradorConfig,
        persistence: Arc<dyn SessionPersistence>,
        cookies: Arc<CookieJar>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;

        let checker = config.rbac.policy().create_permission_checker()?;
        let navigation = match &config.navigation.file {
            Some(file) => NavigationTree::from_file(file)
                .with_context(|| format!("Failed to load navigation from {}", file.display()))?,
            None => NavigationTree::backoffice().context("Failed to load built-in navigation")?,
        };
        let routes = RouteTable::from_navigation(&navigation)
            .with_login_path(config.sessions.login_route.clone())
            .with_fallback(config.rbac.fallback_route.clone())
            .with_return_param(config.sessions.return_param.clone());

        let session = SessionStore::with_persistence(persistence);
        let client = ApiClient::with_cookie_jar(
            &config.api,
            &config.sessions,
            session.clone(),
            navigator.clone(),
            cookies,
        )?;
        let auth = AuthService::new(client, &config.api, config.sessions.login_route.clone());

        log::debug!(
            "Back office ready: {} roles, {} routes",
            config.rbac.policy().roles.len(),
            routes.rules().len()
        );

        Ok(Self {
            config: Arc::new(config),
            checker,
            navigation: Arc::new(navigation),
            routes: Arc::new(routes),
            session,
            auth,
            navigator,
        })
    }

    /// Restore the persisted session; run once before the first guard
    pub async fn init(&self) -> Result<()> {
        self.session.rehydrate().await.context("Failed to restore session")
    }

    /// Restore and confirm the session with the server
    pub async fn restore(&self) -> crate::Result<()> {
        self.auth.restore().await.map(|_| ())
    }

    /// Drop in-memory session state, keeping what is persisted
    pub fn teardown(&self) {
        self.session.teardown();
    }

    pub fn config(&self) -> &MostradorConfig {
        &self.config
    }

    pub fn checker(&self) -> &Arc<dyn PermissionChecker> {
        &self.checker
    }

    pub fn navigation(&self) -> &NavigationTree {
        &self.navigation
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn client(&self) -> &ApiClient {
        self.auth.client()
    }

    /// Menu visible to the current identity
    pub fn visible_navigation(&self) -> NavigationTree {
        let state = self.session.snapshot();
        match state.roles() {
            Some(roles) => filter_navigation(&self.navigation, roles, self.checker.as_ref()),
            None => NavigationTree::default(),
        }
    }

    /// Whether the current identity may use `module`
    pub fn can_access(&self, module: &ModulePath) -> bool {
        self.session
            .snapshot()
            .roles()
            .is_some_and(|roles| self.checker.has_module_access(roles, module))
    }

    /// Guard a render attempt at `href`, performing any redirect
    ///
    /// Sub-paths of a navigation entry need the entry's module. Public paths
    /// and paths outside every entry render.
    pub fn guard(&self, href: &str) -> GuardDecision {
        let location = Location::parse(href);
        match self.routes.guard_for(&location.path) {
            Some(guard) => guard.enforce(
                &self.session.snapshot(),
                &location,
                self.checker.as_ref(),
                self.navigator.as_ref(),
            ),
            None => GuardDecision::Render,
        }
    }
}

impl std::fmt::Debug for BackOffice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackOffice")
            .field("session", &self.session)
            .field("routes", &self.routes.rules().len())
            .finish()
    }
}
