#![allow(dead_code)]
use crate::test_app::TestApp;
use cucumber::World as CucumberWorld;
use mostrador_core::config::MostradorConfig;
use mostrador_core::guard::GuardDecision;
use mostrador_core::navigation::NavigationTree;
use mostrador_core::navigator::RecordingNavigator;
use mostrador_core::rbac::RoleSet;
use mostrador_core::session::{Identity, MemorySessionPersistence};
use mostrador_core::{BackOffice, Error};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

/// Shared state for every Mostrador scenario
#[derive(Debug, Default, CucumberWorld)]
pub struct MostradorWorld {
    pub config: MostradorConfig,
    pub backoffice: Option<BackOffice>,
    pub navigator: RecordingNavigator,
    pub persistence: Option<MemorySessionPersistence>,
    pub state_dir: Option<TempDir>,
    pub api: Option<TestApp>,

    pub menu: Option<NavigationTree>,
    pub decision: Option<GuardDecision>,
    pub responses: Vec<Result<Value, Error>>,
    pub login_result: Option<Result<Identity, Error>>,
}

pub fn parse_roles(raw: &str) -> RoleSet {
    raw.split(',').map(str::trim).filter(|role| !role.is_empty()).collect()
}

impl MostradorWorld {
    pub fn backoffice(&self) -> &BackOffice {
        self.backoffice.as_ref().expect("back office not started")
    }

    /// Back office whose session lives in memory only
    pub fn start_in_memory(&mut self) {
        let persistence = MemorySessionPersistence::new();
        let backoffice = BackOffice::with_persistence(
            self.config.clone(),
            Arc::new(persistence.clone()),
            Arc::new(self.navigator.clone()),
        )
        .expect("back office");
        self.persistence = Some(persistence);
        self.backoffice = Some(backoffice);
    }

    /// Back office persisting its session under a fresh temporary directory
    pub fn start_persistent(&mut self) {
        let dir = tempfile::tempdir().expect("temp dir");
        self.config.sessions.persist = true;
        self.config.sessions.state_dir = dir.path().to_path_buf();
        self.state_dir = Some(dir);
        self.restart_backoffice();
    }

    /// Drop the current back office and build a new one from the same config
    pub fn restart_backoffice(&mut self) {
        if let Some(old) = self.backoffice.take() {
            old.teardown();
        }
        let backoffice = BackOffice::from_config(self.config.clone(), Arc::new(self.navigator.clone()))
            .expect("back office");
        self.backoffice = Some(backoffice);
    }

    pub async fn ensure_initialized(&self) {
        let backoffice = self.backoffice();
        if !backoffice.session().snapshot().initialized {
            backoffice.init().await.expect("session restore");
        }
    }

    pub async fn start_api(&mut self) {
        let api = TestApp::start().await.expect("stub api");
        self.config.api.base_url = api.base_url();
        self.config.api.timeout_secs = 5;
        self.api = Some(api);
    }
}
