pub mod inspect;
pub mod session;

use anyhow::Result;
use mostrador_core::config::MostradorConfig;
use mostrador_core::navigator::LogNavigator;
use mostrador_core::session::{Identity, MemorySessionPersistence, PersistedSession};
use mostrador_core::BackOffice;
use std::sync::Arc;

/// Back office for the given roles, or for the persisted session
///
/// Explicit roles never touch the persisted session.
pub async fn backoffice_for(config: MostradorConfig, roles: Option<Vec<String>>) -> Result<BackOffice> {
    let backoffice = match roles {
        Some(roles) => {
            let identity = Identity::new(0, "cli", roles.into_iter().collect());
            let persistence = MemorySessionPersistence::with_entry(PersistedSession {
                identity: Some(identity),
                authenticated: true,
            });
            BackOffice::with_persistence(config, Arc::new(persistence), Arc::new(LogNavigator))?
        }
        None => BackOffice::from_config(config, Arc::new(LogNavigator))?,
    };
    backoffice.init().await?;
    Ok(backoffice)
}
