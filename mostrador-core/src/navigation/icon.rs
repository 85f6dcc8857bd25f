//! Closed set of navigation icons
//!
//! Icon keys in the navigation definition resolve to [`Icon`] when the
//! tree is loaded. An unknown key is a load error, never a blank icon.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Dashboard,
    Home,
    ShoppingCart,
    CashRegister,
    Settings,
    Users,
    BuildingStore,
    Receipt,
    Package,
    ChartBar,
}

impl Icon {
    pub const ALL: [Icon; 10] = [
        Icon::Dashboard,
        Icon::Home,
        Icon::ShoppingCart,
        Icon::CashRegister,
        Icon::Settings,
        Icon::Users,
        Icon::BuildingStore,
        Icon::Receipt,
        Icon::Package,
        Icon::ChartBar,
    ];

    /// Key used in navigation definitions
    pub fn key(&self) -> &'static str {
        match self {
            Icon::Dashboard => "dashboard",
            Icon::Home => "home",
            Icon::ShoppingCart => "shopping-cart",
            Icon::CashRegister => "cash-register",
            Icon::Settings => "settings",
            Icon::Users => "users",
            Icon::BuildingStore => "building-store",
            Icon::Receipt => "receipt",
            Icon::Package => "package",
            Icon::ChartBar => "chart-bar",
        }
    }
}

/// Icon key with no matching [`Icon`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown icon key '{0}'")]
pub struct UnknownIcon(pub String);

impl FromStr for Icon {
    type Err = UnknownIcon;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.key() == key)
            .ok_or_else(|| UnknownIcon(key.to_string()))
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match_serde() {
        for icon in Icon::ALL {
            let json = serde_json::to_string(&icon).unwrap();
            assert_eq!(json, format!("\"{}\"", icon.key()));
            assert_eq!(icon.key().parse::<Icon>().unwrap(), icon);
        }
    }

    #[test]
    fn test_unknown_key_fails() {
        assert_eq!("rocket".parse::<Icon>(), Err(UnknownIcon("rocket".to_string())));
        assert!(serde_json::from_str::<Icon>("\"rocket\"").is_err());
    }
}
