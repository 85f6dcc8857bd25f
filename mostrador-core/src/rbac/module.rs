//! Module identifiers
//!
//! A module names a navigable section of the back office with a
//! dot-separated path such as `dashboards.configuraciones.usuarios`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a valid module path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModulePathError {
    #[error("module path is empty")]
    Empty,
    #[error("module path '{0}' contains an empty segment")]
    EmptySegment(String),
    #[error("module path '{0}' contains whitespace")]
    Whitespace(String),
}

/// Parsed, validated module path
///
/// Segments are kept separately so ancestry is decided per segment,
/// never by string prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// Parse a dot-separated path
    pub fn parse(raw: &str) -> Result<Self, ModulePathError> {
        if raw.is_empty() {
            return Err(ModulePathError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(ModulePathError::Whitespace(raw.to_string()));
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ModulePathError::EmptySegment(raw.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Parent module, `None` for a top-level module
    pub fn parent(&self) -> Option<ModulePath> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self { segments: self.segments[..self.segments.len() - 1].to_vec() })
    }

    /// Whether `self` is a strict ancestor of `other`
    pub fn is_ancestor_of(&self, other: &ModulePath) -> bool {
        self.segments.len() < other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }

    /// Append a child segment
    pub fn child(&self, segment: &str) -> Result<ModulePath, ModulePathError> {
        ModulePath::parse(&format!("{}.{}", self, segment))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for ModulePath {
    type Err = ModulePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ModulePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModulePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ModulePath::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let path = ModulePath::parse("dashboards.configuraciones.usuarios").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "dashboards.configuraciones.usuarios");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(ModulePath::parse(""), Err(ModulePathError::Empty));
        assert!(matches!(ModulePath::parse("dashboards..ventas"), Err(ModulePathError::EmptySegment(_))));
        assert!(matches!(ModulePath::parse(".ventas"), Err(ModulePathError::EmptySegment(_))));
        assert!(matches!(ModulePath::parse("dash boards"), Err(ModulePathError::Whitespace(_))));
    }

    #[test]
    fn test_ancestry_is_segment_based() {
        let venta = ModulePath::parse("dashboards.venta").unwrap();
        let ventas2 = ModulePath::parse("dashboards.ventas2").unwrap();
        let root = ModulePath::parse("dashboards").unwrap();

        assert!(!venta.is_ancestor_of(&ventas2));
        assert!(root.is_ancestor_of(&ventas2));
        assert!(!root.is_ancestor_of(&root));
    }

    #[test]
    fn test_parent_and_child() {
        let path = ModulePath::parse("dashboards.configuraciones").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "dashboards");
        assert!(path.parent().unwrap().parent().is_none());
        assert_eq!(path.child("usuarios").unwrap().to_string(), "dashboards.configuraciones.usuarios");
    }

    #[test]
    fn test_serde_as_string() {
        let path: ModulePath = serde_json::from_str("\"dashboards.home\"").unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"dashboards.home\"");
        assert!(serde_json::from_str::<ModulePath>("\"a..b\"").is_err());
    }
}
