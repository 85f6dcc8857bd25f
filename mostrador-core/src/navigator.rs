//! Navigation side effects
//!
//! Guards and the API client never change location themselves; they go
//! through a [`Navigator`] so hosts and tests can observe or replace the
//! effect.

use std::sync::{Arc, Mutex};

/// Performs location changes on behalf of guards and the API client
pub trait Navigator: Send + Sync {
    /// Client-side route change, in-memory state is kept
    fn navigate(&self, href: &str);

    /// Full reload at `href`, all in-memory state is discarded
    fn hard_redirect(&self, href: &str);
}

/// Recorded navigation effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Navigate(String),
    HardRedirect(String),
}

/// Navigator that only records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().expect("navigator lock poisoned").clone()
    }

    pub fn hard_redirects(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, NavigationEvent::HardRedirect(_)))
            .count()
    }

    fn push(&self, event: NavigationEvent) {
        self.events.lock().expect("navigator lock poisoned").push(event);
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, href: &str) {
        self.push(NavigationEvent::Navigate(href.to_string()));
    }

    fn hard_redirect(&self, href: &str) {
        self.push(NavigationEvent::HardRedirect(href.to_string()));
    }
}

/// Navigator for headless hosts: logs the requested location
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, href: &str) {
        log::info!("Navigate to {}", href);
    }

    fn hard_redirect(&self, href: &str) {
        log::warn!("Hard redirect to {}", href);
    }
}
