//! Per-domain icon load states.
//!
//! Session-scoped, never persisted. The presentation layer reads these to
//! decide whether to show a spinner, the cached icon, or retry with the next
//! favicon source.

use std::collections::HashMap;

/// Lifecycle of one domain's icon within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconState {
    #[default]
    Idle,
    Loading,
    Cached,
    Failed,
}

/// Registry of per-domain icon states.
#[derive(Debug, Default)]
pub struct IconStates {
    states: HashMap<String, IconState>,
}

impl IconStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a domain; unseen domains are `Idle`.
    pub fn state(&self, domain: &str) -> IconState {
        self.states.get(domain).copied().unwrap_or_default()
    }

    pub fn set_loading(&mut self, domain: &str) {
        self.states.insert(domain.to_string(), IconState::Loading);
    }

    pub fn set_cached(&mut self, domain: &str) {
        self.states.insert(domain.to_string(), IconState::Cached);
    }

    /// Mark a domain failed, after the caller has exhausted all sources.
    pub fn set_failed(&mut self, domain: &str) {
        self.states.insert(domain.to_string(), IconState::Failed);
    }

    pub fn is_loading(&self, domain: &str) -> bool {
        self.state(domain) == IconState::Loading
    }

    pub fn is_failed(&self, domain: &str) -> bool {
        self.state(domain) == IconState::Failed
    }

    /// Drop all per-domain state.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_domain_is_idle() {
        let states = IconStates::new();
        assert_eq!(states.state("example.com"), IconState::Idle);
    }

    #[test]
    fn test_transitions() {
        let mut states = IconStates::new();

        states.set_loading("example.com");
        assert!(states.is_loading("example.com"));

        states.set_cached("example.com");
        assert_eq!(states.state("example.com"), IconState::Cached);

        states.set_loading("other.com");
        states.set_failed("other.com");
        assert!(states.is_failed("other.com"));
        assert!(!states.is_loading("other.com"));
    }

    #[test]
    fn test_clear() {
        let mut states = IconStates::new();
        states.set_failed("example.com");
        states.clear();
        assert_eq!(states.state("example.com"), IconState::Idle);
    }
}
