//! Rule persistence.
//!
//! Rules are stored as a single JSON document and loaded/saved as a whole
//! list, preserving order. A built-in default rule set is embedded at compile
//! time and materialized on first run when no rules file exists yet.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Rule, RulesConfig};
use crate::Error;

/// Default rule set embedded at compile time.
const DEFAULT_RULES_JSON: &str = include_str!("default_rules.json");

/// File-backed rule store.
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    /// Create a store backed by the given rules file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing rules file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The built-in default rules.
    pub fn default_rules() -> Vec<Rule> {
        match serde_json::from_str::<RulesConfig>(DEFAULT_RULES_JSON) {
            Ok(config) => config.rules,
            Err(e) => {
                warn!(error = %e, "embedded default rules failed to parse");
                Vec::new()
            }
        }
    }

    /// Load the rule list.
    ///
    /// A missing file yields the built-in defaults, which are saved back so
    /// the file exists for subsequent edits. A present but unreadable or
    /// corrupt file is an error.
    pub fn load(&self) -> Result<Vec<Rule>, Error> {
        if !self.path.exists() {
            let defaults = Self::default_rules();
            if let Err(e) = self.save(&defaults) {
                warn!(path = %self.path.display(), error = %e, "failed to materialize default rules");
            }
            return Ok(defaults);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::RuleStore(format!("failed to read {}: {e}", self.path.display())))?;

        let config: RulesConfig = serde_json::from_str(&content)
            .map_err(|e| Error::RuleStore(format!("failed to parse {}: {e}", self.path.display())))?;

        debug!(count = config.rules.len(), "rules loaded");
        Ok(config.rules)
    }

    /// Save the whole rule list, preserving order.
    pub fn save(&self, rules: &[Rule]) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| Error::RuleStore(format!("failed to create {}: {e}", parent.display())))?;
        }

        let config = RulesConfig { rules: rules.to_vec() };
        let content = serde_json::to_string_pretty(&config)
            .map_err(|e| Error::RuleStore(format!("failed to serialize rules: {e}")))?;

        fs::write(&self.path, content)
            .map_err(|e| Error::RuleStore(format!("failed to write {}: {e}", self.path.display())))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> RuleStore {
        let path = std::env::temp_dir().join(format!("ringsnap-rules-{}-{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        RuleStore::new(path)
    }

    #[test]
    fn test_default_rules_parse() {
        let rules = RuleStore::default_rules();
        assert!(!rules.is_empty());
        assert!(rules.iter().any(|r| r.url.contains("{text}")));
    }

    #[test]
    fn test_load_missing_file_yields_defaults_and_materializes() {
        let store = temp_store("missing");
        let rules = store.load().unwrap();
        assert_eq!(rules, RuleStore::default_rules());
        assert!(store.path().exists());
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = temp_store("roundtrip");
        let rules = vec![
            Rule {
                name: "Second".into(),
                pattern: "b".into(),
                url: "https://b/{1}".into(),
                icon: "b.com".into(),
                enabled: false,
                icon_source_index: 1,
            },
            Rule {
                name: "First".into(),
                pattern: "a".into(),
                url: "https://a/{text}".into(),
                icon: "a.com".into(),
                enabled: true,
                icon_source_index: 0,
            },
        ];

        store.save(&rules).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, rules);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let store = temp_store("corrupt");
        fs::write(store.path(), "not json").unwrap();
        let result = store.load();
        assert!(matches!(result, Err(Error::RuleStore(_))));
        let _ = fs::remove_file(store.path());
    }
}
