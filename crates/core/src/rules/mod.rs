//! URL rule model and match results.
//!
//! A rule maps a regular-expression pattern to a URL template. Matching a
//! rule against input text produces a [`MatchResult`] carrying the fully
//! substituted target URL. Rules are owned by the configuration layer and
//! referenced, not copied, by match results.

use serde::{Deserialize, Serialize};

pub mod store;

pub use store::RuleStore;

/// A named pattern-to-URL-template mapping.
///
/// Wire shape: `{ name, pattern, url, icon, enabled?, iconSourceIndex? }`.
/// `enabled` absent on load is treated as `true`; `iconSourceIndex` defaults
/// to the first favicon source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Display name.
    pub name: String,

    /// Regular expression source, compiled case-insensitively at match time.
    pub pattern: String,

    /// Target URL template with `{1}`, `{2}`, ... and `{text}` placeholders.
    pub url: String,

    /// Domain used to resolve the rule's display icon.
    pub icon: String,

    /// Disabled rules are skipped during matching.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Preferred favicon source index for this rule's icon domain.
    #[serde(default, rename = "iconSourceIndex")]
    pub icon_source_index: u32,
}

fn default_enabled() -> bool {
    true
}

/// One successful rule match against a piece of input text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<'r> {
    /// The rule that produced this result.
    pub rule: &'r Rule,

    /// Fully substituted target URL.
    pub target_url: String,

    /// The substring of the input the pattern matched.
    pub matched_text: String,
}

/// On-disk rule list document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub rules: Vec<Rule>,
}
