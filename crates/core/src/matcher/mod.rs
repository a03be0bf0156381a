//! Rule matching engine.
//!
//! Evaluates ordered pattern rules against normalized input text and produces
//! actionable results, plus a deterministic search-engine fallback for text
//! nothing matches.
//!
//! ### Matching
//! - Patterns compile case-insensitively; a pattern that fails to compile is
//!   logged and skipped, never fatal.
//! - First match only per rule; multiple occurrences in the same text are not
//!   enumerated.
//!
//! ### Templates
//! - `{1}`, `{2}`, ... substitute percent-encoded capture groups.
//! - `{0}`/`{1}` substitute the whole match when the pattern has no groups.
//! - `{text}` substitutes the percent-encoded input text.
//! - Each placeholder token is replaced at its first occurrence only.

use std::sync::LazyLock;

use regex::RegexBuilder;
use tracing::warn;

use crate::rules::{MatchResult, Rule};

pub mod normalize;
pub mod template;
pub mod urls;

pub use normalize::normalize;
pub use template::encode_component;

/// Match a single rule against input text.
///
/// Returns `None` when the pattern does not match or fails to compile.
pub fn match_rule<'r>(text: &str, rule: &'r Rule) -> Option<MatchResult<'r>> {
    let regex = match RegexBuilder::new(&rule.pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            warn!(rule = %rule.name, error = %e, "rule pattern failed to compile, skipping");
            return None;
        }
    };

    let caps = regex.captures(text)?;
    let matched_text = caps[0].to_string();
    let target_url = template::substitute(&rule.url, &caps, text);

    Some(MatchResult { rule, target_url, matched_text })
}

/// Match every enabled rule against input text, preserving rule order.
///
/// A total, non-short-circuiting scan: one rule failing never prevents
/// evaluation of the rest.
pub fn match_all<'r>(text: &str, rules: &'r [Rule]) -> Vec<MatchResult<'r>> {
    if text.is_empty() || rules.is_empty() {
        return Vec::new();
    }

    rules
        .iter()
        .filter(|rule| rule.enabled)
        .filter_map(|rule| match_rule(text, rule))
        .collect()
}

/// Built-in search engines used when no rule matches.
static DEFAULT_SEARCH_ENGINES: LazyLock<[Rule; 3]> = LazyLock::new(|| {
    let engine = |name: &str, url: &str, icon: &str| Rule {
        name: name.to_string(),
        pattern: ".*".to_string(),
        url: url.to_string(),
        icon: icon.to_string(),
        enabled: true,
        icon_source_index: 0,
    };

    [
        engine("Google", "https://www.google.com/search?q={text}", "google.com"),
        engine("Baidu", "https://www.baidu.com/s?wd={text}", "baidu.com"),
        engine("Bing", "https://www.bing.com/search?q={text}", "bing.com"),
    ]
});

/// Build the fixed search-engine fallback for input text.
///
/// Bypasses the regex path entirely: always exactly one result per built-in
/// engine, each with `{text}` substituted by the percent-encoded input.
pub fn default_search_results(text: &str) -> Vec<MatchResult<'static>> {
    DEFAULT_SEARCH_ENGINES
        .iter()
        .map(|rule| MatchResult {
            rule,
            target_url: rule.url.replacen("{text}", &encode_component(text), 1),
            matched_text: text.to_string(),
        })
        .collect()
}
