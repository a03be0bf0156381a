//! Structured icon cache keys.
//!
//! A key identifies one (domain, favicon-source) pair. The domain and source
//! index stay distinct fields end to end: the in-memory tier keys its map
//! with the struct itself and the durable tier stores them as separate
//! columns, so "all entries for domain D" matches on the domain field and a
//! domain that is a substring of another can never collide.

use std::fmt;

/// Reserved namespace token for icon entries, used in the rendered form.
pub const KEY_PREFIX: &str = "icon";

/// Composite key for one cached icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconKey {
    pub domain: String,
    pub source_index: u32,
}

impl IconKey {
    pub fn new(domain: impl Into<String>, source_index: u32) -> Self {
        Self { domain: domain.into(), source_index }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_PREFIX}:{}:{}", self.domain, self.source_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_token() {
        let key = IconKey::new("github.com", 2);
        assert_eq!(key.to_string(), "icon:github.com:2");
    }

    #[test]
    fn test_equality_is_field_wise() {
        assert_eq!(IconKey::new("a.com", 0), IconKey::new("a.com", 0));
        assert_ne!(IconKey::new("a.com", 0), IconKey::new("a.com", 1));
        assert_ne!(IconKey::new("a.com", 0), IconKey::new("xa.com", 0));
    }
}
