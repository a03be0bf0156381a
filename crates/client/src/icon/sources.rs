//! Favicon source generators.
//!
//! A fixed ordered set of fallback strategies for deriving an icon URL from
//! a domain. Callers walk the list by index: the resolver itself never
//! advances to the next source, so "try the next one" stays a caller-driven
//! retry.

/// One favicon URL strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaviconSource {
    /// Google's favicon service; the only source that honors a size.
    Google,
    /// DuckDuckGo's icon proxy, fixed size.
    DuckDuckGo,
    /// The domain's own /favicon.ico, fixed size.
    Direct,
}

/// Number of favicon sources, in fallback order.
pub const SOURCE_COUNT: u32 = 3;

impl FaviconSource {
    /// The source at a fallback position, if any.
    pub fn for_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Google),
            1 => Some(Self::DuckDuckGo),
            2 => Some(Self::Direct),
            _ => None,
        }
    }

    /// Fallback position of this source.
    pub fn index(self) -> u32 {
        match self {
            Self::Google => 0,
            Self::DuckDuckGo => 1,
            Self::Direct => 2,
        }
    }

    /// Build the favicon URL for a domain.
    ///
    /// `size` is consumed only by sources that support it.
    pub fn url_for(self, domain: &str, size: u32) -> String {
        match self {
            Self::Google => format!("https://www.google.com/s2/favicons?domain={domain}&sz={size}"),
            Self::DuckDuckGo => format!("https://icons.duckduckgo.com/ip3/{domain}.ico"),
            Self::Direct => format!("https://{domain}/favicon.ico"),
        }
    }
}
