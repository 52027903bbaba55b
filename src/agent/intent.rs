//! Intent labels for turn routing

use std::fmt;

/// The closed set of labels a turn can route to
///
/// Exactly one handler runs per turn, picked by this label. The set is
/// closed on purpose: dispatch is exhaustive, and anything the classifier
/// emits outside the set degrades to [`Intent::Chat`] in the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// General conversation
    Chat,
    /// Web research with summarization
    Search,
    /// Document-to-CSV conversion
    Document,
}

impl Intent {
    /// Parse a classifier label, normalizing whitespace and case
    ///
    /// Returns `None` for anything outside the fixed label set.
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::agent::Intent;
    ///
    /// assert_eq!(Intent::from_label("search"), Some(Intent::Search));
    /// assert_eq!(Intent::from_label("  Document\n"), Some(Intent::Document));
    /// assert_eq!(Intent::from_label("banana"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "chat" => Some(Intent::Chat),
            "search" => Some(Intent::Search),
            "document" => Some(Intent::Document),
            _ => None,
        }
    }

    /// The canonical label string for this intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Chat => "chat",
            Intent::Search => "search",
            Intent::Document => "document",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
