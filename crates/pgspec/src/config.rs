use crate::operator::{JoinKind, Wildcard};
use crate::spec::DEFAULT_MIN_CHARS;
use serde::{Deserialize, Serialize};

/// Defaults applied by [`SpecificationBuilder`](crate::SpecificationBuilder)
/// before any per-predicate customisation.
///
/// Missing keys fall back to their defaults when deserializing, so a partial
/// `[filters]` table in a config file is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Distinct flag propagated onto every top-level predicate.
    pub distinct: bool,
    /// Minimum trimmed length of a LIKE fragment.
    pub like_min_chars: usize,
    /// Whether LIKE compares upper-cased values.
    pub like_ignore_case: bool,
    pub like_wildcard: Wildcard,
    /// Join kind for association paths.
    pub join: JoinKind,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            distinct: true,
            like_min_chars: DEFAULT_MIN_CHARS,
            like_ignore_case: true,
            like_wildcard: Wildcard::Absence,
            join: JoinKind::Inner,
        }
    }
}

impl BuilderConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn with_like_min_chars(mut self, min_chars: usize) -> Self {
        self.like_min_chars = min_chars;
        self
    }

    pub fn with_like_ignore_case(mut self, ignore_case: bool) -> Self {
        self.like_ignore_case = ignore_case;
        self
    }

    pub fn with_like_wildcard(mut self, wildcard: Wildcard) -> Self {
        self.like_wildcard = wildcard;
        self
    }

    pub fn with_join(mut self, join: JoinKind) -> Self {
        self.join = join;
        self
    }
}
