//! Hierarchical datastore keys.
//!
//! A key is a slash-separated path that always starts with `/` and never
//! ends with one (except the root key `/`). Keys order lexicographically,
//! so every key under a namespace sits in one contiguous range.

use std::fmt;

/// Slash-separated datastore key, e.g. `/onchain/height/100`
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Create a key from a path, cleaning it into canonical form.
    ///
    /// Empty segments are dropped, so `"meta"`, `"/meta/"` and `"//meta"`
    /// all become `/meta`.
    pub fn new(path: impl AsRef<str>) -> Self {
        let mut out = String::with_capacity(path.as_ref().len() + 1);
        for segment in path.as_ref().split('/').filter(|s| !s.is_empty()) {
            out.push('/');
            out.push_str(segment);
        }
        if out.is_empty() {
            out.push('/');
        }
        Self(out)
    }

    /// The root key `/`
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Whether this is the root key
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Append a single segment. Slashes inside `segment` nest further.
    #[must_use]
    pub fn child_string(&self, segment: impl AsRef<str>) -> Self {
        if self.is_root() {
            Self::new(segment)
        } else {
            Self::new(format!("{}/{}", self.0, segment.as_ref()))
        }
    }

    /// Append another key below this one
    #[must_use]
    pub fn child(&self, other: &Self) -> Self {
        self.child_string(&other.0)
    }

    /// Whether `other` lives strictly below this key
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.range_prefix()) && other.0.len() > self.0.len()
    }

    /// Last path segment (empty for the root key)
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// String prefix shared by every descendant of this key
    pub(crate) fn range_prefix(&self) -> String {
        if self.is_root() {
            self.0.clone()
        } else {
            format!("{}/", self.0)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
