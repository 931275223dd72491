//! Relative resource paths.
//!
//! A [`ResourcePath`] is a list of segments joined with `/` and resolved
//! against one of the client's base URLs. Ids are appended with
//! [`join`](ResourcePath::join), so callers never format slashes by hand.
//!
//! # Example
//!
//! ```rust
//! use xplenty_api::rest::ResourcePath;
//!
//! let path = ResourcePath::new("clusters").join(42).join("watchers");
//! assert_eq!(path.to_string(), "clusters/42/watchers");
//!
//! let connection = ResourcePath::from_segments(["connections", "s3", "7"]);
//! assert_eq!(connection.to_string(), "connections/s3/7");
//! ```

use std::fmt::{self, Display};

/// A relative API path made of non-empty segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// Parses a slash-separated path, dropping empty segments.
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self::from_segments(path.split('/').filter(|s| !s.is_empty()))
    }

    /// Builds a path from individual segments.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        let mut path = Self::default();
        path.extend(segments);
        path
    }

    /// Returns the path with one more segment appended.
    ///
    /// A segment containing `/` is split, so `join("a/b")` appends two.
    #[must_use]
    pub fn join(mut self, segment: impl Display) -> Self {
        self.push(&segment.to_string());
        self
    }

    /// Appends every segment from an iterator.
    pub fn extend<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        for segment in segments {
            self.push(&segment.to_string());
        }
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn push(&mut self, segment: &str) {
        self.segments.extend(
            segment
                .split('/')
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
    }
}

impl Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<&str> for ResourcePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ResourcePath {
    fn from(path: String) -> Self {
        Self::new(&path)
    }
}

impl From<&ResourcePath> for ResourcePath {
    fn from(path: &ResourcePath) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_drops_empty_segments() {
        let path = ResourcePath::new("/clusters//42/");
        assert_eq!(path.segments(), &["clusters", "42"]);
        assert_eq!(path.to_string(), "clusters/42");
    }

    #[test]
    fn test_join_accepts_numbers_and_nested_segments() {
        let path = ResourcePath::new("packages").join(7).join("validations/3");
        assert_eq!(path.to_string(), "packages/7/validations/3");
        assert_eq!(path.segments().len(), 4);
    }

    #[test]
    fn test_from_segments() {
        let path = ResourcePath::from_segments(vec!["user", "keys"]);
        assert_eq!(path, ResourcePath::from("user/keys"));
    }

    #[test]
    fn test_empty_path_displays_empty() {
        assert_eq!(ResourcePath::new("").to_string(), "");
        assert_eq!(ResourcePath::default().segments().len(), 0);
    }
}
