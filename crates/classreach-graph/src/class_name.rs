//! Canonical class names.
//!
//! A reference read out of a class file can come in several shapes: the
//! internal form (`com/example/Foo`), an array encoding (`[Lcom/example/Foo;`)
//! or a field descriptor (`Lcom/example/Foo;`). Everything downstream of the
//! reader compares and stores [`ClassName`], which is always the plain dotted
//! form (`com.example.Foo`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive type keywords that never name a loadable class.
const PRIMITIVE_KEYWORDS: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Fully-qualified, dot-separated class name with no array or descriptor markers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    /// Normalize a raw reference into a canonical class name.
    ///
    /// Returns `None` when the reference does not denote a loadable class:
    /// primitive arrays (`[I`, `[[J`), primitive keywords and empty input.
    ///
    /// ```
    /// use classreach_graph::ClassName;
    ///
    /// let name = ClassName::from_reference("[[Lcom/example/Foo;").unwrap();
    /// assert_eq!(name.as_str(), "com.example.Foo");
    /// assert!(ClassName::from_reference("[I").is_none());
    /// ```
    pub fn from_reference(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let stripped = raw.trim_start_matches('[');
        let is_array = stripped.len() != raw.len();

        let body = if let Some(inner) = stripped
            .strip_prefix('L')
            .and_then(|rest| rest.strip_suffix(';'))
        {
            inner
        } else if is_array {
            // Array element that is not an object type is a primitive marker.
            return None;
        } else {
            stripped.strip_suffix(';').unwrap_or(stripped)
        };

        if body.is_empty() || PRIMITIVE_KEYWORDS.contains(&body) {
            return None;
        }

        let dotted = body.replace('/', ".");
        if dotted.starts_with('.') || dotted.ends_with('.') || dotted.contains("..") {
            return None;
        }

        Some(Self(dotted))
    }

    /// Dotted form, e.g. `com.example.Foo$Inner`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Internal (slash-separated) form used inside class files and archives.
    pub fn internal_name(&self) -> String {
        self.0.replace('.', "/")
    }

    /// Root-relative path of the defining artifact, e.g. `com/example/Foo.class`.
    pub fn relative_path(&self) -> String {
        format!("{}.class", self.internal_name())
    }

    /// Package portion of the name, empty for the default package.
    pub fn package(&self) -> &str {
        self.0.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
    }

    /// Last segment of the name, including any `$` nesting suffix.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once('.').map(|(_, name)| name).unwrap_or(&self.0)
    }

    /// Check whether this name lives at or under the given dotted prefix.
    ///
    /// `com.example` matches `com.example` and `com.example.Foo`,
    /// but not `com.examples.Foo`.
    pub fn is_under(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches(".*").trim_end_matches('.');
        if prefix.is_empty() {
            return true;
        }
        self.0 == prefix
            || (self.0.starts_with(prefix) && self.0.as_bytes().get(prefix.len()) == Some(&b'.'))
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> Option<String> {
        ClassName::from_reference(raw).map(|n| n.as_str().to_string())
    }

    #[test]
    fn test_internal_form_is_dotted() {
        assert_eq!(name("com/example/Foo").as_deref(), Some("com.example.Foo"));
        assert_eq!(name("com.example.Foo").as_deref(), Some("com.example.Foo"));
    }

    #[test]
    fn test_array_markers_are_stripped() {
        assert_eq!(name("[Lcom/example/Foo;").as_deref(), Some("com.example.Foo"));
        assert_eq!(name("[[[Lcom/example/Foo;").as_deref(), Some("com.example.Foo"));
        assert_eq!(name("Lcom/example/Foo;").as_deref(), Some("com.example.Foo"));
    }

    #[test]
    fn test_primitive_markers_are_rejected() {
        assert_eq!(name("[I"), None);
        assert_eq!(name("[[D"), None);
        assert_eq!(name("int"), None);
        assert_eq!(name("void"), None);
        assert_eq!(name(""), None);
        assert_eq!(name("[L;"), None);
    }

    #[test]
    fn test_nested_class_keeps_dollar() {
        let n = ClassName::from_reference("com/example/Outer$Inner").unwrap();
        assert_eq!(n.simple_name(), "Outer$Inner");
        assert_eq!(n.package(), "com.example");
        assert_eq!(n.relative_path(), "com/example/Outer$Inner.class");
    }

    #[test]
    fn test_default_package() {
        let n = ClassName::from_reference("Main").unwrap();
        assert_eq!(n.package(), "");
        assert_eq!(n.simple_name(), "Main");
        assert_eq!(n.relative_path(), "Main.class");
    }

    #[test]
    fn test_is_under_respects_segment_boundary() {
        let n = ClassName::from_reference("com.examples.Foo").unwrap();
        assert!(n.is_under("com"));
        assert!(n.is_under("com.examples"));
        assert!(n.is_under("com.examples.*"));
        assert!(n.is_under("com.examples."));
        assert!(!n.is_under("com.example"));
        assert!(!n.is_under("org"));
    }

    #[test]
    fn test_ordering_is_string_order() {
        let mut names = vec![
            ClassName::from_reference("b.A").unwrap(),
            ClassName::from_reference("a.Z").unwrap(),
            ClassName::from_reference("a.B").unwrap(),
        ];
        names.sort();
        let sorted: Vec<_> = names.iter().map(ClassName::as_str).collect();
        assert_eq!(sorted, vec!["a.B", "a.Z", "b.A"]);
    }
}
