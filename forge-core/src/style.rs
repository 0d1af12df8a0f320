//! Ordered style directive maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered mapping of CSS-like property names to values.
///
/// Setting a key that already exists replaces its value but keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(IndexMap<String, String>);

impl StyleMap {
    /// Create an empty style map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a directive, replacing any earlier value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get the value of a directive.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a directive is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Apply every directive of `other` on top of this map.
    pub fn merge(&mut self, other: StyleMap) {
        self.0.extend(other.0);
    }

    /// Number of directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Directive names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Directives in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Format a number the way CSS expects (`4` rather than `4.0`).
#[must_use]
pub fn css_number(value: f64) -> String {
    format!("{value}")
}

/// Format a number as a pixel length.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Truncate toward zero, matching how pixel geometry is snapped.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overrides_in_place() {
        let mut styles = StyleMap::new();
        styles.set("position", "absolute");
        styles.set("width", "100px");
        styles.set("position", "relative");

        assert_eq!(styles.get("position"), Some("relative"));
        assert_eq!(styles.keys().collect::<Vec<_>>(), ["position", "width"]);
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base: StyleMap = [("width", "100px"), ("height", "40px")].into_iter().collect();
        let overlay: StyleMap = [("width", "100%")].into_iter().collect();

        base.merge(overlay);

        assert_eq!(base.get("width"), Some("100%"));
        assert_eq!(base.get("height"), Some("40px"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let styles: StyleMap = [("zIndex", "1"), ("alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&styles).expect("should serialize");
        assert_eq!(json, r#"{"zIndex":"1","alpha":"2"}"#);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(px(4.0), "4px");
        assert_eq!(px(2.5), "2.5px");
        assert_eq!(css_number(700.0), "700");
        assert_eq!(truncate(-3.7), -3);
        assert_eq!(truncate(20.9), 20);
    }
}
