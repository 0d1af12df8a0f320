//! Resize constraints to positional style directives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::style::StyleMap;
use crate::ResolveResult;

/// How a node responds to horizontal resizing of its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalConstraint {
    /// Pinned to the left edge.
    #[default]
    Left,
    /// Pinned to the right edge.
    Right,
    /// Centered.
    Center,
    /// Stretches with the parent.
    Scale,
    /// Any other value (e.g. `LEFT_RIGHT`); produces no directive.
    #[serde(other)]
    Other,
}

/// How a node responds to vertical resizing of its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalConstraint {
    /// Pinned to the top edge.
    #[default]
    Top,
    /// Pinned to the bottom edge.
    Bottom,
    /// Centered.
    Center,
    /// Stretches with the parent.
    Scale,
    /// Any other value (e.g. `TOP_BOTTOM`); produces no directive.
    #[serde(other)]
    Other,
}

/// Axis constraints. Defaults to `{LEFT, TOP}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Horizontal behavior.
    #[serde(default)]
    pub horizontal: HorizontalConstraint,
    /// Vertical behavior.
    #[serde(default)]
    pub vertical: VerticalConstraint,
}

impl Constraints {
    /// Create a constraint pair.
    #[must_use]
    pub const fn new(horizontal: HorizontalConstraint, vertical: VerticalConstraint) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Parse from raw document JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResolveError::Malformed`] if either axis is not a string.
    pub fn from_value(value: &Value) -> ResolveResult<Self> {
        Ok(Self::deserialize(value)?)
    }
}

type Directive = (&'static str, &'static str);

/// Accumulates constraint directives for one node.
///
/// Axes may be applied in either order. Output is always the horizontal
/// directive, then the vertical one, then the centering `transform` (X before
/// Y). Applying an axis again replaces its earlier directive.
#[derive(Debug, Default)]
pub struct ConstraintStyles {
    horizontal: Option<Directive>,
    vertical: Option<Directive>,
    translate_x: bool,
    translate_y: bool,
}

impl ConstraintStyles {
    /// Start with no directives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the horizontal axis.
    pub fn horizontal(&mut self, constraint: HorizontalConstraint) -> &mut Self {
        self.horizontal = match constraint {
            HorizontalConstraint::Center => Some(("left", "50%")),
            HorizontalConstraint::Right => Some(("right", "0")),
            HorizontalConstraint::Scale => Some(("width", "100%")),
            HorizontalConstraint::Left | HorizontalConstraint::Other => None,
        };
        self.translate_x = constraint == HorizontalConstraint::Center;
        self
    }

    /// Apply the vertical axis.
    pub fn vertical(&mut self, constraint: VerticalConstraint) -> &mut Self {
        self.vertical = match constraint {
            VerticalConstraint::Center => Some(("top", "50%")),
            VerticalConstraint::Bottom => Some(("bottom", "0")),
            VerticalConstraint::Scale => Some(("height", "100%")),
            VerticalConstraint::Top | VerticalConstraint::Other => None,
        };
        self.translate_y = constraint == VerticalConstraint::Center;
        self
    }

    /// Finish, appending the shared `transform` directive if any axis is centered.
    #[must_use]
    pub fn finish(self) -> StyleMap {
        let mut styles: StyleMap = self.horizontal.into_iter().chain(self.vertical).collect();
        let transform: Vec<&str> = [
            (self.translate_x, "translateX(-50%)"),
            (self.translate_y, "translateY(-50%)"),
        ]
        .into_iter()
        .filter_map(|(enabled, value)| enabled.then_some(value))
        .collect();

        if !transform.is_empty() {
            styles.set("transform", transform.join(" "));
        }
        styles
    }
}

/// Resolve a constraint pair into style directives.
#[must_use]
pub fn resolve_constraints(constraints: Constraints) -> StyleMap {
    let mut builder = ConstraintStyles::new();
    builder
        .horizontal(constraints.horizontal)
        .vertical(constraints.vertical);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_produces_nothing() {
        assert!(resolve_constraints(Constraints::default()).is_empty());
    }

    #[test]
    fn test_horizontal_directives() {
        let right = resolve_constraints(Constraints::new(
            HorizontalConstraint::Right,
            VerticalConstraint::Top,
        ));
        assert_eq!(right.get("right"), Some("0"));

        let scale = resolve_constraints(Constraints::new(
            HorizontalConstraint::Scale,
            VerticalConstraint::Top,
        ));
        assert_eq!(scale.get("width"), Some("100%"));

        let center = resolve_constraints(Constraints::new(
            HorizontalConstraint::Center,
            VerticalConstraint::Top,
        ));
        assert_eq!(center.get("left"), Some("50%"));
        assert_eq!(center.get("transform"), Some("translateX(-50%)"));
    }

    #[test]
    fn test_vertical_directives() {
        let bottom = resolve_constraints(Constraints::new(
            HorizontalConstraint::Left,
            VerticalConstraint::Bottom,
        ));
        assert_eq!(bottom.get("bottom"), Some("0"));

        let scale = resolve_constraints(Constraints::new(
            HorizontalConstraint::Left,
            VerticalConstraint::Scale,
        ));
        assert_eq!(scale.get("height"), Some("100%"));

        let center = resolve_constraints(Constraints::new(
            HorizontalConstraint::Left,
            VerticalConstraint::Center,
        ));
        assert_eq!(center.get("top"), Some("50%"));
        assert_eq!(center.get("transform"), Some("translateY(-50%)"));
    }

    #[test]
    fn test_both_centered_share_transform() {
        let styles = resolve_constraints(Constraints::new(
            HorizontalConstraint::Center,
            VerticalConstraint::Center,
        ));
        assert_eq!(
            styles.get("transform"),
            Some("translateX(-50%) translateY(-50%)")
        );
    }

    #[test]
    fn test_axis_order_does_not_matter() {
        let mut x_first = ConstraintStyles::new();
        x_first
            .horizontal(HorizontalConstraint::Center)
            .vertical(VerticalConstraint::Center);

        let mut y_first = ConstraintStyles::new();
        y_first
            .vertical(VerticalConstraint::Center)
            .horizontal(HorizontalConstraint::Center);

        let a = x_first.finish();
        let b = y_first.finish();
        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
        assert_eq!(b.get("transform"), Some("translateX(-50%) translateY(-50%)"));
    }

    #[test]
    fn test_key_order_is_horizontal_then_vertical() {
        let mut y_first = ConstraintStyles::new();
        y_first
            .vertical(VerticalConstraint::Bottom)
            .horizontal(HorizontalConstraint::Right);

        let styles = y_first.finish();
        assert_eq!(
            styles.iter().collect::<Vec<_>>(),
            [("right", "0"), ("bottom", "0")]
        );
    }

    #[test]
    fn test_reapplying_an_axis_replaces_it() {
        let mut builder = ConstraintStyles::new();
        builder
            .horizontal(HorizontalConstraint::Center)
            .horizontal(HorizontalConstraint::Scale);

        let styles = builder.finish();
        assert_eq!(styles.iter().collect::<Vec<_>>(), [("width", "100%")]);
    }

    #[test]
    fn test_from_value_rejects_mistyped_axis() {
        let err = Constraints::from_value(&serde_json::json!({ "horizontal": 5 })).unwrap_err();
        assert!(matches!(err, crate::ResolveError::Malformed(_)));
    }

    #[test]
    fn test_parse_missing_axis_defaults() {
        let constraints: Constraints =
            serde_json::from_str(r#"{ "vertical": "BOTTOM" }"#).expect("should parse");
        assert_eq!(constraints.horizontal, HorizontalConstraint::Left);
        assert_eq!(constraints.vertical, VerticalConstraint::Bottom);
    }

    #[test]
    fn test_parse_stretch_constraints_as_other() {
        let constraints: Constraints =
            serde_json::from_str(r#"{ "horizontal": "LEFT_RIGHT", "vertical": "TOP_BOTTOM" }"#)
                .expect("should parse");
        assert!(resolve_constraints(constraints).is_empty());
    }

    fn arb_horizontal() -> impl Strategy<Value = HorizontalConstraint> {
        prop_oneof![
            Just(HorizontalConstraint::Left),
            Just(HorizontalConstraint::Right),
            Just(HorizontalConstraint::Center),
            Just(HorizontalConstraint::Scale),
            Just(HorizontalConstraint::Other),
        ]
    }

    fn arb_vertical() -> impl Strategy<Value = VerticalConstraint> {
        prop_oneof![
            Just(VerticalConstraint::Top),
            Just(VerticalConstraint::Bottom),
            Just(VerticalConstraint::Center),
            Just(VerticalConstraint::Scale),
            Just(VerticalConstraint::Other),
        ]
    }

    proptest! {
        #[test]
        fn prop_axes_commute(h in arb_horizontal(), v in arb_vertical()) {
            let mut forward = ConstraintStyles::new();
            forward.horizontal(h).vertical(v);
            let mut reverse = ConstraintStyles::new();
            reverse.vertical(v).horizontal(h);

            let forward = forward.finish();
            let reverse = reverse.finish();
            prop_assert_eq!(
                forward.iter().collect::<Vec<_>>(),
                reverse.iter().collect::<Vec<_>>()
            );
        }
    }
}
