//! Visual effects (shadows and blurs) to style directives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{ColorValue, Rgba};
use crate::style::{px, StyleMap};
use crate::{ResolveError, ResolveResult};

/// Effect type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    /// Outer shadow.
    DropShadow,
    /// Inset shadow.
    InnerShadow,
    /// Blur of the layer itself.
    LayerBlur,
    /// Blur of whatever is behind the layer.
    BackgroundBlur,
    /// Unrecognized or absent type; ignored.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Shadow offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

/// An effect descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Effect type.
    #[serde(rename = "type", default)]
    pub kind: EffectKind,
    /// Shadow color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    /// Shadow offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    /// Blur radius in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Effect {
    /// Create a shadow effect.
    #[must_use]
    pub fn shadow(kind: EffectKind, color: Rgba, x: f64, y: f64, radius: f64) -> Self {
        Self {
            kind,
            color: Some(color.into()),
            offset: Some(Offset { x, y }),
            radius: Some(radius),
        }
    }

    /// Create a blur effect.
    #[must_use]
    pub fn blur(kind: EffectKind, radius: f64) -> Self {
        Self {
            kind,
            color: None,
            offset: None,
            radius: Some(radius),
        }
    }

    fn radius(&self) -> ResolveResult<f64> {
        self.radius
            .ok_or_else(|| ResolveError::missing("effect.radius"))
    }

    fn shadow_value(&self) -> ResolveResult<String> {
        let color = self
            .color
            .as_ref()
            .ok_or_else(|| ResolveError::missing("effect.color"))?;
        let offset = self
            .offset
            .ok_or_else(|| ResolveError::missing("effect.offset"))?;

        Ok(format!(
            "{} {} {} {}",
            px(offset.x),
            px(offset.y),
            px(self.radius()?),
            color.parse()?.to_hex()?
        ))
    }

    fn blur_value(&self) -> ResolveResult<String> {
        Ok(format!("blur({})", px(self.radius()?)))
    }
}

/// Parse an effect list from raw document JSON.
///
/// # Errors
///
/// Returns [`ResolveError::Malformed`] if the value is not a list of effects.
pub fn parse_effects(value: &Value) -> ResolveResult<Vec<Effect>> {
    Ok(Vec::<Effect>::deserialize(value)?)
}

/// Resolve an ordered effect list into style directives.
///
/// Later effects targeting the same key replace earlier ones. Unknown effect
/// types are ignored.
///
/// # Errors
///
/// Returns an error if a recognized effect lacks a field it needs or carries
/// an invalid color.
pub fn resolve_effects(effects: &[Effect]) -> ResolveResult<StyleMap> {
    let mut styles = StyleMap::new();

    for effect in effects {
        match effect.kind {
            EffectKind::DropShadow => styles.set("boxShadow", effect.shadow_value()?),
            EffectKind::InnerShadow => {
                styles.set("boxShadow", format!("inset {}", effect.shadow_value()?));
            }
            EffectKind::LayerBlur => styles.set("filter", effect.blur_value()?),
            EffectKind::BackgroundBlur => styles.set("backdropFilter", effect.blur_value()?),
            EffectKind::Unknown => {
                tracing::trace!("Ignoring effect of unrecognized type");
            }
        }
    }

    Ok(styles)
}
