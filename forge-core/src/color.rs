//! Color conversion and contrast helpers.
//!
//! Design documents store colors as normalized channels in `[0, 1]`. These are
//! turned into `#rrggbb` hex strings for style output. Alpha is validated but
//! not encoded: styles always carry opaque six-digit hex.
//!
//! Colors inside documents are kept as [`ColorValue`] and only checked when a
//! style needs them, so a bad channel surfaces as
//! [`ResolveError::InvalidColorInput`] at the node that uses it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{ResolveError, ResolveResult};

/// Text color used on light backgrounds.
pub const DARK_TEXT: &str = "#000000";

/// Text color used on dark backgrounds.
pub const LIGHT_TEXT: &str = "#ffffff";

/// Background used for frames that declare no paint.
pub const DEFAULT_FRAME_BACKGROUND: &str = "#ffffff";

/// Luminance above which dark text is chosen.
const LUMINANCE_THRESHOLD: f64 = 0.5;

/// A color with normalized channels, as found in design documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel in `[0, 1]`.
    pub r: f64,
    /// Green channel in `[0, 1]`.
    pub g: f64,
    /// Blue channel in `[0, 1]`.
    pub b: f64,
    /// Optional alpha channel in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl Rgba {
    /// Create an opaque color without an explicit alpha channel.
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    /// Format as `#rrggbb`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidColorInput`] if any channel is out of range.
    pub fn to_hex(&self) -> ResolveResult<String> {
        rgb_to_hex(self.r, self.g, self.b, self.a)
    }

    /// Text color with adequate contrast against this color.
    #[must_use]
    pub fn foreground(&self) -> &'static str {
        foreground_color(self.r, self.g, self.b)
    }
}

/// A color exactly as written in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorValue(Value);

impl ColorValue {
    /// Check and convert to [`Rgba`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidColorInput`] if a channel is missing,
    /// non-numeric or out of range.
    pub fn parse(&self) -> ResolveResult<Rgba> {
        parse_color(&self.0)
    }
}

impl From<Rgba> for ColorValue {
    fn from(color: Rgba) -> Self {
        let mut value = json!({ "r": color.r, "g": color.g, "b": color.b });
        if let Some(a) = color.a {
            value["a"] = json!(a);
        }
        Self(value)
    }
}

/// Parse a `{ r, g, b, a? }` color object.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidColorInput`] naming the first channel that
/// is missing, non-numeric or outside `[0, 1]`.
pub fn parse_color(value: &Value) -> ResolveResult<Rgba> {
    let channel = |name: &'static str| -> ResolveResult<Option<f64>> {
        match value.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => match raw.as_f64() {
                Some(v) => check_channel(name, v).map(Some),
                None => Err(invalid(name, raw.to_string())),
            },
        }
    };
    let required = |name: &'static str| -> ResolveResult<f64> {
        channel(name)?.ok_or_else(|| invalid(name, "missing".to_string()))
    };

    Ok(Rgba {
        r: required("r")?,
        g: required("g")?,
        b: required("b")?,
        a: channel("a")?,
    })
}

/// Convert normalized channels to a `#rrggbb` hex string.
///
/// The alpha channel is range-checked when present but is not part of the
/// output.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidColorInput`] if any channel is outside
/// `[0, 1]` or is not finite.
pub fn rgb_to_hex(r: f64, g: f64, b: f64, a: Option<f64>) -> ResolveResult<String> {
    let r = channel_byte("r", r)?;
    let g = channel_byte("g", g)?;
    let b = channel_byte("b", b)?;
    if let Some(a) = a {
        check_channel("a", a)?;
    }
    Ok(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Pick dark or light text for a background using Rec. 601 luma weights.
#[must_use]
pub fn foreground_color(r: f64, g: f64, b: f64) -> &'static str {
    let luminance = 0.299 * r + 0.587 * g + 0.114 * b;
    if luminance > LUMINANCE_THRESHOLD {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

fn invalid(channel: &'static str, value: String) -> ResolveError {
    ResolveError::InvalidColorInput { channel, value }
}

fn check_channel(channel: &'static str, value: f64) -> ResolveResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(invalid(channel, value.to_string()))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_byte(channel: &'static str, value: f64) -> ResolveResult<u8> {
    let value = check_channel(channel, value)?;
    Ok((value * 255.0).round().clamp(0.0, 255.0) as u8)
}
