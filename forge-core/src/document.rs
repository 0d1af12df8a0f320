//! Design document model.
//!
//! Only the subset of the design-tool format consumed by the resolver is
//! modelled. Candidate frames are kept as raw JSON so that a malformed frame
//! fails on its own when it is resolved, without poisoning the whole document.
//! Within a node, the decorative properties (`strokes`, `strokeWeight`,
//! `effects`, `constraints`) are also kept raw and parsed only when resolved,
//! so a malformed one skips that node instead of failing its frame.
//!
//! ```json
//! {
//!   "name": "Landing page",
//!   "document": {
//!     "children": [
//!       { "children": [ { "type": "FRAME", "absoluteBoundingBox": {...}, "children": [...] } ] }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{ColorValue, Rgba};
use crate::constraint::Constraints;
use crate::effect::{parse_effects, Effect};
use crate::ResolveResult;

/// Node type tag identifying frames among top-level children.
pub const FRAME_TYPE: &str = "FRAME";

/// A fetched design document. Read-only once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentTree {
    /// Document name, carried into every frame's metadata.
    pub name: String,
    /// Root node.
    pub document: DocumentRoot,
}

/// The document root node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentRoot {
    /// First-level containers (pages).
    #[serde(default)]
    pub children: Vec<Container>,
}

/// A first-level container whose children are candidate frames.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Container {
    /// Candidate frames, unparsed.
    #[serde(default)]
    pub children: Vec<Value>,
}

/// A frame scheduled for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSlot {
    /// Position among the candidate children of the first container.
    pub position: usize,
    /// Frame index: 0 for single-frame documents, otherwise 1-based.
    pub frame_index: u32,
}

impl DocumentTree {
    /// Parse a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or lacks `name` / `document`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Children of the first-level container, or nothing if there is none.
    #[must_use]
    pub fn candidates(&self) -> &[Value] {
        self.document
            .children
            .first()
            .map(|container| container.children.as_slice())
            .unwrap_or_default()
    }

    /// Frame slots in document order.
    ///
    /// Only children tagged `FRAME` count. A document with exactly one frame
    /// gets index 0; otherwise frames are numbered from 1.
    #[must_use]
    pub fn frame_slots(&self) -> Vec<FrameSlot> {
        let positions: Vec<usize> = self
            .candidates()
            .iter()
            .enumerate()
            .filter(|(_, child)| is_frame(child))
            .map(|(position, _)| position)
            .collect();

        let single = positions.len() == 1;
        positions
            .into_iter()
            .zip(1u32..)
            .map(|(position, counter)| FrameSlot {
                position,
                frame_index: if single { 0 } else { counter },
            })
            .collect()
    }
}

fn is_frame(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(FRAME_TYPE)
}

/// Absolute box in document coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// A paint entry from `background` or `fills`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Paint {
    /// Paint type (`SOLID`, `GRADIENT_LINEAR`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Solid color, absent for gradients and images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
}

/// The places a node or frame may declare its background paint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaintSources {
    /// Direct background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorValue>,
    /// Legacy background paint list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub background: Vec<Paint>,
    /// Fill paint list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
}

type PaintAccessor = fn(&PaintSources) -> Option<&ColorValue>;

fn direct_background(paint: &PaintSources) -> Option<&ColorValue> {
    paint.background_color.as_ref()
}

fn first_background(paint: &PaintSources) -> Option<&ColorValue> {
    paint.background.first().and_then(|p| p.color.as_ref())
}

fn first_fill(paint: &PaintSources) -> Option<&ColorValue> {
    paint.fills.first().and_then(|p| p.color.as_ref())
}

/// Paint lookups in precedence order; the first present color wins.
const PAINT_PRECEDENCE: [PaintAccessor; 3] = [direct_background, first_background, first_fill];

impl PaintSources {
    /// The effective background color, if any source declares one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResolveError::InvalidColorInput`] if the winning color
    /// is malformed. Lower-precedence colors are not consulted.
    pub fn resolve(&self) -> ResolveResult<Option<Rgba>> {
        PAINT_PRECEDENCE
            .iter()
            .find_map(|accessor| accessor(self))
            .map(ColorValue::parse)
            .transpose()
    }
}

/// A stroke entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stroke {
    /// Stroke style (`SOLID`, `DASHED`, ...); defaults to solid.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    /// Stroke weight in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Typography declared on a text node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    /// Font family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Numeric font weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    /// Letter spacing in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    /// Unitless line height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    /// Line height in pixels; wins over `line_height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_px: Option<f64>,
}

/// Auto-layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    /// Children stacked top to bottom.
    Vertical,
    /// Children laid out left to right.
    Horizontal,
    /// Any other declared mode.
    #[serde(other)]
    Other,
}

impl LayoutMode {
    /// CSS `flex-direction` for this mode.
    #[must_use]
    pub fn flex_direction(self) -> &'static str {
        match self {
            Self::Vertical => "column",
            Self::Horizontal | Self::Other => "row",
        }
    }
}

/// A visual element inside a frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node identifier, used as the asset key.
    #[serde(default)]
    pub id: String,
    /// Human-authored name; its first token selects the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Preferred geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<BoundingBox>,
    /// Fallback geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_render_bounds: Option<BoundingBox>,
    /// Paint sources.
    #[serde(flatten)]
    pub paint: PaintSources,
    /// Strokes, unparsed; only the first is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Value>,
    /// Node-level stroke weight, unparsed. Used when the stroke has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<Value>,
    /// Visual effects, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Value>,
    /// Resize constraints, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Value>,
    /// Uniform corner radius in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    /// Auto-layout mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    /// Typography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,
    /// Literal text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
}

impl Node {
    /// Geometry box: bounding box if present, else render bounds.
    #[must_use]
    pub fn geometry(&self) -> Option<&BoundingBox> {
        self.absolute_bounding_box
            .as_ref()
            .or(self.absolute_render_bounds.as_ref())
    }

    /// Parsed constraints, if declared.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResolveError::Malformed`] if they do not parse.
    pub fn parse_constraints(&self) -> ResolveResult<Option<Constraints>> {
        self.constraints
            .as_ref()
            .map(Constraints::from_value)
            .transpose()
    }

    /// Parsed effects, if declared.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResolveError::Malformed`] if they do not parse.
    pub fn parse_effects(&self) -> ResolveResult<Option<Vec<Effect>>> {
        self.effects.as_ref().map(parse_effects).transpose()
    }

    /// The first stroke, with the node-level weight filled in when the stroke
    /// declares none.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResolveError::Malformed`] if the strokes or the
    /// node-level weight do not parse.
    pub fn first_stroke(&self) -> ResolveResult<Option<Stroke>> {
        let Some(strokes) = &self.strokes else {
            return Ok(None);
        };
        let Some(mut stroke) = Vec::<Stroke>::deserialize(strokes)?.into_iter().next() else {
            return Ok(None);
        };
        if stroke.weight.is_none() {
            stroke.weight = self
                .stroke_weight
                .as_ref()
                .map(f64::deserialize)
                .transpose()?;
        }
        Ok(Some(stroke))
    }
}

/// A top-level frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame identifier.
    #[serde(default)]
    pub id: String,
    /// Frame name.
    #[serde(default)]
    pub name: String,
    /// Frame geometry; required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<BoundingBox>,
    /// Paint sources.
    #[serde(flatten)]
    pub paint: PaintSources,
    /// Visual effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<Effect>>,
    /// Resize constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Child nodes; required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}
