//! Frame resolution.
//!
//! Turns each child node of a frame into an absolutely positioned, styled
//! component and collects the frame's own metadata. Style passes run in a
//! fixed order, later passes overriding earlier ones on shared keys:
//!
//! ```text
//! geometry -> constraints -> effects -> paint -> border
//!          -> role (form attributes / typography) -> rounding
//!          -> responsive defaults -> layout
//! ```
//!
//! Image nodes are not fetched here. Each one produces an [`AssetRequest`] that
//! the caller may hand to an asset fetcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::color::DEFAULT_FRAME_BACKGROUND;
use crate::constraint::resolve_constraints;
use crate::document::{BoundingBox, DocumentTree, Frame, FrameSlot, Node, Stroke, TypeStyle};
use crate::effect::resolve_effects;
use crate::error::decoration;
use crate::role::ElementRole;
use crate::style::{css_number, px, truncate, StyleMap};
use crate::{ResolveError, ResolveResult};

/// A node with its resolved style and role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNode {
    /// Source node identifier.
    pub id: String,
    /// Source node name.
    pub name: String,
    /// Inferred UI role.
    pub role: ElementRole,
    /// HTML tag for the role.
    pub tag: String,
    /// Resolved style directives.
    pub style: StyleMap,
    /// Input type for form controls and buttons.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Initial checked state for checkboxes and radios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Literal text for textual roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Relative path of the fetched asset, filled in by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

/// Metadata describing the frame itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetadata {
    /// Frame width in whole pixels.
    pub width: i64,
    /// Frame height in whole pixels.
    pub height: i64,
    /// Frame background as hex.
    pub background_color: String,
    /// Document name.
    pub name: String,
    /// Frame index (0 for single-frame documents).
    pub frame_index: u32,
    /// Frame description.
    pub description: String,
    /// Frame effect directives.
    pub effects: StyleMap,
    /// Frame constraint directives.
    pub constraints: StyleMap,
}

/// A request to rasterize and store an image node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// Index into [`ResolvedFrame::components`].
    pub component: usize,
    /// Node to rasterize.
    pub node_id: String,
    /// File stem for the stored asset.
    pub asset_name: String,
}

/// Resolution result for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFrame {
    /// Resolved child nodes in document order.
    pub components: Vec<ResolvedNode>,
    /// Frame metadata.
    pub frame: FrameMetadata,
    /// Assets the caller should fetch.
    #[serde(skip)]
    pub asset_requests: Vec<AssetRequest>,
    /// Nodes skipped because a decorative property failed to resolve.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Resolve a parsed frame.
///
/// # Errors
///
/// Returns an error if the frame lacks its bounding box or children, or if a
/// node fails in a way that is not confined to a decorative property.
pub fn resolve_frame(
    frame: &Frame,
    document_name: &str,
    frame_index: u32,
) -> ResolveResult<ResolvedFrame> {
    FrameResolver::new(frame, document_name, frame_index)?.resolve()
}

/// Parse and resolve a frame from raw document JSON.
///
/// # Errors
///
/// Returns [`ResolveError::Malformed`] if the JSON does not match the frame
/// shape, otherwise the same errors as [`resolve_frame`].
pub fn resolve_frame_value(
    value: &Value,
    document_name: &str,
    frame_index: u32,
) -> ResolveResult<ResolvedFrame> {
    let frame = Frame::deserialize(value)?;
    resolve_frame(&frame, document_name, frame_index)
}

impl DocumentTree {
    /// Resolve the frame in the given slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot does not point at a candidate or the frame
    /// fails to resolve.
    pub fn resolve_slot(&self, slot: FrameSlot) -> ResolveResult<ResolvedFrame> {
        let value = self
            .candidates()
            .get(slot.position)
            .ok_or_else(|| ResolveError::missing(format!("frame at position {}", slot.position)))?;
        resolve_frame_value(value, &self.name, slot.frame_index)
    }

    /// Resolve every frame sequentially, in document order.
    ///
    /// Frames that fail are logged and left out.
    #[must_use]
    pub fn resolve_all(&self) -> Vec<ResolvedFrame> {
        self.frame_slots()
            .into_iter()
            .filter_map(|slot| match self.resolve_slot(slot) {
                Ok(frame) => Some(frame),
                Err(err) => {
                    warn!(frame_index = slot.frame_index, error = %err, "Frame resolution failed");
                    None
                }
            })
            .collect()
    }
}

/// Per-frame resolver state.
struct FrameResolver<'a> {
    frame: &'a Frame,
    origin: &'a BoundingBox,
    children: &'a [Node],
    document_name: &'a str,
    frame_index: u32,
    /// Fallback counter for unnamed image assets.
    image_count: u32,
    warnings: Vec<String>,
    asset_requests: Vec<AssetRequest>,
}

impl<'a> FrameResolver<'a> {
    fn new(frame: &'a Frame, document_name: &'a str, frame_index: u32) -> ResolveResult<Self> {
        let origin = frame
            .absolute_bounding_box
            .as_ref()
            .ok_or_else(|| ResolveError::missing("frame.absoluteBoundingBox"))?;
        let children = frame
            .children
            .as_deref()
            .ok_or_else(|| ResolveError::missing("frame.children"))?;

        Ok(Self {
            frame,
            origin,
            children,
            document_name,
            frame_index,
            image_count: 0,
            warnings: Vec::new(),
            asset_requests: Vec::new(),
        })
    }

    fn resolve(mut self) -> ResolveResult<ResolvedFrame> {
        let mut components = Vec::with_capacity(self.children.len());

        for node in self.children {
            match self.resolve_node(node) {
                Ok(resolved) => {
                    if resolved.role.is_asset() {
                        let asset_name = self.asset_name(&resolved.name);
                        self.asset_requests.push(AssetRequest {
                            component: components.len(),
                            node_id: resolved.id.clone(),
                            asset_name,
                        });
                    }
                    components.push(resolved);
                }
                Err(err) if err.is_node_local() => {
                    warn!(frame_index = self.frame_index, error = %err, "Skipping node");
                    self.warnings.push(err.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        let frame = self.metadata()?;
        debug!(
            frame_index = self.frame_index,
            components = components.len(),
            assets = self.asset_requests.len(),
            "Resolved frame"
        );

        Ok(ResolvedFrame {
            components,
            frame,
            asset_requests: self.asset_requests,
            warnings: self.warnings,
        })
    }

    fn resolve_node(&self, node: &Node) -> ResolveResult<ResolvedNode> {
        let name = node
            .name
            .as_deref()
            .ok_or_else(|| ResolveError::missing("node.name"))?;
        let bounds = node.geometry().ok_or_else(|| ResolveError::MissingGeometry {
            node: name.to_string(),
        })?;

        let mut style = self.geometry(bounds);

        if let Some(constraints) = decoration(name, "constraints", node.parse_constraints())? {
            style.merge(resolve_constraints(constraints));
        }

        if let Some(effects) = decoration(name, "effects", node.parse_effects())? {
            style.merge(decoration(name, "effects", resolve_effects(&effects))?);
        }

        if let Some(color) = node.paint.resolve()? {
            style.set("backgroundColor", color.to_hex()?);
            style.set("color", color.foreground());
        }

        if let Some(stroke) = decoration(name, "border", node.first_stroke())? {
            style.set("border", decoration(name, "border", border(&stroke))?);
        }

        let role = ElementRole::classify(name);
        let tokens: Vec<String> = name
            .to_lowercase()
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        let mut resolved = ResolvedNode {
            id: node.id.clone(),
            name: name.to_string(),
            role,
            tag: role.html_tag().to_string(),
            style,
            input_type: None,
            checked: None,
            text: None,
            asset: None,
        };

        if role.is_form_control() {
            resolved.input_type = Some(tokens.get(1).cloned().unwrap_or_else(|| "text".into()));
            if role.is_checkable() {
                resolved.checked = Some(false);
            }
        } else if role == ElementRole::Button {
            resolved.input_type = tokens.get(1).cloned();
        } else if role.is_textual() {
            resolved.text = Some(node.characters.clone().unwrap_or_default());
            apply_typography(&mut resolved.style, node.style.as_ref());
        }

        if role.is_round() {
            resolved.style.set("borderRadius", "50%");
        } else if let Some(radius) = node.corner_radius {
            resolved.style.set("borderRadius", px(radius));
        }

        resolved.style.set("maxWidth", "100%");
        resolved.style.set("boxSizing", "border-box");

        if let Some(mode) = node.layout_mode {
            resolved.style.set("display", "flex");
            resolved.style.set("flexDirection", mode.flex_direction());
        }

        Ok(resolved)
    }

    /// Absolute position relative to the frame origin.
    ///
    /// Offsets are absolute differences, so a node above or left of the frame
    /// gets the same offset as one mirrored below or right of it.
    fn geometry(&self, bounds: &BoundingBox) -> StyleMap {
        let left = truncate(self.origin.x).abs_diff(truncate(bounds.x));
        let top = truncate(self.origin.y).abs_diff(truncate(bounds.y));

        let mut style = StyleMap::new();
        style.set("position", "absolute");
        style.set("left", format!("{left}px"));
        style.set("top", format!("{top}px"));
        style.set("width", format!("{}px", truncate(bounds.width)));
        style.set("height", format!("{}px", truncate(bounds.height)));
        style
    }

    /// Asset file stem: the name after the role key, or a per-frame counter.
    ///
    /// Tokens are rejoined with single spaces.
    fn asset_name(&mut self, name: &str) -> String {
        let rest = name.split_whitespace().skip(1).collect::<Vec<_>>().join(" ");
        if rest.is_empty() {
            self.image_count += 1;
            self.image_count.to_string()
        } else {
            rest
        }
    }

    fn metadata(&self) -> ResolveResult<FrameMetadata> {
        let background_color = match self.frame.paint.resolve()? {
            Some(color) => color.to_hex()?,
            None => DEFAULT_FRAME_BACKGROUND.to_string(),
        };
        let effects = resolve_effects(self.frame.effects.as_deref().unwrap_or_default())?;
        let constraints = resolve_constraints(self.frame.constraints.unwrap_or_default());

        Ok(FrameMetadata {
            width: truncate(self.origin.width),
            height: truncate(self.origin.height),
            background_color,
            name: self.document_name.to_string(),
            frame_index: self.frame_index,
            description: self.frame.description.clone().unwrap_or_default(),
            effects,
            constraints,
        })
    }
}

fn border(stroke: &Stroke) -> ResolveResult<String> {
    let color = stroke
        .color
        .as_ref()
        .ok_or_else(|| ResolveError::missing("strokes[0].color"))?
        .parse()?;
    let weight = stroke.weight.unwrap_or(1.0);
    let kind = stroke
        .kind
        .as_deref()
        .map_or_else(|| "solid".to_string(), str::to_lowercase);

    Ok(format!("{} {kind} {}", px(weight), color.to_hex()?))
}

fn apply_typography(style: &mut StyleMap, type_style: Option<&TypeStyle>) {
    let fallback = TypeStyle::default();
    let type_style = type_style.unwrap_or(&fallback);

    style.set(
        "fontFamily",
        type_style.font_family.as_deref().unwrap_or("inherit"),
    );
    style.set(
        "fontSize",
        format!("{}px", type_style.font_size.map_or(16, truncate)),
    );
    style.set(
        "fontWeight",
        type_style
            .font_weight
            .map_or_else(|| "normal".to_string(), css_number),
    );
    style.set("letterSpacing", px(type_style.letter_spacing.unwrap_or(0.0)));

    let line_height = match (type_style.line_height_px, type_style.line_height) {
        (Some(pixels), _) => px(pixels),
        (None, Some(ratio)) => css_number(ratio),
        (None, None) => "1.5".to_string(),
    };
    style.set("lineHeight", line_height);
}
