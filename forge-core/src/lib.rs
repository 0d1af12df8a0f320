//! # Forge Core
//!
//! Resolves design-tool frames into positioned, styled UI components.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 DocumentTree                 │
//! │   name, document.children[0].children[..]    │
//! ├──────────────────────────────────────────────┤
//! │  frame_slots()   │  resolve_slot(slot)       │
//! │  - FRAME only    │  - Frame metadata         │
//! │  - 0 or 1..n     │  - Node resolution        │
//! ├──────────────────────────────────────────────┤
//! │  Style passes    │  Role classification      │
//! │  - Geometry      │  - First name token       │
//! │  - Paint/Color   │  - Form attributes        │
//! │  - Effects       │  - Typography             │
//! │  - Constraints   │  - Asset requests         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Resolution is pure and synchronous. Fetching documents and assets lives in
//! `forge-source`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod constraint;
pub mod document;
pub mod effect;
pub mod error;
pub mod frame;
pub mod role;
pub mod style;

pub use color::{foreground_color, parse_color, rgb_to_hex, ColorValue, Rgba};
pub use constraint::{
    resolve_constraints, ConstraintStyles, Constraints, HorizontalConstraint, VerticalConstraint,
};
pub use document::{
    BoundingBox, DocumentTree, Frame, FrameSlot, LayoutMode, Node, Paint, PaintSources, Stroke,
    TypeStyle,
};
pub use effect::{parse_effects, resolve_effects, Effect, EffectKind, Offset};
pub use error::{ResolveError, ResolveResult};
pub use frame::{
    resolve_frame, resolve_frame_value, AssetRequest, FrameMetadata, ResolvedFrame, ResolvedNode,
};
pub use role::ElementRole;
pub use style::StyleMap;

/// Forge core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
