//! UI role classification from node names.
//!
//! The first whitespace-separated token of a node's lowercased name is its
//! role key:
//!
//! | Role key                                   | HTML tag   |
//! |--------------------------------------------|------------|
//! | `image`                                    | `img`      |
//! | `button`, `label`                          | same       |
//! | `text`, `paragraph`                        | `p`        |
//! | `heading` / `subheading`                   | `h1`/`h2`  |
//! | `rectangle`, `circle`, `oval`              | `div`      |
//! | `line`                                     | `hr`       |
//! | `textbox`, `checkbox`, `radio`, `slider`   | `input`    |
//! | `textarea`                                 | `textarea` |
//! | `listbox`, `dropdown`                      | `select`   |
//! | `link`                                     | `a`        |
//! | `icon`                                     | `span`     |
//! | `video`, `audio`, `iframe`, `svg`, `canvas`| same       |
//! | anything else                              | `div`      |

use serde::{Deserialize, Serialize};

/// Inferred UI element role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ElementRole {
    Image,
    Button,
    Label,
    Text,
    Heading,
    Subheading,
    Paragraph,
    Rectangle,
    Circle,
    Oval,
    Line,
    Textbox,
    Textarea,
    Listbox,
    Checkbox,
    Radio,
    Slider,
    Dropdown,
    Link,
    Icon,
    Video,
    Audio,
    Iframe,
    Svg,
    Canvas,
    /// Fallback for unrecognized role keys.
    Container,
}

const ROLE_TABLE: [(&str, ElementRole); 25] = [
    ("image", ElementRole::Image),
    ("button", ElementRole::Button),
    ("label", ElementRole::Label),
    ("text", ElementRole::Text),
    ("heading", ElementRole::Heading),
    ("subheading", ElementRole::Subheading),
    ("paragraph", ElementRole::Paragraph),
    ("rectangle", ElementRole::Rectangle),
    ("circle", ElementRole::Circle),
    ("oval", ElementRole::Oval),
    ("line", ElementRole::Line),
    ("textbox", ElementRole::Textbox),
    ("textarea", ElementRole::Textarea),
    ("listbox", ElementRole::Listbox),
    ("checkbox", ElementRole::Checkbox),
    ("radio", ElementRole::Radio),
    ("slider", ElementRole::Slider),
    ("dropdown", ElementRole::Dropdown),
    ("link", ElementRole::Link),
    ("icon", ElementRole::Icon),
    ("video", ElementRole::Video),
    ("audio", ElementRole::Audio),
    ("iframe", ElementRole::Iframe),
    ("svg", ElementRole::Svg),
    ("canvas", ElementRole::Canvas),
];

impl ElementRole {
    /// Look up a role key. Unknown keys classify as [`ElementRole::Container`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        ROLE_TABLE
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(Self::Container, |(_, role)| *role)
    }

    /// Classify a node by the first token of its lowercased name.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        name.to_lowercase()
            .split_whitespace()
            .next()
            .map_or(Self::Container, Self::from_key)
    }

    /// The role key, as written in node names.
    #[must_use]
    pub fn key(self) -> &'static str {
        ROLE_TABLE
            .iter()
            .find(|(_, role)| *role == self)
            .map_or("container", |(k, _)| *k)
    }

    /// HTML tag this role maps to.
    #[must_use]
    pub fn html_tag(self) -> &'static str {
        match self {
            Self::Image => "img",
            Self::Text | Self::Paragraph => "p",
            Self::Heading => "h1",
            Self::Subheading => "h2",
            Self::Rectangle | Self::Circle | Self::Oval | Self::Container => "div",
            Self::Line => "hr",
            Self::Textbox | Self::Checkbox | Self::Radio | Self::Slider => "input",
            Self::Listbox | Self::Dropdown => "select",
            Self::Link => "a",
            Self::Icon => "span",
            Self::Button
            | Self::Label
            | Self::Textarea
            | Self::Video
            | Self::Audio
            | Self::Iframe
            | Self::Svg
            | Self::Canvas => self.key(),
        }
    }

    /// Form controls take an input `type` from the second name token.
    #[must_use]
    pub fn is_form_control(self) -> bool {
        matches!(
            self,
            Self::Textbox
                | Self::Textarea
                | Self::Listbox
                | Self::Checkbox
                | Self::Radio
                | Self::Slider
                | Self::Dropdown
        )
    }

    /// Controls that carry a `checked` state.
    #[must_use]
    pub fn is_checkable(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }

    /// Roles rendered from the node's literal text with typography.
    #[must_use]
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            Self::Heading | Self::Subheading | Self::Paragraph | Self::Text | Self::Label
        )
    }

    /// Roles that reference a rasterized asset.
    #[must_use]
    pub fn is_asset(self) -> bool {
        self == Self::Image
    }

    /// Roles drawn fully rounded.
    #[must_use]
    pub fn is_round(self) -> bool {
        matches!(self, Self::Circle | Self::Oval)
    }
}
