//! The card-deck data model.
//!
//! A [`CardDeck`] is the validated input of the pipeline: header text, an
//! ordered list of [`CardItem`]s and a deck-level [`DeckStyle`]. Items are a
//! tagged union over their `type` ([`CardBody`]) so that slot assignment and
//! per-item content shape are exhaustive matches rather than ad-hoc checks on
//! optional fields.
//!
//! The JSON shape follows the tool-call arguments: camelCase field names,
//! item variant selected by a `type` string. An absent or unrecognised `type`
//! is read as `default`; empty optional strings are read as absent.

use crate::output::OutputMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A complete card deck: header plus ordered items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDeck {
    /// Shown verbatim in the header.
    pub page_title: String,
    /// Shown verbatim under the title.
    pub page_description: String,
    /// Rendering order is input order.
    pub items: Vec<CardItem>,
    /// Carried into the document root; the layout mode is pinned regardless.
    #[serde(default)]
    pub style: DeckStyle,
}

impl CardDeck {
    pub fn new(page_title: impl Into<String>, page_description: impl Into<String>) -> Self {
        Self {
            page_title: page_title.into(),
            page_description: page_description.into(),
            items: Vec::new(),
            style: DeckStyle::default(),
        }
    }

    /// Append an item.
    pub fn item(mut self, item: CardItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn style(mut self, style: DeckStyle) -> Self {
        self.style = style;
        self
    }
}

/// A deck plus delivery hints, as received from a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRequest {
    #[serde(flatten)]
    pub deck: CardDeck,
    #[serde(default)]
    pub output_mode: OutputMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl CardRequest {
    pub fn new(deck: CardDeck) -> Self {
        Self {
            deck,
            output_mode: OutputMode::default(),
            filename: None,
        }
    }

    /// The filename hint; an empty string counts as none.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| !f.is_empty())
    }
}

// ── Items ────────────────────────────────────────────────────────────────

/// One card in the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCardItem", into = "RawCardItem")]
pub struct CardItem {
    pub title: String,
    /// Badge text above the card content.
    pub category: String,
    pub subtitle: Option<String>,
    pub theme: Theme,
    /// Decorative watermark label. Empty means none.
    pub bg_text: String,
    pub body: CardBody,
}

/// Variant-specific card content, keyed by the item's `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    /// `type: "default"` (also absent or unknown types).
    Default { description: Option<String> },
    /// `type: "data"`: a highlighted metric.
    Data {
        data_value: Option<String>,
        description: Option<String>,
    },
    /// `type: "list"`: bullets in input order.
    List { list_items: Vec<String> },
    /// `type: "full"`: like `default` but spans the full width.
    Full { description: Option<String> },
}

/// The `type` discriminant of a [`CardBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Default,
    Data,
    List,
    Full,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Data => "data",
            Self::List => "list",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CardBody {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Default { .. } => ItemKind::Default,
            Self::Data { .. } => ItemKind::Data,
            Self::List { .. } => ItemKind::List,
            Self::Full { .. } => ItemKind::Full,
        }
    }

    /// The optional description, for the variants that have one.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Default { description }
            | Self::Full { description }
            | Self::Data { description, .. } => description.as_deref(),
            Self::List { .. } => None,
        }
    }
}

impl CardItem {
    pub fn new(title: impl Into<String>, category: impl Into<String>, body: CardBody) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            subtitle: None,
            theme: Theme::default(),
            bg_text: String::new(),
            body,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = non_empty(Some(subtitle.into()));
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn bg_text(mut self, text: impl Into<String>) -> Self {
        self.bg_text = text.into();
        self
    }

    pub fn kind(&self) -> ItemKind {
        self.body.kind()
    }
}

// ── Enumerations ─────────────────────────────────────────────────────────

/// Card colour theme. Selects the gradient and accent classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
    Red,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Red => "red",
        }
    }
}

/// Deck-level visual style.
///
/// Accepted and recorded on the document root as `data-style`, but the root
/// is always rendered in the mobile layout, so the value does not change the
/// produced pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckStyle {
    #[default]
    Default,
    Minimal,
    Dark,
    Editorial,
}

impl DeckStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Minimal => "minimal",
            Self::Dark => "dark",
            Self::Editorial => "editorial",
        }
    }
}

// ── Wire shape ───────────────────────────────────────────────────────────

/// Flat JSON shape of an item as it arrives from the tool call.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCardItem {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    title: String,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list_items: Option<Vec<String>>,
    #[serde(default)]
    theme: Theme,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    bg_text: String,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

impl From<RawCardItem> for CardItem {
    fn from(raw: RawCardItem) -> Self {
        let description = non_empty(raw.description);
        let body = match raw.kind.as_deref() {
            Some("data") => CardBody::Data {
                data_value: non_empty(raw.data_value),
                description,
            },
            Some("list") => CardBody::List {
                list_items: raw.list_items.unwrap_or_default(),
            },
            Some("full") => CardBody::Full { description },
            None | Some("default") => CardBody::Default { description },
            Some(other) => {
                warn!(
                    item_type = other,
                    title = %raw.title,
                    "Unknown card type, rendering as default"
                );
                CardBody::Default { description }
            }
        };

        Self {
            title: raw.title,
            category: raw.category,
            subtitle: non_empty(raw.subtitle),
            theme: raw.theme,
            bg_text: raw.bg_text,
            body,
        }
    }
}

impl From<CardItem> for RawCardItem {
    fn from(item: CardItem) -> Self {
        let kind = Some(item.kind().as_str().to_string());
        let (description, data_value, list_items) = match item.body {
            CardBody::Default { description } | CardBody::Full { description } => {
                (description, None, None)
            }
            CardBody::Data {
                data_value,
                description,
            } => (description, data_value, None),
            CardBody::List { list_items } => (None, None, Some(list_items)),
        };

        Self {
            kind,
            title: item.title,
            category: item.category,
            subtitle: item.subtitle,
            description,
            data_value,
            list_items,
            theme: item.theme,
            bg_text: item.bg_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(v: serde_json::Value) -> CardItem {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn type_selects_variant() {
        let data = item(json!({"type": "data", "title": "X", "category": "C", "dataValue": "42%"}));
        assert_eq!(
            data.body,
            CardBody::Data {
                data_value: Some("42%".into()),
                description: None
            }
        );

        let list = item(json!({"type": "list", "title": "L", "category": "C", "listItems": ["a", "b"]}));
        assert_eq!(list.kind(), ItemKind::List);

        let full = item(json!({"type": "full", "title": "F", "category": "C", "description": "d"}));
        assert_eq!(full.body.description(), Some("d"));
    }

    #[test]
    fn absent_and_unknown_type_read_as_default() {
        let absent = item(json!({"title": "A", "category": "C"}));
        assert_eq!(absent.kind(), ItemKind::Default);

        let unknown = item(json!({"type": "carousel", "title": "U", "category": "C"}));
        assert_eq!(unknown.kind(), ItemKind::Default);
    }

    #[test]
    fn optional_fields_default() {
        let it = item(json!({"title": "A", "category": "C"}));
        assert_eq!(it.theme, Theme::Blue);
        assert_eq!(it.bg_text, "");
        assert_eq!(it.subtitle, None);
    }

    #[test]
    fn empty_optional_strings_are_absent() {
        let it = item(json!({
            "type": "data", "title": "A", "category": "C",
            "subtitle": "", "description": "", "dataValue": ""
        }));
        assert_eq!(it.subtitle, None);
        assert_eq!(
            it.body,
            CardBody::Data {
                data_value: None,
                description: None
            }
        );
    }

    #[test]
    fn list_without_items_is_empty_list() {
        let it = item(json!({"type": "list", "title": "L", "category": "C"}));
        assert_eq!(it.body, CardBody::List { list_items: vec![] });
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let r: Result<CardItem, _> =
            serde_json::from_value(json!({"title": "A", "category": "C", "theme": "teal"}));
        assert!(r.is_err());
    }

    #[test]
    fn deck_parses_camel_case_and_serializes_back() {
        let deck: CardDeck = serde_json::from_value(json!({
            "pageTitle": "T",
            "pageDescription": "D",
            "style": "dark",
            "items": [{"type": "list", "title": "L", "category": "C", "listItems": ["x"], "theme": "red", "bgText": "01"}]
        }))
        .unwrap();
        assert_eq!(deck.style, DeckStyle::Dark);
        assert_eq!(deck.items[0].theme, Theme::Red);
        assert_eq!(deck.items[0].bg_text, "01");

        let v = serde_json::to_value(&deck).unwrap();
        assert_eq!(v["pageTitle"], "T");
        assert_eq!(v["items"][0]["type"], "list");
        assert_eq!(v["items"][0]["listItems"][0], "x");
        assert_eq!(v["items"][0]["bgText"], "01");
    }

    #[test]
    fn request_flattens_deck_with_snake_case_hints() {
        let req: CardRequest = serde_json::from_value(json!({
            "pageTitle": "T",
            "pageDescription": "D",
            "items": [],
            "output_mode": "local",
            "filename": "out"
        }))
        .unwrap();
        assert_eq!(req.deck.page_title, "T");
        assert_eq!(req.output_mode, OutputMode::Local);
        assert_eq!(req.filename(), Some("out"));
    }

    #[test]
    fn request_defaults_to_auto_without_filename() {
        let req: CardRequest = serde_json::from_value(json!({
            "pageTitle": "T", "pageDescription": "D", "items": [], "filename": ""
        }))
        .unwrap();
        assert_eq!(req.output_mode, OutputMode::Auto);
        assert_eq!(req.filename(), None);
    }

    #[test]
    fn style_defaults_when_absent() {
        let raw = json!({"pageTitle": "T", "pageDescription": "D", "items": []});
        let deck: CardDeck = serde_json::from_value(raw).unwrap();
        assert_eq!(deck.style, DeckStyle::Default);
        assert!(deck.items.is_empty());
    }
}
