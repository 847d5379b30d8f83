//! Layout resolution: which slot a card occupies and how a metric is styled.
//!
//! Pure functions, no I/O. The slot mapping is total over [`ItemKind`]:
//!
//! | `type`             | slot         |
//! |--------------------|--------------|
//! | `full`             | `FullWidth`  |
//! | `list`             | `Large`      |
//! | `data`, `default`  | `Small`      |
//!
//! Absent or unknown types were already read as `default` by the deck model.

use crate::deck::{CardItem, ItemKind};

/// Value shown for a `data` card without a `dataValue`.
pub const MISSING_DATA_VALUE: &str = "N/A";

/// Grid size class of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualSlot {
    Small,
    Large,
    FullWidth,
}

impl VisualSlot {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Small => "card-small",
            Self::Large => "card-large",
            Self::FullWidth => "card-full-width",
        }
    }
}

/// Slot for an item kind.
pub fn slot_for_kind(kind: ItemKind) -> VisualSlot {
    match kind {
        ItemKind::Full => VisualSlot::FullWidth,
        ItemKind::List => VisualSlot::Large,
        ItemKind::Data | ItemKind::Default => VisualSlot::Small,
    }
}

/// Slot for an item.
pub fn slot_for(item: &CardItem) -> VisualSlot {
    slot_for_kind(item.kind())
}

/// Styling of the value block on a `data` card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    /// The value contains at least one digit: large metric treatment.
    Numeric,
    /// Words only: smaller text treatment.
    Textual,
}

impl HighlightStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Numeric => "card-data-highlight",
            Self::Textual => "card-data-text",
        }
    }
}

/// Classify a data value and pick the text to display.
///
/// An absent value is classified on the empty string (textual) and shown
/// as [`MISSING_DATA_VALUE`].
pub fn highlight_for(data_value: Option<&str>) -> (HighlightStyle, &str) {
    let raw = data_value.unwrap_or("");
    let style = if raw.chars().any(|c| c.is_ascii_digit()) {
        HighlightStyle::Numeric
    } else {
        HighlightStyle::Textual
    };
    let shown = data_value.filter(|v| !v.is_empty()).unwrap_or(MISSING_DATA_VALUE);
    (style, shown)
}
