//! Document composition: `CardDeck` → [`ComposedDocument`].
//!
//! Pure and total over a well-formed deck. The produced tree is:
//!
//! ```text
//! body.mobile-layout[data-style]
//! └── div.container
//!     ├── div.header ── h1 (pageTitle), p (pageDescription)
//!     └── div.card-grid
//!         └── div.card.<slot>.gradient-<theme>[data-bg-text]   (one per item)
//!             └── div.card-content ── badge, subtitle?, body…
//! ```
//!
//! The body always carries `mobile-layout`; the deck style only lands in
//! `data-style`.

use crate::deck::{CardBody, CardDeck, CardItem};
use crate::document::{ComposedDocument, Element};
use crate::pipeline::layout::{highlight_for, slot_for};
use tracing::debug;

/// Class pinned on the document body for every render.
pub const ROOT_LAYOUT_CLASS: &str = "mobile-layout";

/// Build the layout tree for `deck`. Item order is preserved.
pub fn compose(deck: &CardDeck) -> ComposedDocument {
    let header = Element::new("div")
        .class("header")
        .child(Element::new("h1").text(deck.page_title.as_str()))
        .child(Element::new("p").text(deck.page_description.as_str()));

    let grid = Element::new("div")
        .class("card-grid")
        .children(deck.items.iter().map(compose_card));

    let body = Element::new("body")
        .class(ROOT_LAYOUT_CLASS)
        .attr("data-style", deck.style.as_str())
        .child(Element::new("div").class("container").child(header).child(grid));

    debug!(items = deck.items.len(), style = deck.style.as_str(), "Composed card document");
    ComposedDocument::new(deck.style, body)
}

fn compose_card(item: &CardItem) -> Element {
    let theme = item.theme.as_str();

    let badge = Element::new("span")
        .class("card-category")
        .class(format!("color-{theme}"))
        .text(item.category.as_str());
    let subtitle = item
        .subtitle
        .as_deref()
        .map(|s| Element::new("h3").class("card-subtitle").text(s));
    let headline = || Element::new("h2").class("card-headline").text(item.title.as_str());
    let description =
        |d: Option<&str>| d.map(|d| Element::new("p").class("card-description").text(d));

    let content = Element::new("div")
        .class("card-content")
        .child(badge)
        .maybe_child(subtitle);

    let content = match &item.body {
        CardBody::Data {
            data_value,
            description: desc,
        } => {
            let (style, shown) = highlight_for(data_value.as_deref());
            content
                .child(Element::new("div").class(style.css_class()).text(shown))
                .maybe_child(description(desc.as_deref()))
        }
        CardBody::List { list_items } => content.child(headline()).child(
            Element::new("ul")
                .class("card-list")
                .children(list_items.iter().map(|li| Element::new("li").text(li.as_str()))),
        ),
        CardBody::Default { description: desc } | CardBody::Full { description: desc } => content
            .child(headline())
            .maybe_child(description(desc.as_deref())),
    };

    Element::new("div")
        .class("card")
        .class(slot_for(item).css_class())
        .class(format!("gradient-{theme}"))
        .attr("data-bg-text", item.bg_text.as_str())
        .child(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckStyle, Theme};

    fn data_deck(value: Option<&str>) -> CardDeck {
        CardDeck::new("T", "D").item(CardItem::new(
            "X",
            "C",
            CardBody::Data {
                data_value: value.map(str::to_string),
                description: None,
            },
        ))
    }

    #[test]
    fn empty_deck_has_empty_grid() {
        let doc = compose(&CardDeck::new("T", "D"));
        assert_eq!(doc.card_count(), 0);
        let grid = doc.body().first_by_class("card-grid").unwrap();
        assert!(grid.child_nodes().is_empty());
    }

    #[test]
    fn header_shows_title_and_description() {
        let doc = compose(&CardDeck::new("Quarterly <Review>", "All teams"));
        let header = doc.body().first_by_class("header").unwrap();
        assert_eq!(header.text_content(), "Quarterly <Review>All teams");
        assert!(doc.to_html().contains("<h1>Quarterly &lt;Review&gt;</h1>"));
    }

    #[test]
    fn root_is_pinned_and_style_round_trips() {
        for style in [DeckStyle::Default, DeckStyle::Dark, DeckStyle::Editorial] {
            let doc = compose(&CardDeck::new("T", "D").style(style));
            assert!(doc.body().has_class(ROOT_LAYOUT_CLASS));
            assert_eq!(doc.body().attr_value("data-style"), Some(style.as_str()));
            assert_eq!(doc.style(), style);
        }
    }

    #[test]
    fn card_container_carries_slot_theme_and_label() {
        let full = CardItem::new("F", "C", CardBody::Full { description: None })
            .theme(Theme::Purple)
            .bg_text("01");
        let list = CardItem::new("L", "C", CardBody::List { list_items: vec![] });
        let deck = CardDeck::new("T", "D").item(full).item(list);
        let doc = compose(&deck);
        let cards = doc.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].classes(), ["card", "card-full-width", "gradient-purple"]);
        assert_eq!(cards[0].attr_value("data-bg-text"), Some("01"));
        assert_eq!(cards[1].classes(), ["card", "card-large", "gradient-blue"]);
        // Unset label renders as an empty attribute.
        assert_eq!(cards[1].attr_value("data-bg-text"), Some(""));
        assert!(!doc.to_html().contains("undefined"));
    }

    #[test]
    fn data_card_numeric_and_textual() {
        let doc = compose(&data_deck(Some("42%")));
        let v = doc.body().first_by_class("card-data-highlight").unwrap();
        assert_eq!(v.text_content(), "42%");
        // Data cards have no headline.
        assert!(doc.body().first_by_class("card-headline").is_none());

        let doc = compose(&data_deck(Some("Steady")));
        assert!(doc.body().first_by_class("card-data-text").is_some());
    }

    #[test]
    fn data_card_missing_value_shows_na() {
        let doc = compose(&data_deck(None));
        let v = doc.body().first_by_class("card-data-text").unwrap();
        assert_eq!(v.text_content(), "N/A");
    }

    #[test]
    fn list_items_keep_order() {
        let deck = CardDeck::new("T", "D").item(CardItem::new(
            "L",
            "C",
            CardBody::List {
                list_items: vec!["one".into(), "two".into(), "three".into()],
            },
        ));
        let doc = compose(&deck);
        let ul = doc.body().first_by_class("card-list").unwrap();
        let lis: Vec<String> = ul
            .child_nodes()
            .iter()
            .map(|n| match n {
                crate::document::Node::Element(e) => e.text_content(),
                crate::document::Node::Text(t) => t.clone(),
            })
            .collect();
        assert_eq!(lis, ["one", "two", "three"]);
    }

    #[test]
    fn empty_list_renders_empty_container() {
        let list = CardItem::new("L", "C", CardBody::List { list_items: vec![] });
        let deck = CardDeck::new("T", "D").item(list);
        let doc = compose(&deck);
        let ul = doc.body().first_by_class("card-list").unwrap();
        assert!(ul.child_nodes().is_empty());
    }

    #[test]
    fn optional_subtitle_and_description() {
        let with_body = CardItem::new(
            "A",
            "C",
            CardBody::Default {
                description: Some("body".into()),
            },
        )
        .subtitle("sub");
        let bare = CardItem::new("B", "C", CardBody::Default { description: None });
        let deck = CardDeck::new("T", "D").item(with_body).item(bare);
        let doc = compose(&deck);
        let cards = doc.cards();
        assert!(cards[0].first_by_class("card-subtitle").is_some());
        assert_eq!(cards[0].first_by_class("card-description").unwrap().text_content(), "body");
        assert!(cards[1].first_by_class("card-subtitle").is_none());
        assert!(cards[1].first_by_class("card-description").is_none());
    }

    #[test]
    fn badge_uses_theme_accent() {
        let item = CardItem::new("A", "Growth", CardBody::Default { description: None })
            .theme(Theme::Green);
        let deck = CardDeck::new("T", "D").item(item);
        let doc = compose(&deck);
        let badge = doc.body().first_by_class("card-category").unwrap();
        assert!(badge.has_class("color-green"));
        assert_eq!(badge.text_content(), "Growth");
    }

    #[test]
    fn item_text_is_escaped_in_html() {
        let hostile = CardItem::new(
            "<img src=x onerror=alert(1)>",
            "C",
            CardBody::Default { description: None },
        )
        .bg_text("\"><b>");
        let deck = CardDeck::new("T", "D").item(hostile);
        let html = compose(&deck).to_html();
        assert!(!html.contains("<img"));
        assert!(html.contains("data-bg-text=\"&quot;&gt;&lt;b&gt;\""));
    }
}
