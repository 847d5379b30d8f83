//! The embedded card stylesheet.
//!
//! Every visual rule lives in [`CARD_STYLESHEET`] and is inlined into the
//! composed page, so a render needs no network access and no files next to
//! the binary. Class names here are the contract with
//! [`crate::pipeline::compose`]; the tests below pin that contract.
//!
//! The page is laid out for a 500 px wide viewport. `body.mobile-layout`
//! collapses the grid to one column. No rule is keyed on `data-style`.

/// CSS for the summary-card page.
pub const CARD_STYLESHEET: &str = r#"
*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }

html, body {
  background: #f4f5f7;
  color: #1d1f23;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "Noto Sans", "Helvetica Neue", Arial,
    "PingFang SC", "Hiragino Sans GB", "Microsoft YaHei", sans-serif;
  -webkit-font-smoothing: antialiased;
}

.container { width: 100%; padding: 28px 20px 20px; }

.header { margin-bottom: 22px; }
.header h1 { font-size: 28px; line-height: 1.25; font-weight: 800; letter-spacing: -0.02em; }
.header p { margin-top: 8px; font-size: 15px; line-height: 1.55; color: #5b6170; }

.card-grid { display: grid; grid-template-columns: repeat(6, 1fr); gap: 14px; }
.card-small { grid-column: span 2; }
.card-large { grid-column: span 3; }
.card-full-width { grid-column: 1 / -1; }

body.mobile-layout .card-grid { grid-template-columns: 1fr; }
body.mobile-layout .card-small,
body.mobile-layout .card-large,
body.mobile-layout .card-full-width { grid-column: 1 / -1; }

.card {
  position: relative;
  overflow: hidden;
  border-radius: 18px;
  padding: 20px 20px 22px;
  color: #ffffff;
  box-shadow: 0 6px 18px rgba(20, 24, 40, 0.12);
}
.card::before {
  content: attr(data-bg-text);
  position: absolute;
  right: -6px;
  bottom: -18px;
  font-size: 96px;
  font-weight: 900;
  line-height: 1;
  color: rgba(255, 255, 255, 0.12);
  white-space: nowrap;
  pointer-events: none;
}
.card-content { position: relative; z-index: 1; }

.gradient-blue { background: linear-gradient(135deg, #2f6bff 0%, #5b9dff 100%); }
.gradient-green { background: linear-gradient(135deg, #11a36a 0%, #3fd09a 100%); }
.gradient-orange { background: linear-gradient(135deg, #f06a1d 0%, #ffa24c 100%); }
.gradient-purple { background: linear-gradient(135deg, #6b3df5 0%, #a17bff 100%); }
.gradient-red { background: linear-gradient(135deg, #e23a4e 0%, #ff7a85 100%); }

.card-category {
  display: inline-block;
  padding: 3px 10px;
  border-radius: 999px;
  background: #ffffff;
  font-size: 12px;
  font-weight: 700;
  letter-spacing: 0.04em;
  text-transform: uppercase;
}
.color-blue { color: #2f6bff; }
.color-green { color: #11a36a; }
.color-orange { color: #f06a1d; }
.color-purple { color: #6b3df5; }
.color-red { color: #e23a4e; }

.card-subtitle { margin-top: 12px; font-size: 13px; font-weight: 600; opacity: 0.85; }
.card-headline { margin-top: 10px; font-size: 21px; line-height: 1.3; font-weight: 800; }
.card-description { margin-top: 8px; font-size: 14px; line-height: 1.6; opacity: 0.92; }

.card-data-highlight { margin-top: 10px; font-size: 44px; line-height: 1.1; font-weight: 900; letter-spacing: -0.02em; }
.card-data-text { margin-top: 10px; font-size: 24px; line-height: 1.3; font-weight: 800; }

.card-list { margin-top: 10px; padding-left: 18px; font-size: 14px; line-height: 1.6; }
.card-list li + li { margin-top: 4px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slot_class_is_styled() {
        for class in [".card-small", ".card-large", ".card-full-width"] {
            assert!(CARD_STYLESHEET.contains(class), "missing {class}");
        }
    }

    #[test]
    fn every_theme_has_gradient_and_accent() {
        for theme in ["blue", "green", "orange", "purple", "red"] {
            assert!(CARD_STYLESHEET.contains(&format!(".gradient-{theme}")));
            assert!(CARD_STYLESHEET.contains(&format!(".color-{theme}")));
        }
    }

    #[test]
    fn background_label_comes_from_attribute() {
        assert!(CARD_STYLESHEET.contains("content: attr(data-bg-text)"));
    }

    #[test]
    fn no_rules_keyed_on_deck_style() {
        assert!(!CARD_STYLESHEET.contains("data-style"));
    }
}
