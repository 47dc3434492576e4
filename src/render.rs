use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::carousel::SlideIndex;
use crate::model::{ParsedMessage, ProductRecord};

/// Text styling for one widget skin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub currency: String,
    pub rule: String,
    pub active_dot: String,
    pub inactive_dot: String,
    pub show_counter: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            currency: "$".into(),
            rule: "━".repeat(32),
            active_dot: "●".into(),
            inactive_dot: "○".into(),
            show_counter: true,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".into(),
            currency: "$".into(),
            rule: "─".repeat(32),
            active_dot: "◆".into(),
            inactive_dot: "◇".into(),
            show_counter: true,
        }
    }

    pub fn minimal() -> Self {
        Self {
            name: "minimal".into(),
            currency: "$".into(),
            rule: "-".repeat(16),
            active_dot: "*".into(),
            inactive_dot: ".".into(),
            show_counter: false,
        }
    }

    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "dark" => Ok(Self::dark()),
            "light" => Ok(Self::light()),
            "minimal" => Ok(Self::minimal()),
            other => bail!("unknown theme '{}' (expected dark, light or minimal)", other),
        }
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn price(&self, price: &str) -> String {
        format!("{}{}", self.currency, price)
    }
}

/// Lay out one message: leading prose, the current product card, trailing prose.
pub fn render(
    parsed: &ParsedMessage,
    products: &[ProductRecord],
    slides: Option<&SlideIndex>,
    theme: &Theme,
) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if !parsed.before.is_empty() {
        blocks.push(parsed.before.clone());
    }

    if parsed.has_products {
        if let Some(slides) = slides {
            if let Some(product) = products.get(slides.current()) {
                blocks.push(render_card(product, slides, theme));
            }
        }
    }

    if !parsed.after.is_empty() {
        blocks.push(parsed.after.clone());
    }

    blocks.join("\n\n")
}

fn render_card(product: &ProductRecord, slides: &SlideIndex, theme: &Theme) -> String {
    let mut out = vec![theme.rule.clone(), product.name.clone()];
    if !product.description.is_empty() {
        out.push(product.description.clone());
    }
    out.push(theme.price(&product.price));
    if let Some(link) = &product.link {
        out.push(format!("View product: {}", link));
    }
    if let Some(image) = &product.image {
        out.push(format!("Image: {}", image));
    }

    if slides.len() > 1 {
        let dots: Vec<&str> = (0..slides.len())
            .map(|i| {
                if i == slides.current() {
                    theme.active_dot.as_str()
                } else {
                    theme.inactive_dot.as_str()
                }
            })
            .collect();
        let prev = if slides.at_start() { "( ‹ )" } else { "[ ‹ ]" };
        let next = if slides.at_end() { "( › )" } else { "[ › ]" };
        out.push(format!("{} {} {}", prev, dots.join(" "), next));
        if theme.show_counter {
            if let Some(counter) = slides.counter() {
                out.push(counter);
            }
        }
    }

    out.push(theme.rule.clone());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> ProductRecord {
        ProductRecord {
            name: name.into(),
            description: "Soft cotton".into(),
            price: "25.00".into(),
            link: Some("https://store.com/products/tee".into()),
            image: None,
        }
    }

    fn parsed() -> ParsedMessage {
        ParsedMessage {
            before: "Here you go:".into(),
            has_products: true,
            after: "Anything else?".into(),
        }
    }

    #[test]
    fn card_between_prose() {
        let products = vec![product("Tee"), product("Hoodie")];
        let slides = SlideIndex::new(products.len()).unwrap();
        let out = render(&parsed(), &products, Some(&slides), &Theme::minimal());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Here you go:");
        assert!(out.contains("Tee\nSoft cotton\n$25.00\nView product: https://store.com/products/tee"));
        assert!(out.contains("( ‹ ) * . [ › ]"));
        assert!(!out.contains("of 2 products"));
        assert_eq!(*lines.last().unwrap(), "Anything else?");
    }

    #[test]
    fn follows_current_slide() {
        let products = vec![product("Tee"), product("Hoodie")];
        let mut slides = SlideIndex::new(products.len()).unwrap();
        slides.next();
        let out = render(&parsed(), &products, Some(&slides), &Theme::dark());
        assert!(out.contains("Hoodie"));
        assert!(!out.contains("Tee\n"));
        assert!(out.contains("2 of 2 products"));
        assert!(out.contains("[ ‹ ] ○ ● ( › )"));
    }

    #[test]
    fn single_product_has_no_navigation() {
        let products = vec![product("Tee")];
        let slides = SlideIndex::new(1).unwrap();
        let out = render(&parsed(), &products, Some(&slides), &Theme::dark());
        assert!(!out.contains('‹'));
        assert!(!out.contains("of 1"));
    }

    #[test]
    fn currency_override() {
        let theme = Theme::light().with_currency("€");
        assert_eq!(theme.price("9.50"), "€9.50");
    }

    #[test]
    fn prose_only() {
        let p = ParsedMessage::unsegmented("Hello");
        assert_eq!(render(&p, &[], None, &Theme::default()), "Hello");
    }

    #[test]
    fn unknown_theme() {
        assert!(Theme::by_name("neon").is_err());
        assert_eq!(Theme::by_name("light").unwrap().name, "light");
    }
}
