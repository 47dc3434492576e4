pub mod grammar;
pub mod lines;
pub mod products;
pub mod segment;

use tracing::debug;

use crate::model::{ExtractedMessage, ParsedMessage, ProductRecord, RawMessage, Role};
use grammar::Grammar;

/// First pass: product records in document order.
pub fn extract_products(content: &str, grammar: &Grammar) -> Vec<ProductRecord> {
    let products = products::collect_products(lines::classify_lines(content, grammar));
    debug!(grammar = %grammar.name, count = products.len(), "parsed products");
    products
}

/// Two independent passes over the message: products, then segmentation.
///
/// User messages are never scanned. A message whose headers all fail to
/// produce a presentable record is returned unsegmented.
pub fn process_message(message: &RawMessage, grammar: &Grammar) -> ExtractedMessage {
    let products = match message.role {
        Role::Assistant => extract_products(&message.content, grammar),
        Role::User => Vec::new(),
    };
    let parsed = if products.is_empty() {
        ParsedMessage::unsegmented(&message.content)
    } else {
        segment::segment(&message.content, grammar)
    };
    ExtractedMessage {
        role: message.role,
        products,
        parsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.md", name)).unwrap()
    }

    #[test]
    fn options_end_to_end() {
        let msg = RawMessage::assistant(fixture("options"));
        let out = process_message(&msg, Grammar::storefront());

        assert_eq!(out.products.len(), 2);
        let hoodie = &out.products[0];
        assert_eq!(hoodie.name, "Hoodie");
        assert_eq!(hoodie.description, "Classic fit");
        assert_eq!(hoodie.price, "60.00");
        assert_eq!(hoodie.link.as_deref(), Some("https://store.com/products/hoodie"));
        assert_eq!(hoodie.image.as_deref(), Some("https://cdn.shop.com/hoodie.jpg"));
        let tee = &out.products[1];
        assert_eq!(tee.name, "Tee");
        assert_eq!(tee.price, "25.00");
        assert_eq!(tee.link.as_deref(), Some("https://store.com/products/tee"));
        assert_eq!(tee.image, None);

        assert!(out.parsed.has_products);
        assert_eq!(out.parsed.before, "Here are some options:");
        assert_eq!(out.parsed.after, "Let me know if you'd like more details!");
    }

    #[test]
    fn user_messages_are_not_scanned() {
        let msg = RawMessage::user(fixture("options"));
        let out = process_message(&msg, Grammar::storefront());
        assert!(out.products.is_empty());
        assert_eq!(out.parsed, ParsedMessage::unsegmented(&msg.content));
    }

    #[test]
    fn headers_without_fields_leave_message_whole() {
        let content = "Options:\n1. Ghost - No links, $5.00\nBye";
        let out = process_message(&RawMessage::assistant(content), Grammar::storefront());
        assert!(out.products.is_empty());
        assert!(!out.parsed.has_products);
        assert_eq!(out.parsed.before, content);
    }

    #[test]
    fn plain_text_is_untouched() {
        let content = "Thanks for reaching out.\n\nOur store opens at 9am.";
        let out = process_message(&RawMessage::assistant(content), Grammar::storefront());
        assert!(out.products.is_empty());
        assert_eq!(out.parsed.before, content);
        assert_eq!(out.parsed.after, "");
    }

    #[test]
    fn labelled_fixture() {
        let out = process_message(
            &RawMessage::assistant(fixture("labelled")),
            Grammar::labelled(),
        );
        let names: Vec<&str> = out.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Juniper Hoodie", "Treeblend Tee", "Kavik Beanie"]);
        assert_eq!(out.products[1].price, "28.00");
        assert!(out.parsed.has_products);
        assert_eq!(out.parsed.before, "Great choice! Here's what we have:");
        assert_eq!(out.parsed.after, "Would you like help picking a size?");
    }

    #[test]
    fn mixed_fixture_order_and_priority() {
        let out = process_message(&RawMessage::assistant(fixture("mixed")), Grammar::storefront());
        let names: Vec<&str> = out.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Trail Jacket", "Rain Shell", "Fleece Vest"]);
        assert_eq!(out.products[0].price, "120.00");
        assert_eq!(out.products[0].link.as_deref(), Some("https://outfitters.com/products/trail-jacket"));
        assert_eq!(out.products[1].link, None);
        assert_eq!(out.products[1].image.as_deref(), Some("https://cdn.shopify.com/s/rain-shell.jpg"));
        assert_eq!(out.products[2].price, "45");
        assert_eq!(out.parsed.before, "I found a few jackets:");
        assert_eq!(out.parsed.after, "All of these ship free.\n\nAnything else?");
    }

    #[test]
    fn extraction_is_deterministic() {
        let md = fixture("mixed");
        let a = extract_products(&md, Grammar::storefront());
        let b = extract_products(&md, Grammar::storefront());
        assert_eq!(a, b);
    }
}
