use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One chat message as delivered by the session transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub role: Role,
    pub content: String,
}

impl RawMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A product announced inside an assistant message.
///
/// `price` is the first numeric amount as written, currency symbol stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub description: String,
    pub price: String,
    pub link: Option<String>,
    pub image: Option<String>,
}

impl ProductRecord {
    /// Records with neither a link nor an image are never surfaced.
    pub fn is_presentable(&self) -> bool {
        self.link.is_some() || self.image.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub before: String,
    #[serde(rename = "hasProducts")]
    pub has_products: bool,
    pub after: String,
}

impl ParsedMessage {
    /// The whole message as prose, with no product block.
    pub fn unsegmented(content: &str) -> Self {
        Self {
            before: content.to_string(),
            has_products: false,
            after: String::new(),
        }
    }
}

/// Both outputs of the pipeline for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedMessage {
    pub role: Role,
    pub products: Vec<ProductRecord>,
    pub parsed: ParsedMessage,
}
