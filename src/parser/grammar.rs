use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

// Header patterns must expose `name`, `description` and `price` groups;
// link and image patterns must expose `url`.
const STOREFRONT_HEADERS: &[&str] = &[
    r"(?i)^\d+\.\s+(?P<name>.+?)\s+-\s+(?P<description>.+?),\s+\$?(?P<price>[\d,]+\.?\d*(?:\s+to\s+\$?[\d,]+\.?\d*)?)",
    r"(?i)^\d+\.\s+(?P<name>.+?)\s+-\s+(?P<description>.+?)\s+-\s+Price:\s+\$?(?P<price>[\d,]+\.?\d*(?:\s*-\s*\$?[\d,]+\.?\d*)?)",
    r"(?i)^\d+\.\s+(?P<name>.+?)\s+\((?P<description>[^)]+)\)\s+-\s+Price:\s+\$?(?P<price>[\d,]+\.?\d*)",
];

const LABELLED_HEADERS: &[&str] = &[
    r"(?i)^\d+\.\s+(?P<name>.+?)\s+-\s+(?P<description>.+?)\.\s+Price:\s+\$?(?P<price>[\d,]+\.?\d*)",
    r"(?i)^\d+\.\s+(?P<name>.+?)\s+-\s+(?P<description>.+?)\s+-\s+Price:\s+\$?(?P<price>[\d,]+\.?\d*(?:\s*-\s*\$?[\d,]+\.?\d*)?)",
    r"(?i)^\d+\.\s+(?P<name>.+?)\s+\((?P<description>[^)]+)\)\s+-\s+Price:\s+\$?(?P<price>[\d,]+\.?\d*)",
];

const EXPLICIT_LINK: &str = r"(?i)^(?:-\s*)?Link:\s*(?P<url>https?://\S+)";
const MARKDOWN_LINK: &str = r"(?i)\[View Product\]\((?P<url>https?://[^)]+)\)";
const ANY_CATALOG_URL: &str = r"(?i)^(?P<url>https?://(?:www\.)?\S+\.com/products/\S+)";
const STORE_CATALOG_URL: &str = r"(?i)^(?P<url>https?://(?:www\.)?tentree\.com/products/\S+)";

const EXPLICIT_IMAGE: &str = r"(?i)(?:-\s*)?Image:\s*!\[[^\]]*\]\((?P<url>https?://[^)]+)\)";
const MARKDOWN_IMAGE: &str = r"!\[[^\]]*\]\((?P<url>https?://[^)]+)\)";
const ASSET_HOST_URL: &str = r"(?i)^(?P<url>https?://cdn\.shopify\.com/\S+)";

const CONTINUATION: &str = r"(?i)^(?:-\s*)?Available\b";
const PRICE_RANGE_TAIL: &str = r"(?i)\s*(?:to|-)\s*\$?[\d,]+\.?\d*";

static STOREFRONT: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::compile(&GrammarSpec::storefront()).unwrap());
static LABELLED: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::compile(&GrammarSpec::labelled()).unwrap());

/// Pattern table for one listing dialect, as written in a grammar file.
///
/// Every list is in priority order: index 0 wins over index 1 and so on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarSpec {
    pub name: String,
    pub headers: Vec<String>,
    pub links: Vec<String>,
    pub images: Vec<String>,
    #[serde(default = "default_continuation")]
    pub continuation: String,
    #[serde(default = "default_price_range_tail")]
    pub price_range_tail: String,
}

fn default_continuation() -> String {
    CONTINUATION.to_string()
}

fn default_price_range_tail() -> String {
    PRICE_RANGE_TAIL.to_string()
}

fn owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

impl GrammarSpec {
    /// Comma or `Price:` separated prices, any `*.com/products/` catalog.
    pub fn storefront() -> Self {
        Self {
            name: "storefront".into(),
            headers: owned(STOREFRONT_HEADERS),
            links: owned(&[EXPLICIT_LINK, MARKDOWN_LINK, ANY_CATALOG_URL]),
            images: owned(&[EXPLICIT_IMAGE, MARKDOWN_IMAGE, ASSET_HOST_URL]),
            continuation: default_continuation(),
            price_range_tail: default_price_range_tail(),
        }
    }

    /// `Price:` label always present, single allowlisted catalog domain.
    pub fn labelled() -> Self {
        Self {
            name: "labelled".into(),
            headers: owned(LABELLED_HEADERS),
            links: owned(&[EXPLICIT_LINK, MARKDOWN_LINK, STORE_CATALOG_URL]),
            images: owned(&[EXPLICIT_IMAGE, MARKDOWN_IMAGE, ASSET_HOST_URL]),
            continuation: default_continuation(),
            price_range_tail: default_price_range_tail(),
        }
    }
}

/// Compiled pattern table shared by the classifier, accumulator and segmenter.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub name: String,
    headers: Vec<Regex>,
    links: Vec<Regex>,
    images: Vec<Regex>,
    continuation: Regex,
    price_range_tail: Regex,
}

impl Default for Grammar {
    fn default() -> Self {
        STOREFRONT.clone()
    }
}

impl Grammar {
    pub fn storefront() -> &'static Grammar {
        &STOREFRONT
    }

    pub fn labelled() -> &'static Grammar {
        &LABELLED
    }

    pub fn builtin(name: &str) -> Option<&'static Grammar> {
        match name {
            "storefront" => Some(&STOREFRONT),
            "labelled" => Some(&LABELLED),
            _ => None,
        }
    }

    pub fn compile(spec: &GrammarSpec) -> Result<Self> {
        if spec.headers.is_empty() {
            bail!("grammar '{}' has no header patterns", spec.name);
        }
        Ok(Self {
            name: spec.name.clone(),
            headers: compile_all(&spec.headers, &["name", "description", "price"])
                .with_context(|| format!("grammar '{}': header pattern", spec.name))?,
            links: compile_all(&spec.links, &["url"])
                .with_context(|| format!("grammar '{}': link pattern", spec.name))?,
            images: compile_all(&spec.images, &["url"])
                .with_context(|| format!("grammar '{}': image pattern", spec.name))?,
            continuation: Regex::new(&spec.continuation)
                .with_context(|| format!("grammar '{}': continuation pattern", spec.name))?,
            price_range_tail: Regex::new(&spec.price_range_tail)
                .with_context(|| format!("grammar '{}': price range pattern", spec.name))?,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let spec: GrammarSpec = serde_json::from_str(json).context("invalid grammar JSON")?;
        Self::compile(&spec)
    }

    /// A built-in grammar name, or a path to a grammar JSON file.
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if let Some(g) = Self::builtin(name_or_path) {
            return Ok(g.clone());
        }
        let path = Path::new(name_or_path);
        if !path.exists() {
            bail!(
                "unknown grammar '{}' (expected storefront, labelled, or a JSON file)",
                name_or_path
            );
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading grammar file {}", path.display()))?;
        Self::from_json(&json)
    }

    pub(crate) fn headers(&self) -> &[Regex] {
        &self.headers
    }

    pub(crate) fn links(&self) -> &[Regex] {
        &self.links
    }

    pub(crate) fn images(&self) -> &[Regex] {
        &self.images
    }

    pub(crate) fn is_continuation(&self, line: &str) -> bool {
        self.continuation.is_match(line)
    }

    /// Keep only the first bound of a price range.
    pub(crate) fn first_price(&self, price: &str) -> String {
        self.price_range_tail
            .replace(price.trim(), "")
            .trim()
            .to_string()
    }
}

fn compile_all(patterns: &[String], groups: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let re = Regex::new(p).with_context(|| format!("cannot compile {:?}", p))?;
            let names: Vec<&str> = re.capture_names().flatten().collect();
            for group in groups {
                if !names.contains(group) {
                    bail!("pattern {:?} lacks a `{}` group", p, group);
                }
            }
            Ok(re)
        })
        .collect()
}
