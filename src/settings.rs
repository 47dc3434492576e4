use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::carousel::DEFAULT_SWIPE_THRESHOLD;

/// Settings read from `LISTING_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Built-in grammar name or path to a grammar JSON file.
    pub grammar: String,
    pub db_path: String,
    pub swipe_threshold: f32,
    pub theme: String,
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grammar: "storefront".into(),
            db_path: "data/listings.sqlite".into(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            theme: "dark".into(),
            currency: "$".into(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_source(Environment::with_prefix("LISTING").try_parsing(true))
    }

    fn from_source(env: Environment) -> Result<Self> {
        Config::builder()
            .add_source(env)
            .build()
            .context("reading LISTING_* settings")?
            .try_deserialize()
            .context("invalid LISTING_* settings")
    }
}
