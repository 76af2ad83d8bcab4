use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::{BotbuilderConfig, PageLayout, load_config};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Decode a wizard page description.
pub fn parse_page_str(contents: &str, format: DocumentFormat) -> Result<PageLayout> {
    page_from_value(parse_document_str(contents, format)?)
}

pub fn page_from_value(value: Value) -> Result<PageLayout> {
    serde_json::from_value(value).context("document is not a valid wizard page")
}

/// Decode and schema-check a botbuilder configuration.
pub fn parse_config_str(contents: &str, format: DocumentFormat) -> Result<BotbuilderConfig> {
    load_config(&parse_document_str(contents, format)?)
}
