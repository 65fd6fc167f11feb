//! Raw document shape and the YAML reader/writer.
//!
//! ```yaml
//! referenceLevel: -18
//! plugins:
//!   - pluginUri: http://lsp-plug.in/plugins/lv2/comp_mono
//!     parameters:
//!       threshold: "linear(reference - 6)"
//!       ratio: "4"
//! ```
//!
//! Parameter values are always handed to the engine as text. An unquoted scalar
//! such as `ratio: 4` is accepted and carried as the string `"4"`.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// First stage of a configuration: everything as written, nothing evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    /// Seeds the `reference` variable on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_level: Option<f64>,

    #[serde(default)]
    pub plugins: Vec<RawPlugin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlugin {
    pub plugin_uri: String,

    /// Parameter name to literal or expression text, in document order.
    #[serde(default, deserialize_with = "scalar_text_map")]
    pub parameters: IndexMap<String, String>,
}

impl RawPlugin {
    pub fn new(plugin_uri: impl Into<String>) -> Self {
        Self {
            plugin_uri: plugin_uri.into(),
            parameters: IndexMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), text.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_text_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Scalar>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.into_text()))
        .collect())
}

/// Parse a YAML document.
pub fn from_yaml_str(yaml: &str) -> Result<RawDocument, ConfigError> {
    if yaml.trim().is_empty() {
        return Ok(RawDocument::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Render a document as YAML.
pub fn to_yaml_string(doc: &RawDocument) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(doc)?)
}

pub fn read_file(path: impl AsRef<Path>) -> Result<RawDocument, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_yaml_str(&text)
}

pub fn write_file(doc: &RawDocument, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let text = to_yaml_string(doc)?;
    std::fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
